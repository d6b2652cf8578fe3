//! Pointer Interaction
//!
//! One drag session at a time: either a node is being moved or the board
//! is being panned. The machine only decides *what* should change; the
//! canvas applies the returned [`DragEffect`] to its nodes and viewport.

use super::geometry::{Point, Vector};

/// What a pointer-down landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// The body of a node
    Node(String),
    /// Empty board surface
    Board,
}

/// Current drag session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    DraggingNode {
        node_id: String,
        last_pointer: Point,
    },
    PanningBoard {
        last_pointer: Point,
    },
}

/// Mutation requested by a pointer move
#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    /// Move a node by a world-space delta
    MoveNode { node_id: String, world_delta: Vector },
    /// Translate the board by a screen-space delta
    Pan { screen_delta: Vector },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// Id of the node being dragged, if any
    pub fn dragged_node(&self) -> Option<&str> {
        match self {
            Interaction::DraggingNode { node_id, .. } => Some(node_id),
            _ => None,
        }
    }

    /// Start a session. Ignored unless idle, so an active node drag is
    /// never replaced by a pan (and vice versa).
    ///
    /// Returns whether a session was started.
    pub fn pointer_down(&mut self, target: PointerTarget, pos: Point) -> bool {
        if !self.is_idle() {
            return false;
        }

        *self = match target {
            PointerTarget::Node(node_id) => Interaction::DraggingNode {
                node_id,
                last_pointer: pos,
            },
            PointerTarget::Board => Interaction::PanningBoard { last_pointer: pos },
        };
        true
    }

    /// Advance the session to `pos`.
    ///
    /// Node drags are divided by `zoom` so the node tracks the pointer at
    /// any zoom level; pans stay in screen units.
    pub fn pointer_move(&mut self, pos: Point, zoom: f64) -> Option<DragEffect> {
        match self {
            Interaction::Idle => None,
            Interaction::DraggingNode {
                node_id,
                last_pointer,
            } => {
                let delta = pos - *last_pointer;
                *last_pointer = pos;
                Some(DragEffect::MoveNode {
                    node_id: node_id.clone(),
                    world_delta: delta / zoom,
                })
            }
            Interaction::PanningBoard { last_pointer } => {
                let delta = pos - *last_pointer;
                *last_pointer = pos;
                Some(DragEffect::Pan {
                    screen_delta: delta,
                })
            }
        }
    }

    /// Pointer released or left the canvas
    pub fn end(&mut self) {
        *self = Interaction::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_drag_scaled_by_zoom() {
        let mut interaction = Interaction::default();
        assert!(interaction.pointer_down(PointerTarget::Node("a".into()), Point::new(100.0, 100.0)));

        let effect = interaction.pointer_move(Point::new(140.0, 80.0), 2.0);
        assert_eq!(
            effect,
            Some(DragEffect::MoveNode {
                node_id: "a".into(),
                world_delta: Vector::new(20.0, -10.0),
            })
        );

        // deltas are relative to the previous move, not the press
        let effect = interaction.pointer_move(Point::new(150.0, 80.0), 2.0);
        assert_eq!(
            effect,
            Some(DragEffect::MoveNode {
                node_id: "a".into(),
                world_delta: Vector::new(5.0, 0.0),
            })
        );
    }

    #[test]
    fn test_pan_is_unscaled() {
        let mut interaction = Interaction::default();
        interaction.pointer_down(PointerTarget::Board, Point::new(0.0, 0.0));
        let effect = interaction.pointer_move(Point::new(30.0, 40.0), 0.5);
        assert_eq!(
            effect,
            Some(DragEffect::Pan {
                screen_delta: Vector::new(30.0, 40.0)
            })
        );
    }

    #[test]
    fn test_one_session_at_a_time() {
        let mut interaction = Interaction::default();
        interaction.pointer_down(PointerTarget::Node("a".into()), Point::ZERO);
        assert!(!interaction.pointer_down(PointerTarget::Board, Point::ZERO));
        assert_eq!(interaction.dragged_node(), Some("a"));

        interaction.end();
        assert!(interaction.is_idle());
        assert!(interaction.pointer_down(PointerTarget::Board, Point::ZERO));
        assert!(!interaction.pointer_down(PointerTarget::Node("b".into()), Point::ZERO));
    }

    #[test]
    fn test_idle_move_does_nothing() {
        let mut interaction = Interaction::default();
        assert_eq!(interaction.pointer_move(Point::new(5.0, 5.0), 1.0), None);
    }
}
