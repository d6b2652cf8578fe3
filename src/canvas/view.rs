//! Flow Canvas
//!
//! Owns the nodes and the viewport of one diagram and is the only thing
//! allowed to mutate them. Hosts feed it steps and pointer events and
//! receive add/delete requests through [`StepActions`].
//!
//! All positions handed to the canvas are screen coordinates relative to
//! the canvas' own top-left corner.

use super::geometry::{Point, Rect, Vector};
use super::interaction::{DragEffect, Interaction, PointerTarget};
use super::layout::{compute_layout, fit_to_content, LayoutConfig};
use super::node::{Node, ScreenLookup, Step};
use super::path::{connectors, Connector};
use super::transform::{
    Viewport, BUTTON_ZOOM_IN, BUTTON_ZOOM_OUT, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT,
};

/// Side of the square menu button in a node's top-right corner (world units)
pub const MENU_BUTTON_SIZE: f64 = 32.0;

/// Size of the node menu popup (screen units)
pub const MENU_SIZE: Vector = Vector::new(160.0, 44.0);

/// Callbacks the host implements to change its step list
pub trait StepActions {
    /// The user asked for a new step at the end of the flow
    fn on_add_step(&mut self);

    /// The user confirmed deleting `step_id`
    fn on_delete_step(&mut self, step_id: &str);
}

/// Input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    PointerLeave,
    /// `delta_y > 0` scrolls towards the user and zooms out
    Wheel { pos: Point, delta_y: f64 },
    /// A press anywhere in the host window, used to dismiss menus
    DocumentPointerDown(Point),
}

/// What a screen position lands on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeHit {
    Body(String),
    MenuButton(String),
}

/// Per-node popup menu and delete confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    open_for: Option<String>,
    pending_delete: Option<String>,
}

impl MenuState {
    pub fn open_for(&self) -> Option<&str> {
        self.open_for.as_deref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }
}

/// Everything needed to paint one frame
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub nodes: &'a [Node],
    pub connectors: Vec<Connector>,
    pub viewport: Viewport,
}

/// The interactive step diagram
#[derive(Debug, Clone)]
pub struct FlowCanvas {
    config: LayoutConfig,
    nodes: Vec<Node>,
    viewport: Viewport,
    bounds: Rect,
    interaction: Interaction,
    menu: MenuState,
    steps: Vec<Step>,
    screens: ScreenLookup,
    layout_pending: bool,
}

impl Default for FlowCanvas {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl FlowCanvas {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            viewport: Viewport::default(),
            bounds: Rect::default(),
            interaction: Interaction::Idle,
            menu: MenuState::default(),
            steps: Vec::new(),
            screens: ScreenLookup::new(),
            layout_pending: false,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the canvas has been given a usable size
    pub fn is_measurable(&self) -> bool {
        self.bounds.width() > 0.0 && self.bounds.height() > 0.0
    }

    /// Nodes, connectors and viewport for painting
    pub fn scene(&self) -> Scene<'_> {
        Scene {
            nodes: &self.nodes,
            connectors: connectors(&self.nodes),
            viewport: self.viewport,
        }
    }

    /// Relayout only if the steps or screen names differ from the last call.
    ///
    /// Returns whether a relayout happened.
    pub fn sync(&mut self, steps: &[Step], screens: &ScreenLookup) -> bool {
        if self.steps.as_slice() == steps && &self.screens == screens {
            return false;
        }
        self.set_steps(steps.to_vec(), screens.clone());
        true
    }

    /// Replace the step list and rebuild every node from scratch
    pub fn set_steps(&mut self, steps: Vec<Step>, screens: ScreenLookup) {
        self.steps = steps;
        self.screens = screens;
        self.relayout();
    }

    /// Update the canvas size; runs a deferred layout once measurable
    pub fn set_viewport_size(&mut self, size: Vector) {
        self.bounds = Rect::from_min_size(Point::ZERO, size);
        if self.layout_pending && self.is_measurable() {
            self.relayout();
        }
    }

    fn relayout(&mut self) {
        if self.steps.is_empty() {
            self.nodes.clear();
            self.layout_pending = false;
            self.forget_missing_nodes();
            return;
        }

        if !self.is_measurable() {
            log::debug!("Canvas not measurable yet, deferring layout of {} steps", self.steps.len());
            self.nodes.clear();
            self.layout_pending = true;
            self.forget_missing_nodes();
            return;
        }

        self.nodes = compute_layout(&self.steps, &self.screens, self.bounds.width(), &self.config);
        self.layout_pending = false;
        self.forget_missing_nodes();
        log::debug!("Laid out {} steps at width {}", self.nodes.len(), self.bounds.width());
    }

    /// Drop drag/menu state pointing at nodes that no longer exist
    fn forget_missing_nodes(&mut self) {
        let exists = |id: &str, nodes: &[Node]| nodes.iter().any(|n| n.id == id);

        if let Some(id) = self.interaction.dragged_node() {
            if !exists(id, &self.nodes) {
                self.interaction.end();
            }
        }
        if let Some(id) = self.menu.open_for.as_deref() {
            if !exists(id, &self.nodes) {
                self.menu.open_for = None;
            }
        }
        if let Some(id) = self.menu.pending_delete.as_deref() {
            if !exists(id, &self.nodes) {
                self.menu.pending_delete = None;
            }
        }
    }

    /// World-space rectangle of a node's menu button
    pub fn menu_button_rect(&self, node: &Node) -> Rect {
        Rect::from_min_size(
            Point::new(node.position.x + node.size.x - MENU_BUTTON_SIZE, node.position.y),
            Vector::new(MENU_BUTTON_SIZE, MENU_BUTTON_SIZE),
        )
    }

    /// Topmost node under a screen position
    pub fn hit_test(&self, screen: Point) -> Option<NodeHit> {
        let world = self.viewport.to_world(screen);
        self.nodes.iter().rev().find(|n| n.contains(world)).map(|node| {
            if self.menu_button_rect(node).contains(world) {
                NodeHit::MenuButton(node.id.clone())
            } else {
                NodeHit::Body(node.id.clone())
            }
        })
    }

    /// Screen-space rectangle of the open menu popup
    pub fn menu_bounds(&self) -> Option<Rect> {
        let node = self.node(self.menu.open_for()?)?;
        let button = self.menu_button_rect(node);
        let top_right = self.viewport.to_screen(Point::new(button.max.x, button.max.y));
        Some(Rect::from_min_size(
            Point::new(top_right.x - MENU_SIZE.x, top_right.y),
            MENU_SIZE,
        ))
    }

    /// Route one host event
    pub fn dispatch(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::PointerDown(pos) => self.pointer_down(pos),
            CanvasEvent::PointerMove(pos) => self.pointer_move(pos),
            CanvasEvent::PointerUp => self.pointer_up(),
            CanvasEvent::PointerLeave => self.pointer_leave(),
            CanvasEvent::Wheel { pos, delta_y } => {
                self.wheel(pos, delta_y);
            }
            CanvasEvent::DocumentPointerDown(pos) => self.document_pointer_down(pos),
        }
    }

    pub fn pointer_down(&mut self, pos: Point) {
        if self.menu_bounds().is_some_and(|menu| menu.contains(pos)) {
            return;
        }

        match self.hit_test(pos) {
            Some(NodeHit::MenuButton(id)) => self.toggle_menu(&id),
            Some(NodeHit::Body(id)) => {
                self.interaction.pointer_down(PointerTarget::Node(id), pos);
            }
            None => {
                self.interaction.pointer_down(PointerTarget::Board, pos);
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Point) {
        if let Some(effect) = self.interaction.pointer_move(pos, self.viewport.zoom()) {
            self.apply(effect);
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction.end();
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.end();
    }

    fn apply(&mut self, effect: DragEffect) {
        match effect {
            DragEffect::MoveNode {
                node_id,
                world_delta,
            } => {
                if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
                    node.position += world_delta;
                }
            }
            DragEffect::Pan { screen_delta } => self.viewport.pan_by(screen_delta),
        }
    }

    /// Zoom around the pointer. Returns whether anything changed.
    pub fn wheel(&mut self, pos: Point, delta_y: f64) -> bool {
        if self.nodes.is_empty() || !self.is_measurable() || !self.bounds.contains(pos) {
            return false;
        }
        if delta_y == 0.0 || delta_y.is_nan() {
            return false;
        }

        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        self.viewport.zoom_by(pos, factor);
        true
    }

    /// Toolbar zoom in, anchored at the canvas centre
    pub fn zoom_in(&mut self) {
        self.zoom_centered(BUTTON_ZOOM_IN);
    }

    /// Toolbar zoom out, anchored at the canvas centre
    pub fn zoom_out(&mut self) {
        self.zoom_centered(BUTTON_ZOOM_OUT);
    }

    fn zoom_centered(&mut self, factor: f64) {
        if !self.is_measurable() {
            return;
        }
        self.viewport.zoom_by(self.bounds.center(), factor);
    }

    /// Restore a saved view
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Viewport::new(viewport.pan(), viewport.zoom());
    }

    /// Frame all nodes; no-op while the canvas has no size
    pub fn reset_view(&mut self) {
        if let Some(viewport) = fit_to_content(&self.nodes, self.bounds, &self.config) {
            log::debug!(
                "Reset view: zoom {:.3}, pan ({:.1}, {:.1})",
                viewport.zoom(),
                viewport.pan().x,
                viewport.pan().y
            );
            self.viewport = viewport;
        }
    }

    pub fn toggle_menu(&mut self, node_id: &str) {
        if self.menu.open_for.as_deref() == Some(node_id) {
            self.menu.open_for = None;
        } else if self.node(node_id).is_some() {
            self.menu.open_for = Some(node_id.to_string());
        }
    }

    pub fn close_menu(&mut self) {
        self.menu.open_for = None;
    }

    /// Close the open menu when a press lands outside it.
    ///
    /// Presses on the owning node's menu button are left to `pointer_down`,
    /// which toggles the menu.
    pub fn document_pointer_down(&mut self, pos: Point) {
        let Some(menu) = self.menu_bounds() else {
            return;
        };
        if menu.contains(pos) {
            return;
        }
        let on_own_button = matches!(
            self.hit_test(pos),
            Some(NodeHit::MenuButton(id)) if self.menu.open_for.as_deref() == Some(id.as_str())
        );
        if !on_own_button {
            self.close_menu();
        }
    }

    /// Ask the user to confirm deleting a step
    pub fn request_delete(&mut self, node_id: &str) {
        self.menu.open_for = None;
        if self.node(node_id).is_some() {
            self.menu.pending_delete = Some(node_id.to_string());
        }
    }

    pub fn cancel_delete(&mut self) {
        self.menu.pending_delete = None;
    }

    /// Forward a confirmed delete to the host
    pub fn confirm_delete(&mut self, actions: &mut dyn StepActions) {
        if let Some(id) = self.menu.pending_delete.take() {
            log::debug!("Deleting step {}", id);
            actions.on_delete_step(&id);
        }
    }

    pub fn add_step(&mut self, actions: &mut dyn StepActions) {
        log::debug!("Requesting new step after {} steps", self.steps.len());
        actions.on_add_step();
    }
}
