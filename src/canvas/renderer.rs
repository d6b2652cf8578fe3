//! Interactive Flow Renderer
//!
//! Native egui widget around [`FlowCanvas`]:
//! - Pan (drag empty board) and cursor-anchored zoom (mouse wheel)
//! - Node dragging
//! - Per-node menu with delete confirmation
//! - Toolbar: add step, zoom, reset view, grid toggle
//!
//! egui reports window coordinates; everything is shifted by the canvas
//! origin before it reaches the engine.

use eframe::egui::{
    self, epaint::CubicBezierShape, Align2, Color32, CursorIcon, FontId, Painter, Pos2, Rect,
    Sense, Stroke, Vec2,
};

use super::geometry::{Point, Vector};
use super::node::Node;
use super::theme::CanvasTheme;
use super::transform::Viewport;
use super::view::{CanvasEvent, FlowCanvas, NodeHit, StepActions, MENU_BUTTON_SIZE, MENU_SIZE};
use crate::config::StudioConfig;

/// Toolbar size in screen pixels
const TOOLBAR_SIZE: Vec2 = Vec2::new(360.0, 32.0);

/// Main flow viewer widget
pub struct FlowViewer {
    /// The engine
    pub canvas: FlowCanvas,

    /// Theme for rendering
    pub theme: CanvasTheme,

    /// Whether to show grid
    pub show_grid: bool,

    /// Grid size in world units
    pub grid_size: f32,

    /// Show toolbar
    pub show_toolbar: bool,

    /// Node under the pointer, refreshed every frame
    hovered_node: Option<String>,
}

impl Default for FlowViewer {
    fn default() -> Self {
        Self::new(FlowCanvas::default())
    }
}

impl FlowViewer {
    pub fn new(canvas: FlowCanvas) -> Self {
        Self {
            canvas,
            theme: CanvasTheme::dark(),
            show_grid: true,
            grid_size: 24.0,
            show_toolbar: true,
            hovered_node: None,
        }
    }

    /// Build a viewer from the `[canvas]` and `[layout]` config sections
    pub fn from_config(config: &StudioConfig) -> Self {
        let mut theme = CanvasTheme::from_kind(config.canvas.theme);
        if let Some(ref accent) = config.canvas.accent {
            theme = theme.with_accent(accent);
        }

        Self {
            canvas: FlowCanvas::new(config.layout.clone()),
            theme,
            show_grid: config.canvas.show_grid,
            grid_size: config.canvas.grid_size,
            show_toolbar: config.canvas.show_toolbar,
            hovered_node: None,
        }
    }

    /// Main UI function
    pub fn ui(&mut self, ui: &mut egui::Ui, actions: &mut dyn StepActions) {
        let available_size = ui.available_size();
        let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
        let rect = response.rect;

        self.canvas.set_viewport_size(Vector::from(rect.size()));

        painter.rect_filled(rect, 0.0, self.theme.canvas_bg);
        if self.show_grid {
            self.draw_grid(&painter, rect);
        }

        let toolbar_rect = Rect::from_min_size(rect.min + Vec2::new(10.0, 10.0), TOOLBAR_SIZE);
        self.handle_input(ui, &response, rect, toolbar_rect);

        let scene = self.canvas.scene();
        let viewport = scene.viewport;

        // Connectors first (behind nodes)
        for connector in &scene.connectors {
            let points = connector.points().map(|p| to_egui(rect, &viewport, p));
            painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new((2.0 * viewport.zoom() as f32).max(1.0), self.theme.edge_color),
            ));
        }

        for (index, node) in scene.nodes.iter().enumerate() {
            self.draw_node(&painter, rect, &viewport, index, node);
        }

        if self.canvas.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No steps yet. Use \"+ Add step\" to start the flow.",
                FontId::proportional(16.0),
                self.theme.node_text_dim,
            );
        }

        if self.show_toolbar {
            self.draw_toolbar(ui, &painter, toolbar_rect, actions);
        }

        self.draw_menu(ui.ctx(), rect);
        self.draw_delete_confirmation(ui.ctx(), actions);
    }

    /// Translate egui input into canvas events
    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, rect: Rect, toolbar_rect: Rect) {
        let (hover, press, released, scroll) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                if i.pointer.primary_pressed() {
                    i.pointer.interact_pos()
                } else {
                    None
                },
                i.pointer.primary_released(),
                i.raw_scroll_delta.y,
            )
        });
        let local = |p: Pos2| Point::from(p - rect.min.to_vec2());
        let show_toolbar = self.show_toolbar;
        let over_toolbar = |p: Pos2| show_toolbar && toolbar_rect.contains(p);

        if let Some(p) = press {
            self.canvas.dispatch(CanvasEvent::DocumentPointerDown(local(p)));
            if response.hovered() && rect.contains(p) && !over_toolbar(p) {
                self.canvas.dispatch(CanvasEvent::PointerDown(local(p)));
            }
        }

        match hover {
            Some(p) if rect.contains(p) => {
                if !self.canvas.interaction().is_idle() {
                    self.canvas.dispatch(CanvasEvent::PointerMove(local(p)));
                }
            }
            _ => {
                if !self.canvas.interaction().is_idle() {
                    self.canvas.dispatch(CanvasEvent::PointerLeave);
                }
            }
        }

        if released {
            self.canvas.dispatch(CanvasEvent::PointerUp);
        }

        if response.hovered() && scroll != 0.0 {
            if let Some(p) = hover {
                // egui: positive y scrolls away from the user
                self.canvas.dispatch(CanvasEvent::Wheel {
                    pos: local(p),
                    delta_y: -scroll as f64,
                });
            }
        }

        self.hovered_node = hover
            .filter(|p| rect.contains(*p))
            .and_then(|p| self.canvas.hit_test(local(p)))
            .map(|hit| match hit {
                NodeHit::Body(id) | NodeHit::MenuButton(id) => id,
            });

        if self.canvas.interaction().dragged_node().is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if self.hovered_node.is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }

        if response.hovered() {
            let (fit, grid, zoom_in, zoom_out) = ui.input(|i| {
                (
                    i.key_pressed(egui::Key::F),
                    i.key_pressed(egui::Key::G),
                    i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals),
                    i.key_pressed(egui::Key::Minus),
                )
            });
            if fit {
                self.canvas.reset_view();
            }
            if grid {
                self.show_grid = !self.show_grid;
            }
            if zoom_in {
                self.canvas.zoom_in();
            }
            if zoom_out {
                self.canvas.zoom_out();
            }
        }
    }

    /// Draw the grid
    fn draw_grid(&self, painter: &Painter, rect: Rect) {
        let viewport = self.canvas.viewport();
        let grid_size = self.grid_size * viewport.zoom() as f32;
        if grid_size < 4.0 {
            return;
        }

        let pan: Vec2 = viewport.pan().into();
        let start = rect.min + Vec2::new(pan.x.rem_euclid(grid_size), pan.y.rem_euclid(grid_size));
        let stroke = Stroke::new(1.0, self.theme.grid_color);

        let mut x = start.x;
        while x < rect.max.x {
            painter.line_segment([Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)], stroke);
            x += grid_size;
        }

        let mut y = start.y;
        while y < rect.max.y {
            painter.line_segment([Pos2::new(rect.min.x, y), Pos2::new(rect.max.x, y)], stroke);
            y += grid_size;
        }
    }

    /// Draw a node
    fn draw_node(&self, painter: &Painter, canvas_rect: Rect, viewport: &Viewport, index: usize, node: &Node) {
        let zoom = viewport.zoom() as f32;
        let min = to_egui(canvas_rect, viewport, node.position);
        let rect = Rect::from_min_size(min, Vec2::from(node.size) * zoom);
        if !rect.intersects(canvas_rect) {
            return;
        }

        let dragging = self.canvas.interaction().dragged_node() == Some(node.id.as_str());
        let hovered = self.hovered_node.as_deref() == Some(node.id.as_str());
        let (stroke_color, stroke_width) = if dragging {
            (self.theme.node_dragging, 2.5)
        } else if hovered {
            (self.theme.node_hover, 2.0)
        } else {
            (self.theme.node_stroke, 1.5)
        };

        painter.rect(rect, 8.0 * zoom, self.theme.node_fill, Stroke::new(stroke_width, stroke_color));

        let pad = 12.0 * zoom;
        let mut header = format!("Step {}", index + 1);
        if node.is_first {
            header.push_str("  · START");
        }
        if node.is_last {
            header.push_str("  · END");
        }
        let header_color = match (node.is_first, node.is_last) {
            (true, _) => self.theme.marker_start,
            (_, true) => self.theme.marker_end,
            _ => self.theme.node_text_dim,
        };
        painter.text(
            rect.min + Vec2::new(pad, pad),
            Align2::LEFT_TOP,
            header,
            FontId::proportional(12.0 * zoom),
            header_color,
        );

        // Menu button
        let button = Rect::from_min_size(
            Pos2::new(rect.max.x - MENU_BUTTON_SIZE as f32 * zoom, rect.min.y),
            Vec2::splat(MENU_BUTTON_SIZE as f32 * zoom),
        );
        painter.text(
            button.center(),
            Align2::CENTER_CENTER,
            "⋮",
            FontId::proportional(16.0 * zoom),
            self.theme.node_text_dim,
        );

        let wrap_width = (rect.width() - 2.0 * pad).max(1.0);
        let galley = painter.layout(
            node.description.clone(),
            FontId::proportional(14.0 * zoom),
            self.theme.node_text,
            wrap_width,
        );
        painter.galley(rect.min + Vec2::new(pad, pad + 20.0 * zoom), galley, self.theme.node_text);

        if let Some(ref screen) = node.screen_name {
            let font = FontId::proportional(11.0 * zoom);
            let badge_text = painter.layout_no_wrap(format!("▣ {}", screen), font, self.theme.node_text_dim);
            let badge_rect = Rect::from_min_size(
                Pos2::new(rect.min.x + pad, rect.max.y - pad - badge_text.size().y - 4.0 * zoom),
                badge_text.size() + Vec2::new(8.0, 4.0) * zoom,
            );
            painter.rect_filled(badge_rect, 4.0 * zoom, self.theme.badge_bg);
            painter.galley(badge_rect.min + Vec2::new(4.0, 2.0) * zoom, badge_text, self.theme.node_text_dim);
        }
    }

    /// Draw toolbar
    fn draw_toolbar(&mut self, ui: &mut egui::Ui, painter: &Painter, toolbar_rect: Rect, actions: &mut dyn StepActions) {
        painter.rect_filled(toolbar_rect.expand(2.0), 6.0, self.theme.panel_bg);

        ui.allocate_new_ui(egui::UiBuilder::new().max_rect(toolbar_rect.shrink(4.0)), |ui| {
            ui.horizontal(|ui| {
                if ui.small_button("+ Add step").clicked() {
                    self.canvas.add_step(actions);
                }
                ui.separator();
                if ui.small_button("−").on_hover_text("Zoom out (-)").clicked() {
                    self.canvas.zoom_out();
                }
                ui.label(format!("{:.0}%", self.canvas.viewport().zoom() * 100.0));
                if ui.small_button("+").on_hover_text("Zoom in (+)").clicked() {
                    self.canvas.zoom_in();
                }
                if ui.small_button("⊞").on_hover_text("Reset view (F)").clicked() {
                    self.canvas.reset_view();
                }
                if ui.small_button("▦").on_hover_text("Toggle grid (G)").clicked() {
                    self.show_grid = !self.show_grid;
                }
            });
        });
    }

    /// Draw the open node menu
    fn draw_menu(&mut self, ctx: &egui::Context, canvas_rect: Rect) {
        let (Some(bounds), Some(node_id)) = (
            self.canvas.menu_bounds(),
            self.canvas.menu().open_for().map(str::to_string),
        ) else {
            return;
        };

        let mut delete = false;
        egui::Area::new(egui::Id::new("flow-node-menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(canvas_rect.min + Vec2::new(bounds.min.x as f32, bounds.min.y as f32))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(self.theme.panel_bg)
                    .show(ui, |ui| {
                        ui.set_min_width(MENU_SIZE.x as f32 - 16.0);
                        let label = egui::RichText::new("🗑 Delete step").color(self.theme.danger);
                        if ui.button(label).clicked() {
                            delete = true;
                        }
                    });
            });

        if delete {
            self.canvas.request_delete(&node_id);
        }
    }

    /// Ask before forwarding a delete to the host
    fn draw_delete_confirmation(&mut self, ctx: &egui::Context, actions: &mut dyn StepActions) {
        let Some(node) = self
            .canvas
            .menu()
            .pending_delete()
            .and_then(|id| self.canvas.node(id))
        else {
            return;
        };
        let description = node.description.clone();

        let mut confirm = false;
        let mut cancel = false;
        egui::Window::new("Delete step?")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("\"{}\" will be removed from the flow.", description));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let delete = egui::RichText::new("Delete").color(self.theme.danger);
                    if ui.button(delete).clicked() {
                        confirm = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if confirm {
            self.canvas.confirm_delete(actions);
        } else if cancel {
            self.canvas.cancel_delete();
        }
    }
}

/// World point -> absolute egui position
fn to_egui(canvas_rect: Rect, viewport: &Viewport, world: Point) -> Pos2 {
    Pos2::from(viewport.to_screen(world)) + canvas_rect.min.to_vec2()
}
