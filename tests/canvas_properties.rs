//! End-to-end behaviour of the flow canvas through its public API

use flow_studio::canvas::{
    CanvasEvent, FlowCanvas, Point, ScreenLookup, Step, StepActions, Vector, Viewport, MAX_ZOOM,
    MIN_ZOOM,
};
use flow_studio::{FlowDocument, StepStore};

const EPS: f64 = 1e-6;

fn steps(n: usize) -> Vec<Step> {
    (0..n).map(|i| Step::new(format!("step-{}", i), format!("Step {}", i))).collect()
}

fn canvas_with(n: usize) -> FlowCanvas {
    let mut canvas = FlowCanvas::default();
    canvas.set_viewport_size(Vector::new(1000.0, 600.0));
    canvas.set_steps(steps(n), ScreenLookup::new());
    canvas
}

/// A screen point on node `i`, away from its menu button
fn grab_point(canvas: &FlowCanvas, i: usize) -> Point {
    let node = &canvas.nodes()[i];
    canvas.viewport().to_screen(node.position + Vector::new(30.0, 80.0))
}

#[test]
fn zoom_anchor_holds_for_any_cursor() {
    let cursors = [Point::new(500.0, 300.0), Point::new(3.0, 590.0), Point::new(999.0, 1.0)];
    let mut canvas = canvas_with(3);
    canvas.pointer_down(Point::new(2.0, 2.0));
    canvas.pointer_move(Point::new(-80.0, 45.0));
    canvas.pointer_up();

    for cursor in cursors {
        for delta in [1.0, -1.0, 1.0, 1.0, -1.0] {
            let before = canvas.viewport().to_world(cursor);
            canvas.dispatch(CanvasEvent::Wheel { pos: cursor, delta_y: delta });
            let after = canvas.viewport().to_world(cursor);
            assert!(after.approx_eq(before, EPS), "{:?} moved to {:?}", before, after);
        }
    }
}

#[test]
fn zoom_clamps_at_both_ends() {
    let mut vp = Viewport::default();
    for _ in 0..100 {
        vp.zoom_at(Point::new(500.0, 300.0), vp.zoom() * 1.1);
    }
    assert_eq!(vp.zoom(), MAX_ZOOM);

    let mut vp = Viewport::default();
    for _ in 0..100 {
        vp.zoom_at(Point::new(500.0, 300.0), vp.zoom() * 0.9);
    }
    assert_eq!(vp.zoom(), MIN_ZOOM);
}

#[test]
fn three_steps_layout_exactly() {
    let canvas = canvas_with(3);
    let positions: Vec<Point> = canvas.nodes().iter().map(|n| n.position).collect();
    assert_eq!(
        positions,
        vec![Point::new(50.0, 150.0), Point::new(450.0, 150.0), Point::new(850.0, 150.0)]
    );
}

#[test]
fn drag_is_scaled_by_zoom() {
    let mut canvas = canvas_with(3);
    canvas.set_viewport(Viewport::new(Vector::new(-40.0, 10.0), 2.0));

    let start = grab_point(&canvas, 1);
    let before = canvas.nodes()[1].position;
    canvas.dispatch(CanvasEvent::PointerDown(start));
    canvas.dispatch(CanvasEvent::PointerMove(start + Vector::new(40.0, -18.0)));
    canvas.dispatch(CanvasEvent::PointerUp);

    let moved = canvas.nodes()[1].position - before;
    assert!(moved.approx_eq(Vector::new(20.0, -9.0), EPS));
}

#[test]
fn board_pan_moves_every_node_on_screen_by_delta() {
    for zoom_steps in [0, 2, 5] {
        let mut canvas = canvas_with(3);
        for _ in 0..zoom_steps {
            canvas.zoom_out();
        }
        let vp = canvas.viewport();
        let before: Vec<Point> = canvas.nodes().iter().map(|n| vp.to_screen(n.position)).collect();

        let start = Point::new(5.0, 590.0);
        canvas.dispatch(CanvasEvent::PointerDown(start));
        canvas.dispatch(CanvasEvent::PointerMove(start + Vector::new(12.0, -7.0)));
        canvas.dispatch(CanvasEvent::PointerMove(start + Vector::new(33.0, 21.0)));
        canvas.dispatch(CanvasEvent::PointerUp);

        let vp = canvas.viewport();
        for (node, old) in canvas.nodes().iter().zip(&before) {
            let shift = vp.to_screen(node.position) - *old;
            assert!(shift.approx_eq(Vector::new(33.0, 21.0), EPS), "zoom steps {}", zoom_steps);
        }
    }
}

#[test]
fn adding_a_step_resets_dragged_positions() {
    let mut store = StepStore::new(FlowDocument {
        name: None,
        steps: steps(3),
        screens: Vec::new(),
    });
    let mut canvas = FlowCanvas::default();
    canvas.set_viewport_size(Vector::new(1000.0, 600.0));
    canvas.sync(store.steps(), &ScreenLookup::new());

    let start = grab_point(&canvas, 0);
    canvas.pointer_down(start);
    canvas.pointer_move(start + Vector::new(120.0, 200.0));
    canvas.pointer_up();
    assert_ne!(canvas.nodes()[0].position, Point::new(50.0, 150.0));

    canvas.add_step(&mut store);
    assert!(canvas.sync(store.steps(), &ScreenLookup::new()));

    assert_eq!(canvas.nodes().len(), 4);
    assert_eq!(canvas.nodes()[0].position, Point::new(50.0, 150.0));
    assert!(canvas.nodes()[3].is_last);
    assert!(!canvas.nodes()[2].is_last);
}

#[test]
fn wheel_out_from_identity() {
    let mut canvas = canvas_with(3);
    canvas.dispatch(CanvasEvent::Wheel {
        pos: Point::new(500.0, 300.0),
        delta_y: 120.0,
    });
    let vp = canvas.viewport();
    assert!((vp.zoom() - 0.9).abs() < EPS);
    assert!(vp.pan().approx_eq(Vector::new(50.0, 30.0), EPS));
}

#[test]
fn delete_flows_back_through_host() {
    struct Host(Vec<String>);
    impl StepActions for Host {
        fn on_add_step(&mut self) {}
        fn on_delete_step(&mut self, step_id: &str) {
            self.0.push(step_id.to_string());
        }
    }

    let mut canvas = canvas_with(2);
    let mut host = Host(Vec::new());
    canvas.request_delete("step-1");
    canvas.confirm_delete(&mut host);
    assert_eq!(host.0, vec!["step-1".to_string()]);
}
