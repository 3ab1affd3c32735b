use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn zoom_never_leaves_bounds() {
    let bounds = ZoomBounds::default();
    let mut t = Transform::default();
    for _ in 0..1000 {
        t.apply(TransformDelta::zoom(1.0), bounds);
    }
    assert_eq!(t.zoom, 2.0);

    for _ in 0..1000 {
        t.apply(TransformDelta::zoom(-1.0), bounds);
    }
    assert_eq!(t.zoom, 0.5);

    t.apply(TransformDelta::zoom(f64::NAN), bounds);
    assert_eq!(t.zoom, 0.5);
}

#[test]
fn rotation_wraps_to_non_negative() {
    let bounds = ZoomBounds::default();
    let mut t = Transform::default();
    t.apply(TransformDelta::rotate(-90.0), bounds);
    assert_eq!(t.rotation_deg, 270.0);

    t.apply(TransformDelta::rotate(90.0), bounds);
    assert_eq!(t.rotation_deg, 0.0);

    t.apply(TransformDelta::rotate(720.0 + 45.0), bounds);
    assert_eq!(t.rotation_deg, 45.0);
}

#[test]
fn wrap_degrees_edges() {
    assert_eq!(wrap_degrees(360.0), 0.0);
    assert_eq!(wrap_degrees(-360.0), 0.0);
    assert_eq!(wrap_degrees(-1e-20), 0.0);
    assert_eq!(wrap_degrees(f64::INFINITY), 0.0);
    assert!(wrap_degrees(359.5) < 360.0);
}

#[test]
fn drag_without_rotation_is_scaled_raw_delta() {
    for (x, y) in [(1.0, 0.0), (-3.0, 4.0), (12.5, -7.25), (0.0, 0.0)] {
        let d = screen_to_layer_delta(Vec2::new(x, y), 0.0, 1.5);
        assert!(approx(d.x, x * 1.5) && approx(d.y, y * 1.5), "{d:?}");
    }
}

#[test]
fn drag_at_quarter_turn_swaps_axes() {
    let horizontal = screen_to_layer_delta(Vec2::new(10.0, 0.0), 90.0, 1.5);
    assert!(approx(horizontal.x, 0.0));
    assert!(approx(horizontal.y, -15.0));

    let vertical = screen_to_layer_delta(Vec2::new(0.0, 10.0), 90.0, 1.5);
    assert!(approx(vertical.x, 15.0));
    assert!(approx(vertical.y, 0.0));
}

#[test]
fn pan_accumulates_and_noop_detection() {
    let mut t = Transform::default();
    t.apply(TransformDelta::pan(Vec2::new(1.0, 2.0)), ZoomBounds::default());
    t.apply(TransformDelta::pan(Vec2::new(3.0, -4.0)), ZoomBounds::default());
    assert_eq!(t.offset, Vec2::new(4.0, -2.0));
    assert!(TransformDelta::default().is_noop());
    assert!(!TransformDelta::rotate(90.0).is_noop());
}
