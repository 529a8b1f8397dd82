use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 1200,
        height: 628,
    }
}

#[test]
fn fit_scales_to_canvas_width_and_centers() {
    let vp = ViewportState::fit(canvas(), 2400, 1600);
    assert_eq!(vp.scale, 0.5);
    assert_eq!(vp.min_scale, 0.25);
    assert_eq!(vp.max_scale, 1.5);
    assert_eq!(vp.scaled_size(), Vec2::new(1200.0, 800.0));
    assert_eq!(vp.origin, Point::new(0.0, -86.0));
    assert!(!vp.placed);
}

#[test]
fn zoom_keeps_image_center_fixed() {
    let mut vp = ViewportState::fit(canvas(), 1200, 600);
    let before = vp.bounds().center();
    assert!(vp.zoom(-1.0));
    assert!((vp.scale - 1.05).abs() < 1e-12);
    let after = vp.bounds().center();
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}

#[test]
fn zoom_is_clamped_for_any_sequence() {
    let mut vp = ViewportState::fit(canvas(), 800, 800);
    let mut state = 0x2545_f491_4f6c_dd1du64;
    for _ in 0..2000 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let delta = (state % 7) as f64 - 3.0;
        vp.zoom(delta);
        assert!(vp.scale >= vp.min_scale && vp.scale <= vp.max_scale);
    }
    for _ in 0..500 {
        vp.zoom(1.0);
    }
    assert_eq!(vp.scale, vp.min_scale);
    for _ in 0..500 {
        vp.zoom(-1.0);
    }
    assert_eq!(vp.scale, vp.max_scale);
}

#[test]
fn zero_delta_zooms_in_one_notch() {
    let mut vp = ViewportState::fit(canvas(), 1200, 600);
    let center = vp.bounds().center();
    assert!(vp.zoom(0.0));
    assert!((vp.scale - 1.05).abs() < 1e-12);
    assert!((vp.bounds().center().x - center.x).abs() < 1e-9);

    let before = vp.clone();
    assert!(!vp.zoom(f64::NAN));
    assert_eq!(vp, before);
}

#[test]
fn drag_moves_only_when_grabbed_inside() {
    let mut vp = ViewportState::fit(canvas(), 1200, 600);
    assert!(!vp.begin_drag(Point::new(10.0, 5.0)));
    assert!(!vp.drag_to(Point::new(50.0, 50.0)));

    assert!(vp.begin_drag(Point::new(100.0, 100.0)));
    assert!(vp.drag_to(Point::new(130.0, 90.0)));
    assert_eq!(vp.origin, Point::new(30.0, 4.0));
    vp.end_drag();
    assert!(!vp.is_dragging());
    assert!(!vp.drag_to(Point::new(500.0, 500.0)));
}

#[test]
fn placement_freezes_drag_and_zoom() {
    let mut vp = ViewportState::fit(canvas(), 1200, 600);
    assert!(vp.begin_drag(Point::new(600.0, 300.0)));
    vp.place();
    let frozen = vp.clone();
    assert!(!vp.drag_to(Point::new(0.0, 0.0)));
    assert!(!vp.zoom(1.0));
    assert!(!vp.begin_drag(Point::new(600.0, 300.0)));
    assert_eq!(vp, frozen);
}
