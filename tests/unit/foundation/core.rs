use super::*;

#[test]
fn canvas_rejects_empty_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(640, 480).unwrap();
    assert_eq!(c.center(), Point::new(320.0, 240.0));
    assert_eq!(c.rgba8_len(), 640 * 480 * 4);
}

#[test]
fn millis_add_saturates() {
    assert_eq!(
        Millis(100).saturating_add(Duration::from_millis(200)),
        Millis(300)
    );
    assert_eq!(
        Millis(u64::MAX - 1).saturating_add(Duration::from_secs(10)),
        Millis(u64::MAX)
    );
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_and_clears_transparent() {
    let mut px = vec![10, 20, 30, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);

    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
}

#[test]
fn unpremultiply_half_alpha_is_close_to_source() {
    let mut px = vec![200, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[..3].iter().zip([200u8, 100, 50]) {
        assert!(got.abs_diff(want) <= 2, "{got} vs {want}");
    }
    assert_eq!(px[3], 128);
}
