use super::*;

#[test]
fn caption_padding_expands_horizontally_and_shrinks_vertically() {
    let r = Edges::CAPTION.expand(Rect::new(10.0, 20.0, 60.0, 70.0));
    assert_eq!(r, Rect::new(7.0, 24.0, 63.0, 66.0));
}

#[test]
fn edges_reject_nan() {
    let edges = Edges {
        left: f64::NAN,
        ..Edges::default()
    };
    assert!(edges.validate().is_err());
    assert!(Edges::CAPTION.validate().is_ok());
}

#[test]
fn premultiply_rounds_and_keeps_alpha() {
    assert_eq!(Rgba8::WHITE.premultiplied(), [255, 255, 255, 255]);
    assert_eq!(Rgba8::WHITE.with_alpha(0).premultiplied(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::opaque(200, 100, 0).with_alpha(128).premultiplied(), [100, 50, 0, 128]);
}
