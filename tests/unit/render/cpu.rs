use super::*;

fn pixel(surface: &CpuSurface, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * surface.width() + x) * 4) as usize;
    let d = surface.data();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn fill(surface: &mut CpuSurface, rect: Rect, color: Rgba8, blend: BlendMode) {
    let window = PixelWindow::full(surface.width(), surface.height());
    surface
        .paint(window, blend, |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        })
        .unwrap();
}

fn system_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn surface_rejects_degenerate_sizes() {
    assert!(CpuSurface::new(0, 10).is_err());
    assert!(CpuSurface::new(10, 70_000).is_err());
    let s = CpuSurface::new(16, 8).unwrap();
    assert_eq!((s.width(), s.height()), (16, 8));
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn painted_rect_lands_on_surface() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    fill(&mut s, Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::opaque(255, 0, 0), BlendMode::Normal);
    assert_eq!(pixel(&s, 1, 1), [255, 0, 0, 255]);
    assert_eq!(pixel(&s, 6, 6), [0, 0, 0, 0]);
}

#[test]
fn dest_over_paints_behind_existing_pixels() {
    let mut s = CpuSurface::new(8, 8).unwrap();
    fill(&mut s, Rect::new(0.0, 0.0, 4.0, 8.0), Rgba8::opaque(255, 255, 255), BlendMode::Normal);
    fill(&mut s, Rect::new(0.0, 0.0, 8.0, 8.0), Rgba8::HIGHLIGHT_BOX, BlendMode::DestOver);
    assert_eq!(pixel(&s, 1, 1), [255, 255, 255, 255]);
    assert_eq!(pixel(&s, 6, 1), Rgba8::HIGHLIGHT_BOX.premultiplied());
}

#[test]
fn windowed_paint_is_clipped() {
    let mut s = CpuSurface::new(8, 2).unwrap();
    let window = PixelWindow::from_rect(Rect::new(0.0, 0.0, 3.0, 2.0), 8, 2);
    s.paint(window, BlendMode::Normal, |ctx| {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 255, 0, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 8.0, 2.0));
    })
    .unwrap();
    assert_eq!(pixel(&s, 2, 0)[3], 255);
    assert_eq!(pixel(&s, 3, 0)[3], 0);
}

#[test]
fn clear_resets_to_transparent() {
    let mut s = CpuSurface::new(4, 4).unwrap();
    fill(&mut s, Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::WHITE, BlendMode::Normal);
    s.clear();
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn readback_flattens_over_background() {
    let s = CpuSurface::new(2, 2).unwrap();
    let frame = s.readback(Some(Rgba8::opaque(18, 20, 28)));
    assert_eq!(frame.data.len(), 16);
    assert_eq!(&frame.data[..4], &[18, 20, 28, 255]);
    assert!(frame.premultiplied);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let frame = FrameRGBA {
        width: 1,
        height: 2,
        data: vec![64, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    }
    .into_unpremultiplied();
    assert!(!frame.premultiplied);
    assert_eq!(&frame.data[..4], &[128, 0, 0, 128]);
    assert_eq!(&frame.data[4..], &[0, 0, 0, 0]);
}

#[test]
fn backend_rejects_invalid_sizes_and_fonts() {
    let ok = TextStyleSpec::new(32.0, Rgba8::WHITE);
    let bad = TextStyleSpec::new(0.0, Rgba8::WHITE);
    assert!(CpuTextBackend::new(Vec::new(), bad, ok).is_err());
    assert!(CpuTextBackend::new(Vec::new(), ok, TextStyleSpec::new(f64::NAN, Rgba8::WHITE)).is_err());
    assert!(CpuTextBackend::new(b"not a font".to_vec(), ok, ok).is_err());
}

#[test]
fn shapes_and_draws_with_a_system_font() {
    let Some(bytes) = system_font() else {
        return;
    };
    let mut backend = CpuTextBackend::new(
        bytes,
        TextStyleSpec::new(32.0, Rgba8::WHITE),
        TextStyleSpec::new(32.0, Rgba8::opaque(255, 200, 0)),
    )
    .unwrap();
    assert!(!backend.family_name().is_empty());
    assert_eq!(backend.font_size(TextRole::Normal), Some(32.0));

    let hello = backend.measure("hello", TextRole::Normal).unwrap();
    let hi = backend.measure("hi", TextRole::Normal).unwrap();
    assert!(hello.width > hi.width);
    assert!(hello.line_height > 0.0);
    assert_eq!(backend.live_handles(), 2);

    let mut surface = CpuSurface::new(200, 60).unwrap();
    backend
        .draw_text(&mut surface, &hello.shaped, Point::new(4.0, 4.0))
        .unwrap();
    assert!(surface.data().chunks_exact(4).any(|p| p[3] > 0));

    backend.clear(&mut surface).unwrap();
    backend
        .draw_text_clipped(
            &mut surface,
            &hello.shaped,
            Point::new(4.0, 4.0),
            Rect::new(0.0, 0.0, 0.0, 60.0),
        )
        .unwrap();
    assert!(surface.data().iter().all(|&b| b == 0));

    backend.release(hello.shaped);
    backend.release(hi.shaped);
    assert_eq!(backend.live_handles(), 0);
}
