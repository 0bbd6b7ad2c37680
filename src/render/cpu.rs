use crate::{
    foundation::{
        core::{BlendMode, Point, Rect, Rgba8},
        error::{CaptionError, CaptionResult},
    },
    render::{
        backend::{Measured, TextBackend, TextRole},
        composite::{PixelWindow, composite_in_place},
    },
};

/// RGBA8 brush color carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Size and color of one text role.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyleSpec {
    /// Font size in pixels.
    pub size: f64,
    /// Fill color.
    pub color: Rgba8,
}

impl TextStyleSpec {
    /// Style with `size` pixels and `color`.
    pub fn new(size: f64, color: Rgba8) -> Self {
        Self { size, color }
    }
}

/// One word shaped by [`CpuTextBackend`].
pub struct CpuShaped {
    layout: parley::Layout<TextBrushRgba8>,
    width: f64,
    line_height: f64,
}

impl std::fmt::Debug for CpuShaped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuShaped")
            .field("width", &self.width)
            .field("line_height", &self.line_height)
            .finish_non_exhaustive()
    }
}

/// Readback of a rendered surface.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha, as image encoders expect.
    pub fn into_unpremultiplied(mut self) -> Self {
        if self.premultiplied {
            for px in self.data.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
            self.premultiplied = false;
        }
        self
    }
}

/// Pixel target for [`CpuTextBackend`].
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Transparent surface of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> CaptionResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| CaptionError::backend("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| CaptionError::backend("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(CaptionError::backend("surface dimensions must be > 0"));
        }
        Ok(Self {
            width: width_u16,
            height: height_u16,
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
            scratch: vello_cpu::Pixmap::new(width_u16, height_u16),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Copy the surface out, optionally flattened over an opaque `background`.
    pub fn readback(&self, background: Option<Rgba8>) -> FrameRGBA {
        let mut data = self.data().to_vec();
        if let Some(bg) = background {
            let bg = bg.premultiplied();
            for px in data.chunks_exact_mut(4) {
                let out = crate::render::composite::over(bg, [px[0], px[1], px[2], px[3]]);
                px.copy_from_slice(&out);
            }
        }
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data,
            premultiplied: true,
        }
    }

    fn clear(&mut self) {
        fill_pixmap(&mut self.pixmap, [0, 0, 0, 0]);
    }

    fn paint(
        &mut self,
        window: PixelWindow,
        blend: BlendMode,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> CaptionResult<()> {
        if window.is_empty() {
            return Ok(());
        }
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        draw(&mut ctx);
        ctx.flush();

        fill_pixmap(&mut self.scratch, [0, 0, 0, 0]);
        ctx.render_to_pixmap(&mut self.scratch);
        composite_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
            u32::from(self.width),
            window,
            blend,
        )
    }
}

/// [`TextBackend`] that shapes with parley and rasterizes with vello_cpu.
pub struct CpuTextBackend {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    normal: TextStyleSpec,
    highlight: TextStyleSpec,
    live_handles: usize,
}

impl std::fmt::Debug for CpuTextBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuTextBackend")
            .field("family_name", &self.family_name)
            .field("normal", &self.normal)
            .field("highlight", &self.highlight)
            .field("live_handles", &self.live_handles)
            .finish_non_exhaustive()
    }
}

impl CpuTextBackend {
    /// Register `font_bytes` and prepare the two text roles.
    pub fn new(
        font_bytes: Vec<u8>,
        normal: TextStyleSpec,
        highlight: TextStyleSpec,
    ) -> CaptionResult<Self> {
        for (role, spec) in [("normal", normal), ("highlight", highlight)] {
            if !spec.size.is_finite() || spec.size <= 0.0 {
                return Err(CaptionError::validation(format!(
                    "{role} font size must be finite and > 0"
                )));
            }
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CaptionError::backend("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CaptionError::backend("registered font family has no name"))?
            .to_string();
        tracing::debug!(family = %family_name, "registered caption font");

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
            normal,
            highlight,
            live_handles: 0,
        })
    }

    /// Family name resolved from the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shaped handles handed out and not yet released.
    pub fn live_handles(&self) -> usize {
        self.live_handles
    }

    fn style(&self, role: TextRole) -> TextStyleSpec {
        match role {
            TextRole::Normal => self.normal,
            TextRole::Highlight => self.highlight,
        }
    }

    fn paint_text(
        &self,
        surface: &mut CpuSurface,
        shaped: &CpuShaped,
        origin: Point,
        window: PixelWindow,
    ) -> CaptionResult<()> {
        let font = &self.font;
        surface.paint(window, BlendMode::Normal, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
            for line in shaped.layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };

                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));

                    let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        })
    }
}

impl TextBackend for CpuTextBackend {
    type Shaped = CpuShaped;
    type Surface = CpuSurface;

    fn font_size(&self, role: TextRole) -> Option<f64> {
        Some(self.style(role).size)
    }

    fn measure(&mut self, text: &str, role: TextRole) -> CaptionResult<Measured<CpuShaped>> {
        let style = self.style(role);
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size as f32));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            style.color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut width = 0.0f64;
        let mut line_height = 0.0f64;
        for line in layout.lines() {
            let m = line.metrics();
            width = width.max(f64::from(m.advance));
            line_height += f64::from(m.ascent + m.descent + m.leading);
        }
        if line_height <= 0.0 {
            line_height = style.size;
        }

        self.live_handles += 1;
        Ok(Measured {
            width,
            line_height,
            shaped: CpuShaped {
                layout,
                width,
                line_height,
            },
        })
    }

    fn clear(&mut self, surface: &mut CpuSurface) -> CaptionResult<()> {
        surface.clear();
        Ok(())
    }

    fn draw_text(
        &mut self,
        surface: &mut CpuSurface,
        shaped: &CpuShaped,
        origin: Point,
    ) -> CaptionResult<()> {
        let window = PixelWindow::full(surface.width(), surface.height());
        self.paint_text(surface, shaped, origin, window)
    }

    fn draw_text_clipped(
        &mut self,
        surface: &mut CpuSurface,
        shaped: &CpuShaped,
        origin: Point,
        clip: Rect,
    ) -> CaptionResult<()> {
        let window = PixelWindow::from_rect(clip, surface.width(), surface.height());
        self.paint_text(surface, shaped, origin, window)
    }

    fn fill_rect(
        &mut self,
        surface: &mut CpuSurface,
        rect: Rect,
        color: Rgba8,
        blend: BlendMode,
    ) -> CaptionResult<()> {
        let window = PixelWindow::full(surface.width(), surface.height());
        surface.paint(window, blend, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                color.r, color.g, color.b, color.a,
            ));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
        })
    }

    fn release(&mut self, shaped: CpuShaped) {
        self.live_handles = self.live_handles.saturating_sub(1);
        drop(shaped);
    }
}

fn fill_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
