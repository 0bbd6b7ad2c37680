use crate::foundation::{
    core::{BlendMode, Point, Rect, Rgba8},
    error::CaptionResult,
};

/// Which text style a word is shaped with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Style for words not yet highlighted.
    Normal,
    /// Style drawn over spoken words.
    Highlight,
}

/// Result of shaping one word.
#[derive(Clone, Debug)]
pub struct Measured<S> {
    /// Advance width of the shaped word.
    pub width: f64,
    /// Height of the full line box.
    pub line_height: f64,
    /// Backend handle to draw later. Must be handed back through [`TextBackend::release`].
    pub shaped: S,
}

/// Rendering capability consumed by captions.
///
/// The backend shapes words, hands out opaque shaped handles, and draws them onto its own
/// surface type. Callers own the handles and return each one exactly once via
/// [`TextBackend::release`].
pub trait TextBackend {
    /// Shaped-output handle for one word.
    type Shaped;
    /// Draw target.
    type Surface;

    /// Font size configured for `role`, if the style defines one.
    fn font_size(&self, role: TextRole) -> Option<f64>;

    /// Shape `text` in `role` style and report its metrics.
    fn measure(&mut self, text: &str, role: TextRole) -> CaptionResult<Measured<Self::Shaped>>;

    /// Reset the surface to transparent.
    fn clear(&mut self, surface: &mut Self::Surface) -> CaptionResult<()>;

    /// Draw a shaped word with its box top-left at `origin`.
    fn draw_text(
        &mut self,
        surface: &mut Self::Surface,
        shaped: &Self::Shaped,
        origin: Point,
    ) -> CaptionResult<()>;

    /// Draw a shaped word, keeping only the pixels inside `clip`.
    fn draw_text_clipped(
        &mut self,
        surface: &mut Self::Surface,
        shaped: &Self::Shaped,
        origin: Point,
        clip: Rect,
    ) -> CaptionResult<()>;

    /// Fill `rect` with `color`.
    fn fill_rect(
        &mut self,
        surface: &mut Self::Surface,
        rect: Rect,
        color: Rgba8,
        blend: BlendMode,
    ) -> CaptionResult<()>;

    /// Free a shaped handle.
    fn release(&mut self, shaped: Self::Shaped);
}
