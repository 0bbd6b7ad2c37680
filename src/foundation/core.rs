use crate::foundation::error::{CaptionError, CaptionResult};

pub use kurbo::{Point, Rect, Vec2};

/// Padding edges in caption-local pixels.
///
/// Values may be negative: a negative `top`/`bottom` pulls highlight boxes inside the line box.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    /// Left padding.
    #[serde(default)]
    pub left: f64,
    /// Right padding.
    #[serde(default)]
    pub right: f64,
    /// Top padding.
    #[serde(default)]
    pub top: f64,
    /// Bottom padding.
    #[serde(default)]
    pub bottom: f64,
}

impl Edges {
    /// Padding used by the caption renderer unless configured otherwise.
    pub const CAPTION: Self = Self {
        left: 3.0,
        right: 3.0,
        top: -4.0,
        bottom: -4.0,
    };

    /// Reject non-finite edge values.
    pub fn validate(&self) -> CaptionResult<()> {
        for (name, value) in [
            ("left", self.left),
            ("right", self.right),
            ("top", self.top),
            ("bottom", self.bottom),
        ] {
            if !value.is_finite() {
                return Err(CaptionError::validation(format!(
                    "padding.{name} must be finite"
                )));
            }
        }
        Ok(())
    }

    /// Grow `rect` by these edges (left/top outward, right/bottom outward).
    pub fn expand(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 - self.left,
            rect.y0 - self.top,
            rect.x1 + self.right,
            rect.y1 + self.bottom,
        )
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Purple used for the box highlight.
    pub const HIGHLIGHT_BOX: Self = Self::opaque(146, 95, 248);

    /// Build an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Premultiplied channel bytes in RGBA order.
    pub fn premultiplied(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// How a filled rectangle combines with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    Normal,
    /// Destination over source: the fill lands behind existing content.
    DestOver,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
