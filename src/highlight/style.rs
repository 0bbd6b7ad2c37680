use std::str::FromStr;

use crate::foundation::error::{CaptionError, CaptionResult};

/// Highlight treatment family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Spoken words are re-drawn on top in the highlight text style.
    #[default]
    Opacity,
    /// A filled box is drawn behind the active word.
    Highlight,
}

/// Granularity of the highlighted region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightLevel {
    /// The whole chunk.
    Object,
    /// The line holding the active word.
    Line,
    /// Words up to the active one.
    #[default]
    Word,
}

/// How the active word's highlight grows over its duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Grows with the word's progress (karaoke fill).
    Linear,
    /// Appears whole as soon as the word starts.
    #[default]
    Stepped,
}

/// Declarative highlight descriptor as supplied by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FancyStyle {
    /// Treatment family.
    #[serde(default)]
    pub style: StyleKind,
    /// Region granularity.
    #[serde(default)]
    pub level: HighlightLevel,
    /// Growth of the active word.
    #[serde(default)]
    pub interpolation: Interpolation,
}

/// Validated highlight behavior. Every supported `{style, level}` pair is one variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightMode {
    /// Box behind the single active word.
    WordBox {
        /// Box width follows word progress when linear.
        interpolation: Interpolation,
    },
    /// Highlight-style words `0..=active`.
    SpokenWords {
        /// Active word is partially filled when linear.
        interpolation: Interpolation,
    },
    /// Highlight-style words through the end of the active line.
    SpokenLines,
    /// Every word of the chunk, unconditionally.
    WholeChunk,
}

impl HighlightMode {
    /// Whether this mode draws words in the highlight text style.
    pub fn needs_highlight_text(self) -> bool {
        !matches!(self, Self::WordBox { .. })
    }
}

impl TryFrom<FancyStyle> for HighlightMode {
    type Error = CaptionError;

    fn try_from(value: FancyStyle) -> CaptionResult<Self> {
        match (value.style, value.level) {
            // the box always marks the active word, whatever the level
            (StyleKind::Highlight, _) => Ok(Self::WordBox {
                interpolation: value.interpolation,
            }),
            (StyleKind::Opacity, HighlightLevel::Word) => Ok(Self::SpokenWords {
                interpolation: value.interpolation,
            }),
            (StyleKind::Opacity, HighlightLevel::Line) => Ok(Self::SpokenLines),
            (StyleKind::Opacity, HighlightLevel::Object) => Ok(Self::WholeChunk),
        }
    }
}

impl StyleKind {
    /// Lowercase configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opacity => "opacity",
            Self::Highlight => "highlight",
        }
    }
}

impl HighlightLevel {
    /// Lowercase configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Line => "line",
            Self::Word => "word",
        }
    }
}

impl Interpolation {
    /// Lowercase configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Stepped => "stepped",
        }
    }
}

impl FromStr for StyleKind {
    type Err = CaptionError;

    fn from_str(s: &str) -> CaptionResult<Self> {
        match s {
            "opacity" => Ok(Self::Opacity),
            "highlight" => Ok(Self::Highlight),
            other => Err(CaptionError::validation(format!(
                "unknown fancy style '{other}' (expected 'opacity' or 'highlight')"
            ))),
        }
    }
}

impl FromStr for HighlightLevel {
    type Err = CaptionError;

    fn from_str(s: &str) -> CaptionResult<Self> {
        match s {
            "object" => Ok(Self::Object),
            "line" => Ok(Self::Line),
            "word" => Ok(Self::Word),
            other => Err(CaptionError::validation(format!(
                "unknown highlight level '{other}' (expected 'object', 'line' or 'word')"
            ))),
        }
    }
}

impl FromStr for Interpolation {
    type Err = CaptionError;

    fn from_str(s: &str) -> CaptionResult<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "stepped" => Ok(Self::Stepped),
            other => Err(CaptionError::validation(format!(
                "unknown interpolation '{other}' (expected 'linear' or 'stepped')"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/style.rs"]
mod tests;
