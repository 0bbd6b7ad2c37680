use crate::{
    foundation::{
        core::{Edges, Rgba8},
        error::{CaptionError, CaptionResult},
    },
    highlight::style::{FancyStyle, HighlightMode},
    transcript::model::Transcript,
};

/// Configuration of a [`crate::CaptionGenerator`].
///
/// Deserialized from camelCase JSON; every field falls back to its default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptionConfig {
    /// First time (ms) the generator reacts to.
    pub start_time: f64,
    /// Last time (ms) the generator reacts to.
    pub end_time: f64,
    /// Length of one chunk in ms.
    pub chunk_duration: f64,
    /// Container width words wrap within.
    pub width: f64,
    /// Layout origin offset and box-highlight expansion.
    pub padding: Edges,
    /// Highlight descriptor.
    pub fancy_style: FancyStyle,
    /// Fill color of the box highlight.
    pub box_color: Rgba8,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: 1000.0,
            chunk_duration: 1000.0,
            width: 250.0,
            padding: Edges::CAPTION,
            fancy_style: FancyStyle::default(),
            box_color: Rgba8::HIGHLIGHT_BOX,
        }
    }
}

impl CaptionConfig {
    /// Defaults with the time range set to cover `transcript`.
    pub fn spanning(transcript: &Transcript) -> Self {
        let mut config = Self::default();
        if let (Some(start), Some(end)) = (transcript.start_time(), transcript.end_time()) {
            config.start_time = start;
            config.end_time = end;
        }
        config
    }

    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> CaptionResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// `end_time - start_time`.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Validated highlight mode.
    pub fn highlight_mode(&self) -> CaptionResult<HighlightMode> {
        HighlightMode::try_from(self.fancy_style)
    }

    /// Reject configurations the generator cannot run with.
    pub fn validate(&self) -> CaptionResult<()> {
        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            return Err(CaptionError::validation(
                "startTime and endTime must be finite",
            ));
        }
        if self.end_time < self.start_time {
            return Err(CaptionError::validation(format!(
                "endTime ({}) must not precede startTime ({})",
                self.end_time, self.start_time
            )));
        }
        if !self.chunk_duration.is_finite() || self.chunk_duration <= 0.0 {
            return Err(CaptionError::validation(
                "chunkDuration must be finite and > 0",
            ));
        }
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(CaptionError::validation("width must be finite and > 0"));
        }
        self.padding.validate()?;
        self.highlight_mode()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/config.rs"]
mod tests;
