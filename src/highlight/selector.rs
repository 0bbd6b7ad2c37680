use crate::{
    foundation::core::{Edges, Rect},
    highlight::style::{HighlightMode, Interpolation},
    layout::wrap::WordLayout,
    transcript::model::Transcript,
};

/// One word to re-draw in the highlight text style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordFill {
    /// Word index inside the chunk.
    pub index: usize,
    /// Portion of the word width to reveal, `(0, 1]` for visible fills.
    pub fraction: f64,
}

impl WordFill {
    fn full(index: usize) -> Self {
        Self {
            index,
            fraction: 1.0,
        }
    }
}

/// Highlight overlays for one drawn frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightFrame {
    /// Rectangle painted behind the text (box style).
    pub backdrop: Option<Rect>,
    /// Words to draw again in the highlight style, in index order.
    pub fills: Vec<WordFill>,
}

impl HighlightFrame {
    /// Nothing to highlight.
    pub fn is_empty(&self) -> bool {
        self.backdrop.is_none() && self.fills.is_empty()
    }

    /// Indices of fully or partially highlighted words.
    pub fn filled_indices(&self) -> Vec<usize> {
        self.fills.iter().map(|f| f.index).collect()
    }
}

/// Decides which words of a chunk receive highlight treatment at a given time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightSelector {
    mode: HighlightMode,
    padding: Edges,
}

impl HighlightSelector {
    /// Selector for `mode`; `padding` expands box highlights around the word box.
    pub fn new(mode: HighlightMode, padding: Edges) -> Self {
        Self { mode, padding }
    }

    /// Mode in use.
    pub fn mode(&self) -> HighlightMode {
        self.mode
    }

    /// Evaluate highlights for `time` against a chunk transcript and its layout.
    ///
    /// Opacity modes additionally highlight every word once the chunk's last word has ended,
    /// regardless of level.
    pub fn select(&self, transcript: &Transcript, layout: &WordLayout, time: f64) -> HighlightFrame {
        let count = layout.len().min(transcript.len());
        let active = transcript
            .active_word_index(time)
            .filter(|&idx| idx < count);

        let mut frame = HighlightFrame::default();
        match self.mode {
            HighlightMode::WordBox { interpolation } => {
                frame.backdrop = active.and_then(|idx| {
                    let rect = self.padding.expand(layout.word_rect(idx)?);
                    let progress = match interpolation {
                        Interpolation::Stepped => 1.0,
                        Interpolation::Linear => transcript.words()[idx].progress(time),
                    };
                    Some(Rect::new(
                        rect.x0,
                        rect.y0,
                        rect.x0 + rect.width() * progress,
                        rect.y1,
                    ))
                });
                return frame;
            }
            HighlightMode::SpokenWords { interpolation } => {
                if let Some(idx) = active {
                    frame.fills.extend((0..idx).map(WordFill::full));
                    let fraction = match interpolation {
                        Interpolation::Stepped => 1.0,
                        Interpolation::Linear => transcript.words()[idx].progress(time),
                    };
                    frame.fills.push(WordFill {
                        index: idx,
                        fraction,
                    });
                }
            }
            HighlightMode::SpokenLines => {
                if let Some(end) = active.and_then(|idx| layout.line_end_for(idx)) {
                    frame.fills.extend((0..=end.min(count - 1)).map(WordFill::full));
                }
            }
            HighlightMode::WholeChunk => {
                frame.fills.extend((0..count).map(WordFill::full));
            }
        }

        let past_end = transcript.last_word().is_some_and(|w| w.end_time < time);
        if past_end {
            frame.fills = (0..count).map(WordFill::full).collect();
        }
        frame
    }
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/selector.rs"]
mod tests;
