use crate::{
    foundation::{
        core::{BlendMode, Edges, Rect, Rgba8},
        error::CaptionResult,
    },
    highlight::{
        selector::{HighlightFrame, HighlightSelector},
        style::HighlightMode,
    },
    layout::wrap::{WordBox, WordLayout, WrapParams, layout_words},
    render::backend::{TextBackend, TextRole},
    transcript::model::Transcript,
};

/// Word spacing as a fraction of the normal font size.
const SPACE_PER_FONT_SIZE: f64 = 0.2;

/// A word shaped by the backend, with the metrics layout needs.
#[derive(Debug)]
pub struct MeasuredWord<S> {
    /// Word text.
    pub text: String,
    /// Advance width.
    pub width: f64,
    /// Line box height.
    pub line_height: f64,
    shaped: S,
}

impl<S> MeasuredWord<S> {
    /// Backend handle.
    pub fn shaped(&self) -> &S {
        &self.shaped
    }
}

/// Laid out words of one chunk, ready to draw at any time inside the chunk.
///
/// Owns the backend handles of its words. They are returned through [`Caption::destroy`].
#[derive(Debug)]
pub struct Caption<S> {
    transcript: Transcript,
    words: Vec<MeasuredWord<S>>,
    highlight_words: Vec<MeasuredWord<S>>,
    layout: WordLayout,
    selector: HighlightSelector,
}

impl<S> Caption<S> {
    /// Measure every word of `transcript` and lay the chunk out within `width`.
    ///
    /// Words are measured in the normal role, and again in the highlight role when `mode`
    /// re-draws words. On failure every handle measured so far is released.
    #[tracing::instrument(skip(transcript, backend, padding), fields(words = transcript.len()))]
    pub fn build<B>(
        transcript: Transcript,
        backend: &mut B,
        mode: HighlightMode,
        width: f64,
        padding: Edges,
    ) -> CaptionResult<Self>
    where
        B: TextBackend<Shaped = S>,
    {
        let mut words = Vec::with_capacity(transcript.len());
        let mut highlight_words = Vec::new();

        let measured = measure_all(backend, &transcript, TextRole::Normal, &mut words).and_then(
            |()| {
                if mode.needs_highlight_text() {
                    measure_all(backend, &transcript, TextRole::Highlight, &mut highlight_words)
                } else {
                    Ok(())
                }
            },
        );

        let space = backend
            .font_size(TextRole::Normal)
            .map_or(0.0, |size| size * SPACE_PER_FONT_SIZE);
        let boxes: Vec<WordBox> = words
            .iter()
            .map(|w| WordBox::new(w.width, w.line_height))
            .collect();
        let layout = measured.and_then(|()| {
            layout_words(
                &boxes,
                WrapParams {
                    container_width: width,
                    space,
                    padding,
                },
            )
        });

        let layout = match layout {
            Ok(layout) => layout,
            Err(err) => {
                release_all(backend, words);
                release_all(backend, highlight_words);
                return Err(err);
            }
        };

        tracing::debug!(
            lines = layout.line_count(),
            highlight_words = highlight_words.len(),
            "caption built"
        );
        Ok(Self {
            transcript,
            words,
            highlight_words,
            layout,
            selector: HighlightSelector::new(mode, padding),
        })
    }

    /// Words of the chunk.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Normal-style measured words.
    pub fn words(&self) -> &[MeasuredWord<S>] {
        &self.words
    }

    /// Highlight-style measured words; empty for the box style.
    pub fn highlight_words(&self) -> &[MeasuredWord<S>] {
        &self.highlight_words
    }

    /// Word positions and line ends.
    pub fn layout(&self) -> &WordLayout {
        &self.layout
    }

    /// Highlight mode in use.
    pub fn mode(&self) -> HighlightMode {
        self.selector.mode()
    }

    /// True for a chunk without words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of backend handles held.
    pub fn handle_count(&self) -> usize {
        self.words.len() + self.highlight_words.len()
    }

    /// Highlight overlays for `time`.
    pub fn highlight_frame(&self, time: f64) -> HighlightFrame {
        self.selector.select(&self.transcript, &self.layout, time)
    }

    /// Draw the chunk as it looks at `time`.
    ///
    /// The surface is cleared, every word is drawn in the normal style, then the highlight
    /// backdrop is filled behind the text and highlighted words are drawn on top, clipped to
    /// their fill fraction.
    pub fn draw<B>(
        &self,
        backend: &mut B,
        surface: &mut B::Surface,
        time: f64,
        box_color: Rgba8,
    ) -> CaptionResult<HighlightFrame>
    where
        B: TextBackend<Shaped = S>,
    {
        backend.clear(surface)?;
        for (word, origin) in self.words.iter().zip(self.layout.positions()) {
            backend.draw_text(surface, &word.shaped, *origin)?;
        }

        let frame = self.highlight_frame(time);
        if let Some(rect) = frame.backdrop {
            backend.fill_rect(surface, rect, box_color, BlendMode::DestOver)?;
        }
        for fill in &frame.fills {
            let (Some(word), Some(origin)) = (
                self.highlight_words.get(fill.index),
                self.layout.positions().get(fill.index),
            ) else {
                continue;
            };
            if fill.fraction <= 0.0 {
                continue;
            }
            if fill.fraction >= 1.0 {
                backend.draw_text(surface, &word.shaped, *origin)?;
            } else {
                let clip = Rect::new(
                    origin.x,
                    origin.y,
                    origin.x + word.width * fill.fraction,
                    origin.y + word.line_height,
                );
                backend.draw_text_clipped(surface, &word.shaped, *origin, clip)?;
            }
        }
        Ok(frame)
    }

    /// Hand every backend handle back and drop the caption. Returns the number released.
    pub fn destroy<B>(self, backend: &mut B) -> usize
    where
        B: TextBackend<Shaped = S>,
    {
        let released = self.handle_count();
        release_all(backend, self.words);
        release_all(backend, self.highlight_words);
        released
    }
}

fn measure_all<B: TextBackend>(
    backend: &mut B,
    transcript: &Transcript,
    role: TextRole,
    out: &mut Vec<MeasuredWord<B::Shaped>>,
) -> CaptionResult<()> {
    for word in transcript.words() {
        let m = backend.measure(&word.text, role)?;
        out.push(MeasuredWord {
            text: word.text.clone(),
            width: m.width,
            line_height: m.line_height,
            shaped: m.shaped,
        });
    }
    Ok(())
}

fn release_all<B: TextBackend>(backend: &mut B, words: Vec<MeasuredWord<B::Shaped>>) {
    for word in words {
        backend.release(word.shaped);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/chunk.rs"]
mod tests;
