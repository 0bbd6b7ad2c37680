use std::collections::BTreeSet;

use crate::foundation::{
    core::{Edges, Point, Rect},
    error::{CaptionError, CaptionResult},
};

/// Measured box of one word as reported by the rendering backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordBox {
    /// Advance width.
    pub width: f64,
    /// Full line box height.
    pub line_height: f64,
}

impl WordBox {
    /// Convenience constructor.
    pub fn new(width: f64, line_height: f64) -> Self {
        Self { width, line_height }
    }
}

/// Inputs to [`layout_words`] besides the boxes themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrapParams {
    /// Container width a line should not exceed.
    pub container_width: f64,
    /// Horizontal gap inserted after every word.
    pub space: f64,
    /// Origin offset; `left`/`top` seed the first position.
    pub padding: Edges,
}

/// Placement of every word of a chunk plus its line structure.
///
/// Immutable once computed; a chunk keeps its layout until it is replaced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordLayout {
    positions: Vec<Point>,
    boxes: Vec<WordBox>,
    line_ends: BTreeSet<usize>,
}

impl WordLayout {
    /// Top-left corner of every word box.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Box of word `index`.
    pub fn word_box(&self, index: usize) -> Option<WordBox> {
        self.boxes.get(index).copied()
    }

    /// Number of laid out words.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when the chunk had no words.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Indices of the last word on each line, ascending.
    pub fn line_ends(&self) -> &BTreeSet<usize> {
        &self.line_ends
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.line_ends.len()
    }

    /// Rectangle of word `index` (position plus width and line height).
    pub fn word_rect(&self, index: usize) -> Option<Rect> {
        let p = self.positions.get(index)?;
        let b = self.boxes.get(index)?;
        Some(Rect::new(p.x, p.y, p.x + b.width, p.y + b.line_height))
    }

    /// Last word index of the line containing `index`: the nearest line end `>= index`.
    pub fn line_end_for(&self, index: usize) -> Option<usize> {
        self.line_ends.range(index..).next().copied()
    }

    /// Word index range of the line containing `index`.
    pub fn line_range(&self, index: usize) -> Option<std::ops::RangeInclusive<usize>> {
        let end = self.line_end_for(index)?;
        let start = self
            .line_ends
            .range(..index)
            .next_back()
            .map_or(0, |prev| prev + 1);
        Some(start..=end)
    }

    /// Union of all word rectangles, `None` for an empty layout.
    pub fn bounds(&self) -> Option<Rect> {
        (0..self.len())
            .filter_map(|i| self.word_rect(i))
            .reduce(|acc, r| acc.union(r))
    }
}

/// Greedy left-to-right line wrap.
///
/// Each word is placed at the running offset, which then advances by `width + space`. Before
/// the next word is placed, if it would cross `container_width` the offset returns to
/// `padding.left`, drops by the current word's line height, and the current word closes its line.
/// Words are never moved after placement and never split; the last word always closes a line.
pub fn layout_words(boxes: &[WordBox], params: WrapParams) -> CaptionResult<WordLayout> {
    if !params.container_width.is_finite() || params.container_width <= 0.0 {
        return Err(CaptionError::layout("container width must be finite and > 0"));
    }
    if !params.space.is_finite() || params.space < 0.0 {
        return Err(CaptionError::layout("word spacing must be finite and >= 0"));
    }
    params.padding.validate()?;
    for (idx, b) in boxes.iter().enumerate() {
        if !b.width.is_finite() || b.width < 0.0 || !b.line_height.is_finite() {
            return Err(CaptionError::layout(format!(
                "word {idx} has an invalid measured box ({} x {})",
                b.width, b.line_height
            )));
        }
    }

    let mut positions = Vec::with_capacity(boxes.len());
    let mut line_ends = BTreeSet::new();
    let mut x = params.padding.left;
    let mut y = params.padding.top;

    for (idx, b) in boxes.iter().enumerate() {
        positions.push(Point::new(x, y));
        x += b.width + params.space;

        if let Some(next) = boxes.get(idx + 1)
            && x + next.width > params.container_width
        {
            x = params.padding.left;
            y += b.line_height;
            line_ends.insert(idx);
        }
    }
    if let Some(last) = boxes.len().checked_sub(1) {
        line_ends.insert(last);
    }

    Ok(WordLayout {
        positions,
        boxes: boxes.to_vec(),
        line_ends,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
