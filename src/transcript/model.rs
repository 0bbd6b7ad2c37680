use crate::foundation::error::{CaptionError, CaptionResult};

/// One time-coded word. Times are milliseconds, inclusive on both ends.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Display text.
    pub text: String,
    /// First millisecond the word is spoken.
    pub start_time: f64,
    /// Last millisecond the word is spoken.
    pub end_time: f64,
}

impl Word {
    /// Convenience constructor.
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }

    /// Whether `time` lies inside `[start_time, end_time]`.
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    /// Normalized position of `time` inside this word, clamped to `[0, 1]`.
    ///
    /// Zero-length words report `1.0` once reached.
    pub fn progress(&self, time: f64) -> f64 {
        let span = self.end_time - self.start_time;
        if span <= 0.0 {
            return if time >= self.start_time { 1.0 } else { 0.0 };
        }
        ((time - self.start_time) / span).clamp(0.0, 1.0)
    }
}

/// Writing direction carried alongside the transcript for the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// Ordered, immutable sequence of time-coded words.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Transcript {
    words: Vec<Word>,
    language: String,
    text_direction: TextDirection,
}

impl Transcript {
    /// Build a transcript from raw input.
    ///
    /// The word list must be non-empty, every word must satisfy `start_time <= end_time` with
    /// finite times, and words must be in non-decreasing `start_time` order.
    pub fn new(
        words: Vec<Word>,
        language: impl Into<String>,
        text_direction: TextDirection,
    ) -> CaptionResult<Self> {
        if words.is_empty() {
            return Err(CaptionError::validation(
                "transcript must contain at least one word",
            ));
        }
        for (idx, w) in words.iter().enumerate() {
            if !w.start_time.is_finite() || !w.end_time.is_finite() {
                return Err(CaptionError::validation(format!(
                    "word {idx} ('{}') has non-finite times",
                    w.text
                )));
            }
            if w.start_time > w.end_time {
                return Err(CaptionError::validation(format!(
                    "word {idx} ('{}') starts after it ends",
                    w.text
                )));
            }
        }
        if let Some(idx) = words
            .windows(2)
            .position(|pair| pair[1].start_time < pair[0].start_time)
        {
            return Err(CaptionError::validation(format!(
                "word {} starts before word {}",
                idx + 1,
                idx
            )));
        }

        Ok(Self {
            words,
            language: language.into(),
            text_direction,
        })
    }

    /// All words in order.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True for slices that matched no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Language tag, e.g. `en`.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Writing direction.
    pub fn text_direction(&self) -> TextDirection {
        self.text_direction
    }

    /// Start of the first word, `None` for an empty slice.
    pub fn start_time(&self) -> Option<f64> {
        self.words.first().map(|w| w.start_time)
    }

    /// End of the last word, `None` for an empty slice.
    pub fn end_time(&self) -> Option<f64> {
        self.words.last().map(|w| w.end_time)
    }

    /// `end_time - start_time`, zero for an empty slice.
    pub fn duration(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Last word, if any.
    pub fn last_word(&self) -> Option<&Word> {
        self.words.last()
    }

    /// Index of the word being spoken at `time`.
    ///
    /// Returns `None` outside the transcript range and in gaps between words. Overlapping words
    /// resolve to the first one in order.
    pub fn active_word_index(&self, time: f64) -> Option<usize> {
        let (start, end) = (self.start_time()?, self.end_time()?);
        if time < start || time > end {
            return None;
        }
        self.words.iter().position(|w| w.contains(time))
    }

    /// Words fully contained in `[start, end]`.
    ///
    /// A word that straddles either bound is excluded.
    pub fn words_for_time_range(&self, start: f64, end: f64) -> Vec<Word> {
        self.words
            .iter()
            .filter(|w| w.start_time >= start && w.end_time <= end)
            .cloned()
            .collect()
    }

    /// Value copy of the words inside `[start, end]`, keeping language and direction.
    ///
    /// The result may be empty.
    pub fn slice(&self, start: f64, end: f64) -> Transcript {
        Transcript {
            words: self.words_for_time_range(start, end),
            language: self.language.clone(),
            text_direction: self.text_direction,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transcript/model.rs"]
mod tests;
