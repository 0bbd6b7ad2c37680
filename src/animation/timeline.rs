use std::time::Instant;

use crate::foundation::error::{CaptionError, CaptionResult};

/// Monotonic wall clock measured in milliseconds since construction or the last reset.
#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    start: Instant,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// Start the clock now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed milliseconds.
    pub fn current_time(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Move the zero point to now.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

/// Maps a time value onto `[0, 1]` progress over `[start, end]`, optionally looping.
pub struct ProgressTimeline {
    start: f64,
    end: f64,
    looping: bool,
    prev_time: f64,
    on_loop: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for ProgressTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTimeline")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("looping", &self.looping)
            .field("prev_time", &self.prev_time)
            .field("has_on_loop", &self.on_loop.is_some())
            .finish()
    }
}

impl ProgressTimeline {
    /// Non-looping timeline over `[start, end]`. Requires finite bounds with `end > start`.
    pub fn new(start: f64, end: f64) -> CaptionResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(CaptionError::validation(
                "progress timeline bounds must be finite",
            ));
        }
        if end <= start {
            return Err(CaptionError::validation(
                "progress timeline end must be > start",
            ));
        }
        Ok(Self {
            start,
            end,
            looping: false,
            prev_time: 0.0,
            on_loop: None,
        })
    }

    /// Enable or disable looping.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Callback invoked once every time a looping timeline wraps.
    pub fn on_loop(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_loop = Some(Box::new(callback));
        self
    }

    /// Start bound.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End bound.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Whether the timeline loops.
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Progress at `time`.
    ///
    /// Looping timelines wrap `time` by `end - start` and fire the loop callback whenever the
    /// wrapped time is smaller than on the previous call.
    pub fn value(&mut self, time: f64) -> f64 {
        if time < self.start {
            return 0.0;
        }
        if !self.looping && time > self.end {
            return 1.0;
        }

        let span = self.end - self.start;
        let mut time = time;
        if self.looping {
            time %= span;
            if time < self.prev_time {
                tracing::trace!(wrapped = time, prev = self.prev_time, "progress timeline looped");
                if let Some(cb) = self.on_loop.as_mut() {
                    cb();
                }
            }
            self.prev_time = time;
        }
        (time - self.start) / span
    }
}

/// Linear interpolation between `from` and `to`.
pub fn interpolate(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
