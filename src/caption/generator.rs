use crate::{
    caption::{chunk::Caption, config::CaptionConfig},
    foundation::error::{CaptionError, CaptionResult},
    highlight::style::HighlightMode,
    render::{
        backend::TextBackend,
        service::{BackendService, BackendStatus},
    },
    transcript::model::Transcript,
};

/// Outcome of [`CaptionGenerator::draw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawStatus {
    /// The active caption was drawn.
    Drawn,
    /// The backend is still loading; nothing was drawn.
    Pending,
    /// No caption is active yet; nothing was drawn.
    Idle,
}

/// Counters describing the generator's work so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    /// Captions built and installed.
    pub builds: u64,
    /// Staged builds superseded before they could run.
    pub stale_builds_discarded: u64,
    /// Backend handles returned by destroyed captions.
    pub handles_released: u64,
}

#[derive(Debug)]
struct PendingBuild {
    generation: u64,
    chunk: usize,
    transcript: Transcript,
}

/// Chunk scheduler: owns the full transcript and the single active [`Caption`].
///
/// Time moves forward through [`CaptionGenerator::set_current_time`]. Crossing a chunk boundary
/// destroys the active caption and stages a build for the new chunk; the build runs as soon as
/// the backend service is ready. Only one build is staged at a time: a newer chunk change
/// replaces it, and the replaced build is counted as stale.
pub struct CaptionGenerator<B: TextBackend> {
    transcript: Transcript,
    config: CaptionConfig,
    mode: HighlightMode,
    service: BackendService<B>,
    current_time: Option<f64>,
    current_chunk: Option<usize>,
    generation: u64,
    pending: Option<PendingBuild>,
    active: Option<(usize, Caption<B::Shaped>)>,
    stats: GeneratorStats,
}

impl<B: TextBackend> std::fmt::Debug for CaptionGenerator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionGenerator")
            .field("words", &self.transcript.len())
            .field("config", &self.config)
            .field("current_time", &self.current_time)
            .field("current_chunk", &self.current_chunk)
            .field("generation", &self.generation)
            .field("backend", &self.service.status())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<B: TextBackend> CaptionGenerator<B> {
    /// Validate `config` and take ownership of the transcript and backend service.
    pub fn new(
        transcript: Transcript,
        config: CaptionConfig,
        service: BackendService<B>,
    ) -> CaptionResult<Self> {
        config.validate()?;
        let mode = config.highlight_mode()?;
        Ok(Self {
            transcript,
            config,
            mode,
            service,
            current_time: None,
            current_chunk: None,
            generation: 0,
            pending: None,
            active: None,
            stats: GeneratorStats::default(),
        })
    }

    /// Full transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Configuration in use.
    pub fn config(&self) -> &CaptionConfig {
        &self.config
    }

    /// Validated highlight mode.
    pub fn mode(&self) -> HighlightMode {
        self.mode
    }

    /// Last accepted time, `None` before the first in-range update.
    pub fn current_time(&self) -> Option<f64> {
        self.current_time
    }

    /// Chunk of the last accepted time.
    pub fn current_chunk(&self) -> Option<usize> {
        self.current_chunk
    }

    /// Bumped on every chunk change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Work counters.
    pub fn stats(&self) -> GeneratorStats {
        self.stats
    }

    /// Backend service status without polling.
    pub fn backend_status(&self) -> BackendStatus {
        self.service.status()
    }

    /// Backend service.
    pub fn service(&self) -> &BackendService<B> {
        &self.service
    }

    /// Installed caption, if its build has completed.
    pub fn active_caption(&self) -> Option<&Caption<B::Shaped>> {
        self.active.as_ref().map(|(_, caption)| caption)
    }

    /// Number of chunks covering the configured range.
    pub fn chunk_count(&self) -> usize {
        (self.config.duration() / self.config.chunk_duration).ceil() as usize
    }

    /// Chunk index for `time`.
    ///
    /// Times before the range map to chunk `0`, times after it to [`Self::chunk_count`].
    pub fn active_chunk(&self, time: f64) -> usize {
        if time < self.config.start_time {
            return 0;
        }
        if time > self.config.end_time {
            return self.chunk_count();
        }
        (time / self.config.chunk_duration).floor() as usize
    }

    /// `[start, end)` of chunk `index` in ms.
    pub fn chunk_time_range(&self, index: usize) -> (f64, f64) {
        let start = index as f64 * self.config.chunk_duration;
        (start, start + self.config.chunk_duration)
    }

    /// Word of the full transcript active at the current time.
    pub fn active_word_index(&self) -> Option<usize> {
        self.transcript.active_word_index(self.current_time?)
    }

    /// Move playback to `time` (ms).
    ///
    /// Times outside `[start_time, end_time]` are ignored. Staying inside the current chunk only
    /// records the time; a chunk change replaces the active caption.
    pub fn set_current_time(&mut self, time: f64) -> CaptionResult<()> {
        if !(self.config.start_time..=self.config.end_time).contains(&time) {
            tracing::trace!(time, "time outside caption range, ignored");
            return Ok(());
        }
        self.current_time = Some(time);

        let chunk = self.active_chunk(time);
        if self.current_chunk != Some(chunk) {
            self.current_chunk = Some(chunk);
            self.destroy_active();

            let (start, end) = self.chunk_time_range(chunk);
            let transcript = self.transcript.slice(start, end);
            self.generation += 1;
            tracing::debug!(
                chunk,
                start,
                end,
                words = transcript.len(),
                generation = self.generation,
                "chunk changed"
            );

            let staged = PendingBuild {
                generation: self.generation,
                chunk,
                transcript,
            };
            if let Some(stale) = self.pending.replace(staged) {
                tracing::debug!(
                    chunk = stale.chunk,
                    generation = stale.generation,
                    "discarding superseded build"
                );
                self.stats.stale_builds_discarded += 1;
            }
        }
        self.pump().map(|_| ())
    }

    /// Draw the active caption at the current time.
    pub fn draw(&mut self, surface: &mut B::Surface) -> CaptionResult<DrawStatus> {
        if self.pump()? == BackendStatus::Loading {
            tracing::debug!("backend not ready, skipping draw");
            return Ok(DrawStatus::Pending);
        }
        let (Some((_, caption)), Some(time)) = (self.active.as_ref(), self.current_time) else {
            return Ok(DrawStatus::Idle);
        };
        let Some(backend) = self.service.backend_mut() else {
            return Ok(DrawStatus::Pending);
        };
        caption.draw(backend, surface, time, self.config.box_color)?;
        Ok(DrawStatus::Drawn)
    }

    /// Poll the backend and run the staged build once it is ready.
    fn pump(&mut self) -> CaptionResult<BackendStatus> {
        match self.service.poll_ready() {
            BackendStatus::Loading => Ok(BackendStatus::Loading),
            BackendStatus::Failed => Err(CaptionError::backend_unavailable(
                self.service.failure().unwrap_or("backend failed to load"),
            )),
            BackendStatus::Ready => {
                if let Some(build) = self.pending.take() {
                    self.apply(build)?;
                }
                Ok(BackendStatus::Ready)
            }
        }
    }

    fn apply(&mut self, build: PendingBuild) -> CaptionResult<()> {
        let Some(backend) = self.service.backend_mut() else {
            return Ok(());
        };
        let caption = Caption::build(
            build.transcript,
            backend,
            self.mode,
            self.config.width,
            self.config.padding,
        )?;
        self.stats.builds += 1;
        self.active = Some((build.chunk, caption));
        Ok(())
    }

    fn destroy_active(&mut self) {
        let Some((chunk, caption)) = self.active.take() else {
            return;
        };
        if let Some(backend) = self.service.backend_mut() {
            let released = caption.destroy(backend);
            self.stats.handles_released += released as u64;
            tracing::trace!(chunk, released, "caption destroyed");
        }
    }
}

impl<B: TextBackend> Drop for CaptionGenerator<B> {
    fn drop(&mut self) {
        self.destroy_active();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caption/generator.rs"]
mod tests;
