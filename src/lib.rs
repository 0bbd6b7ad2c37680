//! fancy-captions renders word-synchronized captions over video.
//!
//! Given a time-coded transcript and the current playback time, the engine buckets the
//! transcript into fixed-duration chunks, lays out the active chunk's words into wrapped lines,
//! and draws per-word highlight effects (spoken-word opacity, box highlight, karaoke fill).
//!
//! # Pipeline overview
//!
//! 1. **Chunk**: `CaptionGenerator::set_current_time` maps time to a chunk and slices the
//!    [`Transcript`] when the chunk changes.
//! 2. **Measure + lay out**: the chunk's words are shaped by a [`TextBackend`] and wrapped with
//!    [`layout_words`].
//! 3. **Highlight**: [`HighlightSelector`] decides which words (or which backdrop box) are
//!    highlighted at the current time.
//! 4. **Draw**: the [`Caption`] issues text and rectangle draws to the backend surface.
//!
//! The core never shapes text itself; [`CpuTextBackend`] (parley + vello_cpu) is the bundled
//! backend, and tests drive the engine with recording doubles.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod caption;
mod foundation;
mod highlight;
mod layout;
mod render;
mod transcript;

pub use animation::timeline::{ProgressTimeline, Timeline, interpolate};
pub use caption::chunk::{Caption, MeasuredWord};
pub use caption::config::CaptionConfig;
pub use caption::generator::{CaptionGenerator, DrawStatus, GeneratorStats};
pub use foundation::core::{BlendMode, Edges, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{CaptionError, CaptionResult};
pub use highlight::selector::{HighlightFrame, HighlightSelector, WordFill};
pub use highlight::style::{FancyStyle, HighlightLevel, HighlightMode, Interpolation, StyleKind};
pub use layout::wrap::{WordBox, WordLayout, WrapParams, layout_words};
pub use render::backend::{Measured, TextBackend, TextRole};
pub use render::composite::{PixelWindow, PremulRgba8, blend, composite_in_place, over};
pub use render::cpu::{
    CpuShaped, CpuSurface, CpuTextBackend, FrameRGBA, TextBrushRgba8, TextStyleSpec,
};
pub use render::service::{BackendLoad, BackendService, BackendStatus};
pub use transcript::input::{parse_scene_groups, parse_transcript_json};
pub use transcript::model::{TextDirection, Transcript, Word};
