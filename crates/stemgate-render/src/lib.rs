//! Offline rendering layer for the Stemgate engine.
//!
//! This crate drives the gate over whole files instead of live buffers:
//!
//! - **WAV I/O**: [`read_wav_mono`] / [`write_wav_mono16`] for decoding
//!   stems and persisting rendered output
//! - **Preview rendering**: [`render_preview`] runs a file through a
//!   dedicated gate and produces a downsampled amplitude overlay plus a
//!   rendered intermediate file
//! - **Caching**: [`PreviewCache`] keyed on source identity + settings +
//!   classification, owning each render's temp file until eviction
//! - **Scheduling**: [`PreviewService`] runs renders on background workers
//!   with generation tokens and cooperative cancellation
//! - **Export**: [`export_item`] applies the identical gate pass and writes
//!   mono 16-bit 44.1 kHz WAVs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stemgate_core::{DrumClass, GateSettings};
//! use stemgate_render::{CancellationToken, render_preview, DEFAULT_TARGET_POINTS};
//!
//! let settings = GateSettings { active: true, threshold_db: -30.0, ..Default::default() };
//! let cancel = CancellationToken::new();
//! let preview = render_preview(
//!     "kick.wav".as_ref(),
//!     &settings,
//!     DrumClass::Kick,
//!     DEFAULT_TARGET_POINTS,
//!     &cancel,
//! )?;
//! println!("{} overlay points -> {}", preview.peaks.len(), preview.rendered_path().display());
//! ```

mod cache;
mod export;
mod preview;
mod resample;
mod service;
mod wav;

pub use cache::{PreviewCache, PreviewKey, SourceId};
pub use export::{EXPORT_SAMPLE_RATE, ExportItem, ExportStats, export_item};
pub use preview::{
    CancellationToken, DEFAULT_TARGET_POINTS, GatePreview, render_preview, working_sample_rate,
};
pub use resample::convert_rate;
pub use service::{PreviewService, RenderJob, RequestOutcome};
pub use wav::{WavInfo, read_wav_info, read_wav_mono, write_wav_mono16};

use std::path::PathBuf;

/// Error types for rendering and export operations.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source decoded to zero frames.
    #[error("source file contains no audio: {0}")]
    EmptySource(PathBuf),

    /// The render was cancelled before completion.
    #[error("render cancelled")]
    Cancelled,
}

/// Convenience result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
