//! Offline preview rendering.
//!
//! Runs a whole stem through a dedicated gate processor and produces the
//! two artifacts the editor overlay needs: a fixed-length array of
//! normalized peak values and a rendered intermediate WAV. Long files are
//! processed at a reduced working rate; the gate envelope is insensitive to
//! the exact rate, and the bound keeps memory and CPU flat for hour-long
//! stems.

use crate::resample::convert_rate;
use crate::wav::{read_wav_mono, write_wav_mono16};
use crate::{RenderError, Result};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use stemgate_core::{DrumClass, GateProcessor, GateSettings};
use tempfile::TempPath;

/// Number of overlay points a render produces by default.
pub const DEFAULT_TARGET_POINTS: usize = 1200;

/// Working rate for files short enough to process at full preview quality.
const FULL_WORKING_RATE: u32 = 22_050;

/// Cooperative cancellation flag shared between a render worker and its
/// scheduler. Checked at chunk boundaries; a cancelled render stops early
/// and returns [`RenderError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A completed preview render.
#[derive(Debug)]
pub struct GatePreview {
    /// Normalized peak overlay, each value in `[0, 1]`.
    pub peaks: Vec<f32>,
    /// The rendered intermediate file. Owned: deleting the preview deletes
    /// the file.
    rendered: TempPath,
}

impl GatePreview {
    /// Path of the rendered intermediate WAV.
    pub fn rendered_path(&self) -> &Path {
        &self.rendered
    }
}

/// Pick the working sample rate for a source of the given duration.
///
/// Longer files render at lower rates to bound memory and CPU.
pub fn working_sample_rate(duration_secs: f64) -> u32 {
    if duration_secs > 600.0 {
        12_000
    } else if duration_secs > 300.0 {
        16_000
    } else if duration_secs > 180.0 {
        18_000
    } else {
        FULL_WORKING_RATE
    }
}

/// Chunk size for the gated peak scan, scaling with duration.
fn chunk_size(duration_secs: f64) -> usize {
    if duration_secs > 360.0 {
        8_192
    } else if duration_secs > 180.0 {
        4_096
    } else if duration_secs > 60.0 {
        2_048
    } else {
        1_024
    }
}

/// Reduce the per-chunk peak array to exactly `target` points, taking the
/// max over equal-width slices. Peaks are never averaged away.
fn downsample_peaks(coarse: &[f32], target: usize) -> Vec<f32> {
    if target == 0 {
        return Vec::new();
    }
    if coarse.is_empty() {
        return vec![0.0; target];
    }

    let mut points = Vec::with_capacity(target);
    for slot in 0..target {
        let start = slot * coarse.len() / target;
        let end = (((slot + 1) * coarse.len()) / target).max(start + 1).min(coarse.len());
        let slice_max = coarse[start..end]
            .iter()
            .fold(0.0_f32, |acc, &p| acc.max(p));
        points.push(slice_max);
    }
    points
}

/// Render a preview for one stem.
///
/// Decodes the source, converts it to the working rate, streams it through
/// a gate configured from `settings` and the profile for `class`, and
/// produces `target_points` normalized peaks plus a rendered temp WAV.
///
/// The token is checked at every chunk boundary; cancellation discards all
/// partial output.
pub fn render_preview(
    source: &Path,
    settings: &GateSettings,
    class: DrumClass,
    target_points: usize,
    cancel: &CancellationToken,
) -> Result<GatePreview> {
    let (samples, source_rate) = read_wav_mono(source)?;
    let duration_secs = samples.len() as f64 / f64::from(source_rate);
    let working_rate = working_sample_rate(duration_secs);

    tracing::debug!(
        path = %source.display(),
        source_rate,
        working_rate,
        duration_secs,
        "preview render start"
    );

    let mut samples = convert_rate(&samples, source_rate, working_rate);
    if samples.is_empty() {
        return Err(RenderError::EmptySource(source.to_path_buf()));
    }

    // Pre-gate peak across the whole file; the overlay is normalized
    // against the raw material, not the gated result.
    let raw_max = samples.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()));

    let mut gate = GateProcessor::new();
    gate.reconfigure(settings, working_rate as f32, class.profile());

    let chunk = chunk_size(duration_secs);
    let mut coarse = Vec::with_capacity(samples.len() / chunk + 1);
    for block in samples.chunks_mut(chunk) {
        if cancel.is_cancelled() {
            tracing::debug!(path = %source.display(), "preview render cancelled");
            return Err(RenderError::Cancelled);
        }
        gate.process_interleaved_f32(block, 1);
        let block_peak = block.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()));
        coarse.push(block_peak);
    }

    let norm = if raw_max > 1e-9 { 1.0 / raw_max } else { 0.0 };
    let peaks: Vec<f32> = downsample_peaks(&coarse, target_points)
        .into_iter()
        .map(|p| (p * norm).clamp(0.0, 1.0))
        .collect();

    let temp = tempfile::Builder::new()
        .prefix("stemgate-preview-")
        .suffix(".wav")
        .tempfile()?;
    write_wav_mono16(temp.path(), &samples, working_rate)?;
    let rendered = temp.into_temp_path();

    tracing::debug!(
        path = %source.display(),
        rendered = %rendered.display(),
        points = peaks.len(),
        "preview render done"
    );

    Ok(GatePreview { peaks, rendered })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_rate_tiers() {
        assert_eq!(working_sample_rate(30.0), 22_050);
        assert_eq!(working_sample_rate(200.0), 18_000);
        assert_eq!(working_sample_rate(400.0), 16_000);
        assert_eq!(working_sample_rate(900.0), 12_000);
    }

    #[test]
    fn test_chunk_size_tiers() {
        assert_eq!(chunk_size(10.0), 1_024);
        assert_eq!(chunk_size(90.0), 2_048);
        assert_eq!(chunk_size(200.0), 4_096);
        assert_eq!(chunk_size(500.0), 8_192);
    }

    #[test]
    fn test_downsample_exact_count() {
        let coarse: Vec<f32> = (0..37).map(|i| i as f32 / 37.0).collect();
        assert_eq!(downsample_peaks(&coarse, 12).len(), 12);
        assert_eq!(downsample_peaks(&coarse, 100).len(), 100);
        assert_eq!(downsample_peaks(&[], 50), vec![0.0; 50]);
    }

    #[test]
    fn test_downsample_takes_max_not_mean() {
        // one spike in a long quiet run must survive downsampling
        let mut coarse = vec![0.01_f32; 100];
        coarse[57] = 0.9;
        let points = downsample_peaks(&coarse, 10);
        assert!((points[5] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_cancellation_token() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
