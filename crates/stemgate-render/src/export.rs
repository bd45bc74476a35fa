//! Final export pass.
//!
//! Applies exactly the same per-sample gate as live monitoring, in one
//! streaming pass per item: decode, downmix, convert to the export rate,
//! gate, write. Output is always mono 16-bit 44.1 kHz PCM, and the time
//! axis is preserved: leading and trailing silence survive the gate.

use crate::resample::convert_rate;
use crate::wav::read_wav_mono;
use crate::{RenderError, Result};
use hound::{SampleFormat, WavWriter};
use std::path::{Path, PathBuf};
use stemgate_core::{DrumClass, GateProcessor, GateSettings};

/// Sample rate of exported stems.
pub const EXPORT_SAMPLE_RATE: u32 = 44_100;

/// Gate pass block size for export.
const BLOCK_SIZE: usize = 4_096;

/// One stem to export.
#[derive(Debug, Clone)]
pub struct ExportItem {
    /// Source audio file.
    pub source: PathBuf,
    /// Drum classification selecting the tuned profile.
    pub class: DrumClass,
    /// Gate settings for this stem.
    pub settings: GateSettings,
}

/// Level summary of a finished export.
#[derive(Debug, Clone, Copy)]
pub struct ExportStats {
    /// Frames written at the export rate.
    pub frames: usize,
    /// Peak level before gating.
    pub input_peak: f32,
    /// Peak level after gating.
    pub output_peak: f32,
}

/// Export one item to `output`, reporting progress as `(done, total)` frame
/// counts after each processed block.
pub fn export_item(
    item: &ExportItem,
    output: &Path,
    mut progress: impl FnMut(usize, usize),
) -> Result<ExportStats> {
    let (samples, source_rate) = read_wav_mono(&item.source)?;
    let mut samples = convert_rate(&samples, source_rate, EXPORT_SAMPLE_RATE);
    if samples.is_empty() {
        return Err(RenderError::EmptySource(item.source.clone()));
    }

    let input_peak = samples.iter().fold(0.0_f32, |acc, &s| acc.max(s.abs()));

    let mut gate = GateProcessor::new();
    gate.reconfigure(&item.settings, EXPORT_SAMPLE_RATE as f32, item.class.profile());

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: EXPORT_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output, spec)?;

    const MAX_VAL: f32 = 32_768.0;
    let total = samples.len();
    let mut done = 0usize;
    let mut output_peak = 0.0_f32;

    for block in samples.chunks_mut(BLOCK_SIZE) {
        gate.process_interleaved_f32(block, 1);
        for &sample in block.iter() {
            output_peak = output_peak.max(sample.abs());
            let int_sample = (sample * MAX_VAL).clamp(-MAX_VAL, MAX_VAL - 1.0) as i16;
            writer.write_sample(int_sample)?;
        }
        done += block.len();
        progress(done, total);
    }

    writer.finalize()?;

    tracing::info!(
        source = %item.source.display(),
        output = %output.display(),
        class = item.class.name(),
        frames = total,
        "exported stem"
    );

    Ok(ExportStats {
        frames: total,
        input_peak,
        output_peak,
    })
}
