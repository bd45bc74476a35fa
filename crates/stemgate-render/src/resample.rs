//! Working-rate conversion for offline rendering.
//!
//! Preview and export never need transparent resampling quality; the gate
//! envelope is what matters. Downsampling applies a Butterworth biquad
//! lowpass below the target Nyquist before linear interpolation to keep
//! aliased energy out of the detection bands.

use stemgate_core::Biquad;

/// Fraction of the destination Nyquist where the anti-alias lowpass sits.
const ANTI_ALIAS_FRACTION: f32 = 0.45;

/// Convert a mono buffer from `src_rate` to `dst_rate`.
///
/// Returns the input unchanged when the rates already match. The output
/// length is `len * dst_rate / src_rate`, truncated.
pub fn convert_rate(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || samples.is_empty() || src_rate == 0 || dst_rate == 0 {
        return samples.to_vec();
    }

    let filtered: Vec<f32>;
    let source: &[f32] = if dst_rate < src_rate {
        let cutoff = ANTI_ALIAS_FRACTION * dst_rate as f32;
        match Biquad::lowpass(cutoff, 0.707, src_rate as f32) {
            Some(mut lowpass) => {
                filtered = samples.iter().map(|&s| lowpass.process(s)).collect();
                &filtered
            }
            None => samples,
        }
    } else {
        samples
    };

    let out_len = ((samples.len() as u64 * u64::from(dst_rate)) / u64::from(src_rate)) as usize;
    let step = f64::from(src_rate) / f64::from(dst_rate);

    let mut output = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let position = i as f64 * step;
        let index = position as usize;
        let frac = (position - index as f64) as f32;
        let a = source[index.min(source.len() - 1)];
        let b = source[(index + 1).min(source.len() - 1)];
        output.push(a + frac * (b - a));
    }
    output
}
