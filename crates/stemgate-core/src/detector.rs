//! Multi-band transient detector.
//!
//! Runs the (sidechain-shaped) mono signal through one bandpass filter per
//! focus band and reports the weighted maximum of the rectified outputs: a
//! per-sample proxy for "did a frequency region characteristic of this drum
//! voice just fire".

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::biquad::Biquad;
use crate::profile::FrequencyBand;

#[derive(Debug, Clone)]
struct BandStage {
    filter: Biquad,
    weight: f32,
}

/// Bank of weighted bandpass filters.
#[derive(Debug, Clone)]
pub struct BandDetector {
    bands: Vec<BandStage>,
}

impl BandDetector {
    /// Build one bandpass per focus band.
    ///
    /// Bands with degenerate edges are dropped silently; returns `None` only
    /// when no band at all survives, in which case the gate falls back to
    /// broadband detection.
    pub fn new(bands: &[FrequencyBand], sample_rate: f32) -> Option<Self> {
        let bands: Vec<BandStage> = bands
            .iter()
            .filter_map(|band| {
                Biquad::bandpass(band.low_hz, band.high_hz, sample_rate).map(|filter| BandStage {
                    filter,
                    weight: band.weight,
                })
            })
            .collect();

        if bands.is_empty() {
            None
        } else {
            Some(Self { bands })
        }
    }

    /// Weighted-max focus envelope for one sample.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let mut focus = 0.0_f32;
        for stage in &mut self.bands {
            let filtered = stage.filter.process(sample);
            focus = focus.max(filtered.abs() * stage.weight);
        }
        focus
    }

    /// Number of bands that survived construction.
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Clear all filter state.
    pub fn reset(&mut self) {
        for stage in &mut self.bands {
            stage.filter.reset();
        }
    }
}
