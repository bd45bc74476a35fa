//! Sidechain EQ chain.
//!
//! Pre-shapes the mono signal fed to detection: an optional highpass and
//! lowpass bracket the voice's range, emphasis peaks lift the regions that
//! should trigger the gate, and bleed dips pull down the regions where other
//! drums leak in. The gate still applies its gain to the original unfiltered
//! samples; this chain never touches the output path.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::biquad::Biquad;
use crate::profile::DrumProfile;

/// Butterworth Q for the bracket filters.
const BRACKET_Q: f32 = 0.71;

/// Ordered filter chain applied to the detection signal.
#[derive(Debug, Clone, Default)]
pub struct SidechainChain {
    stages: Vec<Biquad>,
}

impl SidechainChain {
    /// Assemble the chain for a profile: highpass, lowpass, emphasis peaks,
    /// bleed cuts, in that order. Stages with degenerate parameters are
    /// skipped rather than failing the build.
    pub fn build(profile: &DrumProfile, sample_rate: f32) -> Self {
        let mut stages = Vec::new();

        if let Some(cutoff) = profile.sidechain_hp_hz
            && let Some(filter) = Biquad::highpass(cutoff, BRACKET_Q, sample_rate)
        {
            stages.push(filter);
        }
        if let Some(cutoff) = profile.sidechain_lp_hz
            && let Some(filter) = Biquad::lowpass(cutoff, BRACKET_Q, sample_rate)
        {
            stages.push(filter);
        }
        for peak in profile.emphasis_peaks {
            if let Some(filter) = Biquad::peaking(peak.freq_hz, peak.q, peak.gain_db, sample_rate) {
                stages.push(filter);
            }
        }
        for cut in profile.bleed_cuts {
            if let Some(filter) = Biquad::peaking(cut.freq_hz, cut.q, cut.gain_db, sample_rate) {
                stages.push(filter);
            }
        }

        Self { stages }
    }

    /// Run one sample through every stage in order.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let mut value = sample;
        for stage in &mut self.stages {
            value = stage.process(value);
        }
        value
    }

    /// Number of stages that survived construction.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when no stage survived (chain is a passthrough).
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Clear all filter state.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{DrumClass, FrequencyBand, PeakSpec};

    const SR: f32 = 44_100.0;

    #[test]
    fn test_chain_stage_count_per_profile() {
        let snare = SidechainChain::build(DrumClass::Snare.profile(), SR);
        // highpass + 1 emphasis + 2 bleed cuts
        assert_eq!(snare.len(), 4);

        let toms = SidechainChain::build(DrumClass::Toms.profile(), SR);
        // highpass + lowpass + 1 emphasis + 1 bleed cut
        assert_eq!(toms.len(), 4);

        let custom = SidechainChain::build(DrumClass::Custom.profile(), SR);
        assert!(custom.is_empty());
    }

    #[test]
    fn test_degenerate_stage_is_skipped() {
        // A profile whose lowpass sits past Nyquist at a low working rate:
        // the stage drops out, the rest of the chain survives.
        static NARROW: DrumProfile = DrumProfile {
            focus_bands: &[FrequencyBand { low_hz: 100.0, high_hz: 200.0, weight: 1.0 }],
            floor_db: -50.0,
            hold_range: (0.03, 0.2),
            hysteresis_ratio: 0.6,
            threshold_bias_db: 0.0,
            focus_weight: 1.2,
            curve: 1.45,
            sidechain_hp_hz: Some(100.0),
            sidechain_lp_hz: Some(9_000.0),
            emphasis_peaks: &[],
            bleed_cuts: &[PeakSpec { freq_hz: 7_500.0, gain_db: -6.0, q: 1.0 }],
        };

        let full = SidechainChain::build(&NARROW, 44_100.0);
        assert_eq!(full.len(), 3);

        let at_12k = SidechainChain::build(&NARROW, 12_000.0);
        assert_eq!(at_12k.len(), 1); // only the highpass survives
    }

    #[test]
    fn test_empty_chain_is_passthrough() {
        let mut chain = SidechainChain::build(DrumClass::Custom.profile(), SR);
        for i in 0..32 {
            let x = (i as f32 / 32.0) - 0.5;
            assert_eq!(chain.process(x), x);
        }
    }
}
