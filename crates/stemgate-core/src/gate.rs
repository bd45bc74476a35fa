//! The gate state machine.
//!
//! [`GateProcessor`] converts a detected envelope into a time-varying gain
//! applied in place to sample buffers. It is a hybrid machine: a continuous
//! one-pole envelope plus a discrete hold counter, with hysteresis between
//! the open and close thresholds and an adaptive floor that tightens as the
//! threshold rises.
//!
//! [`reconfigure`] derives a frozen [`GateRuntimeConfig`] from user settings,
//! a [`DrumProfile`], and the sample rate; the `process_*` methods then run
//! allocation-free over interleaved `i16`, interleaved `f32`, or planar
//! `f32` buffers. A processor that was never reconfigured, or whose settings
//! were inactive, passes buffers through untouched.
//!
//! `reconfigure` and `process_*` mutate shared filter state in place; if a
//! host can call them from different threads, it must serialize the two
//! externally.
//!
//! [`reconfigure`]: GateProcessor::reconfigure

use libm::{expf, powf, roundf};

use crate::detector::BandDetector;
use crate::profile::DrumProfile;
use crate::settings::GateSettings;
use crate::sidechain::SidechainChain;

/// Full scale of 16-bit integer samples.
pub const I16_FULL_SCALE: f32 = 32_767.0;

/// Raw peaks at or above `threshold * TRANSIENT_FACTOR` force the gate open
/// before the smoothed envelope catches up. Tuned empirically; the exact
/// value interacts with the per-voice threshold tables.
pub const TRANSIENT_FACTOR: f32 = 1.3;

/// ln(1000): a release is the time to decay to 0.1% of a step.
const LN_1000: f32 = 6.907_755;

/// Derived per-sample constants, frozen by [`GateProcessor::reconfigure`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateRuntimeConfig {
    /// Open threshold as linear amplitude, floored away from zero.
    pub threshold_linear: f32,
    /// Close threshold as a fraction of the open threshold.
    pub close_ratio: f32,
    /// One-pole coefficient while the envelope rises.
    pub attack_coeff: f32,
    /// One-pole coefficient while the envelope falls.
    pub release_coeff: f32,
    /// Samples the gate stays fully open after a trigger.
    pub hold_samples: u32,
    /// Closed-gate gain.
    pub floor_gain: f32,
    /// Exponent shaping the gain ramp inside the hysteresis band.
    pub curve: f32,
    /// Multiplier on the focus envelope.
    pub focus_weight: f32,
    /// Normalized level below which passed samples fade toward silence.
    pub min_pass_linear: f32,
}

impl GateRuntimeConfig {
    fn derive(settings: &GateSettings, sample_rate: f32, profile: &DrumProfile) -> Self {
        let threshold_linear = powf(10.0, settings.threshold_db / 20.0).max(0.00005);
        let close_ratio = profile.hysteresis_ratio.clamp(0.25, 0.95);

        // The floor tightens with the threshold: a gate set near 0 dB is
        // asking for aggressive cleanup, so the closed gain sinks toward
        // -60 dB regardless of the voice's default.
        let tightness = ((settings.threshold_db + 24.0) / 24.0).clamp(0.0, 1.0);
        let adaptive_floor_db = profile.floor_db * (1.0 - tightness) + (-60.0) * tightness;
        let requested_floor_db = settings.floor_db.map(|db| db.min(-6.0));
        let floor_db = match requested_floor_db {
            Some(db) => adaptive_floor_db.min(db),
            None => adaptive_floor_db,
        };
        let floor_gain = powf(10.0, floor_db.max(-90.0) / 20.0);

        let min_pass_linear = powf(10.0, requested_floor_db.unwrap_or(-120.0).max(-120.0) / 20.0);

        let curve = profile.curve.clamp(1.1, 3.0);

        let (hold_min, hold_max) = profile.hold_range;
        let hold_s = (settings.release_s * 0.85).max(0.025).clamp(hold_min, hold_max);
        let hold_samples = (roundf(sample_rate * hold_s) as u32).max(1);

        let attack_coeff = if settings.attack_s > 0.0 {
            expf(-1.0 / (sample_rate * settings.attack_s.max(0.0004)))
        } else {
            0.0
        };
        let release_coeff = if settings.release_s > 0.0 {
            expf(-LN_1000 / (sample_rate * settings.release_s.max(0.001)))
        } else {
            0.0
        };

        Self {
            threshold_linear,
            close_ratio,
            attack_coeff,
            release_coeff,
            hold_samples,
            floor_gain,
            curve,
            focus_weight: profile.focus_weight.max(1.0),
            min_pass_linear,
        }
    }
}

/// The gate state machine.
///
/// One instance per processing context; drive it from a single thread.
///
/// # Example
///
/// ```rust
/// use stemgate_core::{DrumClass, GateProcessor, GateSettings};
///
/// let settings = GateSettings {
///     active: true,
///     threshold_db: -24.0,
///     attack_s: 0.005,
///     release_s: 0.05,
///     floor_db: Some(-40.0),
///     auto_applied: false,
/// };
///
/// let mut gate = GateProcessor::new();
/// assert!(gate.reconfigure(&settings, 44_100.0, DrumClass::Kick.profile()));
///
/// let mut buffer = vec![0i16; 1024];
/// gate.process_interleaved_i16(&mut buffer, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GateProcessor {
    config: Option<GateRuntimeConfig>,
    detector: Option<BandDetector>,
    sidechain: SidechainChain,
    envelope: f32,
    hold_counter: u32,
}

impl GateProcessor {
    /// Create an unconfigured (passthrough) processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the frozen config, detector, and sidechain chain.
    ///
    /// Returns true when the gate is active and configured. Inactive
    /// settings clear everything and return false; `process_*` is then a
    /// no-op until the next reconfigure.
    pub fn reconfigure(
        &mut self,
        settings: &GateSettings,
        sample_rate: f32,
        profile: &DrumProfile,
    ) -> bool {
        if !settings.active || sample_rate <= 0.0 {
            self.config = None;
            self.detector = None;
            self.sidechain = SidechainChain::default();
            self.envelope = 0.0;
            self.hold_counter = 0;
            return false;
        }

        self.config = Some(GateRuntimeConfig::derive(settings, sample_rate, profile));
        // A detector that loses every band (e.g. all bands above Nyquist at a
        // low working rate) degrades to broadband-only detection.
        self.detector = BandDetector::new(profile.focus_bands, sample_rate);
        self.sidechain = SidechainChain::build(profile, sample_rate);
        self.envelope = 0.0;
        self.hold_counter = 0;
        true
    }

    /// The frozen runtime config, if the gate is active.
    pub fn runtime_config(&self) -> Option<&GateRuntimeConfig> {
        self.config.as_ref()
    }

    /// Clear envelope, hold, and filter state without touching the config.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
        self.hold_counter = 0;
        if let Some(detector) = &mut self.detector {
            detector.reset();
        }
        self.sidechain.reset();
    }

    /// Envelope/hold update and gain decision for one frame.
    ///
    /// `mono` and `raw_peak_norm` are normalized to full scale = 1.0.
    #[inline]
    fn frame_gain(&mut self, cfg: &GateRuntimeConfig, mono: f32, raw_peak_norm: f32) -> f32 {
        let shaped = self.sidechain.process(mono);
        let broadband = shaped.abs();
        let focus = match &mut self.detector {
            Some(detector) => detector.process(shaped) * cfg.focus_weight,
            None => 0.0,
        };
        let detected = broadband.max(focus);

        let coeff = if detected > self.envelope {
            cfg.attack_coeff
        } else {
            cfg.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * detected;

        let ratio = self.envelope / cfg.threshold_linear;
        if ratio >= 1.0 {
            self.hold_counter = cfg.hold_samples;
        }

        // A raw peak well past the threshold opens the gate immediately,
        // before the smoothed envelope has caught up to the transient.
        let transient_hit = raw_peak_norm >= cfg.threshold_linear * TRANSIENT_FACTOR;
        if transient_hit {
            self.hold_counter = self.hold_counter.max(cfg.hold_samples);
            self.envelope = self.envelope.max(raw_peak_norm);
        }

        if transient_hit {
            1.0
        } else if self.hold_counter > 0 {
            self.hold_counter -= 1;
            1.0
        } else if ratio >= cfg.close_ratio {
            let t = ((ratio - cfg.close_ratio) / (1.0 - cfg.close_ratio)).clamp(0.0, 1.0);
            cfg.floor_gain.max(powf(t, cfg.curve))
        } else {
            cfg.floor_gain
        }
    }

    /// Residual fade for samples that passed the gate but sit below the
    /// requested floor: scales smoothly toward zero instead of hard-muting.
    #[inline]
    fn bleed_fade(cfg: &GateRuntimeConfig, normalized_abs: f32) -> f32 {
        if normalized_abs < cfg.min_pass_linear {
            normalized_abs / cfg.min_pass_linear
        } else {
            1.0
        }
    }

    /// Gate an interleaved 16-bit buffer in place.
    ///
    /// No-op for malformed buffers (zero channels, partial trailing frame)
    /// or an unconfigured gate.
    pub fn process_interleaved_i16(&mut self, samples: &mut [i16], channels: usize) {
        let Some(cfg) = self.config else { return };
        if channels == 0 || !samples.len().is_multiple_of(channels) {
            return;
        }

        for frame in samples.chunks_exact_mut(channels) {
            let mut sum = 0.0_f32;
            let mut peak = 0.0_f32;
            for &sample in frame.iter() {
                let value = f32::from(sample);
                sum += value;
                peak = peak.max(value.abs());
            }
            let mono = sum / (channels as f32 * I16_FULL_SCALE);
            let gain = self.frame_gain(&cfg, mono, peak / I16_FULL_SCALE);

            for sample in frame.iter_mut() {
                let gated = f32::from(*sample) * gain;
                let fade = Self::bleed_fade(&cfg, gated.abs() / I16_FULL_SCALE);
                *sample = (gated * fade) as i16;
            }
        }
    }

    /// Gate an interleaved float buffer (full scale ±1.0) in place.
    pub fn process_interleaved_f32(&mut self, samples: &mut [f32], channels: usize) {
        let Some(cfg) = self.config else { return };
        if channels == 0 || !samples.len().is_multiple_of(channels) {
            return;
        }

        for frame in samples.chunks_exact_mut(channels) {
            let mut sum = 0.0_f32;
            let mut peak = 0.0_f32;
            for &sample in frame.iter() {
                sum += sample;
                peak = peak.max(sample.abs());
            }
            let mono = sum / channels as f32;
            let gain = self.frame_gain(&cfg, mono, peak);

            for sample in frame.iter_mut() {
                let gated = *sample * gain;
                *sample = gated * Self::bleed_fade(&cfg, gated.abs());
            }
        }
    }

    /// Gate planar float channel buffers (full scale ±1.0) in place.
    ///
    /// All channel slices must have the same length; mismatched lengths are
    /// treated as a malformed buffer and ignored.
    pub fn process_planar_f32(&mut self, channels: &mut [&mut [f32]]) {
        let Some(cfg) = self.config else { return };
        let Some(first) = channels.first() else { return };
        let frames = first.len();
        if channels.iter().any(|channel| channel.len() != frames) {
            return;
        }

        let channel_count = channels.len() as f32;
        for i in 0..frames {
            let mut sum = 0.0_f32;
            let mut peak = 0.0_f32;
            for channel in channels.iter() {
                let value = channel[i];
                sum += value;
                peak = peak.max(value.abs());
            }
            let gain = self.frame_gain(&cfg, sum / channel_count, peak);

            for channel in channels.iter_mut() {
                let gated = channel[i] * gain;
                channel[i] = gated * Self::bleed_fade(&cfg, gated.abs());
            }
        }
    }
}
