//! Static tuned tables per drum voice.
//!
//! Every [`DrumClass`] maps to one immutable [`DrumProfile`]: the frequency
//! regions a hit of that voice concentrates energy in, the closed-gate floor,
//! the hold window, and the sidechain shaping stages that suppress bleed from
//! neighboring drums before detection. The tables are data only; all behavior
//! lives in the detector, sidechain, and gate modules that consume them.

/// A weighted detection band.
///
/// Invariant: `0 < low_hz < high_hz`. Bands violating this are dropped at
/// filter-construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    /// Lower band edge in Hz.
    pub low_hz: f32,
    /// Upper band edge in Hz.
    pub high_hz: f32,
    /// Relative weight of this band in the focus envelope.
    pub weight: f32,
}

/// A peaking-EQ stage specification (emphasis boost or bleed dip).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakSpec {
    /// Center frequency in Hz.
    pub freq_hz: f32,
    /// Gain in dB; positive emphasizes, negative cuts.
    pub gain_db: f32,
    /// Filter Q.
    pub q: f32,
}

/// Drum-stem classification selecting a tuned [`DrumProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DrumClass {
    /// Kick drum.
    Kick,
    /// Snare drum.
    Snare,
    /// Hi-hat.
    HiHat,
    /// Rack and floor toms.
    Toms,
    /// Tambourine, claps, shakers.
    Percussion,
    /// Uncategorized stem; broadband defaults.
    Custom,
}

impl DrumClass {
    /// All classes, in display order.
    pub const ALL: [DrumClass; 6] = [
        DrumClass::Kick,
        DrumClass::Snare,
        DrumClass::HiHat,
        DrumClass::Toms,
        DrumClass::Percussion,
        DrumClass::Custom,
    ];

    /// The tuned profile for this class.
    pub fn profile(self) -> &'static DrumProfile {
        match self {
            DrumClass::Kick => &KICK,
            DrumClass::Snare => &SNARE,
            DrumClass::HiHat => &HI_HAT,
            DrumClass::Toms => &TOMS,
            DrumClass::Percussion => &PERCUSSION,
            DrumClass::Custom => &CUSTOM,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            DrumClass::Kick => "kick",
            DrumClass::Snare => "snare",
            DrumClass::HiHat => "hi-hat",
            DrumClass::Toms => "toms",
            DrumClass::Percussion => "percussion",
            DrumClass::Custom => "custom",
        }
    }
}

/// Per-class gate tuning constants.
///
/// Static singletons; never mutated. Retrieved via [`DrumClass::profile`].
#[derive(Debug)]
pub struct DrumProfile {
    /// Detection bands characteristic of this voice.
    pub focus_bands: &'static [FrequencyBand],
    /// Closed-gate floor in dB before adaptive shaping.
    pub floor_db: f32,
    /// Allowed hold window in seconds (min, max).
    pub hold_range: (f32, f32),
    /// Close threshold as a fraction of the open threshold.
    pub hysteresis_ratio: f32,
    /// Offset in dB applied to auto-suggested thresholds for this voice.
    pub threshold_bias_db: f32,
    /// Multiplier on the focus envelope relative to broadband level.
    pub focus_weight: f32,
    /// Exponent shaping the gain ramp inside the hysteresis band.
    pub curve: f32,
    /// Optional sidechain highpass cutoff in Hz.
    pub sidechain_hp_hz: Option<f32>,
    /// Optional sidechain lowpass cutoff in Hz.
    pub sidechain_lp_hz: Option<f32>,
    /// Peaking boosts applied to the detection signal.
    pub emphasis_peaks: &'static [PeakSpec],
    /// Peaking dips cutting bleed regions out of the detection signal.
    pub bleed_cuts: &'static [PeakSpec],
}

static KICK: DrumProfile = DrumProfile {
    focus_bands: &[
        FrequencyBand { low_hz: 35.0, high_hz: 90.0, weight: 1.0 },
        FrequencyBand { low_hz: 90.0, high_hz: 180.0, weight: 0.6 },
    ],
    floor_db: -55.0,
    hold_range: (0.04, 0.18),
    hysteresis_ratio: 0.6,
    threshold_bias_db: -2.0,
    focus_weight: 1.6,
    curve: 1.35,
    sidechain_hp_hz: None,
    sidechain_lp_hz: Some(400.0),
    emphasis_peaks: &[PeakSpec { freq_hz: 60.0, gain_db: 4.0, q: 1.0 }],
    // snare ring bleeding into the kick mic
    bleed_cuts: &[PeakSpec { freq_hz: 300.0, gain_db: -6.0, q: 1.2 }],
};

static SNARE: DrumProfile = DrumProfile {
    focus_bands: &[
        FrequencyBand { low_hz: 150.0, high_hz: 350.0, weight: 1.0 },
        FrequencyBand { low_hz: 2_000.0, high_hz: 5_000.0, weight: 0.7 },
    ],
    floor_db: -50.0,
    hold_range: (0.05, 0.22),
    hysteresis_ratio: 0.6,
    threshold_bias_db: 0.0,
    focus_weight: 1.5,
    curve: 1.45,
    sidechain_hp_hz: Some(120.0),
    sidechain_lp_hz: None,
    emphasis_peaks: &[PeakSpec { freq_hz: 200.0, gain_db: 3.0, q: 1.1 }],
    bleed_cuts: &[
        PeakSpec { freq_hz: 60.0, gain_db: -8.0, q: 1.0 },
        PeakSpec { freq_hz: 8_000.0, gain_db: -4.0, q: 0.9 },
    ],
};

static HI_HAT: DrumProfile = DrumProfile {
    focus_bands: &[
        FrequencyBand { low_hz: 6_000.0, high_hz: 12_000.0, weight: 1.0 },
        FrequencyBand { low_hz: 3_000.0, high_hz: 6_000.0, weight: 0.6 },
    ],
    floor_db: -48.0,
    hold_range: (0.02, 0.12),
    hysteresis_ratio: 0.65,
    threshold_bias_db: 1.5,
    focus_weight: 1.4,
    curve: 1.6,
    sidechain_hp_hz: Some(2_500.0),
    sidechain_lp_hz: None,
    emphasis_peaks: &[PeakSpec { freq_hz: 9_000.0, gain_db: 3.0, q: 0.9 }],
    bleed_cuts: &[PeakSpec { freq_hz: 200.0, gain_db: -10.0, q: 0.8 }],
};

static TOMS: DrumProfile = DrumProfile {
    focus_bands: &[
        FrequencyBand { low_hz: 80.0, high_hz: 220.0, weight: 1.0 },
        FrequencyBand { low_hz: 220.0, high_hz: 450.0, weight: 0.6 },
    ],
    floor_db: -52.0,
    hold_range: (0.06, 0.25),
    hysteresis_ratio: 0.55,
    threshold_bias_db: -1.0,
    focus_weight: 1.5,
    curve: 1.35,
    sidechain_hp_hz: Some(50.0),
    sidechain_lp_hz: Some(800.0),
    emphasis_peaks: &[PeakSpec { freq_hz: 120.0, gain_db: 3.0, q: 1.0 }],
    bleed_cuts: &[PeakSpec { freq_hz: 5_000.0, gain_db: -6.0, q: 0.8 }],
};

static PERCUSSION: DrumProfile = DrumProfile {
    focus_bands: &[
        FrequencyBand { low_hz: 4_000.0, high_hz: 9_000.0, weight: 1.0 },
        FrequencyBand { low_hz: 1_500.0, high_hz: 4_000.0, weight: 0.8 },
    ],
    floor_db: -46.0,
    hold_range: (0.03, 0.15),
    hysteresis_ratio: 0.62,
    threshold_bias_db: 1.0,
    focus_weight: 1.3,
    curve: 1.5,
    sidechain_hp_hz: Some(800.0),
    sidechain_lp_hz: None,
    emphasis_peaks: &[],
    bleed_cuts: &[PeakSpec { freq_hz: 100.0, gain_db: -10.0, q: 0.8 }],
};

static CUSTOM: DrumProfile = DrumProfile {
    focus_bands: &[FrequencyBand { low_hz: 60.0, high_hz: 8_000.0, weight: 1.0 }],
    floor_db: -50.0,
    hold_range: (0.03, 0.2),
    hysteresis_ratio: 0.6,
    threshold_bias_db: 0.0,
    focus_weight: 1.2,
    curve: 1.45,
    sidechain_hp_hz: None,
    sidechain_lp_hz: None,
    emphasis_peaks: &[],
    bleed_cuts: &[],
};
