//! User-facing gate settings.
//!
//! [`GateSettings`] is a plain value struct owned by the caller (one per
//! stem). The engine only ever reads it; [`GateProcessor::reconfigure`]
//! freezes a copy of the derived runtime values, so later edits have no
//! effect until the next reconfigure.
//!
//! [`GateProcessor::reconfigure`]: crate::GateProcessor::reconfigure

use crate::profile::DrumProfile;

/// Per-stem gate settings edited by the host application.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GateSettings {
    /// Gate enabled. When false the processor is a passthrough.
    pub active: bool,
    /// Open threshold in dB relative to full scale.
    pub threshold_db: f32,
    /// Attack time in seconds.
    pub attack_s: f32,
    /// Release time in seconds.
    pub release_s: f32,
    /// Requested closed-gate floor in dB; `None` leaves the adaptive floor
    /// alone and disables the low-level bleed fade.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub floor_db: Option<f32>,
    /// Whether the current values came from an auto-gate suggestion.
    pub auto_applied: bool,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            active: false,
            threshold_db: -35.0,
            attack_s: 0.003,
            release_s: 0.08,
            floor_db: None,
            auto_applied: false,
        }
    }
}

/// Suggestion produced by the external auto-gate analysis.
///
/// The engine never computes this; it only folds an accepted suggestion into
/// [`GateSettings`] via [`GateSettings::apply_suggestion`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoGateSuggestion {
    /// Suggested open threshold in dB.
    pub threshold_db: f32,
    /// Suggested release in seconds, if the analysis produced one.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub release_s: Option<f32>,
    /// Suggested floor in dB, if the analysis produced one.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub floor_db: Option<f32>,
}

impl GateSettings {
    /// Fold an auto-gate suggestion into these settings.
    ///
    /// The profile's per-voice threshold bias is added to the suggested
    /// threshold; absent suggestion fields leave the current values in place.
    pub fn apply_suggestion(&mut self, suggestion: &AutoGateSuggestion, profile: &DrumProfile) {
        self.threshold_db = suggestion.threshold_db + profile.threshold_bias_db;
        if let Some(release_s) = suggestion.release_s {
            self.release_s = release_s;
        }
        if let Some(floor_db) = suggestion.floor_db {
            self.floor_db = Some(floor_db);
        }
        self.active = true;
        self.auto_applied = true;
    }
}
