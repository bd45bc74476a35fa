//! Stemgate Core - drum-stem gate DSP primitives
//!
//! This crate provides the signal-processing core of the Stemgate engine:
//! everything needed to turn a raw drum-stem buffer into a gated buffer,
//! with zero allocation in the per-sample path.
//!
//! # Components
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficient
//!   designs. Constructors are fallible and return `None` for degenerate
//!   parameters (non-positive frequency, band at or past Nyquist).
//!
//! ## Detection
//!
//! - [`BandDetector`] - Bank of weighted bandpass filters producing a
//!   per-sample "focus" envelope for the frequency regions characteristic
//!   of a drum voice.
//! - [`SidechainChain`] - Ordered highpass/lowpass/peak/dip chain that
//!   pre-shapes the detection signal without touching the output signal.
//!
//! ## Gate
//!
//! - [`GateProcessor`] - The gate state machine. [`GateProcessor::reconfigure`]
//!   freezes user settings, a [`DrumProfile`], and the sample rate into a
//!   [`GateRuntimeConfig`]; the `process_*` methods then apply a time-varying
//!   gain with attack/release smoothing, hold, hysteresis, and an adaptive
//!   floor to interleaved `i16`, interleaved `f32`, or planar `f32` buffers.
//!
//! ## Configuration
//!
//! - [`DrumClass`] / [`DrumProfile`] - Static tuned tables per drum voice.
//! - [`GateSettings`] - Plain user-editable value struct.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (requires `alloc`). Disable the default
//! `std` feature:
//!
//! ```toml
//! [dependencies]
//! stemgate-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use stemgate_core::{DrumClass, GateProcessor, GateSettings};
//!
//! let settings = GateSettings {
//!     active: true,
//!     threshold_db: -30.0,
//!     ..GateSettings::default()
//! };
//!
//! let mut gate = GateProcessor::new();
//! gate.reconfigure(&settings, 48_000.0, DrumClass::Snare.profile());
//!
//! let mut buffer = vec![0.2_f32; 512];
//! gate.process_interleaved_f32(&mut buffer, 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod detector;
pub mod gate;
pub mod math;
pub mod profile;
pub mod settings;
pub mod sidechain;

pub use biquad::Biquad;
pub use detector::BandDetector;
pub use gate::{GateProcessor, GateRuntimeConfig, I16_FULL_SCALE, TRANSIENT_FACTOR};
pub use math::{db_to_linear, linear_to_db};
pub use profile::{DrumClass, DrumProfile, FrequencyBand, PeakSpec};
pub use settings::{AutoGateSuggestion, GateSettings};
pub use sidechain::SidechainChain;
