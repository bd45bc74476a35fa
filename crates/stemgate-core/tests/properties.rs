//! Property-based tests for the gate and its filter primitives.
//!
//! Uses proptest to verify the invariants that hold for any settings the
//! host can produce: finite output, no gain above unity, exact passthrough
//! when inactive, and reproducible reconfiguration.

use proptest::prelude::*;
use stemgate_core::{Biquad, DrumClass, GateProcessor, GateSettings};

fn arb_settings() -> impl Strategy<Value = GateSettings> {
    (
        any::<bool>(),
        -80.0f32..=0.0,
        0.0f32..=0.1,
        0.0f32..=0.5,
        prop::option::of(-80.0f32..=-6.0),
    )
        .prop_map(|(active, threshold_db, attack_s, release_s, floor_db)| GateSettings {
            active,
            threshold_db,
            attack_s,
            release_s,
            floor_db,
            auto_applied: false,
        })
}

fn arb_class() -> impl Strategy<Value = DrumClass> {
    prop::sample::select(DrumClass::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Finite input in [-1, 1] always produces finite output, for any
    /// settings and any drum class.
    #[test]
    fn gate_output_is_finite(
        input in prop::collection::vec(-1.0f32..=1.0, 64..=512),
        settings in arb_settings(),
        class in arb_class(),
    ) {
        let mut gate = GateProcessor::new();
        gate.reconfigure(&settings, 44_100.0, class.profile());

        let mut buffer = input;
        gate.process_interleaved_f32(&mut buffer, 1);
        for (i, sample) in buffer.iter().enumerate() {
            prop_assert!(sample.is_finite(), "sample {i} not finite: {sample}");
        }
    }

    /// The gate only ever attenuates: |output| <= |input| per sample.
    #[test]
    fn gate_never_amplifies(
        input in prop::collection::vec(-1.0f32..=1.0, 64..=512),
        settings in arb_settings(),
        class in arb_class(),
    ) {
        let mut gate = GateProcessor::new();
        gate.reconfigure(&settings, 44_100.0, class.profile());

        let original = input.clone();
        let mut buffer = input;
        gate.process_interleaved_f32(&mut buffer, 1);
        for (out, inp) in buffer.iter().zip(original.iter()) {
            prop_assert!(
                out.abs() <= inp.abs() + 1e-7,
                "amplified {inp} -> {out}"
            );
        }
    }

    /// Inactive settings make processing the identity on any buffer.
    #[test]
    fn inactive_gate_is_identity(
        input in prop::collection::vec(-1.0f32..=1.0, 64..=512),
        mut settings in arb_settings(),
        class in arb_class(),
        channels in 1usize..=4,
    ) {
        settings.active = false;

        let mut gate = GateProcessor::new();
        prop_assert!(!gate.reconfigure(&settings, 44_100.0, class.profile()));

        let frames = input.len() / channels;
        let original: Vec<f32> = input[..frames * channels].to_vec();
        let mut buffer = original.clone();
        gate.process_interleaved_f32(&mut buffer, channels);
        prop_assert_eq!(buffer, original);
    }

    /// Reconfiguring twice with identical inputs is indistinguishable from
    /// reconfiguring once.
    #[test]
    fn reconfigure_is_idempotent(
        input in prop::collection::vec(-1.0f32..=1.0, 64..=256),
        settings in arb_settings(),
        class in arb_class(),
    ) {
        let profile = class.profile();

        let mut once = GateProcessor::new();
        once.reconfigure(&settings, 44_100.0, profile);

        let mut twice = GateProcessor::new();
        twice.reconfigure(&settings, 44_100.0, profile);
        twice.reconfigure(&settings, 44_100.0, profile);

        prop_assert_eq!(once.runtime_config(), twice.runtime_config());

        let mut a = input.clone();
        let mut b = input;
        once.process_interleaved_f32(&mut a, 1);
        twice.process_interleaved_f32(&mut b, 1);
        prop_assert_eq!(a, b);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// A bandpass filter attenuates tones an octave outside its edges more
    /// than a tone at its center frequency.
    #[test]
    fn bandpass_is_selective(
        low in 40.0f32..=400.0,
        width_factor in 1.5f32..=4.0,
    ) {
        let sample_rate = 44_100.0;
        let high = low * width_factor;
        prop_assume!(high < 0.48 * sample_rate);
        let center = (low * high).sqrt();

        let response = |freq: f32| -> f32 {
            let mut filter = Biquad::bandpass(low, high, sample_rate)
                .expect("valid band");
            let mut peak = 0.0_f32;
            for n in 0..16_384 {
                let x = (2.0 * core::f32::consts::PI * freq * n as f32 / sample_rate).sin();
                let y = filter.process(x);
                if n > 8_192 {
                    peak = peak.max(y.abs());
                }
            }
            peak
        };

        let at_center = response(center);
        let above = response(2.0 * high);
        let below = response(0.5 * low);
        prop_assert!(at_center > above, "center {at_center} vs above {above}");
        prop_assert!(at_center > below, "center {at_center} vs below {below}");
    }
}
