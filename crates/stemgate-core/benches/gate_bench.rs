//! Benchmarks for the gate hot path.
//!
//! Run with: cargo bench -p stemgate-core
#![allow(missing_docs)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use stemgate_core::{DrumClass, GateProcessor, GateSettings};

fn settings() -> GateSettings {
    GateSettings {
        active: true,
        threshold_db: -30.0,
        attack_s: 0.003,
        release_s: 0.08,
        floor_db: Some(-40.0),
        auto_applied: false,
    }
}

fn drum_burst(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / 44_100.0;
            let hit = (t * 4.0).fract() < 0.05;
            if hit { 0.6 * (t * 55.0 * std::f32::consts::TAU).sin() } else { 0.002 }
        })
        .collect()
}

fn bench_gate(c: &mut Criterion) {
    let source = drum_burst(4096);

    c.bench_function("gate_mono_4096", |b| {
        let mut gate = GateProcessor::new();
        gate.reconfigure(&settings(), 44_100.0, DrumClass::Kick.profile());
        let mut buffer = source.clone();
        b.iter(|| {
            buffer.copy_from_slice(&source);
            gate.process_interleaved_f32(black_box(&mut buffer), 1);
        });
    });

    c.bench_function("gate_stereo_i16_4096", |b| {
        let mut gate = GateProcessor::new();
        gate.reconfigure(&settings(), 44_100.0, DrumClass::Snare.profile());
        let source_i16: Vec<i16> = source
            .iter()
            .flat_map(|&s| {
                let v = (s * 32_767.0) as i16;
                [v, v]
            })
            .collect();
        let mut buffer = source_i16.clone();
        b.iter(|| {
            buffer.copy_from_slice(&source_i16);
            gate.process_interleaved_i16(black_box(&mut buffer), 2);
        });
    });

    c.bench_function("reconfigure", |b| {
        let mut gate = GateProcessor::new();
        let settings = settings();
        b.iter(|| {
            gate.reconfigure(black_box(&settings), 44_100.0, DrumClass::Toms.profile());
        });
    });
}

criterion_group!(benches, bench_gate);
criterion_main!(benches);
