//! Single-stem preview command.

use super::parse_class;
use clap::Args;
use std::path::PathBuf;
use stemgate_core::GateSettings;
use stemgate_render::{CancellationToken, DEFAULT_TARGET_POINTS, render_preview};

#[derive(Args)]
pub struct PreviewArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Drum class (kick, snare, hi-hat, toms, percussion, custom)
    #[arg(short, long, default_value = "custom")]
    class: String,

    /// Gate threshold in dB
    #[arg(short, long, default_value = "-35.0", allow_hyphen_values = true)]
    threshold: f32,

    /// Attack time in seconds
    #[arg(long, default_value = "0.003")]
    attack: f32,

    /// Release time in seconds
    #[arg(long, default_value = "0.08")]
    release: f32,

    /// Closed-gate floor in dB
    #[arg(long, allow_hyphen_values = true)]
    floor: Option<f32>,

    /// Number of overlay points
    #[arg(long, default_value_t = DEFAULT_TARGET_POINTS)]
    points: usize,

    /// Write the peak overlay as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Keep a copy of the rendered intermediate WAV at this path
    #[arg(long)]
    keep_render: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct PeaksOutput<'a> {
    source: String,
    class: &'a str,
    points: usize,
    peaks: &'a [f32],
}

pub fn run(args: PreviewArgs) -> anyhow::Result<()> {
    let class = parse_class(&args.class)?;
    let settings = GateSettings {
        active: true,
        threshold_db: args.threshold,
        attack_s: args.attack,
        release_s: args.release,
        floor_db: args.floor,
        auto_applied: false,
    };

    println!("Rendering preview for {}...", args.input.display());
    let cancel = CancellationToken::new();
    let preview = render_preview(&args.input, &settings, class, args.points, &cancel)?;

    let max_peak = preview.peaks.iter().fold(0.0_f32, |acc, &p| acc.max(p));
    let audible = preview.peaks.iter().filter(|&&p| p > 0.01).count();
    println!(
        "  {} points, max {:.3}, {:.1}% above the floor",
        preview.peaks.len(),
        max_peak,
        100.0 * audible as f32 / preview.peaks.len().max(1) as f32
    );

    if let Some(json_path) = &args.json {
        let output = PeaksOutput {
            source: args.input.display().to_string(),
            class: class.name(),
            points: preview.peaks.len(),
            peaks: &preview.peaks,
        };
        std::fs::write(json_path, serde_json::to_string_pretty(&output)?)?;
        println!("  wrote overlay to {}", json_path.display());
    }

    if let Some(keep) = &args.keep_render {
        std::fs::copy(preview.rendered_path(), keep)?;
        println!("  kept rendered audio at {}", keep.display());
    }

    Ok(())
}
