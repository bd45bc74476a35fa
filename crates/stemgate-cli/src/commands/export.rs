//! Batch export command.

use crate::manifest::ExportManifest;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use stemgate_core::linear_to_db;
use stemgate_render::{ExportItem, export_item};

#[derive(Args)]
pub struct ExportArgs {
    /// Export manifest (TOML)
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Output directory (overrides the manifest's output_dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop at the first failing item instead of continuing
    #[arg(long)]
    fail_fast: bool,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let manifest = ExportManifest::load(&args.manifest)?;
    if manifest.items.is_empty() {
        anyhow::bail!("manifest lists no items");
    }

    let base_dir = args
        .manifest
        .parent()
        .map(PathBuf::from)
        .unwrap_or_default();
    let output_dir = args.output.unwrap_or_else(|| {
        base_dir.join(manifest.output_dir.clone().unwrap_or_else(|| PathBuf::from("gated")))
    });
    std::fs::create_dir_all(&output_dir)?;

    println!(
        "Exporting {} stem(s) to {}...",
        manifest.items.len(),
        output_dir.display()
    );

    let mut failures = 0usize;
    for entry in &manifest.items {
        let source = base_dir.join(&entry.source);
        let name = source
            .file_stem()
            .map_or_else(|| "stem".to_string(), |s| s.to_string_lossy().into_owned());
        let output = output_dir.join(format!("{name}.wav"));

        let item = ExportItem {
            source: source.clone(),
            class: entry.class,
            settings: entry.gate,
        };

        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {msg} [{bar:30.cyan/blue}] {percent}%")
                .unwrap()
                .progress_chars("##-"),
        );
        pb.set_message(format!("{name} ({})", entry.class.name()));

        let result = export_item(&item, &output, |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        });

        match result {
            Ok(stats) => {
                pb.finish_and_clear();
                println!(
                    "  {name}: {} frames, peak {:.1} dB -> {:.1} dB",
                    stats.frames,
                    linear_to_db(stats.input_peak),
                    linear_to_db(stats.output_peak)
                );
            }
            Err(error) => {
                pb.finish_and_clear();
                failures += 1;
                eprintln!("  {name}: FAILED: {error}");
                if args.fail_fast {
                    anyhow::bail!("export failed for '{}'", source.display());
                }
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} item(s) failed", manifest.items.len());
    }
    println!("Done.");
    Ok(())
}
