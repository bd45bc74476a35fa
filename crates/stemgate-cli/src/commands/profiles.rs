//! Profile listing command.

use clap::Args;
use stemgate_core::DrumClass;

#[derive(Args)]
pub struct ProfilesArgs {
    /// Show the full tuning tables instead of the summary
    #[arg(long)]
    verbose: bool,
}

pub fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    println!("Drum classes:");
    for class in DrumClass::ALL {
        let profile = class.profile();
        let bands: Vec<String> = profile
            .focus_bands
            .iter()
            .map(|b| format!("{:.0}-{:.0} Hz (x{:.1})", b.low_hz, b.high_hz, b.weight))
            .collect();

        println!("\n  {}", class.name());
        println!("    focus bands: {}", bands.join(", "));
        println!(
            "    floor {:.0} dB, hold {:.0}-{:.0} ms, hysteresis {:.2}",
            profile.floor_db,
            profile.hold_range.0 * 1000.0,
            profile.hold_range.1 * 1000.0,
            profile.hysteresis_ratio
        );

        if args.verbose {
            println!(
                "    curve {:.2}, focus weight {:.1}, threshold bias {:+.1} dB",
                profile.curve, profile.focus_weight, profile.threshold_bias_db
            );
            if let Some(hp) = profile.sidechain_hp_hz {
                println!("    sidechain highpass: {hp:.0} Hz");
            }
            if let Some(lp) = profile.sidechain_lp_hz {
                println!("    sidechain lowpass: {lp:.0} Hz");
            }
            for peak in profile.emphasis_peaks {
                println!(
                    "    emphasis: {:.0} Hz {:+.1} dB (Q {:.1})",
                    peak.freq_hz, peak.gain_db, peak.q
                );
            }
            for cut in profile.bleed_cuts {
                println!(
                    "    bleed cut: {:.0} Hz {:+.1} dB (Q {:.1})",
                    cut.freq_hz, cut.gain_db, cut.q
                );
            }
        }
    }
    Ok(())
}
