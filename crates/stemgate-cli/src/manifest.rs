//! Export manifest file format.
//!
//! A manifest is a TOML file listing the stems to gate and export:
//!
//! ```toml
//! output_dir = "gated"
//!
//! [[items]]
//! source = "stems/kick.wav"
//! class = "kick"
//! [items.gate]
//! active = true
//! threshold_db = -30.0
//! attack_s = 0.004
//! release_s = 0.06
//! floor_db = -45.0
//!
//! [[items]]
//! source = "stems/snare.wav"
//! class = "snare"
//! [items.gate]
//! active = true
//! threshold_db = -26.0
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stemgate_core::{DrumClass, GateSettings};

/// A batch of stems to export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Directory the gated WAVs land in, relative to the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// The stems to process.
    #[serde(default)]
    pub items: Vec<ManifestItem>,
}

/// One stem entry in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestItem {
    /// Source audio file, relative to the manifest.
    pub source: PathBuf,

    /// Drum classification selecting the tuned profile.
    pub class: DrumClass,

    /// Gate settings for this stem. Unset fields take the defaults; note
    /// the default is an inactive (passthrough) gate.
    #[serde(default)]
    pub gate: GateSettings,
}

impl ExportManifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest '{}'", path.display()))?;
        let manifest: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse manifest '{}'", path.display()))?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_roundtrip() {
        let manifest = ExportManifest {
            output_dir: Some(PathBuf::from("gated")),
            items: vec![ManifestItem {
                source: PathBuf::from("stems/kick.wav"),
                class: DrumClass::Kick,
                gate: GateSettings {
                    active: true,
                    threshold_db: -30.0,
                    ..GateSettings::default()
                },
            }],
        };

        let text = toml::to_string(&manifest).unwrap();
        let parsed: ExportManifest = toml::from_str(&text).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].class, DrumClass::Kick);
        assert!(parsed.items[0].gate.active);
    }

    #[test]
    fn test_gate_settings_default_when_omitted() {
        let text = r#"
            [[items]]
            source = "stems/hat.wav"
            class = "hi-hat"
        "#;
        let parsed: ExportManifest = toml::from_str(text).unwrap();
        assert_eq!(parsed.items[0].class, DrumClass::HiHat);
        assert!(!parsed.items[0].gate.active);
    }
}
