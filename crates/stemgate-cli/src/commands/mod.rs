//! CLI subcommands.

pub mod export;
pub mod preview;
pub mod profiles;

use stemgate_core::DrumClass;

/// Parse a drum class name as used in manifests and on the command line.
pub fn parse_class(name: &str) -> anyhow::Result<DrumClass> {
    match name.to_ascii_lowercase().as_str() {
        "kick" => Ok(DrumClass::Kick),
        "snare" => Ok(DrumClass::Snare),
        "hi-hat" | "hihat" | "hat" => Ok(DrumClass::HiHat),
        "toms" | "tom" => Ok(DrumClass::Toms),
        "percussion" | "perc" => Ok(DrumClass::Percussion),
        "custom" => Ok(DrumClass::Custom),
        other => anyhow::bail!(
            "unknown drum class '{other}' (expected kick, snare, hi-hat, toms, percussion, or custom)"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_class_aliases() {
        assert_eq!(parse_class("kick").unwrap(), DrumClass::Kick);
        assert_eq!(parse_class("HiHat").unwrap(), DrumClass::HiHat);
        assert_eq!(parse_class("hi-hat").unwrap(), DrumClass::HiHat);
        assert_eq!(parse_class("perc").unwrap(), DrumClass::Percussion);
        assert!(parse_class("cowbell").is_err());
    }
}
