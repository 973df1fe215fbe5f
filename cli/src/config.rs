use anyhow::{Context, Result};
use linkwords_core::RoundConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Contents of the optional TOML settings file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub round: RoundConfig,
    pub color: Option<bool>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::parse("").unwrap();

        assert_eq!(settings.round, RoundConfig::default());
        assert_eq!(settings.color, None);
    }

    #[test]
    fn reads_round_section() {
        let settings = Settings::parse("color = false\n\n[round]\nmax_tries = 6\n").unwrap();

        assert_eq!(settings.round.max_tries, 6);
        assert_eq!(settings.color, Some(false));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Settings::parse("tries = 3\n").is_err());
    }
}
