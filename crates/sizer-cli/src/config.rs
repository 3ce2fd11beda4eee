//! TOML configuration file support.
//!
//! Command-line flags always win; a config file only supplies defaults for flags the
//! user didn't pass. The teacher's own crates don't read a config file of their own, so
//! this follows the broader pack's convention of `toml` + `serde(default)` structs
//! (see `filter-repo-rs`'s use of `toml` for its own settings) rather than anything
//! teacher-specific.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub threshold: Option<u8>,

    #[serde(default)]
    pub json: Option<bool>,

    #[serde(default)]
    pub no_names: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
        toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_minimal_config() {
        let config: FileConfig = toml::from_str("threshold = 2\njson = true\n").unwrap();
        assert_eq!(config.threshold, Some(2));
        assert_eq!(config.json, Some(true));
        assert_eq!(config.no_names, None);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<FileConfig, _> = toml::from_str("bogus = 1\n");
        assert!(result.is_err());
    }
}
