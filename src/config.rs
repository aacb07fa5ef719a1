use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value returned by the front-panel sense switch port (0xFF).
    pub sense_switches: u8,
    pub cassette: CassetteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CassetteConfig {
    /// Tape played back by CLOAD.
    pub load_path: PathBuf,
    /// Directory CSAVE writes programs into.
    pub save_dir: PathBuf,
    pub save_format: SaveFormat,
    /// Capacity of the CSAVE accumulation buffer, in bytes.
    pub capacity: usize,
    /// Clear the CSAVE buffer once a program has been written out.
    pub reset_after_save: bool,
}

impl Default for CassetteConfig {
    fn default() -> Self {
        Self {
            load_path: PathBuf::from("A.bin"),
            save_dir: PathBuf::from("."),
            save_format: SaveFormat::Text,
            capacity: 1024,
            reset_after_save: true,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Raw 7-bit bytes.
    Binary,
    /// Comma separated hex literals, ten per line.
    #[default]
    Text,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Binary => "bin",
            SaveFormat::Text => "txt",
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sense_switches, 0);
        assert_eq!(config.cassette.load_path, PathBuf::from("A.bin"));
        assert_eq!(config.cassette.save_format, SaveFormat::Text);
        assert_eq!(config.cassette.capacity, 1024);
        assert!(config.cassette.reset_after_save);
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(
            r#"{ "sense_switches": 2, "cassette": { "save_format": "binary", "capacity": 4096 } }"#,
        )
        .unwrap();

        assert_eq!(config.sense_switches, 2);
        assert_eq!(config.cassette.save_format, SaveFormat::Binary);
        assert_eq!(config.cassette.capacity, 4096);
        assert_eq!(config.cassette.load_path, PathBuf::from("A.bin"));
        assert_eq!(config.cassette.save_format.extension(), "bin");
    }

    #[test]
    fn test_invalid_json() {
        assert!(Config::from_json(r#"{ "cassette": { "save_format": "tape" } }"#).is_err());
    }
}
