// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{io, path::{Path, PathBuf}};

use serde::Deserialize;
use strum::AsRefStr;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "sparrow.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Parenthesized rendering, one line per program.
    #[default]
    Tree,

    /// Derived `Debug` output of the tree.
    Debug,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigRoot {
    pub log: ConfigSectionLog,
    pub output: ConfigSectionOutput,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigSectionLog {
    pub debug: bool,
    pub trace: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigSectionOutput {
    pub format: OutputFormat,
}

#[derive(Debug, Error, AsRefStr)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigRoot {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads `sparrow.toml` from `directory`. A missing file yields the
    /// default configuration.
    pub fn load(directory: &Path) -> Result<Self, ConfigError> {
        let path = directory.join(CONFIG_FILE_NAME);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No {CONFIG_FILE_NAME} in {}", directory.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        Self::from_toml(&text).map_err(|source| ConfigError::Invalid { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_default() {
        let config = ConfigRoot::from_toml("").unwrap();
        assert!(!config.log.debug);
        assert!(!config.log.trace);
        assert_eq!(config.output.format, OutputFormat::Tree);
    }

    #[test]
    fn sections_are_read() {
        let config = ConfigRoot::from_toml("[log]\ntrace = true\n\n[output]\nformat = \"debug\"\n").unwrap();
        assert!(config.log.trace);
        assert!(!config.log.debug);
        assert_eq!(config.output.format, OutputFormat::Debug);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(ConfigRoot::from_toml("[output]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let config = ConfigRoot::load(Path::new("/this/directory/does/not/exist")).unwrap();
        assert_eq!(config.output.format, OutputFormat::Tree);
    }
}
