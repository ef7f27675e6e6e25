// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::version::OsVersion;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "INTELLIBRIDGE_CONFIG";

/// Channel name shared with the managed-runtime side. Must match exactly.
pub const DEFAULT_CHANNEL_NAME: &str = "com.triplystays.app/apple_intelligence";

/// Advisory returned by `generateResponse` while on-device generation is not wired.
pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "Apple Intelligence is not yet available. Please use the cloud-based AI assistant.";

/// Runtime settings for the intelligence channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Channel identifier the endpoint registers under.
    pub channel_name: String,
    /// Lowest OS version at which the capability may exist.
    pub minimum_os_version: OsVersion,
    /// Advisory string for degraded generation.
    pub fallback_message: String,
    /// Reject extraction results that do not match a parseable JSON schema.
    pub enforce_schema: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.into(),
            minimum_os_version: OsVersion::new(18, 0, 0),
            fallback_message: DEFAULT_FALLBACK_MESSAGE.into(),
            enforce_schema: true,
        }
    }
}

impl BridgeConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded bridge config");
        Ok(config)
    }

    /// Load from `$INTELLIBRIDGE_CONFIG` if set, otherwise defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.channel_name.trim().is_empty() {
            return Err(BridgeError::Config("channel_name must not be empty".into()));
        }
        if self.fallback_message.trim().is_empty() {
            return Err(BridgeError::Config(
                "fallback_message must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_host_channel() {
        let config = BridgeConfig::default();
        assert_eq!(config.channel_name, "com.triplystays.app/apple_intelligence");
        assert_eq!(config.minimum_os_version, OsVersion::new(18, 0, 0));
        assert!(config.fallback_message.contains("cloud-based AI assistant"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"minimum_os_version": "26.0", "enforce_schema": false}}"#).unwrap();

        let config = BridgeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.minimum_os_version, OsVersion::new(26, 0, 0));
        assert!(!config.enforce_schema);
        assert_eq!(config.channel_name, DEFAULT_CHANNEL_NAME);
    }

    #[test]
    fn empty_channel_name_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"channel_name": "  "}}"#).unwrap();

        let err = BridgeConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn malformed_version_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"minimum_os_version": "eighteen"}}"#).unwrap();

        let err = BridgeConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, BridgeError::Serialization(_)));
    }

    #[test]
    fn load_follows_env_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"channel_name": "test.app/intelligence"}}"#).unwrap();

        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var(CONFIG_ENV_VAR, file.path()) };
        let loaded = BridgeConfig::load();
        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

        assert_eq!(loaded.unwrap().channel_name, "test.app/intelligence");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
