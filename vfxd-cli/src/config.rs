//! CLI configuration.
//!
//! Resolution order, later wins: built-in defaults, the JSON config file,
//! `.env` and the process environment, then command-line flags. clap reads
//! the environment for each flag, so the last two steps arrive together in
//! [`GlobalArgs`].

use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use vfxd_traits::Network;
use vfxd_vfx::{HttpLedger, LedgerConfig, RetryingLedger};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "vfxd_config.json";

/// Contents of the JSON config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Network to operate on
    pub network: Option<Network>,
    /// Mainnet ledger API base URL
    pub mainnet_url: Option<String>,
    /// Testnet ledger API base URL
    pub testnet_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Retries per read call
    pub max_retries: Option<u32>,
}

impl FileConfig {
    /// Reads `path`. A missing default file yields an empty config; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Network every command runs against
    pub network: Network,
    /// Ledger endpoints and retry policy
    pub ledger: LedgerConfig,
}

impl Settings {
    /// Layers `file` over the defaults and `args` over `file`
    pub fn resolve(file: FileConfig, args: &GlobalArgs) -> Self {
        let network = args.network.or(file.network).unwrap_or_default();

        let mut ledger = LedgerConfig::default();
        if let Some(url) = args.mainnet_url.clone().or(file.mainnet_url) {
            ledger = ledger.with_url(Network::Mainnet, url);
        }
        if let Some(url) = args.testnet_url.clone().or(file.testnet_url) {
            ledger = ledger.with_url(Network::Testnet, url);
        }
        if let Some(secs) = args.timeout_secs.or(file.timeout_secs) {
            ledger = ledger.with_timeout(secs);
        }
        if let Some(retries) = args.max_retries.or(file.max_retries) {
            ledger = ledger.with_max_retries(retries);
        }

        Self { network, ledger }
    }

    /// Loads the config file named by `args` and resolves against it
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let file = FileConfig::load(args.config.as_deref())?;
        Ok(Self::resolve(file, args))
    }

    /// HTTP ledger for these settings, with read retries
    pub fn ledger(&self) -> Result<RetryingLedger<HttpLedger>> {
        let http = HttpLedger::new(self.ledger.clone()).context("invalid ledger configuration")?;
        Ok(RetryingLedger::new(http, self.ledger.retry.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(FileConfig::default(), &GlobalArgs::default());
        assert_eq!(settings.network, Network::Testnet);
        assert_eq!(settings.ledger, LedgerConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"{"network":"mainnet","mainnet_url":"http://localhost:9000/api","timeout_secs":3}"#,
        );
        let loaded = FileConfig::load(Some(file.path())).unwrap();
        let settings = Settings::resolve(loaded, &GlobalArgs::default());
        assert_eq!(settings.network, Network::Mainnet);
        assert_eq!(settings.ledger.mainnet.url, "http://localhost:9000/api");
        assert_eq!(settings.ledger.testnet.timeout_secs, 3);
    }

    #[test]
    fn test_args_override_file() {
        let file = FileConfig {
            network: Some(Network::Mainnet),
            testnet_url: Some("http://file/api".into()),
            max_retries: Some(5),
            ..Default::default()
        };
        let args = GlobalArgs {
            network: Some(Network::Testnet),
            testnet_url: Some("http://flag/api".into()),
            max_retries: Some(1),
            ..Default::default()
        };
        let settings = Settings::resolve(file, &args);
        assert_eq!(settings.network, Network::Testnet);
        assert_eq!(settings.ledger.testnet.url, "http://flag/api");
        assert_eq!(settings.ledger.retry.backoff.max_attempts, 2);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(FileConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_unknown_field_is_error() {
        let file = write_config(r#"{"netwrok":"mainnet"}"#);
        assert!(FileConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_bad_url_rejected_when_building_ledger() {
        let args = GlobalArgs {
            mainnet_url: Some("ftp://nowhere".into()),
            ..Default::default()
        };
        let settings = Settings::resolve(FileConfig::default(), &args);
        assert!(settings.ledger().is_err());
    }
}
