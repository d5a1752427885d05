//! # CLI Interface
//!
//! Argument structure for the `vfxd` binary, built with `clap` derive.
//! Secrets are read from the environment (`VFXD_MNEMONIC`,
//! `VFXD_PRIVATE_KEY`) so they stay out of shell history.

use crate::logging::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vfxd_traits::Network;

/// VerifiedX wallet command line.
///
/// Every command prints a single JSON document on stdout.
#[derive(Parser, Debug)]
#[command(name = "vfxd", about = "VerifiedX wallet CLI", version, propagate_version = true)]
pub struct VfxdCli {
    /// Settings shared by every command
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted before or after any subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Network to operate on: mainnet or testnet
    #[arg(long, global = true, env = "VFXD_NETWORK")]
    pub network: Option<Network>,

    /// JSON config file. Defaults to `vfxd_config.json` when present.
    #[arg(long, short = 'c', global = true, env = "VFXD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mainnet ledger API base URL
    #[arg(long, global = true, env = "VFXD_MAINNET_URL")]
    pub mainnet_url: Option<String>,

    /// Testnet ledger API base URL
    #[arg(long, global = true, env = "VFXD_TESTNET_URL")]
    pub testnet_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "VFXD_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Retries per read call after the first attempt
    #[arg(long, global = true, env = "VFXD_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a mnemonic and derive its first account
    CreateAccount {
        /// Phrase length: 12 or 24
        #[arg(long, default_value_t = 12)]
        words: usize,
    },
    /// Generate a standalone random key (no mnemonic)
    QuickAccount,
    /// Derive an account from `VFXD_MNEMONIC`
    Restore {
        /// Mnemonic phrase
        #[arg(long, env = "VFXD_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
        /// Optional BIP-39 passphrase
        #[arg(long, env = "VFXD_PASSPHRASE", hide_env_values = true, default_value = "")]
        passphrase: String,
        /// Account index
        #[arg(long, default_value_t = 0)]
        index: u32,
    },
    /// Import a hex private key from `VFXD_PRIVATE_KEY`
    ImportKey {
        /// Hex-encoded private key
        #[arg(long, env = "VFXD_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
    /// Show balance, locked funds, ADNR and activation for an address
    Details {
        /// Address to inspect
        address: String,
    },
    /// List transaction history, most recent first
    Transactions {
        /// Address to inspect
        address: String,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Transactions per page
        #[arg(long, default_value_t = vfxd_vfx::DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
    /// Sign and submit a transfer
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in VFX, e.g. `2.5`
        #[arg(long)]
        amount: String,
        /// Network fee override
        #[arg(long)]
        fee: Option<String>,
        /// Sender key
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// ADNR domain operations
    Domain {
        /// Operation to perform
        #[command(subcommand)]
        action: DomainAction,
    },
}

/// `domain` subcommands.
#[derive(Subcommand, Debug)]
pub enum DomainAction {
    /// Report whether a name is free to bind
    Check {
        /// Domain name, e.g. `alice.vfx`
        name: String,
    },
    /// Resolve a name to its bound address
    Lookup {
        /// Domain name
        name: String,
    },
    /// Bind a name to the signer's address
    Buy {
        /// Domain name
        name: String,
        /// Signer key
        #[command(flatten)]
        signer: SignerArgs,
    },
}

/// Where the signing key comes from. A private key wins over a mnemonic.
#[derive(Args, Debug, Clone)]
pub struct SignerArgs {
    /// Hex-encoded private key
    #[arg(long, env = "VFXD_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
    /// Mnemonic phrase
    #[arg(long, env = "VFXD_MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,
    /// Account index when signing from a mnemonic
    #[arg(long, default_value_t = 0)]
    pub index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        VfxdCli::command().debug_assert();
    }

    #[test]
    fn test_parse_transactions_defaults() {
        let cli = VfxdCli::try_parse_from(["vfxd", "transactions", "xAbc"]).unwrap();
        match cli.command {
            Commands::Transactions { address, page, limit } => {
                assert_eq!(address, "xAbc");
                assert_eq!(page, 1);
                assert_eq!(limit, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_network_after_subcommand() {
        let cli =
            VfxdCli::try_parse_from(["vfxd", "details", "RAbc", "--network", "mainnet"]).unwrap();
        assert_eq!(cli.global.network, Some(Network::Mainnet));
    }

    #[test]
    fn test_parse_domain_buy() {
        let cli = VfxdCli::try_parse_from([
            "vfxd",
            "domain",
            "buy",
            "alice.vfx",
            "--private-key",
            "01",
        ])
        .unwrap();
        match cli.command {
            Commands::Domain {
                action: DomainAction::Buy { name, signer },
            } => {
                assert_eq!(name, "alice.vfx");
                assert_eq!(signer.private_key.as_deref(), Some("01"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_network() {
        assert!(VfxdCli::try_parse_from(["vfxd", "--network", "devnet", "quick-account"]).is_err());
    }
}
