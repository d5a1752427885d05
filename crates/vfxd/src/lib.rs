//! # vfxd - VerifiedX Wallet Core
//!
//! One entry point for the vfxd crates. The key path (mnemonic, derivation,
//! addresses) is always available; the ledger client sits behind a feature.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Mnemonics, keys and addresses |
//! | `ledger` (default) | Ledger queries, transfers, ADNR names |
//!
//! ## Example
//!
//! ```
//! use vfxd::prelude::*;
//!
//! let mnemonic = Mnemonic::generate(WordCount::Twelve).unwrap();
//! let keypair = Keypair::from_mnemonic(&mnemonic.phrase(), 0, Network::Testnet).unwrap();
//! assert!(vfxd::hd_key::validate_address(keypair.address().as_str(), Network::Testnet));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

// ============================================================================
// Re-exports
// ============================================================================

pub use vfxd_error as error;
pub use vfxd_hd_key as hd_key;
pub use vfxd_mnemonic as mnemonic;
pub use vfxd_traits as traits;

/// HTTP transport
#[cfg(feature = "ledger")]
#[cfg_attr(docsrs, doc(cfg(feature = "ledger")))]
pub use vfxd_provider as provider;

/// Retry and timeout building blocks
#[cfg(feature = "ledger")]
#[cfg_attr(docsrs, doc(cfg(feature = "ledger")))]
pub use vfxd_resilience as resilience;

/// Ledger queries, transfers and ADNR names
#[cfg(feature = "ledger")]
#[cfg_attr(docsrs, doc(cfg(feature = "ledger")))]
pub mod vfx {
    pub use vfxd_vfx::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports
pub mod prelude {
    pub use vfxd_hd_key::{
        address_from_private, address_from_public_key, derive_from_mnemonic, generate_random,
        public_from_private, Address, Keypair, PrivateKey, PublicKey,
    };
    pub use vfxd_mnemonic::{Mnemonic, WordCount};
    pub use vfxd_traits::prelude::*;

    #[cfg(feature = "ledger")]
    pub use vfxd_vfx::{
        build_binding_transfer, build_transfer, get_address_details, is_available,
        list_transactions, lookup, submit, HttpLedger, LedgerConfig, MemoryLedger,
        RetryingLedger, TransferBuilder,
    };
}

/// SDK version
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
