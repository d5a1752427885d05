//! # vfxd VFX
//!
//! VerifiedX support for the vfxd wallet core: ledger queries, transfer
//! building and signing, and ADNR domain names.
//!
//! Every operation is a free function parameterized by a ledger, a
//! [`Keypair`](vfxd_hd_key::Keypair) and a [`Network`](vfxd_traits::Network).
//! There is no client object holding hidden state.
//!
//! ## Features
//!
//! - Address details and paginated, most-recent-first transaction history
//! - Deterministically signed transfers ([`TransferBuilder`] for overrides)
//! - Domain availability, lookup and binding (`*.vfx`)
//! - REST, in-memory and retrying [`LedgerService`](vfxd_traits::LedgerService) backends
//!
//! ## Example
//!
//! ```
//! use vfxd_hd_key::Keypair;
//! use vfxd_traits::{Amount, Network};
//! use vfxd_vfx::{build_transfer, get_address_details, submit, MemoryLedger};
//!
//! # tokio_test_block(async {
//! let ledger = MemoryLedger::new();
//! let alice = Keypair::generate(Network::Testnet).unwrap();
//! let bob = Keypair::generate(Network::Testnet).unwrap();
//! ledger.fund(Network::Testnet, alice.address().as_str(), Amount::from_units(10)).unwrap();
//!
//! let signed = build_transfer(&alice, bob.address().as_str(), "2.5", Network::Testnet).unwrap();
//! submit(&ledger, &signed).await.unwrap();
//!
//! let details = get_address_details(&ledger, bob.address().as_str(), Network::Testnet)
//!     .await
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(details.available().to_string(), "2.5");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod ledger;
pub mod query;
pub mod transfer;

pub use config::LedgerConfig;
pub use domain::{
    build_binding_transfer, is_available, is_valid_domain, lookup, normalize_domain, ADNR_SINK,
    DOMAIN_REGISTRATION_COST,
};
pub use ledger::{HttpLedger, MemoryLedger, RetryingLedger};
pub use query::{get_address_details, list_transactions, DEFAULT_PAGE_SIZE};
pub use transfer::{
    build_transfer, payload_digest, submit, verify_signed_transfer, IntoAmount, TransferBuilder,
    DEFAULT_FEE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_binding_transfer, build_transfer, get_address_details, is_available,
        list_transactions, lookup, submit, HttpLedger, LedgerConfig, MemoryLedger,
        RetryingLedger, TransferBuilder,
    };
    pub use vfxd_traits::prelude::*;
}
