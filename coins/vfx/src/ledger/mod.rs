//! [`LedgerService`](vfxd_traits::LedgerService) implementations.
//!
//! - [`HttpLedger`]: the VFX explorer REST API
//! - [`MemoryLedger`]: in-process state for tests and demos
//! - [`RetryingLedger`]: bounded retries around either

mod http;
mod memory;
mod retry;

pub use http::{tx_type_from_wire, HttpLedger};
pub use memory::MemoryLedger;
pub use retry::RetryingLedger;
