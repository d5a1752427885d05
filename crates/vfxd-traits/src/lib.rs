//! # vfxd Traits
//!
//! Shared model for the vfxd VerifiedX wallet core: networks, amounts, ledger
//! records, signed transfers and the [`LedgerService`] trait every ledger
//! backend implements.
//!
//! ## Core Types
//!
//! - [`Network`] - Testnet or Mainnet, fixes address version byte and endpoint
//! - [`Amount`] - exact decimal VFX amount (up to 18 fractional digits)
//! - [`AccountDetails`] - snapshot of an address on the ledger
//! - [`Transaction`] / [`TransactionPage`] - transaction history
//! - [`DomainBinding`] - ADNR name record
//! - [`TransferPayload`] / [`SignedTransfer`] - the write path
//! - [`LedgerService`] - the remote ledger contract
//!
//! ## Example
//!
//! ```ignore
//! use vfxd_traits::prelude::*;
//!
//! async fn balance<L: LedgerService>(ledger: &L, address: &str) -> Result<Option<Amount>> {
//!     let details = ledger.address_details(Network::Testnet, address).await?;
//!     Ok(details.map(|d| d.available()))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use vfxd_error::{Result, VfxdError};

/// Maximum number of fractional digits a VFX amount may carry
pub const VFX_DECIMALS: u32 = 18;

// ============================================================================
// Network
// ============================================================================

/// A VerifiedX network. Fixed for the lifetime of a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Public test network
    #[default]
    Testnet,
    /// Production network
    Mainnet,
}

impl Network {
    /// All known networks
    pub const ALL: [Network; 2] = [Network::Testnet, Network::Mainnet];

    /// Address version byte for this network
    pub fn version_byte(&self) -> u8 {
        match self {
            Network::Mainnet => 0x3C,
            Network::Testnet => 0x89,
        }
    }

    /// Leading character of every Base58 address on this network
    pub fn address_prefix(&self) -> char {
        match self {
            Network::Mainnet => 'R',
            Network::Testnet => 'x',
        }
    }

    /// Default ledger API base URL
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://data.verifiedx.io/api",
            Network::Testnet => "https://data-testnet.verifiedx.io/api",
        }
    }

    /// Lowercase network name
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Looks a network up by address version byte
    pub fn from_version_byte(byte: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.version_byte() == byte)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = VfxdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            other => Err(VfxdError::InvalidParameter(format!(
                "unknown network '{other}', expected mainnet or testnet"
            ))),
        }
    }
}

// ============================================================================
// Amount
// ============================================================================

/// An exact VFX amount.
///
/// Wraps a [`Decimal`] that is kept normalized (no trailing zeros), so equal
/// amounts always serialize to the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero VFX
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates an amount, rejecting more than [`VFX_DECIMALS`] fractional digits
    pub fn new(value: Decimal) -> Result<Self> {
        let value = value.normalize();
        if value.scale() > VFX_DECIMALS {
            return Err(VfxdError::InvalidAmount(format!(
                "{value} has more than {VFX_DECIMALS} fractional digits"
            )));
        }
        Ok(Self(value))
    }

    /// Parses a decimal string such as `"5"`, `"0.00001"` or `"12.5"`
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VfxdError::InvalidAmount("empty amount".into()));
        }
        let value = Decimal::from_str_exact(trimmed)
            .map_err(|e| VfxdError::InvalidAmount(format!("'{trimmed}' is not a number: {e}")))?;
        Self::new(value)
    }

    /// Whole VFX units
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// True if strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// True if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checked addition
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(|v| Amount(v.normalize()))
    }

    /// Checked subtraction (may go negative)
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(|v| Amount(v.normalize()))
    }

    /// Subtraction clamped at zero
    pub fn saturating_sub(&self, other: Amount) -> Amount {
        match self.checked_sub(other) {
            Some(v) if v.0 >= Decimal::ZERO => v,
            _ => Amount::ZERO,
        }
    }

    fn from_f64_lossy(value: f64) -> Result<Self> {
        let d = Decimal::from_f64(value)
            .ok_or_else(|| VfxdError::InvalidAmount(format!("{value} is not representable")))?;
        Self::new(d.round_dp(VFX_DECIMALS))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = VfxdError;

    fn from_str(s: &str) -> Result<Self> {
        Amount::parse(s)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Amount::from_units(units)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = VfxdError;

    fn try_from(value: Decimal) -> Result<Self> {
        Amount::new(value)
    }
}

impl TryFrom<&str> for Amount {
    type Error = VfxdError;

    fn try_from(value: &str) -> Result<Self> {
        Amount::parse(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> serde::de::Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount as a string or number")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
                Amount::parse(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
                Ok(Amount::from_units(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Amount, E> {
                Amount::new(Decimal::from(v)).map_err(E::custom)
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> std::result::Result<Amount, E> {
                Amount::from_f64_lossy(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

// ============================================================================
// Ledger records
// ============================================================================

/// A transaction hash (lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Creates a new TxHash from a string
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TxHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Snapshot of an address as reported by the ledger.
///
/// Never mutated locally; `available` is always `total - locked` (clamped at zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetails {
    address: String,
    total: Amount,
    locked: Amount,
    available: Amount,
    adnr: Option<String>,
    activated: bool,
}

impl AccountDetails {
    /// Builds a snapshot, deriving the available balance
    pub fn new(
        address: impl Into<String>,
        total: Amount,
        locked: Amount,
        adnr: Option<String>,
        activated: bool,
    ) -> Self {
        Self {
            address: address.into(),
            total,
            locked,
            available: total.saturating_sub(locked),
            adnr,
            activated,
        }
    }

    /// The queried address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Total balance
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Locked balance
    pub fn locked(&self) -> Amount {
        self.locked
    }

    /// Spendable balance
    pub fn available(&self) -> Amount {
        self.available
    }

    /// Bound ADNR domain, if any
    pub fn adnr(&self) -> Option<&str> {
        self.adnr.as_deref()
    }

    /// Whether the account is activated on the ledger
    pub fn activated(&self) -> bool {
        self.activated
    }
}

/// Kind of ledger transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Coin transfer
    Transfer,
    /// ADNR domain binding
    DomainBind,
    /// Any other ledger transaction type
    #[serde(other)]
    Other,
}

impl TransactionType {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "Transfer",
            TransactionType::DomainBind => "Domain Bind",
            TransactionType::Other => "Other",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A transaction returned by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction hash
    pub hash: TxHash,
    /// Transaction kind
    pub tx_type: TransactionType,
    /// Amount moved
    pub amount: Amount,
    /// Sender
    pub from_address: String,
    /// Recipient
    pub to_address: String,
    /// When the transaction was crafted
    pub timestamp: DateTime<Utc>,
}

/// One page of transaction history.
///
/// `page` is 1-indexed. An empty page means there are no more results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub page_size: u32,
    /// Transactions, most recent first
    pub transactions: Vec<Transaction>,
}

impl TransactionPage {
    /// True if this page has no transactions
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Number of transactions on this page
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Iterator over transaction hashes
    pub fn hashes(&self) -> impl Iterator<Item = &TxHash> {
        self.transactions.iter().map(|t| &t.hash)
    }
}

/// An ADNR record. `address == None` means the name is unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainBinding {
    /// Normalized domain name
    pub domain: String,
    /// Bound address
    pub address: Option<String>,
}

impl DomainBinding {
    /// True if no address is bound
    pub fn is_available(&self) -> bool {
        self.address.is_none()
    }
}

// ============================================================================
// Transfers
// ============================================================================

/// The signed portion of a transfer.
///
/// Field order is part of the canonical encoding; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    /// Transaction kind
    pub tx_type: TransactionType,
    /// Sender address
    pub from_address: String,
    /// Recipient address (or a reserved sink)
    pub to_address: String,
    /// Amount sent
    pub amount: Amount,
    /// Network fee
    pub fee: Amount,
    /// Sender nonce
    pub nonce: u64,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
    /// Type-specific data
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl TransferPayload {
    /// Compact JSON encoding that is hashed and signed
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Amount plus fee
    pub fn total_cost(&self) -> Result<Amount> {
        self.amount
            .checked_add(self.fee)
            .ok_or_else(|| VfxdError::InvalidAmount("amount plus fee overflows".into()))
    }
}

/// A transfer ready for submission. Carries no private key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransfer {
    /// Network the transfer was built for
    pub network: Network,
    /// Signed payload
    pub payload: TransferPayload,
    /// SHA-256 of the canonical payload encoding
    pub hash: TxHash,
    /// Compact ECDSA signature, hex
    pub signature: String,
    /// Sender public key (uncompressed SEC1), hex
    pub public_key: String,
}

/// Why the ledger refused a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The domain is already bound
    DomainUnavailable(String),
    /// Available balance does not cover amount plus fee
    InsufficientBalance,
    /// Signature or sender key did not verify
    InvalidSignature,
    /// Any other ledger-defined reason
    Other(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::DomainUnavailable(domain) => write!(f, "domain {domain} is unavailable"),
            RejectReason::InsufficientBalance => f.write_str("insufficient balance"),
            RejectReason::InvalidSignature => f.write_str("invalid signature"),
            RejectReason::Other(reason) => f.write_str(reason),
        }
    }
}

impl From<RejectReason> for VfxdError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::DomainUnavailable(domain) => VfxdError::DomainUnavailable(domain),
            other => VfxdError::Rejected(other.to_string()),
        }
    }
}

/// Result of handing a signed transfer to the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// Accepted under this hash
    Accepted(TxHash),
    /// Refused by the ledger
    Rejected(RejectReason),
}

impl SubmitOutcome {
    /// Converts a rejection into the matching error
    pub fn into_result(self) -> Result<TxHash> {
        match self {
            SubmitOutcome::Accepted(hash) => Ok(hash),
            SubmitOutcome::Rejected(reason) => Err(reason.into()),
        }
    }
}

// ============================================================================
// Ledger service
// ============================================================================

/// Remote ledger contract.
///
/// Each call is a single attempt; retries are layered on by wrappers.
/// "No data" is `Ok(None)` or an empty `Vec`, never an error.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Account snapshot, `None` if the address has no ledger activity
    async fn address_details(
        &self,
        network: Network,
        address: &str,
    ) -> Result<Option<AccountDetails>>;

    /// One page (1-indexed) of transactions touching `address`
    async fn transactions(
        &self,
        network: Network,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Transaction>>;

    /// ADNR record, `None` if the ledger knows nothing about the name
    async fn domain_lookup(&self, network: Network, domain: &str)
        -> Result<Option<DomainBinding>>;

    /// Hands a signed transfer to the ledger
    async fn submit(&self, network: Network, transfer: &SignedTransfer) -> Result<SubmitOutcome>;
}

#[async_trait]
impl<T: LedgerService + ?Sized> LedgerService for Arc<T> {
    async fn address_details(
        &self,
        network: Network,
        address: &str,
    ) -> Result<Option<AccountDetails>> {
        (**self).address_details(network, address).await
    }

    async fn transactions(
        &self,
        network: Network,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Transaction>> {
        (**self).transactions(network, address, page, page_size).await
    }

    async fn domain_lookup(
        &self,
        network: Network,
        domain: &str,
    ) -> Result<Option<DomainBinding>> {
        (**self).domain_lookup(network, domain).await
    }

    async fn submit(&self, network: Network, transfer: &SignedTransfer) -> Result<SubmitOutcome> {
        (**self).submit(network, transfer).await
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AccountDetails, Amount, DomainBinding, LedgerService, Network, RejectReason, Result,
        SignedTransfer, SubmitOutcome, Transaction, TransactionPage, TransactionType,
        TransferPayload, TxHash, VfxdError, VFX_DECIMALS,
    };
}
