//! # vfxd Error
//!
//! Unified error types for the vfxd wallet core. Every crate in the workspace
//! returns [`Result`], so callers match on a single [`VfxdError`] no matter
//! which engine produced the failure.
//!
//! ## Error Kinds
//!
//! Each variant maps onto one [`ErrorKind`]:
//!
//! - `InvalidParameter` - malformed caller input (word count, page size, domain name)
//! - `InvalidMnemonic` - failed word-list or checksum validation
//! - `InvalidAddress` - malformed or wrong-network address string
//! - `InvalidAmount` - non-positive or non-numeric transfer amount
//! - `DerivationFailed` - key derivation exhausted its internal retries
//! - `Transport` - remote ledger call failed (network, timeout, bad status or body)
//! - `DomainUnavailable` - the name is already bound
//! - `Rejected` - any other ledger-defined rejection
//!
//! "No data" is never an error: queries return `Option`/empty pages for that.
//!
//! ## Example
//!
//! ```
//! use vfxd_error::{ErrorKind, Result, VfxdError};
//!
//! fn check_page(page: u32) -> Result<()> {
//!     if page == 0 {
//!         return Err(VfxdError::InvalidParameter("page is 1-indexed".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(check_page(0).unwrap_err().kind(), ErrorKind::InvalidParameter);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use thiserror::Error;

/// The main error type for vfxd operations.
///
/// Messages never carry private keys, seeds or mnemonic words.
#[derive(Error, Debug)]
pub enum VfxdError {
    // ============ Input Errors ============
    /// Malformed caller input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mnemonic failed word-list, word-count or checksum validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Private key could not be decoded or is not a valid scalar
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Public key could not be decoded
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid address format, checksum or network
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress {
        /// The invalid address
        address: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid transfer amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // ============ Key/Crypto Errors ============
    /// Derivation kept producing invalid keys
    #[error("Key derivation failed after {attempts} attempts")]
    DerivationFailed {
        /// Attempts made before giving up
        attempts: u32,
    },

    /// Signing failed
    #[error("Failed to sign transfer: {0}")]
    SigningError(String),

    /// Signature did not verify
    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),

    // ============ Transport Errors ============
    /// Remote ledger call failed
    #[error("Ledger request to {endpoint} failed: {reason}")]
    Transport {
        /// Endpoint or operation that failed
        endpoint: String,
        /// Error reason
        reason: String,
    },

    /// Ledger answered with a non-success HTTP status
    #[error("Ledger endpoint {endpoint} returned HTTP {status}")]
    HttpStatus {
        /// Endpoint that answered
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// Ledger answered with a body that could not be decoded
    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse {
        /// Endpoint that answered
        endpoint: String,
        /// Decode failure
        reason: String,
    },

    /// Remote ledger call timed out
    #[error("Ledger request timed out after {seconds}s")]
    TransportTimeout {
        /// Timeout duration
        seconds: u64,
    },

    /// Rate limited by the ledger service
    #[error("Rate limited by ledger, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay
        retry_after_secs: u64,
    },

    // ============ Ledger Outcomes ============
    /// The domain is already bound to an address
    #[error("Domain unavailable: {0}")]
    DomainUnavailable(String),

    /// The ledger rejected a submission
    #[error("Rejected by ledger: {0}")]
    Rejected(String),

    // ============ Parsing Errors ============
    /// Hex decode error
    #[error("Hex decode error: {0}")]
    HexError(String),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(String),

    // ============ IO/Config Errors ============
    /// File IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ============ Generic ============
    /// Unknown/other error
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using VfxdError
pub type Result<T> = std::result::Result<T, VfxdError>;

/// Error kinds callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Malformed caller input
    InvalidParameter,
    /// Mnemonic validation failed
    InvalidMnemonic,
    /// Address validation failed
    InvalidAddress,
    /// Amount validation failed
    InvalidAmount,
    /// Derivation retries exhausted
    DerivationFailed,
    /// Remote call failed
    Transport,
    /// Domain already bound
    DomainUnavailable,
    /// Ledger rejected the submission
    Rejected,
    /// Internal failure (signing, serialization, IO)
    Internal,
}

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    /// Unknown error
    Unknown = 0,
    /// Invalid parameter
    InvalidParameter = 1001,
    /// Invalid mnemonic
    InvalidMnemonic = 1002,
    /// Invalid private or public key
    InvalidKey = 1003,
    /// Invalid address
    InvalidAddress = 1004,
    /// Invalid amount
    InvalidAmount = 1005,
    /// Derivation failed
    DerivationFailed = 2001,
    /// Signing failed
    SigningError = 2002,
    /// Signature verification failed
    SignatureInvalid = 2003,
    /// Transport error
    Transport = 3001,
    /// Transport timeout
    TransportTimeout = 3002,
    /// Rate limited
    RateLimited = 3003,
    /// Domain unavailable
    DomainUnavailable = 4001,
    /// Ledger rejection
    Rejected = 4002,
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Adds context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;

    /// Adds context using a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: std::error::Error> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| VfxdError::Other(format!("{}: {}", ctx.into(), e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| VfxdError::Other(format!("{}: {}", f(), e)))
    }
}

impl<T> ErrorContext<T> for Option<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| VfxdError::Other(ctx.into()))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.ok_or_else(|| VfxdError::Other(f()))
    }
}

// ============ From implementations for common error types ============

impl From<std::io::Error> for VfxdError {
    fn from(err: std::io::Error) -> Self {
        VfxdError::IoError(err.to_string())
    }
}

impl From<hex::FromHexError> for VfxdError {
    fn from(err: hex::FromHexError) -> Self {
        VfxdError::HexError(err.to_string())
    }
}

impl From<serde_json::Error> for VfxdError {
    fn from(err: serde_json::Error) -> Self {
        VfxdError::JsonError(err.to_string())
    }
}

/// HTTP statuses worth retrying: timeouts, throttling and server errors
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504)
}

impl VfxdError {
    /// Builds an [`VfxdError::InvalidAddress`]
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        VfxdError::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Builds a [`VfxdError::Transport`]
    pub fn transport(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        VfxdError::Transport {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Returns the kind this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            VfxdError::InvalidParameter(_)
            | VfxdError::InvalidPrivateKey(_)
            | VfxdError::InvalidPublicKey(_)
            | VfxdError::HexError(_)
            | VfxdError::ConfigError(_) => ErrorKind::InvalidParameter,
            VfxdError::InvalidMnemonic(_) => ErrorKind::InvalidMnemonic,
            VfxdError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            VfxdError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            VfxdError::DerivationFailed { .. } => ErrorKind::DerivationFailed,
            VfxdError::Transport { .. }
            | VfxdError::HttpStatus { .. }
            | VfxdError::InvalidResponse { .. }
            | VfxdError::TransportTimeout { .. }
            | VfxdError::RateLimited { .. } => ErrorKind::Transport,
            VfxdError::DomainUnavailable(_) => ErrorKind::DomainUnavailable,
            VfxdError::Rejected(_) => ErrorKind::Rejected,
            VfxdError::SigningError(_)
            | VfxdError::SignatureVerificationFailed(_)
            | VfxdError::JsonError(_)
            | VfxdError::IoError(_)
            | VfxdError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            VfxdError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            VfxdError::InvalidMnemonic(_) => ErrorCode::InvalidMnemonic,
            VfxdError::InvalidPrivateKey(_) | VfxdError::InvalidPublicKey(_) => {
                ErrorCode::InvalidKey
            }
            VfxdError::InvalidAddress { .. } => ErrorCode::InvalidAddress,
            VfxdError::InvalidAmount(_) => ErrorCode::InvalidAmount,
            VfxdError::DerivationFailed { .. } => ErrorCode::DerivationFailed,
            VfxdError::SigningError(_) => ErrorCode::SigningError,
            VfxdError::SignatureVerificationFailed(_) => ErrorCode::SignatureInvalid,
            VfxdError::Transport { .. }
            | VfxdError::HttpStatus { .. }
            | VfxdError::InvalidResponse { .. } => ErrorCode::Transport,
            VfxdError::TransportTimeout { .. } => ErrorCode::TransportTimeout,
            VfxdError::RateLimited { .. } => ErrorCode::RateLimited,
            VfxdError::DomainUnavailable(_) => ErrorCode::DomainUnavailable,
            VfxdError::Rejected(_) => ErrorCode::Rejected,
            _ => ErrorCode::Unknown,
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            VfxdError::Transport { .. }
            | VfxdError::TransportTimeout { .. }
            | VfxdError::RateLimited { .. } => true,
            VfxdError::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Returns suggested retry delay in seconds, if applicable
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            VfxdError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            VfxdError::TransportTimeout { seconds } => Some(*seconds / 2),
            _ if self.is_retryable() => Some(1),
            _ => None,
        }
    }
}
