//! secp256k1 private and public keys.

use once_cell::sync::Lazy;
use secp256k1::{ecdsa::Signature, All, Message, Secp256k1, SecretKey};
use std::fmt;
use vfxd_error::{Result, VfxdError};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Private key length in bytes
pub const PRIVATE_KEY_LEN: usize = 32;

/// Uncompressed SEC1 public key length in bytes
pub const PUBLIC_KEY_LEN: usize = 65;

/// Compact ECDSA signature length in bytes
pub const SIGNATURE_LEN: usize = 64;

/// Process-wide signing/verification context
pub(crate) static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

// ============================================================================
// Private key
// ============================================================================

/// A 32-byte secp256k1 secret scalar.
///
/// Wiped on drop and never printed: `Debug` is redacted and there is no
/// `Display`. Export goes through [`PrivateKey::to_hex`] explicitly.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; PRIVATE_KEY_LEN]);

impl PrivateKey {
    /// Wraps raw bytes, rejecting zero and values at or above the curve order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(VfxdError::InvalidPrivateKey(format!(
                "expected {PRIVATE_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        SecretKey::from_slice(bytes)
            .map_err(|_| VfxdError::InvalidPrivateKey("not a valid secp256k1 scalar".into()))?;
        let mut key = [0u8; PRIVATE_KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Parses 64 hex characters
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str.trim())
                .map_err(|_| VfxdError::InvalidPrivateKey("expected 64 hex characters".into()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Lowercase hex export. Handle with care.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.0
    }

    /// Derives the matching public key
    pub fn public_key(&self) -> PublicKey {
        self.with_secret(|sk| PublicKey(secp256k1::PublicKey::from_secret_key(&SECP, sk)))
    }

    /// Signs a 32-byte digest (RFC 6979 deterministic nonce), compact form
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; SIGNATURE_LEN]> {
        let message =
            Message::from_slice(digest).map_err(|e| VfxdError::SigningError(e.to_string()))?;
        Ok(self.with_secret(|sk| SECP.sign_ecdsa(&message, sk).serialize_compact()))
    }

    /// Runs `f` with a `SecretKey` that is erased as soon as `f` returns
    fn with_secret<T>(&self, f: impl FnOnce(&SecretKey) -> T) -> T {
        // Validated on construction.
        let mut sk = match SecretKey::from_slice(&self.0) {
            Ok(sk) => sk,
            Err(_) => unreachable!("private key bytes validated on construction"),
        };
        let out = f(&sk);
        sk.non_secure_erase();
        out
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

// ============================================================================
// Public key
// ============================================================================

/// A secp256k1 curve point, a pure function of its private key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    /// Parses SEC1 bytes (compressed or uncompressed)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        secp256k1::PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|e| VfxdError::InvalidPublicKey(e.to_string()))
    }

    /// Parses SEC1 hex
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| VfxdError::InvalidPublicKey(format!("bad hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Uncompressed SEC1 encoding, `04 || X || Y`
    pub fn to_uncompressed(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.0.serialize_uncompressed()
    }

    /// Uncompressed SEC1 encoding as lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_uncompressed())
    }

    /// Checks a compact signature over a 32-byte digest
    pub fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> bool {
        let Ok(message) = Message::from_slice(digest) else {
            return false;
        };
        let Ok(signature) = Signature::from_compact(signature) else {
            return false;
        };
        SECP.verify_ecdsa(&message, &signature, &self.0).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
