//! Deterministic and random private-key derivation.
//!
//! Account keys live at `m/0'/0'/{index}'`. Each level is hardened. When a
//! child at some level is invalid, the child number is bumped and the
//! derivation retried, up to [`MAX_DERIVATION_ATTEMPTS`] times per level.

use crate::keys::{PrivateKey, PRIVATE_KEY_LEN};
use bip32::{ChildNumber, XPrv};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use tracing::{debug, warn};
use vfxd_error::{Result, VfxdError};
use vfxd_mnemonic::{Mnemonic, Seed};
use zeroize::Zeroizing;

/// Account path template. `{index}` is the hardened account index.
pub const DERIVATION_PATH: &str = "m/0'/0'/{index}'";

/// Attempts per derivation level (and per random draw) before giving up
pub const MAX_DERIVATION_ATTEMPTS: u32 = 8;

/// Exclusive upper bound of a hardened child index
pub const HARDENED_LIMIT: u32 = 1 << 31;

/// Renders the account path for `index`
pub fn derivation_path(index: u32) -> String {
    DERIVATION_PATH.replace("{index}", &index.to_string())
}

/// Derives the account key at `index` from a BIP-39 seed
pub fn derive_from_seed(seed: &Seed, index: u32) -> Result<PrivateKey> {
    derive_from_seed_bytes(seed.as_bytes(), index)
}

/// Derives the account key at `index` from raw seed bytes (16 to 64 bytes)
pub fn derive_from_seed_bytes(seed: &[u8], index: u32) -> Result<PrivateKey> {
    if index >= HARDENED_LIMIT {
        return Err(VfxdError::InvalidParameter(format!(
            "account index {index} is outside the hardened range [0, 2^31)"
        )));
    }

    let master = XPrv::new(seed).map_err(|_| VfxdError::DerivationFailed { attempts: 1 })?;

    let mut node = master;
    for target in [0, 0, index] {
        node = derive_hardened(&node, target)?;
    }

    let bytes = Zeroizing::new(node.to_bytes());
    debug_assert_eq!(bytes.len(), PRIVATE_KEY_LEN);
    PrivateKey::from_bytes(bytes.as_slice())
}

fn derive_hardened(parent: &XPrv, first: u32) -> Result<XPrv> {
    let mut child = first;
    for attempt in 1..=MAX_DERIVATION_ATTEMPTS {
        let number = ChildNumber::new(child, true)
            .map_err(|_| VfxdError::DerivationFailed { attempts: attempt })?;
        match parent.derive_child(number) {
            Ok(node) => {
                if child != first {
                    debug!(requested = first, used = child, "derivation skipped invalid child");
                }
                return Ok(node);
            }
            Err(_) => {
                warn!(child, attempt, "invalid child key, trying next child number");
                child = child
                    .checked_add(1)
                    .filter(|c| *c < HARDENED_LIMIT)
                    .ok_or(VfxdError::DerivationFailed { attempts: attempt })?;
            }
        }
    }
    Err(VfxdError::DerivationFailed {
        attempts: MAX_DERIVATION_ATTEMPTS,
    })
}

/// Derives the account key at `index` from a phrase, empty passphrase
pub fn derive_from_mnemonic(phrase: &str, index: u32) -> Result<PrivateKey> {
    derive_from_mnemonic_with_passphrase(phrase, "", index)
}

/// Derives the account key at `index` from a phrase and BIP-39 passphrase
pub fn derive_from_mnemonic_with_passphrase(
    phrase: &str,
    passphrase: &str,
    index: u32,
) -> Result<PrivateKey> {
    if index >= HARDENED_LIMIT {
        return Err(VfxdError::InvalidParameter(format!(
            "account index {index} is outside the hardened range [0, 2^31)"
        )));
    }
    let mnemonic = Mnemonic::parse(phrase)?;
    derive_from_seed(&mnemonic.to_seed(passphrase), index)
}

/// Draws a random account key from the OS CSPRNG
pub fn generate_random() -> Result<PrivateKey> {
    generate_random_with(&mut OsRng)
}

/// Draws a random account key, redrawing out-of-range scalars
pub fn generate_random_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<PrivateKey> {
    let mut buf = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
    for _ in 0..MAX_DERIVATION_ATTEMPTS {
        rng.fill_bytes(buf.as_mut_slice());
        if let Ok(key) = PrivateKey::from_bytes(buf.as_slice()) {
            return Ok(key);
        }
    }
    Err(VfxdError::DerivationFailed {
        attempts: MAX_DERIVATION_ATTEMPTS,
    })
}
