//! # vfxd HD Key
//!
//! Key derivation and address engine for the vfxd VerifiedX wallet core.
//!
//! ## Features
//!
//! - Hardened BIP-32 derivation at `m/0'/0'/{index}'` from a BIP-39 phrase
//! - Random ("quick") keys from an injectable CSPRNG
//! - Uncompressed secp256k1 public keys and Base58Check VFX addresses
//! - [`Keypair`] bundling a key with its address, redacted in `Debug`
//!
//! ## Example
//!
//! ```
//! use vfxd_hd_key::{address_from_private, derive_from_mnemonic};
//! use vfxd_traits::Network;
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon \
//!               abandon abandon abandon abandon abandon about";
//! let key = derive_from_mnemonic(phrase, 0).unwrap();
//! let address = address_from_private(&key, Network::Mainnet);
//! assert_eq!(address.as_str(), "REojDNJU54mt9kswLNPhm3QmwfPwqShRAb");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod derive;
pub mod keypair;
pub mod keys;

pub use address::Address;
pub use derive::{
    derivation_path, derive_from_mnemonic, derive_from_mnemonic_with_passphrase,
    derive_from_seed, derive_from_seed_bytes, generate_random, generate_random_with,
    DERIVATION_PATH, MAX_DERIVATION_ATTEMPTS,
};
pub use keypair::Keypair;
pub use keys::{PrivateKey, PublicKey};

use vfxd_traits::Network;

/// Public key of `private_key`
pub fn public_from_private(private_key: &PrivateKey) -> PublicKey {
    private_key.public_key()
}

/// Address of `private_key` on `network`
pub fn address_from_private(private_key: &PrivateKey, network: Network) -> Address {
    Address::from_private_key(private_key, network)
}

/// Address of `public_key` on `network`
pub fn address_from_public_key(public_key: &PublicKey, network: Network) -> Address {
    Address::from_public_key(public_key, network)
}

/// True if `address` is a well-formed address on `network`
pub fn validate_address(address: &str, network: Network) -> bool {
    Address::parse(address, network).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vfxd_testing::{valid_private_key_bytes, EdgeCaseAddresses, EdgeCaseKeys};

    #[test]
    fn test_private_and_public_paths_agree() {
        for bytes in EdgeCaseKeys::valid_only() {
            let key = PrivateKey::from_bytes(&bytes).unwrap();
            for network in Network::ALL {
                assert_eq!(
                    address_from_private(&key, network),
                    address_from_public_key(&public_from_private(&key), network)
                );
            }
        }
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address("RNZZecHLuoqUzNc9oE8ErkPFV1zJdvDBAH", Network::Mainnet));
        assert!(!validate_address("RNZZecHLuoqUzNc9oE8ErkPFV1zJdvDBAH", Network::Testnet));
        assert!(validate_address("xMb1TyEXahWwxkLpgXmnCQLpwrpwLRRhrb", Network::Testnet));
        for s in EdgeCaseAddresses::malformed() {
            assert!(!validate_address(s, Network::Mainnet));
            assert!(!validate_address(s, Network::Testnet));
        }
    }

    proptest! {
        #[test]
        fn prop_public_key_is_pure(bytes in valid_private_key_bytes()) {
            let a = PrivateKey::from_bytes(&bytes).unwrap();
            let b = PrivateKey::from_bytes(&bytes).unwrap();
            prop_assert_eq!(public_from_private(&a), public_from_private(&b));
            prop_assert_eq!(
                address_from_private(&a, Network::Testnet),
                address_from_public_key(&public_from_private(&b), Network::Testnet)
            );
        }
    }
}
