//! VFX addresses.
//!
//! `Base58(version || RIPEMD160(SHA256(pubkey)) || checksum)`, where
//! `checksum` is the first four bytes of `SHA256(SHA256(version || hash160))`
//! and `pubkey` is the 65-byte uncompressed point.

use crate::keys::{PrivateKey, PublicKey};
use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use vfxd_error::{Result, VfxdError};
use vfxd_traits::Network;

/// RIPEMD-160 digest length
pub const HASH160_LEN: usize = 20;

/// Checksum length
pub const CHECKSUM_LEN: usize = 4;

/// Decoded address length: version + hash160 + checksum
pub const ADDRESS_BYTES_LEN: usize = 1 + HASH160_LEN + CHECKSUM_LEN;

/// A checked VFX address bound to its network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    network: Network,
    hash160: [u8; HASH160_LEN],
    encoded: String,
}

impl Address {
    /// Address of `public_key` on `network`
    pub fn from_public_key(public_key: &PublicKey, network: Network) -> Self {
        Self::from_hash160(hash160(&public_key.to_uncompressed()), network)
    }

    /// Address of the key pair owning `private_key`
    pub fn from_private_key(private_key: &PrivateKey, network: Network) -> Self {
        Self::from_public_key(&private_key.public_key(), network)
    }

    /// Builds an address from its public-key hash
    pub fn from_hash160(hash160: [u8; HASH160_LEN], network: Network) -> Self {
        let mut raw = Vec::with_capacity(ADDRESS_BYTES_LEN);
        raw.push(network.version_byte());
        raw.extend_from_slice(&hash160);
        let check = checksum(&raw);
        raw.extend_from_slice(&check);
        Self {
            network,
            hash160,
            encoded: bs58::encode(raw).into_string(),
        }
    }

    /// Parses and checks an address expected on `network`
    pub fn parse(s: &str, network: Network) -> Result<Self> {
        let address = Self::parse_any(s)?;
        if address.network != network {
            return Err(VfxdError::invalid_address(
                s,
                format!("address belongs to {}, expected {network}", address.network),
            ));
        }
        Ok(address)
    }

    /// Parses an address on any known network
    pub fn parse_any(s: &str) -> Result<Self> {
        let raw = bs58::decode(s)
            .into_vec()
            .map_err(|e| VfxdError::invalid_address(s, format!("not base58: {e}")))?;
        if raw.len() != ADDRESS_BYTES_LEN {
            return Err(VfxdError::invalid_address(
                s,
                format!("expected {ADDRESS_BYTES_LEN} bytes, got {}", raw.len()),
            ));
        }

        let (body, check) = raw.split_at(1 + HASH160_LEN);
        if checksum(body) != check {
            return Err(VfxdError::invalid_address(s, "checksum mismatch"));
        }
        let network = Network::from_version_byte(body[0]).ok_or_else(|| {
            VfxdError::invalid_address(s, format!("unknown version byte 0x{:02x}", body[0]))
        })?;

        let mut hash = [0u8; HASH160_LEN];
        hash.copy_from_slice(&body[1..]);
        Ok(Self {
            network,
            hash160: hash,
            encoded: s.to_string(),
        })
    }

    /// Network the address belongs to
    pub fn network(&self) -> Network {
        self.network
    }

    /// Public-key hash
    pub fn hash160(&self) -> &[u8; HASH160_LEN] {
        &self.hash160
    }

    /// Base58 text form
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// True if `public_key` hashes to this address
    pub fn matches(&self, public_key: &PublicKey) -> bool {
        hash160(&public_key.to_uncompressed()) == self.hash160
    }
}

fn hash160(data: &[u8]) -> [u8; HASH160_LEN] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let twice = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&twice[..CHECKSUM_LEN]);
    out
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl FromStr for Address {
    type Err = VfxdError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_any(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_any(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vfxd_testing::{valid_private_key_bytes, EdgeCaseAddresses, EdgeCaseKeys};

    const KEY_ONE_MAINNET: &str = "RNZZecHLuoqUzNc9oE8ErkPFV1zJdvDBAH";
    const KEY_ONE_TESTNET: &str = "xMb1TyEXahWwxkLpgXmnCQLpwrpwLRRhrb";

    fn key_one() -> PrivateKey {
        PrivateKey::from_bytes(&EdgeCaseKeys::ONE).unwrap()
    }

    #[test]
    fn test_known_addresses() {
        let key = key_one();
        assert_eq!(
            Address::from_private_key(&key, Network::Mainnet).as_str(),
            KEY_ONE_MAINNET
        );
        assert_eq!(
            Address::from_private_key(&key, Network::Testnet).as_str(),
            KEY_ONE_TESTNET
        );
    }

    #[test]
    fn test_prefixes() {
        for key in EdgeCaseKeys::valid_only() {
            let key = PrivateKey::from_bytes(&key).unwrap();
            for network in Network::ALL {
                let address = Address::from_private_key(&key, network);
                assert!(address.as_str().starts_with(network.address_prefix()));
            }
        }
    }

    #[test]
    fn test_parse_round_trip() {
        let parsed = Address::parse(KEY_ONE_MAINNET, Network::Mainnet).unwrap();
        assert_eq!(parsed.network(), Network::Mainnet);
        assert_eq!(parsed.to_string(), KEY_ONE_MAINNET);
        assert!(parsed.matches(&key_one().public_key()));

        let parsed: Address = KEY_ONE_TESTNET.parse().unwrap();
        assert_eq!(parsed.network(), Network::Testnet);
        assert_eq!(parsed, Address::from_private_key(&key_one(), Network::Testnet));
    }

    #[test]
    fn test_wrong_network_rejected() {
        let err = Address::parse(KEY_ONE_MAINNET, Network::Testnet).unwrap_err();
        assert!(matches!(err, VfxdError::InvalidAddress { .. }));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // flip the last character
        let mut tampered = KEY_ONE_MAINNET.to_string();
        tampered.pop();
        tampered.push('J');
        assert!(Address::parse_any(&tampered).is_err());
    }

    #[test]
    fn test_malformed_rejected() {
        for s in EdgeCaseAddresses::malformed() {
            assert!(
                matches!(Address::parse_any(s), Err(VfxdError::InvalidAddress { .. })),
                "{s:?}"
            );
        }
    }

    #[test]
    fn test_unknown_version_byte() {
        let mut raw = vec![0x00];
        raw.extend_from_slice(&[0u8; HASH160_LEN]);
        let check = checksum(&raw);
        raw.extend_from_slice(&check);
        let s = bs58::encode(raw).into_string();
        assert!(Address::parse_any(&s).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let address = Address::from_private_key(&key_one(), Network::Mainnet);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{KEY_ONE_MAINNET}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
        assert!(serde_json::from_str::<Address>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_address_parses_back(bytes in valid_private_key_bytes()) {
            let key = PrivateKey::from_bytes(&bytes).unwrap();
            for network in Network::ALL {
                let address = Address::from_private_key(&key, network);
                let parsed = Address::parse(address.as_str(), network).unwrap();
                prop_assert_eq!(parsed, address);
            }
        }
    }
}
