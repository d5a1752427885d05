//! Account key pair for VFX.

use crate::address::Address;
use crate::derive::{derive_from_mnemonic, generate_random_with};
use crate::keys::{PrivateKey, PublicKey, SIGNATURE_LEN};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use std::fmt;
use tracing::debug;
use vfxd_error::Result;
use vfxd_traits::Network;

/// A private key with its derived public key and address.
///
/// Not `Clone`: the secret has exactly one owner. [`Keypair::logout`]
/// consumes the pair and wipes the key.
pub struct Keypair {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl Keypair {
    /// Completes a key pair from its private key
    pub fn from_private_key(private_key: PrivateKey, network: Network) -> Self {
        let public_key = private_key.public_key();
        let address = Address::from_public_key(&public_key, network);
        debug!(address = %address, %network, "loaded key pair");
        Self {
            private_key,
            public_key,
            address,
        }
    }

    /// Imports a hex-encoded private key
    pub fn from_private_key_hex(hex_str: &str, network: Network) -> Result<Self> {
        Ok(Self::from_private_key(PrivateKey::from_hex(hex_str)?, network))
    }

    /// Restores the account at `index` from a mnemonic phrase
    pub fn from_mnemonic(phrase: &str, index: u32, network: Network) -> Result<Self> {
        Ok(Self::from_private_key(
            derive_from_mnemonic(phrase, index)?,
            network,
        ))
    }

    /// Creates a random account
    pub fn generate(network: Network) -> Result<Self> {
        Self::generate_with(network, &mut OsRng)
    }

    /// Creates a random account from the given RNG
    pub fn generate_with<R: RngCore + CryptoRng>(network: Network, rng: &mut R) -> Result<Self> {
        Ok(Self::from_private_key(generate_random_with(rng)?, network))
    }

    /// Private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Address on the key pair's network
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Network the address was derived for
    pub fn network(&self) -> Network {
        self.address.network()
    }

    /// Signs a 32-byte digest
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; SIGNATURE_LEN]> {
        self.private_key.sign_digest(digest)
    }

    /// Ends the session: the key pair is consumed and its key wiped
    pub fn logout(self) {
        debug!(address = %self.address, "key pair dropped");
        drop(self);
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("private_key", &self.private_key)
            .field("public_key", &self.public_key.to_hex())
            .field("address", &self.address.as_str())
            .finish()
    }
}
