//! Transfer building, signing, verification and submission.

use crate::domain::ADNR_SINK;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use vfxd_error::{Result, VfxdError};
use vfxd_hd_key::{Address, Keypair, PublicKey};
use vfxd_traits::{
    Amount, LedgerService, Network, SignedTransfer, TransactionType, TransferPayload, TxHash,
};

/// Network fee attached to a transfer unless overridden (0.00001 VFX)
pub const DEFAULT_FEE: Decimal = Decimal::from_parts(1, 0, 0, false, 5);

// ============================================================================
// Amount conversion
// ============================================================================

/// Values accepted where a transfer amount is expected
pub trait IntoAmount {
    /// Converts into an [`Amount`], failing with `InvalidAmount`
    fn into_amount(self) -> Result<Amount>;
}

impl IntoAmount for Amount {
    fn into_amount(self) -> Result<Amount> {
        Ok(self)
    }
}

impl IntoAmount for &str {
    fn into_amount(self) -> Result<Amount> {
        Amount::parse(self)
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Result<Amount> {
        Amount::parse(&self)
    }
}

impl IntoAmount for u64 {
    fn into_amount(self) -> Result<Amount> {
        Ok(Amount::from_units(self))
    }
}

impl IntoAmount for Decimal {
    fn into_amount(self) -> Result<Amount> {
        Amount::new(self)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builds and signs a transfer from a [`Keypair`].
///
/// The key pair's network is the transfer's network. Defaults: fee
/// [`DEFAULT_FEE`], nonce 0, timestamp now, no data.
#[derive(Debug)]
pub struct TransferBuilder<'a> {
    keypair: &'a Keypair,
    to_address: String,
    amount: Result<Amount>,
    tx_type: TransactionType,
    fee: Option<Result<Amount>>,
    nonce: u64,
    timestamp: Option<i64>,
    data: Option<serde_json::Value>,
}

impl<'a> TransferBuilder<'a> {
    /// Starts a coin transfer of `amount` to `to_address`
    pub fn new(keypair: &'a Keypair, to_address: impl Into<String>, amount: impl IntoAmount) -> Self {
        Self {
            keypair,
            to_address: to_address.into(),
            amount: amount.into_amount(),
            tx_type: TransactionType::Transfer,
            fee: None,
            nonce: 0,
            timestamp: None,
            data: None,
        }
    }

    /// Overrides the fee
    pub fn with_fee(mut self, fee: impl IntoAmount) -> Self {
        self.fee = Some(fee.into_amount());
        self
    }

    /// Sets the sender nonce
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Pins the timestamp (Unix seconds)
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attaches type-specific data (a memo for plain transfers)
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub(crate) fn with_type(mut self, tx_type: TransactionType) -> Self {
        self.tx_type = tx_type;
        self
    }

    /// Validates, signs and returns the transfer
    pub fn build(self) -> Result<SignedTransfer> {
        let network = self.keypair.network();

        let amount = self.amount?;
        if !amount.is_positive() {
            return Err(VfxdError::InvalidAmount(format!(
                "transfer amount must be positive, got {amount}"
            )));
        }
        let fee = match self.fee {
            Some(fee) => fee?,
            None => Amount::new(DEFAULT_FEE)?,
        };
        if fee.as_decimal().is_sign_negative() {
            return Err(VfxdError::InvalidAmount(format!(
                "fee must not be negative, got {fee}"
            )));
        }

        match self.tx_type {
            TransactionType::DomainBind if self.to_address == ADNR_SINK => {}
            TransactionType::DomainBind => {
                return Err(VfxdError::InvalidParameter(format!(
                    "domain bindings must target {ADNR_SINK}"
                )))
            }
            _ => {
                Address::parse(&self.to_address, network)?;
            }
        }

        let payload = TransferPayload {
            tx_type: self.tx_type,
            from_address: self.keypair.address().to_string(),
            to_address: self.to_address,
            amount,
            fee,
            nonce: self.nonce,
            timestamp: self
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp()),
            data: self.data,
        };
        payload.total_cost()?;

        let digest = payload_digest(&payload)?;
        let signature = self.keypair.sign_digest(&digest)?;
        let hash = TxHash::new(hex::encode(digest));

        debug!(
            %hash,
            from = %payload.from_address,
            to = %payload.to_address,
            amount = %payload.amount,
            tx_type = %payload.tx_type,
            "signed transfer"
        );

        Ok(SignedTransfer {
            network,
            payload,
            hash,
            signature: hex::encode(signature),
            public_key: self.keypair.public_key().to_hex(),
        })
    }
}

/// SHA-256 of the canonical payload encoding
pub fn payload_digest(payload: &TransferPayload) -> Result<[u8; 32]> {
    Ok(Sha256::digest(payload.canonical_bytes()?).into())
}

// ============================================================================
// Operations
// ============================================================================

/// Builds a signed coin transfer on `network`.
///
/// `network` must be the key pair's network.
pub fn build_transfer(
    keypair: &Keypair,
    to_address: &str,
    amount: impl IntoAmount,
    network: Network,
) -> Result<SignedTransfer> {
    ensure_network(keypair, network)?;
    TransferBuilder::new(keypair, to_address, amount).build()
}

pub(crate) fn ensure_network(keypair: &Keypair, network: Network) -> Result<()> {
    if keypair.network() != network {
        return Err(VfxdError::InvalidParameter(format!(
            "key pair is for {}, requested {network}",
            keypair.network()
        )));
    }
    Ok(())
}

/// Checks hash, signature and sender of a signed transfer
pub fn verify_signed_transfer(transfer: &SignedTransfer) -> Result<()> {
    let digest = payload_digest(&transfer.payload)?;
    if hex::encode(digest) != transfer.hash.as_str() {
        return Err(VfxdError::SignatureVerificationFailed(
            "hash does not match payload".into(),
        ));
    }

    let public_key = PublicKey::from_hex(&transfer.public_key)
        .map_err(|_| VfxdError::SignatureVerificationFailed("malformed public key".into()))?;
    let signature = hex::decode(&transfer.signature)
        .map_err(|_| VfxdError::SignatureVerificationFailed("malformed signature".into()))?;
    if !public_key.verify_digest(&digest, &signature) {
        return Err(VfxdError::SignatureVerificationFailed(
            "signature does not verify".into(),
        ));
    }

    let sender = Address::parse(&transfer.payload.from_address, transfer.network)
        .map_err(|_| VfxdError::SignatureVerificationFailed("malformed sender address".into()))?;
    if !sender.matches(&public_key) {
        return Err(VfxdError::SignatureVerificationFailed(
            "public key does not own the sender address".into(),
        ));
    }
    Ok(())
}

/// Hands a signed transfer to the ledger.
///
/// Ledger rejections come back as errors: a taken domain as
/// `DomainUnavailable`, anything else as `Rejected`.
pub async fn submit<L: LedgerService + ?Sized>(
    ledger: &L,
    transfer: &SignedTransfer,
) -> Result<TxHash> {
    verify_signed_transfer(transfer)?;
    let outcome = ledger.submit(transfer.network, transfer).await?;
    match outcome.into_result() {
        Ok(hash) => {
            info!(%hash, network = %transfer.network, "transfer accepted");
            Ok(hash)
        }
        Err(e) => {
            warn!(hash = %transfer.hash, error = %e, "transfer rejected");
            Err(e)
        }
    }
}
