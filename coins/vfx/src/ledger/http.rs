//! REST ledger backed by the VFX explorer API.

use crate::config::LedgerConfig;
use crate::domain::bound_domain;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};
use vfxd_error::Result;
use vfxd_provider::HttpProvider;
use vfxd_resilience::with_timeout;
use vfxd_traits::{
    AccountDetails, Amount, DomainBinding, LedgerService, Network, RejectReason, SignedTransfer,
    SubmitOutcome, Transaction, TransactionType, TxHash,
};

// ============================================================================
// Wire format
// ============================================================================

/// Numeric transaction type used by the explorer API
pub fn tx_type_from_wire(code: i64) -> TransactionType {
    match code {
        0 => TransactionType::Transfer,
        6 => TransactionType::DomainBind,
        _ => TransactionType::Other,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressResponse {
    address: String,
    #[serde(default)]
    balance: Amount,
    #[serde(default)]
    balance_total: Option<Amount>,
    #[serde(default)]
    balance_locked: Amount,
    #[serde(default)]
    adnr: Option<String>,
    #[serde(default)]
    activated: bool,
}

impl AddressResponse {
    fn into_details(self) -> Result<AccountDetails> {
        let total = match self.balance_total {
            Some(total) => total,
            None => self.balance.checked_add(self.balance_locked).ok_or_else(|| {
                vfxd_error::VfxdError::InvalidAmount("balance overflows".into())
            })?,
        };
        let adnr = self.adnr.filter(|name| !name.is_empty());
        Ok(AccountDetails::new(
            self.address,
            total,
            self.balance_locked,
            adnr,
            self.activated,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct TransactionListResponse {
    #[serde(default)]
    results: Vec<TransactionResponse>,
}

#[derive(Debug, Deserialize)]
struct TransactionResponse {
    hash: String,
    #[serde(rename = "type")]
    tx_type: i64,
    total_amount: Amount,
    from_address: String,
    to_address: String,
    date_crafted: DateTime<Utc>,
}

impl From<TransactionResponse> for Transaction {
    fn from(tx: TransactionResponse) -> Self {
        Transaction {
            hash: TxHash::new(tx.hash),
            tx_type: tx_type_from_wire(tx.tx_type),
            amount: tx.total_amount,
            from_address: tx.from_address,
            to_address: tx.to_address,
            timestamp: tx.date_crafted,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DomainResponse {
    domain: String,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn reject_reason(message: Option<String>, transfer: &SignedTransfer) -> RejectReason {
    let message = message.unwrap_or_else(|| "rejected without a reason".into());
    let lower = message.to_ascii_lowercase();
    if lower.contains("insufficient") {
        RejectReason::InsufficientBalance
    } else if lower.contains("signature") {
        RejectReason::InvalidSignature
    } else if let (Some(domain), true) = (bound_domain(transfer), lower.contains("domain")) {
        RejectReason::DomainUnavailable(domain.to_string())
    } else {
        RejectReason::Other(message)
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// [`LedgerService`] over HTTP, one provider per network.
///
/// Every call is a single attempt (with endpoint failover) bounded by
/// [`LedgerConfig::call_deadline`]. Wrap in
/// [`RetryingLedger`](super::RetryingLedger) for retries.
#[derive(Debug)]
pub struct HttpLedger {
    mainnet: HttpProvider,
    testnet: HttpProvider,
    config: LedgerConfig,
}

impl HttpLedger {
    /// Builds both providers from a validated config
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mainnet: HttpProvider::new(config.mainnet.clone())?,
            testnet: HttpProvider::new(config.testnet.clone())?,
            config,
        })
    }

    /// The configuration in use
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Provider serving `network`
    pub fn provider(&self, network: Network) -> &HttpProvider {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }
}

#[async_trait]
impl LedgerService for HttpLedger {
    #[instrument(skip(self), level = "debug")]
    async fn address_details(
        &self,
        network: Network,
        address: &str,
    ) -> Result<Option<AccountDetails>> {
        let path = format!("/addresses/{address}/");
        let response: Option<AddressResponse> = with_timeout(
            self.config.call_deadline(network),
            "address_details",
            self.provider(network).get_json(&path),
        )
        .await?;
        response.map(AddressResponse::into_details).transpose()
    }

    #[instrument(skip(self), level = "debug")]
    async fn transactions(
        &self,
        network: Network,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Transaction>> {
        let path = format!("/transactions/address/{address}/?page={page}&limit={page_size}");
        let response: Option<TransactionListResponse> = with_timeout(
            self.config.call_deadline(network),
            "transactions",
            self.provider(network).get_json(&path),
        )
        .await?;
        // The API answers 404 for pages past the end.
        Ok(response
            .map(|r| r.results.into_iter().map(Transaction::from).collect())
            .unwrap_or_default())
    }

    #[instrument(skip(self), level = "debug")]
    async fn domain_lookup(
        &self,
        network: Network,
        domain: &str,
    ) -> Result<Option<DomainBinding>> {
        let path = format!("/adnr/{domain}/");
        let response: Option<DomainResponse> = with_timeout(
            self.config.call_deadline(network),
            "domain_lookup",
            self.provider(network).get_json(&path),
        )
        .await?;
        Ok(response.map(|r| DomainBinding {
            domain: r.domain,
            address: r.address.filter(|a| !a.is_empty()),
        }))
    }

    #[instrument(skip(self, transfer), fields(hash = %transfer.hash), level = "debug")]
    async fn submit(&self, network: Network, transfer: &SignedTransfer) -> Result<SubmitOutcome> {
        let response: SubmitResponse = with_timeout(
            self.config.call_deadline(network),
            "submit",
            self.provider(network).post_json("/transactions/submit/", transfer),
        )
        .await?;

        if response.success {
            let hash = response
                .hash
                .map(TxHash::new)
                .unwrap_or_else(|| transfer.hash.clone());
            debug!(%hash, "ledger accepted transfer");
            Ok(SubmitOutcome::Accepted(hash))
        } else {
            Ok(SubmitOutcome::Rejected(reject_reason(
                response.message,
                transfer,
            )))
        }
    }
}
