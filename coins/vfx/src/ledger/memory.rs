//! In-process ledger for tests and demos.

use crate::domain::{bound_domain, normalize_domain, ADNR_SINK};
use crate::query::sort_most_recent_first;
use crate::transfer::verify_signed_transfer;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use vfxd_error::{Result, VfxdError};
use vfxd_hd_key::Address;
use vfxd_traits::{
    AccountDetails, Amount, DomainBinding, LedgerService, Network, RejectReason, SignedTransfer,
    SubmitOutcome, Transaction, TransactionType, TxHash,
};

#[derive(Debug, Default, Clone)]
struct Account {
    total: Amount,
    locked: Amount,
    activated: bool,
    adnr: Option<String>,
}

#[derive(Debug, Default)]
struct NetworkState {
    accounts: HashMap<String, Account>,
    history: Vec<Transaction>,
    applied: HashSet<TxHash>,
    domains: HashMap<String, String>,
}

/// A ledger held in memory, one independent state per network.
///
/// `submit` verifies the transfer, checks the sender's available balance
/// against amount plus fee, applies it and records it. Resubmitting an
/// applied hash is accepted without applying it again.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    networks: RwLock<HashMap<Network, NetworkState>>,
}

impl MemoryLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `address` and activates it
    pub fn fund(&self, network: Network, address: &str, amount: Amount) -> Result<()> {
        let mut networks = self.networks.write();
        let account = networks
            .entry(network)
            .or_default()
            .accounts
            .entry(address.to_string())
            .or_default();
        account.total = account
            .total
            .checked_add(amount)
            .ok_or_else(|| VfxdError::InvalidAmount("balance overflows".into()))?;
        account.activated = true;
        debug!(%network, address, %amount, "funded account");
        Ok(())
    }

    /// Locks `amount` of an existing balance
    pub fn lock(&self, network: Network, address: &str, amount: Amount) -> Result<()> {
        let mut networks = self.networks.write();
        let account = networks
            .entry(network)
            .or_default()
            .accounts
            .get_mut(address)
            .ok_or_else(|| VfxdError::InvalidParameter(format!("unknown account {address}")))?;
        account.locked = account
            .locked
            .checked_add(amount)
            .ok_or_else(|| VfxdError::InvalidAmount("locked balance overflows".into()))?;
        Ok(())
    }

    /// Appends a transaction to the history without touching balances
    pub fn record(&self, network: Network, transaction: Transaction) {
        let mut networks = self.networks.write();
        let state = networks.entry(network).or_default();
        state.applied.insert(transaction.hash.clone());
        state.history.push(transaction);
    }

    /// Binds `domain` to `address` directly
    pub fn bind_domain(&self, network: Network, domain: &str, address: &str) -> Result<()> {
        let domain = normalize_domain(domain)?;
        let mut networks = self.networks.write();
        let state = networks.entry(network).or_default();
        state.domains.insert(domain.clone(), address.to_string());
        if let Some(account) = state.accounts.get_mut(address) {
            account.adnr = Some(domain);
        }
        Ok(())
    }

    /// Number of recorded transactions on `network`
    pub fn transaction_count(&self, network: Network) -> usize {
        self.networks
            .read()
            .get(&network)
            .map_or(0, |state| state.history.len())
    }

    fn apply(state: &mut NetworkState, transfer: &SignedTransfer) -> std::result::Result<(), RejectReason> {
        let payload = &transfer.payload;
        let cost = payload
            .total_cost()
            .map_err(|e| RejectReason::Other(e.to_string()))?;

        let domain = match payload.tx_type {
            TransactionType::DomainBind => {
                if payload.to_address != ADNR_SINK {
                    return Err(RejectReason::Other(format!(
                        "domain bindings must target {ADNR_SINK}"
                    )));
                }
                let domain = bound_domain(transfer)
                    .and_then(|d| normalize_domain(d).ok())
                    .ok_or_else(|| RejectReason::Other("binding without a valid domain".into()))?;
                if state.domains.contains_key(&domain) {
                    return Err(RejectReason::DomainUnavailable(domain));
                }
                Some(domain)
            }
            TransactionType::Transfer => {
                Address::parse(&payload.to_address, transfer.network)
                    .map_err(|_| RejectReason::Other("invalid recipient".into()))?;
                None
            }
            TransactionType::Other => {
                return Err(RejectReason::Other("unsupported transaction type".into()))
            }
        };

        let timestamp = Utc
            .timestamp_opt(payload.timestamp, 0)
            .single()
            .ok_or_else(|| RejectReason::Other("invalid timestamp".into()))?;

        let sender = state
            .accounts
            .get(&payload.from_address)
            .cloned()
            .unwrap_or_default();
        if sender.total.saturating_sub(sender.locked) < cost {
            return Err(RejectReason::InsufficientBalance);
        }

        // Checks done; nothing below can fail.
        let sender = state
            .accounts
            .entry(payload.from_address.clone())
            .or_default();
        sender.total = sender.total.saturating_sub(cost);
        sender.activated = true;
        if let Some(domain) = &domain {
            sender.adnr = Some(domain.clone());
        }

        match domain {
            Some(domain) => {
                state.domains.insert(domain, payload.from_address.clone());
            }
            None => {
                let recipient = state
                    .accounts
                    .entry(payload.to_address.clone())
                    .or_default();
                recipient.total = recipient
                    .total
                    .checked_add(payload.amount)
                    .unwrap_or(recipient.total);
                recipient.activated = true;
            }
        }

        state.applied.insert(transfer.hash.clone());
        state.history.push(Transaction {
            hash: transfer.hash.clone(),
            tx_type: payload.tx_type,
            amount: payload.amount,
            from_address: payload.from_address.clone(),
            to_address: payload.to_address.clone(),
            timestamp,
        });
        Ok(())
    }
}

#[async_trait]
impl LedgerService for MemoryLedger {
    async fn address_details(
        &self,
        network: Network,
        address: &str,
    ) -> Result<Option<AccountDetails>> {
        let networks = self.networks.read();
        Ok(networks
            .get(&network)
            .and_then(|state| state.accounts.get(address))
            .map(|account| {
                AccountDetails::new(
                    address,
                    account.total,
                    account.locked,
                    account.adnr.clone(),
                    account.activated,
                )
            }))
    }

    async fn transactions(
        &self,
        network: Network,
        address: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Transaction>> {
        let networks = self.networks.read();
        let Some(state) = networks.get(&network) else {
            return Ok(Vec::new());
        };
        let mut touching: Vec<Transaction> = state
            .history
            .iter()
            .filter(|tx| tx.from_address == address || tx.to_address == address)
            .cloned()
            .collect();
        sort_most_recent_first(&mut touching);

        let skip = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
        Ok(touching
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect())
    }

    async fn domain_lookup(
        &self,
        network: Network,
        domain: &str,
    ) -> Result<Option<DomainBinding>> {
        let networks = self.networks.read();
        Ok(networks
            .get(&network)
            .and_then(|state| state.domains.get(domain))
            .map(|address| DomainBinding {
                domain: domain.to_string(),
                address: Some(address.clone()),
            }))
    }

    async fn submit(&self, network: Network, transfer: &SignedTransfer) -> Result<SubmitOutcome> {
        if transfer.network != network {
            return Ok(SubmitOutcome::Rejected(RejectReason::Other(format!(
                "transfer built for {}, submitted to {network}",
                transfer.network
            ))));
        }
        if verify_signed_transfer(transfer).is_err() {
            return Ok(SubmitOutcome::Rejected(RejectReason::InvalidSignature));
        }

        let mut networks = self.networks.write();
        let state = networks.entry(network).or_default();
        if state.applied.contains(&transfer.hash) {
            debug!(hash = %transfer.hash, "duplicate submission");
            return Ok(SubmitOutcome::Accepted(transfer.hash.clone()));
        }

        match Self::apply(state, transfer) {
            Ok(()) => {
                info!(hash = %transfer.hash, %network, "memory ledger applied transfer");
                Ok(SubmitOutcome::Accepted(transfer.hash.clone()))
            }
            Err(reason) => {
                debug!(hash = %transfer.hash, %reason, "memory ledger rejected transfer");
                Ok(SubmitOutcome::Rejected(reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::{build_transfer, TransferBuilder};
    use vfxd_hd_key::Keypair;
    use vfxd_testing::EdgeCaseMnemonics;

    fn pair(index: u32) -> Keypair {
        Keypair::from_mnemonic(EdgeCaseMnemonics::STANDARD_12, index, Network::Testnet).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_address_is_absent() {
        let ledger = MemoryLedger::new();
        let details = ledger
            .address_details(Network::Testnet, pair(0).address().as_str())
            .await
            .unwrap();
        assert!(details.is_none());
    }

    #[tokio::test]
    async fn test_fund_and_lock() {
        let ledger = MemoryLedger::new();
        let address = pair(0).address().to_string();
        ledger.fund(Network::Testnet, &address, Amount::from_units(10)).unwrap();
        ledger.lock(Network::Testnet, &address, Amount::from_units(4)).unwrap();

        let details = ledger
            .address_details(Network::Testnet, &address)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(details.total(), Amount::from_units(10));
        assert_eq!(details.locked(), Amount::from_units(4));
        assert_eq!(details.available(), Amount::from_units(6));
        assert!(details.activated());

        // networks are independent
        assert!(ledger
            .address_details(Network::Mainnet, &address)
            .await
            .unwrap()
            .is_none());
        assert!(ledger.lock(Network::Testnet, "nobody", Amount::from_units(1)).is_err());
    }

    #[tokio::test]
    async fn test_submit_moves_funds() {
        let ledger = MemoryLedger::new();
        let (alice, bob) = (pair(0), pair(1));
        ledger
            .fund(Network::Testnet, alice.address().as_str(), Amount::from_units(10))
            .unwrap();

        let signed = build_transfer(&alice, bob.address().as_str(), 3u64, Network::Testnet).unwrap();
        let outcome = ledger.submit(Network::Testnet, &signed).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Accepted(signed.hash.clone()));

        let alice_details = ledger
            .address_details(Network::Testnet, alice.address().as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(alice_details.total().to_string(), "6.99999");
        let bob_details = ledger
            .address_details(Network::Testnet, bob.address().as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bob_details.total(), Amount::from_units(3));
        assert_eq!(ledger.transaction_count(Network::Testnet), 1);
    }

    #[tokio::test]
    async fn test_duplicate_submission_applies_once() {
        let ledger = MemoryLedger::new();
        let (alice, bob) = (pair(0), pair(1));
        ledger
            .fund(Network::Testnet, alice.address().as_str(), Amount::from_units(10))
            .unwrap();
        let signed = build_transfer(&alice, bob.address().as_str(), 3u64, Network::Testnet).unwrap();

        ledger.submit(Network::Testnet, &signed).await.unwrap();
        let again = ledger.submit(Network::Testnet, &signed).await.unwrap();
        assert_eq!(again, SubmitOutcome::Accepted(signed.hash.clone()));
        assert_eq!(ledger.transaction_count(Network::Testnet), 1);
    }

    #[tokio::test]
    async fn test_insufficient_balance() {
        let ledger = MemoryLedger::new();
        let (alice, bob) = (pair(0), pair(1));
        ledger
            .fund(Network::Testnet, alice.address().as_str(), Amount::from_units(5))
            .unwrap();
        ledger
            .lock(Network::Testnet, alice.address().as_str(), Amount::from_units(1))
            .unwrap();

        let signed = build_transfer(&alice, bob.address().as_str(), 4u64, Network::Testnet).unwrap();
        let outcome = ledger.submit(Network::Testnet, &signed).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::InsufficientBalance));
        assert_eq!(ledger.transaction_count(Network::Testnet), 0);
    }

    #[tokio::test]
    async fn test_tampered_transfer_rejected() {
        let ledger = MemoryLedger::new();
        let (alice, bob) = (pair(0), pair(1));
        ledger
            .fund(Network::Testnet, alice.address().as_str(), Amount::from_units(100))
            .unwrap();
        let mut signed = TransferBuilder::new(&alice, bob.address().as_str(), 1u64)
            .build()
            .unwrap();
        signed.payload.amount = Amount::from_units(50);

        let outcome = ledger.submit(Network::Testnet, &signed).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::InvalidSignature));
    }

    #[tokio::test]
    async fn test_wrong_network_rejected() {
        let ledger = MemoryLedger::new();
        let (alice, bob) = (pair(0), pair(1));
        let signed = build_transfer(&alice, bob.address().as_str(), 1u64, Network::Testnet).unwrap();
        let outcome = ledger.submit(Network::Mainnet, &signed).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Rejected(RejectReason::Other(_))));
    }
}
