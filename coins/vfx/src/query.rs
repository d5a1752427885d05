//! Account and transaction-history queries.

use tracing::debug;
use vfxd_error::{Result, VfxdError};
use vfxd_hd_key::Address;
use vfxd_traits::{AccountDetails, LedgerService, Network, Transaction, TransactionPage};

/// Default page size for history listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Account snapshot for `address`, `None` if it has no ledger activity.
///
/// The address is validated for `network` before any request is made.
pub async fn get_address_details<L: LedgerService + ?Sized>(
    ledger: &L,
    address: &str,
    network: Network,
) -> Result<Option<AccountDetails>> {
    let address = Address::parse(address, network)?;
    let details = ledger.address_details(network, address.as_str()).await?;
    debug!(%address, %network, found = details.is_some(), "address details");
    Ok(details)
}

/// One page (1-indexed) of history for `address`, most recent first.
///
/// A page past the end of the history is empty, not an error.
pub async fn list_transactions<L: LedgerService + ?Sized>(
    ledger: &L,
    address: &str,
    network: Network,
    page: u32,
    page_size: u32,
) -> Result<TransactionPage> {
    if page == 0 {
        return Err(VfxdError::InvalidParameter("page is 1-indexed".into()));
    }
    if page_size == 0 {
        return Err(VfxdError::InvalidParameter(
            "page size must be at least 1".into(),
        ));
    }
    let address = Address::parse(address, network)?;

    let mut transactions = ledger
        .transactions(network, address.as_str(), page, page_size)
        .await?;
    sort_most_recent_first(&mut transactions);
    transactions.truncate(page_size as usize);

    debug!(%address, page, page_size, count = transactions.len(), "transaction page");
    Ok(TransactionPage {
        page,
        page_size,
        transactions,
    })
}

/// Newest first; equal timestamps ordered by hash
pub fn sort_most_recent_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.hash.cmp(&b.hash))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vfxd_traits::{Amount, TransactionType, TxHash};

    fn tx(hash: &str, secs: i64) -> Transaction {
        Transaction {
            hash: TxHash::new(hash),
            tx_type: TransactionType::Transfer,
            amount: Amount::from_units(1),
            from_address: "a".into(),
            to_address: "b".into(),
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_sort_order() {
        let mut txs = vec![tx("b", 10), tx("c", 20), tx("a", 10), tx("d", 5)];
        sort_most_recent_first(&mut txs);
        let hashes: Vec<_> = txs.iter().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes, ["c", "a", "b", "d"]);
    }
}
