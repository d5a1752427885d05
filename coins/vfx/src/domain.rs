//! ADNR name resolution and binding.
//!
//! Names look like `example.vfx`: lowercase, a single label of 1 to 63
//! characters from `[a-z0-9-]` with no leading or trailing hyphen, then the
//! `.vfx` suffix. Input is lowercased before validation.

use crate::transfer::{ensure_network, TransferBuilder};
use tracing::debug;
use vfxd_error::{Result, VfxdError};
use vfxd_hd_key::{Address, Keypair};
use vfxd_traits::{Amount, LedgerService, Network, SignedTransfer, TransactionType};

/// Required suffix of every ADNR name
pub const DOMAIN_SUFFIX: &str = ".vfx";

/// Longest label before the suffix
pub const MAX_LABEL_LEN: usize = 63;

/// Reserved recipient of binding transactions
pub const ADNR_SINK: &str = "Adnr_Base";

/// Whole VFX charged to bind a name
pub const DOMAIN_REGISTRATION_COST: u64 = 5;

/// Lowercases and validates a name, returning the normalized form
pub fn normalize_domain(name: &str) -> Result<String> {
    let name = name.trim().to_ascii_lowercase();
    let Some(label) = name.strip_suffix(DOMAIN_SUFFIX) else {
        return Err(VfxdError::InvalidParameter(format!(
            "domain '{name}' must end with {DOMAIN_SUFFIX}"
        )));
    };
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(VfxdError::InvalidParameter(format!(
            "domain label must be 1 to {MAX_LABEL_LEN} characters"
        )));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(VfxdError::InvalidParameter(format!(
            "domain '{name}' may only contain a-z, 0-9 and '-'"
        )));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(VfxdError::InvalidParameter(format!(
            "domain '{name}' must not start or end with '-'"
        )));
    }
    Ok(name)
}

/// True if `name` is a well-formed ADNR name
pub fn is_valid_domain(name: &str) -> bool {
    normalize_domain(name).is_ok()
}

/// True iff no address is bound to `domain`
pub async fn is_available<L: LedgerService + ?Sized>(
    ledger: &L,
    domain: &str,
    network: Network,
) -> Result<bool> {
    Ok(lookup(ledger, domain, network).await?.is_none())
}

/// Address bound to `domain`, if any
pub async fn lookup<L: LedgerService + ?Sized>(
    ledger: &L,
    domain: &str,
    network: Network,
) -> Result<Option<Address>> {
    let domain = normalize_domain(domain)?;
    let binding = ledger.domain_lookup(network, &domain).await?;
    let Some(bound) = binding.and_then(|b| b.address) else {
        debug!(%domain, %network, "domain unbound");
        return Ok(None);
    };
    let address = Address::parse(&bound, network).map_err(|e| VfxdError::InvalidResponse {
        endpoint: format!("adnr/{domain}"),
        reason: e.to_string(),
    })?;
    Ok(Some(address))
}

/// Builds the transaction binding `domain` to the key pair's address.
///
/// Fails with `DomainUnavailable` if the name is already bound. The ledger
/// decides at submission time, so a later rejection is still possible.
pub async fn build_binding_transfer<L: LedgerService + ?Sized>(
    ledger: &L,
    keypair: &Keypair,
    domain: &str,
    network: Network,
) -> Result<SignedTransfer> {
    ensure_network(keypair, network)?;
    let domain = normalize_domain(domain)?;
    if !is_available(ledger, &domain, network).await? {
        return Err(VfxdError::DomainUnavailable(domain));
    }

    TransferBuilder::new(
        keypair,
        ADNR_SINK,
        Amount::from_units(DOMAIN_REGISTRATION_COST),
    )
    .with_type(TransactionType::DomainBind)
    .with_data(serde_json::json!({ "domain": domain }))
    .build()
}

/// Domain named in a binding payload
pub fn bound_domain(transfer: &SignedTransfer) -> Option<&str> {
    if transfer.payload.tx_type != TransactionType::DomainBind {
        return None;
    }
    transfer.payload.data.as_ref()?.get("domain")?.as_str()
}
