//! Command handlers. Each returns the JSON document printed on stdout.

use crate::cli::{Commands, DomainAction, SignerArgs};
use anyhow::{bail, Result};
use serde_json::{json, Value};
use tracing::info;
use vfxd_hd_key::{generate_random, Keypair};
use vfxd_traits::{LedgerService, Network, Transaction};
use vfxd_vfx::{
    build_binding_transfer, get_address_details, is_available, list_transactions, lookup,
    normalize_domain, submit, TransferBuilder,
};

/// Runs `command`. `connect` is only called by commands that talk to the ledger.
pub async fn run<L, F>(command: Commands, network: Network, connect: F) -> Result<Value>
where
    L: LedgerService,
    F: FnOnce() -> Result<L>,
{
    match command {
        Commands::CreateAccount { words } => create_account(words, network),
        Commands::QuickAccount => quick_account(network),
        Commands::Restore {
            mnemonic,
            passphrase,
            index,
        } => restore(&mnemonic, &passphrase, index, network),
        Commands::ImportKey { private_key } => import_key(&private_key, network),
        Commands::Details { address } => details(&connect()?, &address, network).await,
        Commands::Transactions {
            address,
            page,
            limit,
        } => transactions(&connect()?, &address, network, page, limit).await,
        Commands::Send {
            to,
            amount,
            fee,
            signer,
        } => send(&connect()?, &signer, &to, &amount, fee.as_deref(), network).await,
        Commands::Domain { action } => match action {
            DomainAction::Check { name } => domain_check(&connect()?, &name, network).await,
            DomainAction::Lookup { name } => domain_lookup(&connect()?, &name, network).await,
            DomainAction::Buy { name, signer } => {
                domain_buy(&connect()?, &signer, &name, network).await
            }
        },
    }
}

fn account_json(keypair: &Keypair) -> Value {
    json!({
        "network": keypair.network(),
        "address": keypair.address().as_str(),
        "public_key": keypair.public_key().to_hex(),
    })
}

fn signer_keypair(signer: &SignerArgs, network: Network) -> Result<Keypair> {
    match (&signer.private_key, &signer.mnemonic) {
        (Some(key), _) => Ok(Keypair::from_private_key_hex(key, network)?),
        (None, Some(phrase)) => Ok(Keypair::from_mnemonic(phrase, signer.index, network)?),
        (None, None) => bail!("no signing key: set VFXD_PRIVATE_KEY or VFXD_MNEMONIC"),
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// New mnemonic plus its index-0 account. The phrase and key are shown once.
pub fn create_account(words: usize, network: Network) -> Result<Value> {
    let mnemonic = vfxd_mnemonic::generate_mnemonic(words)?;
    let phrase = mnemonic.phrase();
    let keypair = Keypair::from_mnemonic(&phrase, 0, network)?;
    info!(address = %keypair.address(), words, "created account");

    let mut out = account_json(&keypair);
    out["index"] = json!(0);
    out["mnemonic"] = json!(phrase.as_str());
    out["private_key"] = json!(keypair.private_key().to_hex().as_str());
    Ok(out)
}

/// Random key with no mnemonic behind it
pub fn quick_account(network: Network) -> Result<Value> {
    let keypair = Keypair::from_private_key(generate_random()?, network);
    info!(address = %keypair.address(), "created standalone key");

    let mut out = account_json(&keypair);
    out["private_key"] = json!(keypair.private_key().to_hex().as_str());
    Ok(out)
}

/// Account `index` of `phrase`
pub fn restore(phrase: &str, passphrase: &str, index: u32, network: Network) -> Result<Value> {
    let private_key =
        vfxd_hd_key::derive_from_mnemonic_with_passphrase(phrase, passphrase, index)?;
    let keypair = Keypair::from_private_key(private_key, network);
    let mut out = account_json(&keypair);
    out["index"] = json!(index);
    Ok(out)
}

/// Account for a hex private key
pub fn import_key(private_key: &str, network: Network) -> Result<Value> {
    let keypair = Keypair::from_private_key_hex(private_key, network)?;
    Ok(account_json(&keypair))
}

// ============================================================================
// Queries
// ============================================================================

/// Balance, locked funds, ADNR and activation
pub async fn details<L: LedgerService + ?Sized>(
    ledger: &L,
    address: &str,
    network: Network,
) -> Result<Value> {
    Ok(match get_address_details(ledger, address, network).await? {
        Some(details) => json!({
            "found": true,
            "address": details.address(),
            "balance": details.available(),
            "total": details.total(),
            "locked": details.locked(),
            "adnr": details.adnr(),
            "activated": details.activated(),
        }),
        None => json!({ "found": false, "address": address }),
    })
}

fn transaction_json(tx: &Transaction) -> Value {
    json!({
        "hash": tx.hash.as_str(),
        "type": tx.tx_type.label(),
        "amount": tx.amount,
        "from": tx.from_address,
        "to": tx.to_address,
        "timestamp": tx.timestamp.to_rfc3339(),
    })
}

/// One page of history
pub async fn transactions<L: LedgerService + ?Sized>(
    ledger: &L,
    address: &str,
    network: Network,
    page: u32,
    limit: u32,
) -> Result<Value> {
    let page = list_transactions(ledger, address, network, page, limit).await?;
    Ok(json!({
        "address": address,
        "page": page.page,
        "page_size": page.page_size,
        "transactions": page.transactions.iter().map(transaction_json).collect::<Vec<_>>(),
    }))
}

// ============================================================================
// Transfers and domains
// ============================================================================

/// Signs and submits a transfer
pub async fn send<L: LedgerService + ?Sized>(
    ledger: &L,
    signer: &SignerArgs,
    to: &str,
    amount: &str,
    fee: Option<&str>,
    network: Network,
) -> Result<Value> {
    let keypair = signer_keypair(signer, network)?;
    let mut builder = TransferBuilder::new(&keypair, to, amount);
    if let Some(fee) = fee {
        builder = builder.with_fee(fee);
    }
    let signed = builder.build()?;
    let hash = submit(ledger, &signed).await?;
    Ok(json!({
        "hash": hash.as_str(),
        "from": signed.payload.from_address,
        "to": signed.payload.to_address,
        "amount": signed.payload.amount,
        "fee": signed.payload.fee,
    }))
}

/// Whether a name is free
pub async fn domain_check<L: LedgerService + ?Sized>(
    ledger: &L,
    name: &str,
    network: Network,
) -> Result<Value> {
    let domain = normalize_domain(name)?;
    let available = is_available(ledger, &domain, network).await?;
    Ok(json!({ "domain": domain, "available": available }))
}

/// Address bound to a name
pub async fn domain_lookup<L: LedgerService + ?Sized>(
    ledger: &L,
    name: &str,
    network: Network,
) -> Result<Value> {
    let domain = normalize_domain(name)?;
    let address = lookup(ledger, &domain, network).await?;
    Ok(json!({
        "domain": domain,
        "address": address.as_ref().map(|a| a.as_str()),
    }))
}

/// Binds a name to the signer's address
pub async fn domain_buy<L: LedgerService + ?Sized>(
    ledger: &L,
    signer: &SignerArgs,
    name: &str,
    network: Network,
) -> Result<Value> {
    let keypair = signer_keypair(signer, network)?;
    let domain = normalize_domain(name)?;
    let signed = build_binding_transfer(ledger, &keypair, &domain, network).await?;
    let hash = submit(ledger, &signed).await?;
    Ok(json!({
        "domain": domain,
        "address": keypair.address().as_str(),
        "hash": hash.as_str(),
    }))
}
