//! Quick start against the in-memory ledger
//!
//! Run with:
//! ```bash
//! cargo run -p vfxd --example quick_start
//! ```

use vfxd::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let ledger = MemoryLedger::new();

    let mnemonic = Mnemonic::generate(WordCount::TwentyFour)?;
    let alice = Keypair::from_mnemonic(&mnemonic.phrase(), 0, Network::Testnet)?;
    let bob = Keypair::generate(Network::Testnet)?;
    println!("alice: {}", alice.address());
    println!("bob:   {}", bob.address());

    ledger.fund(Network::Testnet, alice.address().as_str(), Amount::from_units(25))?;

    let signed = build_transfer(&alice, bob.address().as_str(), "5.0", Network::Testnet)?;
    let hash = submit(&ledger, &signed).await?;
    println!("sent 5 VFX: {hash}");

    let binding = build_binding_transfer(&ledger, &alice, "alice.vfx", Network::Testnet).await?;
    submit(&ledger, &binding).await?;
    if let Some(owner) = lookup(&ledger, "alice.vfx", Network::Testnet).await? {
        println!("alice.vfx -> {owner}");
    }

    for network_address in [alice.address(), bob.address()] {
        if let Some(details) =
            get_address_details(&ledger, network_address.as_str(), Network::Testnet).await?
        {
            println!("{}", serde_json::to_string_pretty(&details).unwrap_or_default());
        }
    }

    alice.logout();
    Ok(())
}
