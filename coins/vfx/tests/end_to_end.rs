//! End-to-end wallet flow against the in-memory ledger
//!
//! Run with: `cargo test -p vfxd_vfx --test end_to_end`

use vfxd_hd_key::{public_from_private, Keypair};
use vfxd_mnemonic::{Mnemonic, WordCount};
use vfxd_traits::{Amount, Network, TransactionType};
use vfxd_vfx::prelude::*;
use vfxd_vfx::verify_signed_transfer;

#[tokio::test]
async fn test_fresh_account_flow() {
    let mnemonic = Mnemonic::generate(WordCount::TwentyFour).unwrap();
    assert!(vfxd_mnemonic::validate(&mnemonic.phrase()));

    let keypair = Keypair::from_mnemonic(&mnemonic.phrase(), 0, Network::Testnet).unwrap();
    assert!(keypair.address().as_str().starts_with('x'));

    let ledger = MemoryLedger::new();
    let details = get_address_details(&ledger, keypair.address().as_str(), Network::Testnet)
        .await
        .unwrap();
    assert!(details.is_none(), "fresh address must be absent");

    let recipient = Keypair::generate(Network::Testnet).unwrap();
    let signed = build_transfer(&keypair, recipient.address().as_str(), "5.0", Network::Testnet)
        .unwrap();
    assert_eq!(
        signed.public_key,
        public_from_private(keypair.private_key()).to_hex()
    );
    verify_signed_transfer(&signed).unwrap();
}

#[tokio::test]
async fn test_restore_then_send() {
    let phrase = "legal winner thank year wave sausage worth useful legal winner thank yellow";
    let ledger = MemoryLedger::new();
    let alice = Keypair::from_mnemonic(phrase, 0, Network::Testnet).unwrap();
    let bob = Keypair::from_mnemonic(phrase, 1, Network::Testnet).unwrap();
    ledger
        .fund(Network::Testnet, alice.address().as_str(), Amount::from_units(20))
        .unwrap();

    let signed = build_transfer(&alice, bob.address().as_str(), "7.5", Network::Testnet).unwrap();
    let hash = submit(&ledger, &signed).await.unwrap();
    assert_eq!(hash, signed.hash);

    let bob_details = get_address_details(&ledger, bob.address().as_str(), Network::Testnet)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob_details.available(), Amount::parse("7.5").unwrap());
    assert!(bob_details.activated());

    let history = list_transactions(&ledger, alice.address().as_str(), Network::Testnet, 1, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.transactions[0].tx_type, TransactionType::Transfer);
    assert_eq!(history.transactions[0].hash, hash);

    // restoring again yields the same account
    let again = Keypair::from_mnemonic(phrase, 0, Network::Testnet).unwrap();
    assert_eq!(again.address(), alice.address());
    alice.logout();
}

#[tokio::test]
async fn test_invalid_inputs_fail_before_the_ledger() {
    let ledger = MemoryLedger::new();
    let err = get_address_details(&ledger, "not_an_address", Network::Testnet)
        .await
        .unwrap_err();
    assert!(matches!(err, VfxdError::InvalidAddress { .. }));

    let mainnet = Keypair::generate(Network::Mainnet).unwrap();
    let err = get_address_details(&ledger, mainnet.address().as_str(), Network::Testnet)
        .await
        .unwrap_err();
    assert!(matches!(err, VfxdError::InvalidAddress { .. }));

    let sender = Keypair::generate(Network::Testnet).unwrap();
    let to = Keypair::generate(Network::Testnet).unwrap();
    for amount in ["0", "-5"] {
        let err = build_transfer(&sender, to.address().as_str(), amount, Network::Testnet)
            .unwrap_err();
        assert!(matches!(err, VfxdError::InvalidAmount(_)));
    }
}

#[tokio::test]
async fn test_rejected_submission_surfaces_error() {
    let ledger = MemoryLedger::new();
    let sender = Keypair::generate(Network::Testnet).unwrap();
    let to = Keypair::generate(Network::Testnet).unwrap();
    let signed = build_transfer(&sender, to.address().as_str(), 1u64, Network::Testnet).unwrap();

    let err = submit(&ledger, &signed).await.unwrap_err();
    assert!(matches!(err, VfxdError::Rejected(_)));
    assert_eq!(ledger.transaction_count(Network::Testnet), 0);
}
