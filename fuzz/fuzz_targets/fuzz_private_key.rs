#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vfxd_hd_key::{Address, PrivateKey, PublicKey};
use vfxd_traits::Network;

#[derive(Debug, Arbitrary)]
struct KeyInput {
    key: Vec<u8>,
    digest: [u8; 32],
    mainnet: bool,
}

fuzz_target!(|input: KeyInput| {
    let Ok(private_key) = PrivateKey::from_bytes(&input.key) else {
        return;
    };
    let network = if input.mainnet { Network::Mainnet } else { Network::Testnet };

    let public_key = private_key.public_key();
    let reparsed = PublicKey::from_bytes(&public_key.to_uncompressed()).expect("own key parses");
    assert_eq!(reparsed, public_key);

    let address = Address::from_public_key(&public_key, network);
    assert!(Address::parse(address.as_str(), network).is_ok());

    let signature = private_key.sign_digest(&input.digest).expect("valid key signs");
    assert!(public_key.verify_digest(&input.digest, &signature));
});
