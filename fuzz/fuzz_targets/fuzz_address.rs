#![no_main]

use libfuzzer_sys::fuzz_target;
use vfxd_hd_key::{validate_address, Address};
use vfxd_traits::Network;

fuzz_target!(|data: &str| {
    let any = Address::parse_any(data);

    for network in Network::ALL {
        let parsed = Address::parse(data, network);
        assert_eq!(parsed.is_ok(), validate_address(data, network));
        if let Ok(address) = parsed {
            assert_eq!(address.network(), network);
            assert_eq!(address.as_str(), data);
        }
    }

    if let Ok(address) = any {
        // Re-encoding the payload gives back the input
        let rebuilt = Address::from_hash160(*address.hash160(), address.network());
        assert_eq!(rebuilt.as_str(), data);
    }
});
