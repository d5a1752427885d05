#![no_main]

use libfuzzer_sys::fuzz_target;
use vfxd_mnemonic::Mnemonic;

fuzz_target!(|data: &str| {
    // Parsing must reject, never panic
    let parsed = Mnemonic::parse(data);
    assert_eq!(parsed.is_ok(), vfxd_mnemonic::validate(data));

    if let Ok(mnemonic) = parsed {
        // A parsed phrase re-parses to the same words
        let again = Mnemonic::parse(&mnemonic.phrase()).expect("canonical phrase parses");
        assert_eq!(again.indices(), mnemonic.indices());
        assert_eq!(*mnemonic.to_entropy(), *again.to_entropy());
    }
});
