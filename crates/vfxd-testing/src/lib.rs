//! # vfxd Testing Infrastructure
//!
//! Shared fixtures for the vfxd test suites:
//! - Edge-case key material for secp256k1
//! - BIP-39 mnemonics, valid and malformed
//! - Malformed VFX addresses, amounts and domain names
//! - Property-based testing strategies
//! - Retry policies that do not wait between attempts
//!
//! The crate depends only on `vfxd-resilience`, never on the wallet crates,
//! so every one of them can pull it in as a dev-dependency.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vfxd_testing::*;
//!
//! for phrase in EdgeCaseMnemonics::invalid() {
//!     assert!(!vfxd_mnemonic::validate(phrase));
//! }
//!
//! proptest! {
//!     #[test]
//!     fn derivation_is_deterministic(index in account_index()) {
//!         // ...
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proptest::prelude::*;
use std::time::Duration;
use vfxd_resilience::{BackoffConfig, RetryPolicy};

// ============================================================================
// Edge Case Key Material
// ============================================================================

/// Edge case secp256k1 private keys
pub struct EdgeCaseKeys;

impl EdgeCaseKeys {
    /// All zeros (invalid scalar)
    pub const ALL_ZEROS: [u8; 32] = [0u8; 32];

    /// All ones (above the curve order, invalid)
    pub const ALL_ONES: [u8; 32] = [0xFF; 32];

    /// Smallest valid scalar, 1
    pub const ONE: [u8; 32] = {
        let mut k = [0u8; 32];
        k[31] = 1;
        k
    };

    /// Key with alternating bits
    pub const ALTERNATING: [u8; 32] = [0xAA; 32];

    /// Only bit 255 set
    pub const HIGH_BIT: [u8; 32] = {
        let mut k = [0u8; 32];
        k[0] = 0x80;
        k
    };

    /// Curve order n (invalid)
    pub const SECP256K1_ORDER: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
        0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
        0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
    ];

    /// n - 1, the largest valid scalar
    pub const SECP256K1_ORDER_MINUS_1: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
        0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
        0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x40,
    ];

    /// Keys that must import successfully
    pub fn valid_only() -> Vec<[u8; 32]> {
        vec![
            Self::ONE,
            Self::ALTERNATING,
            Self::HIGH_BIT,
            Self::SECP256K1_ORDER_MINUS_1,
        ]
    }

    /// Keys that must be rejected
    pub fn invalid_only() -> Vec<[u8; 32]> {
        vec![Self::ALL_ZEROS, Self::ALL_ONES, Self::SECP256K1_ORDER]
    }

    /// Hex strings that are not a 32-byte key
    pub fn malformed_hex() -> Vec<String> {
        vec![
            String::new(),
            "00".repeat(31),
            "00".repeat(33),
            "zz".repeat(32),
            format!("0x{}", "11".repeat(32)),
            "1".repeat(63),
        ]
    }
}

// ============================================================================
// Edge Case Mnemonics
// ============================================================================

/// BIP-39 (English) phrases for testing
pub struct EdgeCaseMnemonics;

impl EdgeCaseMnemonics {
    /// 12 words, all-zero entropy
    pub const STANDARD_12: &'static str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    /// 24 words, all-zero entropy
    pub const STANDARD_24: &'static str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    /// 12 words, entropy 0x7f repeated
    pub const LEGAL_WINNER_12: &'static str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    /// 12 words, all-ones entropy
    pub const ALL_ZOO: &'static str = "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong";

    /// Mixed case (normalizes to [`Self::STANDARD_12`])
    pub const MIXED_CASE: &'static str =
        "ABANDON abandon ABANDON abandon ABANDON abandon ABANDON abandon ABANDON abandon ABANDON About";

    /// Extra whitespace (normalizes to [`Self::STANDARD_12`])
    pub const EXTRA_WHITESPACE: &'static str =
        "  abandon   abandon  abandon abandon\tabandon abandon abandon abandon abandon abandon abandon \n about  ";

    /// Phrases that must validate
    pub fn valid() -> Vec<&'static str> {
        vec![
            Self::STANDARD_12,
            Self::STANDARD_24,
            Self::LEGAL_WINNER_12,
            Self::ALL_ZOO,
            Self::MIXED_CASE,
            Self::EXTRA_WHITESPACE,
        ]
    }

    /// Phrases that must not validate
    pub fn invalid() -> Vec<&'static str> {
        vec![
            "",
            "   ",
            "abandon",
            "abandon abandon abandon",
            "invalid words here",
            // 13 words
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
            // bad checksum
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon wrong",
            // unknown word
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abouts",
            // non-ascii
            "abandón abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        ]
    }
}

// ============================================================================
// Edge Case Addresses
// ============================================================================

/// Malformed VFX address strings
pub struct EdgeCaseAddresses;

impl EdgeCaseAddresses {
    /// Strings that are not a VFX address on any network
    pub fn malformed() -> Vec<&'static str> {
        vec![
            "",
            "R",
            "not_an_address",
            // Base58 excludes 0, O, I and l
            "R0OIl0OIl0OIl0OIl0OIl0OIl0OIl0O",
            "0x742d35Cc6634C0532925a3b844Bc9e7595f5fFb9",
            "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq",
            // valid Base58, wrong length
            "RRRRRRRRRR",
        ]
    }
}

// ============================================================================
// Edge Case Amounts
// ============================================================================

/// Amount strings for parse and validation tests
pub struct EdgeCaseAmounts;

impl EdgeCaseAmounts {
    /// Parse but are not a valid transfer amount
    pub fn non_positive() -> Vec<&'static str> {
        vec!["0", "0.0", "-1", "-0.000000000000000001", "-5.0"]
    }

    /// Do not parse at all
    pub fn non_numeric() -> Vec<&'static str> {
        vec!["", " ", "abc", "1,5", "1.2.3", "NaN", "inf", "1e5", "0x10"]
    }

    /// Too many fractional digits
    pub fn over_precise() -> Vec<&'static str> {
        vec!["0.0000000000000000001", "1.1234567890123456789"]
    }

    /// Positive and representable
    pub fn valid() -> Vec<&'static str> {
        vec!["0.000000000000000001", "0.00001", "1", "5.0", "12.5", "1000000"]
    }
}

// ============================================================================
// Edge Case Domains
// ============================================================================

/// ADNR domain names
pub struct EdgeCaseDomains;

impl EdgeCaseDomains {
    /// Names that must be accepted
    pub fn valid() -> Vec<&'static str> {
        vec!["example.vfx", "a.vfx", "my-wallet.vfx", "EXAMPLE.VFX", "x1.vfx"]
    }

    /// Names that must be rejected
    pub fn invalid() -> Vec<&'static str> {
        vec![
            "",
            ".vfx",
            "example",
            "example.com",
            "-lead.vfx",
            "trail-.vfx",
            "under_score.vfx",
            "sub.domain.vfx",
            "spa ce.vfx",
        ]
    }
}

// ============================================================================
// Property-Based Testing Strategies
// ============================================================================

/// 32-byte secp256k1 private keys (always below the curve order, never zero)
pub fn valid_private_key_bytes() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(1u8..=254u8)
}

/// Hex-encoded private keys
pub fn valid_private_key_hex() -> impl Strategy<Value = String> {
    valid_private_key_bytes().prop_map(hex::encode)
}

/// Hardened-range account indices
pub fn account_index() -> impl Strategy<Value = u32> {
    0u32..(1u32 << 31)
}

/// Entropy for 12- or 24-word mnemonics
pub fn mnemonic_entropy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 16),
        prop::collection::vec(any::<u8>(), 32),
    ]
}

/// Positive decimal strings with up to 18 fractional digits
pub fn valid_amount_string() -> impl Strategy<Value = String> {
    (0u64..1_000_000_000, 0u64..1_000_000_000_000_000_000, 0usize..=18).prop_filter_map(
        "amount must be positive",
        |(whole, frac, digits)| {
            let frac = if digits == 0 {
                0
            } else {
                frac % 10u64.pow(digits as u32)
            };
            if whole == 0 && frac == 0 {
                return None;
            }
            if digits == 0 {
                Some(whole.to_string())
            } else {
                Some(format!("{whole}.{frac:0width$}", width = digits))
            }
        },
    )
}

/// Well-formed ADNR names
pub fn valid_domain() -> impl Strategy<Value = String> {
    "[a-z0-9]([a-z0-9-]{0,20}[a-z0-9])?".prop_map(|label| format!("{label}.vfx"))
}

// ============================================================================
// Retry Policies
// ============================================================================

/// `attempts` tries with millisecond delays and no jitter
pub fn fast_retry_policy(attempts: u32) -> RetryPolicy {
    RetryPolicy::default().with_backoff(
        BackoffConfig::new()
            .with_initial_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5))
            .with_jitter(0.0)
            .with_max_attempts(attempts),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_case_keys_partition() {
        for key in EdgeCaseKeys::valid_only() {
            assert!(!EdgeCaseKeys::invalid_only().contains(&key));
        }
        assert!(EdgeCaseKeys::SECP256K1_ORDER_MINUS_1 < EdgeCaseKeys::SECP256K1_ORDER);
    }

    #[test]
    fn test_edge_case_mnemonic_word_counts() {
        for phrase in EdgeCaseMnemonics::valid() {
            let words = phrase.split_whitespace().count();
            assert!(words == 12 || words == 24, "{phrase}");
        }
    }

    #[test]
    fn test_fixture_lists_non_empty() {
        assert!(!EdgeCaseMnemonics::invalid().is_empty());
        assert!(!EdgeCaseAddresses::malformed().is_empty());
        assert!(!EdgeCaseAmounts::non_positive().is_empty());
        assert!(!EdgeCaseDomains::invalid().is_empty());
    }

    #[test]
    fn test_fast_retry_policy_is_bounded_and_quick() {
        let policy = fast_retry_policy(4);
        assert_eq!(policy.backoff.max_attempts, 4);
        assert!(policy.backoff.max_delay <= Duration::from_millis(5));
        assert!(!policy.retry_submissions);
    }

    proptest! {
        #[test]
        fn test_valid_key_is_nonzero(key in valid_private_key_bytes()) {
            prop_assert!(key.iter().any(|&b| b != 0));
            prop_assert!(key < EdgeCaseKeys::SECP256K1_ORDER);
        }

        #[test]
        fn test_amount_string_shape(s in valid_amount_string()) {
            let frac_digits = s.split('.').nth(1).map(str::len).unwrap_or(0);
            prop_assert!(frac_digits <= 18);
            prop_assert!(s.chars().any(|c| c.is_ascii_digit() && c != '0'));
        }

        #[test]
        fn test_domain_shape(d in valid_domain()) {
            prop_assert!(d.ends_with(".vfx"));
            prop_assert!(!d.starts_with('-'));
            prop_assert!(!d.trim_end_matches(".vfx").ends_with('-'));
        }
    }
}
