//! # vfxd Mnemonic
//!
//! Mnemonic engine for the vfxd VerifiedX wallet core.
//!
//! Phrases are BIP-39 over the English word list (`bip39-english`), 12 or 24
//! words only. The word list and its reverse index are built once per
//! process; the random source is the only external input and can be injected.
//!
//! ## Example
//!
//! ```
//! use vfxd_mnemonic::{Mnemonic, WordCount};
//!
//! let mnemonic = Mnemonic::generate(WordCount::TwentyFour).unwrap();
//! assert!(vfxd_mnemonic::validate(&mnemonic.phrase()));
//! assert!(!vfxd_mnemonic::validate("not a real phrase"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod mnemonic;
pub mod wordlist;

pub use mnemonic::{Mnemonic, Seed, WordCount, SEED_LEN, SEED_ROUNDS};
pub use wordlist::WORDLIST_VERSION;

use vfxd_error::Result;

/// Generates a phrase with `word_count` words (12 or 24).
///
/// Any other count fails with `InvalidParameter`.
pub fn generate_mnemonic(word_count: usize) -> Result<Mnemonic> {
    Mnemonic::generate(WordCount::try_from(word_count)?)
}

/// True iff `phrase` is a well-formed 12- or 24-word phrase with a valid checksum.
///
/// Never fails; use [`Mnemonic::parse`] to learn why a phrase was rejected.
pub fn validate(phrase: &str) -> bool {
    Mnemonic::parse(phrase).is_ok()
}
