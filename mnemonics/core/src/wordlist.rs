//! The fixed word list and its reverse index.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Identifier of the word list mnemonics are encoded with
pub const WORDLIST_VERSION: &str = "bip39-english";

/// Number of words in the list (2^11)
pub const WORDLIST_LEN: usize = 2048;

static INDEX: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    words()
        .iter()
        .enumerate()
        .map(|(i, w)| (*w, i as u16))
        .collect()
});

/// The full list, in index order
pub fn words() -> &'static [&'static str; WORDLIST_LEN] {
    bip39::Language::English.word_list()
}

/// Position of `word` (already lowercased)
pub fn index_of(word: &str) -> Option<u16> {
    INDEX.get(word).copied()
}

/// Word at `index`, `None` past the end
pub fn word_at(index: u16) -> Option<&'static str> {
    words().get(index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_bounds() {
        assert_eq!(index_of("abandon"), Some(0));
        assert_eq!(index_of("zoo"), Some(2047));
        assert_eq!(word_at(0), Some("abandon"));
        assert_eq!(word_at(2047), Some("zoo"));
        assert_eq!(word_at(2048), None);
    }

    #[test]
    fn test_index_is_exact_match() {
        assert_eq!(index_of("Abandon"), None);
        assert_eq!(index_of("aband"), None);
        assert_eq!(index_of(""), None);
    }

    #[test]
    fn test_every_word_indexed() {
        for (i, w) in words().iter().enumerate() {
            assert_eq!(index_of(w), Some(i as u16));
        }
    }
}
