use crate::wordlist::{self, WORDLIST_VERSION};
use bip39::Language;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use std::fmt;
use vfxd_error::{Result, VfxdError};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// PBKDF2 rounds used to stretch a phrase into a seed
pub const SEED_ROUNDS: u32 = 2048;

/// Length of the derived seed in bytes
pub const SEED_LEN: usize = 64;

/// Supported phrase lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordCount {
    /// 12 words, 128 bits of entropy
    Twelve,
    /// 24 words, 256 bits of entropy
    TwentyFour,
}

impl WordCount {
    /// Number of words
    pub fn words(&self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::TwentyFour => 24,
        }
    }

    /// Entropy length in bytes
    pub fn entropy_len(&self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::TwentyFour => 32,
        }
    }

    /// Checksum length in bits (entropy bits / 32)
    pub fn checksum_bits(&self) -> usize {
        self.entropy_len() * 8 / 32
    }

    fn from_entropy_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(WordCount::Twelve),
            32 => Some(WordCount::TwentyFour),
            _ => None,
        }
    }
}

impl TryFrom<usize> for WordCount {
    type Error = VfxdError;

    fn try_from(words: usize) -> Result<Self> {
        match words {
            12 => Ok(WordCount::Twelve),
            24 => Ok(WordCount::TwentyFour),
            other => Err(VfxdError::InvalidParameter(format!(
                "word count must be 12 or 24, got {other}"
            ))),
        }
    }
}

/// A 64-byte seed, wiped on drop
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    /// Raw seed bytes
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

/// A validated mnemonic phrase.
///
/// Wraps [`bip39::Mnemonic`] restricted to English and 12 or 24 words.
/// Wiped on drop. `Debug` never prints the words.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    inner: bip39::Mnemonic,
}

fn map_bip39_error(err: bip39::Error) -> VfxdError {
    match err {
        bip39::Error::UnknownWord(i) => VfxdError::InvalidMnemonic(format!(
            "word {} is not in the {WORDLIST_VERSION} word list",
            i + 1
        )),
        bip39::Error::InvalidChecksum => VfxdError::InvalidMnemonic("checksum mismatch".into()),
        bip39::Error::BadWordCount(n) => {
            VfxdError::InvalidMnemonic(format!("expected 12 or 24 words, got {n}"))
        }
        bip39::Error::BadEntropyBitCount(bits) => VfxdError::InvalidParameter(format!(
            "entropy must be 16 or 32 bytes, got {} bits",
            bits
        )),
        bip39::Error::AmbiguousLanguages(_) => {
            VfxdError::InvalidMnemonic("phrase matches more than one word list".into())
        }
    }
}

impl Mnemonic {
    /// Generates a phrase from the operating system CSPRNG
    pub fn generate(count: WordCount) -> Result<Self> {
        Self::generate_with(count, &mut OsRng)
    }

    /// Generates a phrase from a caller-supplied CSPRNG
    pub fn generate_with<R: RngCore + CryptoRng>(count: WordCount, rng: &mut R) -> Result<Self> {
        let mut buf = Zeroizing::new([0u8; 32]);
        let entropy = &mut buf[..count.entropy_len()];
        rng.try_fill_bytes(entropy)
            .map_err(|e| VfxdError::Other(format!("random source failed: {e}")))?;
        let mnemonic = Self::from_entropy(entropy)?;
        tracing::debug!(words = count.words(), wordlist = WORDLIST_VERSION, "generated mnemonic");
        Ok(mnemonic)
    }

    /// Encodes 16 or 32 bytes of entropy
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        if WordCount::from_entropy_len(entropy.len()).is_none() {
            return Err(VfxdError::InvalidParameter(format!(
                "entropy must be 16 or 32 bytes, got {}",
                entropy.len()
            )));
        }
        let inner = bip39::Mnemonic::from_entropy_in(Language::English, entropy)
            .map_err(map_bip39_error)?;
        Ok(Self { inner })
    }

    /// Parses and validates a phrase.
    ///
    /// Any run of whitespace separates words and ASCII case is ignored.
    /// Errors name the failing position, never the word itself.
    pub fn parse(phrase: &str) -> Result<Self> {
        let mut normalized = Zeroizing::new(String::with_capacity(phrase.len()));
        let mut words = 0usize;
        for (position, raw) in phrase.split_whitespace().enumerate() {
            let word = Zeroizing::new(raw.to_ascii_lowercase());
            if wordlist::index_of(&word).is_none() {
                return Err(map_bip39_error(bip39::Error::UnknownWord(position)));
            }
            if position > 0 {
                normalized.push(' ');
            }
            normalized.push_str(&word);
            words += 1;
        }
        if WordCount::try_from(words).is_err() {
            return Err(map_bip39_error(bip39::Error::BadWordCount(words)));
        }

        let inner = bip39::Mnemonic::parse_in(Language::English, normalized.as_str())
            .map_err(map_bip39_error)?;
        Ok(Self { inner })
    }

    /// Phrase length
    pub fn word_count(&self) -> WordCount {
        if self.inner.word_count() == 24 {
            WordCount::TwentyFour
        } else {
            WordCount::Twelve
        }
    }

    /// Word-list indices in phrase order
    pub fn indices(&self) -> Vec<u16> {
        self.inner.word_indices().map(|i| i as u16).collect()
    }

    /// The normalized phrase: lowercase words joined by single spaces
    pub fn phrase(&self) -> Zeroizing<String> {
        let mut out = Zeroizing::new(String::with_capacity(self.inner.word_count() * 9));
        for (i, word) in self.inner.word_iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    /// Decodes the entropy (checksum bits dropped)
    pub fn to_entropy(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.inner.to_entropy())
    }

    /// Stretches the phrase into a 64-byte seed.
    ///
    /// PBKDF2-HMAC-SHA512, 2048 rounds, salt `"mnemonic" + passphrase`. The
    /// passphrase is NFKD-normalized first, as BIP-39 requires.
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        Seed(Zeroizing::new(self.inner.to_seed(passphrase)))
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.inner.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl std::str::FromStr for Mnemonic {
    type Err = VfxdError;

    fn from_str(s: &str) -> Result<Self> {
        Mnemonic::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vfxd_testing::EdgeCaseMnemonics;

    // ========================================================================
    // Generation
    // ========================================================================

    #[test]
    fn test_generate_word_counts() {
        let twelve = Mnemonic::generate(WordCount::Twelve).unwrap();
        assert_eq!(twelve.phrase().split(' ').count(), 12);

        let twenty_four = Mnemonic::generate(WordCount::TwentyFour).unwrap();
        assert_eq!(twenty_four.phrase().split(' ').count(), 24);
    }

    #[test]
    fn test_generate_with_seeded_rng_is_deterministic() {
        let a = Mnemonic::generate_with(WordCount::TwentyFour, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = Mnemonic::generate_with(WordCount::TwentyFour, &mut StdRng::seed_from_u64(7)).unwrap();
        let c = Mnemonic::generate_with(WordCount::TwentyFour, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_word_count_conversion() {
        assert_eq!(WordCount::try_from(12).unwrap(), WordCount::Twelve);
        assert_eq!(WordCount::try_from(24).unwrap(), WordCount::TwentyFour);
        for bad in [0, 11, 13, 15, 18, 21, 25] {
            assert!(matches!(
                WordCount::try_from(bad),
                Err(VfxdError::InvalidParameter(_))
            ));
        }
        assert_eq!(WordCount::Twelve.checksum_bits(), 4);
        assert_eq!(WordCount::TwentyFour.checksum_bits(), 8);
    }

    // ========================================================================
    // Encoding vectors
    // ========================================================================

    #[test]
    fn test_zero_entropy_vectors() {
        let twelve = Mnemonic::from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(twelve.phrase().as_str(), EdgeCaseMnemonics::STANDARD_12);

        let twenty_four = Mnemonic::from_entropy(&[0u8; 32]).unwrap();
        assert_eq!(twenty_four.phrase().as_str(), EdgeCaseMnemonics::STANDARD_24);
    }

    #[test]
    fn test_known_entropy_vectors() {
        let legal = Mnemonic::from_entropy(&[0x7f; 16]).unwrap();
        assert_eq!(legal.phrase().as_str(), EdgeCaseMnemonics::LEGAL_WINNER_12);

        let zoo = Mnemonic::from_entropy(&[0xff; 16]).unwrap();
        assert_eq!(zoo.phrase().as_str(), EdgeCaseMnemonics::ALL_ZOO);
    }

    #[test]
    fn test_entropy_round_trip() {
        let entropy: Vec<u8> = (0u8..32).collect();
        let m = Mnemonic::from_entropy(&entropy).unwrap();
        let decoded = m.to_entropy();
        assert_eq!(decoded.as_slice(), entropy.as_slice());
        assert!(Mnemonic::from_entropy(&[0u8; 20]).is_err());
    }

    #[test]
    fn test_agrees_with_bip39_crate() {
        let mut rng = StdRng::seed_from_u64(2024);
        for count in [WordCount::Twelve, WordCount::TwentyFour] {
            for _ in 0..8 {
                let ours = Mnemonic::generate_with(count, &mut rng).unwrap();
                let reference = bip39::Mnemonic::parse(ours.phrase().as_str()).unwrap();
                assert_eq!(reference.to_entropy(), ours.to_entropy().to_vec());
                assert_eq!(&reference.to_seed(""), ours.to_seed("").as_bytes());
                assert_eq!(&reference.to_seed("TREZOR"), ours.to_seed("TREZOR").as_bytes());
            }
        }
    }

    #[test]
    fn test_trezor_seed_vector() {
        let m = Mnemonic::parse(EdgeCaseMnemonics::STANDARD_12).unwrap();
        assert_eq!(
            hex::encode(m.to_seed("TREZOR").as_bytes()),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_non_ascii_passphrase_is_nfkd_normalized() {
        let m = Mnemonic::parse(EdgeCaseMnemonics::STANDARD_12).unwrap();
        let reference = bip39::Mnemonic::parse(EdgeCaseMnemonics::STANDARD_12).unwrap();

        let composed = m.to_seed("caf\u{e9}");
        let decomposed = m.to_seed("cafe\u{301}");
        assert_eq!(composed.as_bytes(), decomposed.as_bytes());
        assert_eq!(composed.as_bytes(), &reference.to_seed("caf\u{e9}"));
        assert_ne!(composed.as_bytes(), m.to_seed("cafe").as_bytes());
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    #[test]
    fn test_parse_normalizes() {
        let canonical = Mnemonic::parse(EdgeCaseMnemonics::STANDARD_12).unwrap();
        assert_eq!(Mnemonic::parse(EdgeCaseMnemonics::MIXED_CASE).unwrap(), canonical);
        assert_eq!(Mnemonic::parse(EdgeCaseMnemonics::EXTRA_WHITESPACE).unwrap(), canonical);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for phrase in EdgeCaseMnemonics::invalid() {
            let err = Mnemonic::parse(phrase).unwrap_err();
            assert!(matches!(err, VfxdError::InvalidMnemonic(_)), "{phrase:?}");
        }
    }

    #[test]
    fn test_parse_rejects_other_bip39_lengths() {
        let fifteen = bip39::Mnemonic::from_entropy(&[3u8; 20]).unwrap().to_string();
        assert!(Mnemonic::parse(&fifteen).is_err());
    }

    #[test]
    fn test_errors_do_not_echo_words() {
        let err = Mnemonic::parse("abandon abandon secretword").unwrap_err();
        assert!(!err.to_string().contains("secretword"));
        assert!(err.to_string().contains("word 3"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let m = Mnemonic::parse(EdgeCaseMnemonics::STANDARD_12).unwrap();
        let debug = format!("{m:?}");
        assert!(!debug.contains("abandon"));
        assert!(debug.contains("REDACTED"));
        assert_eq!(format!("{:?}", m.to_seed("")), "Seed([REDACTED])");
    }
}
