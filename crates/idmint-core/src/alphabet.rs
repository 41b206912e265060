//! Digit alphabets for the positional codec.
//!
//! An alphabet is a set of distinct ASCII characters listed in ascending byte
//! order; a character's position is its digit value. The first character is
//! the zero digit used for left padding. Ascending order keeps identifier
//! order equal to ordinal order.

use std::fmt;

use crate::error::{Error, Result};

/// Digits plus upper-case letters without `I` and `O` (34 characters).
pub const DEFAULT_ALPHABET: &str = "0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";

const NO_DIGIT: u8 = u8::MAX;

#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    /// ASCII byte -> digit value, `NO_DIGIT` for foreign characters.
    lookup: [u8; 128],
}

impl Alphabet {
    /// Build an alphabet, rejecting non-ASCII, duplicate, out-of-order, or too
    /// few characters.
    pub fn new(symbols: &str) -> Result<Self> {
        if !symbols.is_ascii() {
            return Err(Error::InvalidAlphabet(format!(
                "alphabet must be ASCII: {symbols:?}"
            )));
        }
        let bytes = symbols.as_bytes();
        if bytes.len() < 2 {
            return Err(Error::InvalidAlphabet(format!(
                "alphabet needs at least 2 characters, got {}",
                bytes.len()
            )));
        }
        // At most 128 distinct ASCII bytes, so every digit value fits in a u8.
        let mut lookup = [NO_DIGIT; 128];
        for (value, &b) in bytes.iter().enumerate() {
            let slot = &mut lookup[b as usize];
            if *slot != NO_DIGIT {
                return Err(Error::InvalidAlphabet(format!(
                    "duplicate character {:?}",
                    b as char
                )));
            }
            *slot = value as u8;
        }
        if let Some(w) = bytes.windows(2).find(|w| w[0] > w[1]) {
            return Err(Error::InvalidAlphabet(format!(
                "characters must be in ascending order: {:?} before {:?}",
                w[0] as char, w[1] as char
            )));
        }

        Ok(Self {
            symbols: bytes.to_vec(),
            lookup,
        })
    }

    /// Number of digits (B).
    pub fn base(&self) -> u64 {
        self.symbols.len() as u64
    }

    /// The padding character (digit value 0).
    pub fn zero(&self) -> char {
        self.symbols[0] as char
    }

    /// Character for a digit value. Panics if `value >= base()`.
    pub fn symbol(&self, value: u64) -> u8 {
        self.symbols[value as usize]
    }

    /// Digit value of `ch`, or `None` if it is not part of the alphabet.
    pub fn digit(&self, ch: char) -> Option<u64> {
        if !ch.is_ascii() {
            return None;
        }
        match self.lookup[ch as usize] {
            NO_DIGIT => None,
            v => Some(u64::from(v)),
        }
    }

    pub fn as_str(&self) -> &str {
        // Validated as ASCII in `new`.
        std::str::from_utf8(&self.symbols).unwrap_or_default()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET).expect("default alphabet is valid")
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.as_str()).finish()
    }
}
