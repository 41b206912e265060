//! Fixed-width base-N codec between ordinals and identifiers.
//!
//! Encoding is big-endian positional (most significant digit first) and
//! left-padded with the alphabet's zero character. Alphabets are always in
//! ascending byte order, so identifiers sort lexicographically in ordinal
//! order.

use crate::alphabet::{Alphabet, DEFAULT_ALPHABET};
use crate::error::{Error, Result};
use crate::id::{Identifier, Ordinal};

/// Identifier width used by the default codec.
pub const DEFAULT_WIDTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    alphabet: Alphabet,
    width: usize,
    /// B^L, computed once.
    space: u64,
}

impl Codec {
    /// Build a codec over `alphabet` producing identifiers of `width` characters.
    ///
    /// Fails with `InvalidAlphabet` if the alphabet is malformed, if `width` is
    /// zero, or if the address space `B^width` does not fit in a `u64`.
    pub fn new(alphabet: &str, width: usize) -> Result<Self> {
        let alphabet = Alphabet::new(alphabet)?;
        if width == 0 {
            return Err(Error::InvalidAlphabet("width must be at least 1".into()));
        }
        let space = u32::try_from(width)
            .ok()
            .and_then(|w| alphabet.base().checked_pow(w))
            .ok_or_else(|| {
                Error::InvalidAlphabet(format!(
                    "address space {}^{} overflows u64",
                    alphabet.base(),
                    width
                ))
            })?;
        Ok(Self {
            alphabet,
            width,
            space,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn base(&self) -> u64 {
        self.alphabet.base()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of identifiers this codec can express (B^L).
    pub fn space(&self) -> u64 {
        self.space
    }

    /// Largest encodable ordinal (B^L - 1).
    pub fn max_ordinal(&self) -> Ordinal {
        Ordinal::new(self.space - 1)
    }

    /// Encode an ordinal. The caller guarantees `ordinal <= max_ordinal()`;
    /// larger values would yield a string wider than `width()`.
    pub fn encode(&self, ordinal: Ordinal) -> Identifier {
        debug_assert!(
            ordinal.get() < self.space,
            "ordinal {ordinal} outside codec space {}",
            self.space
        );
        let base = self.base();
        let mut n = ordinal.get();
        let mut digits = Vec::with_capacity(self.width);
        while n > 0 {
            digits.push(self.alphabet.symbol(n % base));
            n /= base;
        }
        while digits.len() < self.width {
            digits.push(self.alphabet.symbol(0));
        }
        digits.reverse();
        let s: String = digits.into_iter().map(char::from).collect();
        Identifier::from_encoded(s)
    }

    /// Decode an identifier string back into its ordinal.
    pub fn decode(&self, code: &str) -> Result<Ordinal> {
        let actual = code.chars().count();
        if actual != self.width {
            return Err(Error::InvalidLength {
                expected: self.width,
                actual,
            });
        }
        let base = self.base();
        let mut acc: u64 = 0;
        for (position, ch) in code.chars().enumerate() {
            let digit = self
                .alphabet
                .digit(ch)
                .ok_or(Error::InvalidCharacter { ch, position })?;
            // Cannot overflow: width digits of base B stay below B^width.
            acc = acc * base + digit;
        }
        Ok(Ordinal::new(acc))
    }

    /// Validate a string and wrap it as an [`Identifier`].
    pub fn parse(&self, code: &str) -> Result<Identifier> {
        self.decode(code)?;
        Ok(Identifier::from_encoded(code.to_string()))
    }

    /// Encode the inclusive range `first..=last` in ascending order.
    pub fn encode_range(&self, first: Ordinal, last: Ordinal) -> Vec<Identifier> {
        (first.get()..=last.get())
            .map(|n| self.encode(Ordinal::new(n)))
            .collect()
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            width: DEFAULT_WIDTH,
            space: (DEFAULT_ALPHABET.len() as u64).pow(DEFAULT_WIDTH as u32),
        }
    }
}
