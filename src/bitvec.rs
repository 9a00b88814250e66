// Copyright (c) 2020 Helge Wrede, Alexander Schultheiß, Lukas Simon
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Bit vector functionality.
//!
//! Bits are packed into 64-bit words and addressed modulo the vector length,
//! so any `u64` is a valid index. Hash outputs larger than the vector wrap
//! around instead of failing.
use std::fmt::Debug;

use crate::error::{Error, Result};

/// Width of a storage word, in bits.
pub const WORD_BITS: usize = u64::BITS as usize;

/// A packed bit vector whose length is a multiple of [`WORD_BITS`].
#[derive(Clone, PartialEq, Eq)]
pub struct BitVec {
    words: Vec<u64>,
    nbits: usize,
}

impl BitVec {
    /// Create a new bit vector of the given length, in bits.
    ///
    /// The length must be a positive multiple of [`WORD_BITS`]; use
    /// [`crate::calc::make_multiple`] to round a length up first.
    pub fn new(nbits: usize) -> Result<Self> {
        if nbits == 0 || nbits % WORD_BITS != 0 {
            return Err(Error::InvalidLength(nbits));
        }
        Ok(Self {
            words: vec![0; nbits / WORD_BITS],
            nbits,
        })
    }

    /// Get the length in bits of the vector.
    pub fn len(&self) -> usize {
        self.nbits
    }

    /// Check whether this vector is empty, ie. has a length of zero.
    ///
    /// Always `false` for a constructed vector.
    pub fn is_empty(&self) -> bool {
        self.nbits == 0
    }

    /// Set all bits to zero.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Set a single bit to `1`. The index is reduced modulo the length.
    pub fn set(&mut self, index: u64) {
        let (word, mask) = self.locate(index);
        self.words[word] |= mask;
    }

    /// Check whether a bit is set. The index is reduced modulo the length.
    pub fn is_set(&self, index: u64) -> bool {
        let (word, mask) = self.locate(index);
        self.words[word] & mask != 0
    }

    /// Count the number of `1` bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Count the number of `0` bits.
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// Return the underlying word storage.
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    fn locate(&self, index: u64) -> (usize, u64) {
        let bit = (index % self.nbits as u64) as usize;
        (bit / WORD_BITS, 1 << (bit % WORD_BITS))
    }
}

impl TryFrom<Vec<u64>> for BitVec {
    type Error = Error;

    /// Rebuild a bit vector from its words; the length is `words.len() * 64`.
    fn try_from(words: Vec<u64>) -> Result<Self> {
        if words.is_empty() {
            return Err(Error::InvalidLength(0));
        }
        let nbits = words.len() * WORD_BITS;

        Ok(Self { words, nbits })
    }
}

impl From<BitVec> for Vec<u64> {
    fn from(other: BitVec) -> Vec<u64> {
        other.words
    }
}

impl Debug for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let words: Vec<String> = self.words.iter().map(|w| format!("{:b}", w)).collect();
        write!(f, "BitVec({})", words.join("\n"))
    }
}
