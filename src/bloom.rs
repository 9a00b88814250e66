// Copyright (c) 2018 Aleksandr Bezobchuk
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! A Bloom filter over strings, backed by a word-packed bit vector.
use crate::bitvec::BitVec;
use crate::error::Result;
use crate::hash::{HashFamily, SipHashFamily};

/// A Bloom filter storing string items, hashed by a family `H`.
///
/// `H` may be a reference, so that many short-lived stores can share one
/// hash family.
#[derive(Clone, Debug)]
pub struct BloomStore<H = SipHashFamily> {
    bits: BitVec,
    hasher: H,
}

impl BloomStore<SipHashFamily> {
    /// Return an empty filter of `nbits` bits using the default hash family.
    ///
    /// `nbits` must be a positive multiple of 64.
    pub fn new(nbits: usize) -> Result<Self> {
        Self::with_hasher(nbits, SipHashFamily::new())
    }

    /// Rebuild a filter from a word snapshot using the default hash family.
    pub fn from_words(words: Vec<u64>) -> Result<Self> {
        Self::from_words_with_hasher(words, SipHashFamily::new())
    }
}

impl<H: HashFamily> BloomStore<H> {
    /// Return an empty filter of `nbits` bits hashed by `hasher`.
    pub fn with_hasher(nbits: usize, hasher: H) -> Result<Self> {
        Ok(Self {
            bits: BitVec::new(nbits)?,
            hasher,
        })
    }

    /// Rebuild a filter from a word snapshot, see [`BloomStore::as_words`].
    ///
    /// The snapshot carries no metadata: `hasher` must be the family the
    /// snapshot was built with.
    pub fn from_words_with_hasher(words: Vec<u64>, hasher: H) -> Result<Self> {
        Ok(Self {
            bits: BitVec::try_from(words)?,
            hasher,
        })
    }

    /// Set an item in the Bloom filter. This operation is idempotent with regards
    /// to each unique item.
    pub fn insert(&mut self, item: &str) {
        let hashes = self.hasher.hash_all(item);
        self.insert_hashes(&hashes);
    }

    /// Return whether or not a given item is likely in the Bloom filter or not. There is a
    /// possibility for a false positive, but a false negative will never occur.
    pub fn contains(&self, item: &str) -> bool {
        self.contains_hashes(&self.hasher.hash_all(item))
    }

    /// Set the bits of already computed hash values.
    pub fn insert_hashes(&mut self, hashes: &[u64]) {
        for &hash in hashes {
            self.bits.set(hash);
        }
    }

    /// Check the bits of already computed hash values. Stops at the first unset bit.
    pub fn contains_hashes(&self, hashes: &[u64]) -> bool {
        hashes.iter().all(|&hash| self.bits.is_set(hash))
    }

    /// Set all bits to zero.
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Return the number of bits in this filter.
    pub fn bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of hashes used (`k` parameter).
    pub fn hashes(&self) -> usize {
        self.hasher.num_hashes()
    }

    /// The hash family of this filter.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Count the approximate number of items in the filter.
    pub fn count(&self) -> usize {
        let nbits = self.bits.len() as f64;
        let nbits_set = self.bits.count_ones() as f64;
        let nhashes = self.hashes() as f64;
        let count = -(nbits / nhashes) * (1. - (nbits_set / nbits)).ln();

        count.round() as usize
    }

    /// Return the underlying word storage, for persistence.
    pub fn as_words(&self) -> &[u64] {
        self.bits.as_words()
    }
}

impl<H> AsRef<[u64]> for BloomStore<H> {
    fn as_ref(&self) -> &[u64] {
        self.bits.as_words()
    }
}

impl<H> PartialEq for BloomStore<H> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<H> Eq for BloomStore<H> {}

impl<H> From<BloomStore<H>> for Vec<u64> {
    fn from(other: BloomStore<H>) -> Vec<u64> {
        other.bits.into()
    }
}
