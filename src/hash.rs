// Copyright (c) 2018 Aleksandr Bezobchuk
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Hash families producing the `k` bit positions of an item.
use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use crate::error::{Error, Result};

/// Number of hash functions used when none is specified.
pub const DEFAULT_HASHES: usize = 7;

/// Seeds used for SipHash.
const HASHER_SEEDS: [[u8; 16]; 2] = [
    [
        136, 168, 28, 251, 141, 239, 69, 38, 166, 209, 98, 201, 2, 169, 146, 170,
    ],
    [
        103, 236, 177, 212, 54, 11, 66, 5, 194, 86, 6, 254, 82, 93, 203, 37,
    ],
];

/// A source of `k` hash values per item.
///
/// Implementations must be deterministic: the same item always yields the
/// same values, and [`HashFamily::hash_all`] always yields exactly
/// [`HashFamily::num_hashes`] of them. Values are not reduced to any range;
/// the bit vector takes them modulo its length.
pub trait HashFamily {
    /// Number of hash values produced per item (`k` parameter).
    fn num_hashes(&self) -> usize;

    /// Compute all hash values of an item.
    fn hash_all(&self, item: &str) -> Vec<u64>;
}

impl<H: HashFamily + ?Sized> HashFamily for &H {
    fn num_hashes(&self) -> usize {
        (**self).num_hashes()
    }

    fn hash_all(&self, item: &str) -> Vec<u64> {
        (**self).hash_all(item)
    }
}

/// Enhanced double hashing over two keyed SipHash instances.
///
/// g<sub>i</sub>(x) = H<sub>1</sub>(x) + iH<sub>2</sub>(x) + i<sup>3</sup>
#[derive(Clone, Copy, Debug)]
pub struct SipHashFamily {
    hashers: [SipHasher13; 2],
    nhashes: usize,
}

impl SipHashFamily {
    /// Return a family of [`DEFAULT_HASHES`] functions.
    pub fn new() -> Self {
        Self {
            hashers: [
                SipHasher13::new_with_key(&HASHER_SEEDS[0]),
                SipHasher13::new_with_key(&HASHER_SEEDS[1]),
            ],
            nhashes: DEFAULT_HASHES,
        }
    }

    /// Return a family of `nhashes` functions.
    pub fn with_hashes(nhashes: usize) -> Result<Self> {
        if nhashes == 0 {
            return Err(Error::InvalidHashCount);
        }
        Ok(Self {
            nhashes,
            ..Self::new()
        })
    }

    fn sip_hashes(&self, item: &str) -> (u64, u64) {
        let mut sip1 = self.hashers[0];
        let mut sip2 = self.hashers[1];

        item.hash(&mut sip1);
        item.hash(&mut sip2);

        (sip1.finish(), sip2.finish())
    }
}

impl Default for SipHashFamily {
    fn default() -> Self {
        Self::new()
    }
}

impl HashFamily for SipHashFamily {
    fn num_hashes(&self) -> usize {
        self.nhashes
    }

    fn hash_all(&self, item: &str) -> Vec<u64> {
        let (h1, h2) = self.sip_hashes(item);

        (0..self.nhashes as u64)
            .map(|i| h1.wrapping_add(i.wrapping_mul(h2)).wrapping_add(i.wrapping_pow(3)))
            .collect()
    }
}
