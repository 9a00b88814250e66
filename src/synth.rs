// Copyright (c) 2026 The bloomsize authors
//
// Licensed under the MIT license.

//! Random lowercase words used as calibration data.
//!
//! Uniqueness is obtained by rejection sampling: a word already taken is
//! simply drawn again. The cost grows as requests approach the number of
//! distinct words, so callers should keep request sizes well below it.
use std::collections::HashSet;
use std::ops::Range;

/// Word lengths drawn by default, lower bound inclusive.
pub const DEFAULT_LENGTHS: Range<usize> = 3..13;

/// Generator of random lowercase words.
pub struct StringGenerator {
    rng: fastrand::Rng,
}

impl StringGenerator {
    /// Return a generator with a random seed.
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Return a generator producing the same words for the same seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Generate one word, with a length drawn uniformly from [`DEFAULT_LENGTHS`].
    pub fn generate_one(&mut self) -> String {
        let len = self.rng.usize(DEFAULT_LENGTHS);
        (0..len).map(|_| self.rng.lowercase()).collect()
    }

    /// Generate `count` pairwise distinct words.
    pub fn generate_unique(&mut self, count: usize) -> Vec<String> {
        self.generate_excluding(count, &HashSet::new())
    }

    /// Generate as many words as `other` holds, pairwise distinct and
    /// distinct from every word of `other`.
    pub fn generate_disjoint<S: AsRef<str>>(&mut self, other: &[S]) -> Vec<String> {
        let taken: HashSet<&str> = other.iter().map(AsRef::as_ref).collect();
        self.generate_excluding(other.len(), &taken)
    }

    fn generate_excluding(&mut self, count: usize, taken: &HashSet<&str>) -> Vec<String> {
        let mut seen = HashSet::with_capacity(count);
        let mut out = Vec::with_capacity(count);

        while out.len() < count {
            let word = self.generate_one();
            if taken.contains(word.as_str()) || !seen.insert(word.clone()) {
                continue;
            }
            out.push(word);
        }
        out
    }
}

impl Default for StringGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_word(word: &str) -> bool {
        DEFAULT_LENGTHS.contains(&word.len()) && word.chars().all(|c| c.is_ascii_lowercase())
    }

    #[test]
    fn test_generate_one() {
        let mut generator = StringGenerator::with_seed(1);

        for _ in 0..1000 {
            let word = generator.generate_one();
            assert!(is_word(&word), "unexpected word {:?}", word);
        }
    }

    #[test]
    fn test_lengths_are_spread() {
        let mut generator = StringGenerator::with_seed(2);
        let lengths: HashSet<usize> = (0..2000).map(|_| generator.generate_one().len()).collect();

        assert_eq!(lengths, DEFAULT_LENGTHS.collect::<HashSet<_>>());
    }

    #[test]
    fn test_generate_unique() {
        let mut generator = StringGenerator::with_seed(3);
        let words = generator.generate_unique(50);

        assert_eq!(words.len(), 50);
        assert!(words.iter().all(|w| is_word(w)));
        assert_eq!(words.iter().collect::<HashSet<_>>().len(), 50);
    }

    #[test]
    fn test_generate_disjoint() {
        let mut generator = StringGenerator::with_seed(4);
        let words = generator.generate_unique(50);
        let control = generator.generate_disjoint(&words);

        assert_eq!(control.len(), 50);
        assert!(control.iter().all(|w| is_word(w)));
        assert_eq!(control.iter().collect::<HashSet<_>>().len(), 50);
        assert!(control.iter().all(|w| !words.contains(w)));
    }

    #[test]
    fn test_generate_disjoint_of_borrowed() {
        let mut generator = StringGenerator::with_seed(5);
        let control = generator.generate_disjoint(&["foo", "bar"]);

        assert_eq!(control.len(), 2);
        assert!(!control.iter().any(|w| w == "foo" || w == "bar"));
        assert!(generator.generate_disjoint::<String>(&[]).is_empty());
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = StringGenerator::with_seed(42).generate_unique(20);
        let b = StringGenerator::with_seed(42).generate_unique(20);

        assert_eq!(a, b);
    }
}
