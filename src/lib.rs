//! A Bloom filter over strings, with the tools to size it for a target false
//! positive rate.
//!
//! # Bloom Filters
//!
//! A Bloom filter is a space-efficient probabilistic data structure that is
//! used to test whether an element is a member of a set. It allows for queries
//! to return: "possibly in set" or "definitely not in set". Elements can be
//! added to the set, but not removed; the more elements that are added to the
//! set, the larger the probability of false positives.
//!
//! # Sizing
//!
//! [`calc`] holds the closed-form relations between the item count `n`, the
//! bit count `m`, the hash count `k` and the false positive probability `p`,
//! plus a numeric refinement of `m` for a fixed `k`. Sizes are always rounded
//! up to whole 64-bit words.
//!
//! [`Calibrator`] goes further and measures: it fills real filters with the
//! expected items, probes them with random words known to be absent, and
//! shrinks the filter while the measured rate stays within the target.
//!
//! # Example
//!
//! ```
//! use bloomsize::{calc, BloomStore, SipHashFamily};
//!
//! let family = SipHashFamily::new();
//! let nbits = calc::optimize_size(1000, 0.01, &family).unwrap();
//! let mut store = BloomStore::with_hasher(nbits, family).unwrap();
//!
//! store.insert("foo");
//! store.insert("bar");
//!
//! store.contains("foo"); // true
//! store.contains("bar"); // true
//! store.contains("baz"); // false
//! ```
#![warn(missing_docs)]
#![allow(clippy::bool_assert_comparison)]

pub mod bitvec;
pub mod bloom;
pub mod calc;
pub mod calibrate;
pub mod error;
pub mod hash;
pub mod source;
pub mod synth;

pub use bloom::BloomStore;
pub use calc::SizingParams;
pub use calibrate::{Calibration, Calibrator, Config};
pub use error::{Error, Result};
pub use hash::{HashFamily, SipHashFamily};
pub use synth::StringGenerator;
