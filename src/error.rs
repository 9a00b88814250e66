// Copyright (c) 2026 The bloomsize authors
//
// Licensed under the MIT license.

//! Error type shared by every fallible operation in the crate.
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by bit vectors, stores, sizing and calibration.
#[derive(Error, Debug)]
pub enum Error {
    /// A bit length that is zero or not a multiple of the word width.
    #[error("bit length must be a positive multiple of 64, got {0}")]
    InvalidLength(usize),

    /// A false positive probability outside the open interval `(0, 1)`.
    #[error("false positive probability must lie in (0, 1), got {0}")]
    InvalidProbability(f64),

    /// An expected item count of zero.
    #[error("expected item count must be positive")]
    InvalidItemCount,

    /// A hash count of zero.
    #[error("hash count must be positive")]
    InvalidHashCount,

    /// A calibration setting outside its valid range.
    #[error("calibration setting `{setting}` out of range: {value}")]
    InvalidConfig {
        /// Name of the setting.
        setting: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Calibration was asked to run over no items.
    #[error("cannot calibrate over an empty item set")]
    EmptyInput,

    /// An item that was just inserted is not reported as present.
    ///
    /// This means the hash family is not deterministic or the bit vector is
    /// broken. It is never retried.
    #[error("false negative on {item:?} in a filter of {nbits} bits")]
    FalseNegative {
        /// The item that went missing.
        item: String,
        /// Length of the filter it was inserted into.
        nbits: usize,
    },

    /// Reading an item source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
