// Copyright (c) 2026 The bloomsize authors
//
// Licensed under the MIT license.

//! Empirical calibration of a filter size.
//!
//! The analytic size from [`crate::calc`] is a starting point. The calibrator
//! builds real filters at that size and smaller ones, fills them with the
//! items, queries a disjoint set of synthetic words and counts the hits. It
//! keeps shrinking while the measured rate stays within the target.
//!
//! The measured rate is `hits / nbits`, not `hits / control size`. This is
//! the rate the shrink loop compares against the target, so it decides where
//! calibration stops.
use std::path::Path;

use tracing::debug;

use crate::bitvec::WORD_BITS;
use crate::bloom::BloomStore;
use crate::calc;
use crate::error::{Error, Result};
use crate::hash::{HashFamily, SipHashFamily};
use crate::source;
use crate::synth::StringGenerator;

/// Calibration settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Maximum number of filters built per calibration.
    pub max_trials: usize,
    /// Factor applied to the size after each passing trial.
    pub shrink_factor: f64,
    /// Factor applied to `shrink_factor` when shrinking left the size unchanged.
    pub stagnation_decay: f64,
    /// Seed of the synthetic word generator, random when `None`.
    pub seed: Option<u64>,
}

impl Config {
    /// Set the maximum number of trials.
    pub fn with_max_trials(self, max_trials: usize) -> Self {
        Self { max_trials, ..self }
    }

    /// Set the shrink factor.
    pub fn with_shrink_factor(self, shrink_factor: f64) -> Self {
        Self {
            shrink_factor,
            ..self
        }
    }

    /// Set the stagnation decay.
    pub fn with_stagnation_decay(self, stagnation_decay: f64) -> Self {
        Self {
            stagnation_decay,
            ..self
        }
    }

    /// Seed the synthetic word generator.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Check that at least one trial runs and that both factors lie in the
    /// open interval `(0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.max_trials == 0 {
            return Err(Error::InvalidConfig {
                setting: "max_trials",
                value: 0.,
            });
        }
        check_factor("shrink_factor", self.shrink_factor)?;
        check_factor("stagnation_decay", self.stagnation_decay)
    }
}

fn check_factor(setting: &'static str, value: f64) -> Result<()> {
    // Also rejects NaN.
    if value > 0. && value < 1. {
        Ok(())
    } else {
        Err(Error::InvalidConfig { setting, value })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_trials: 10,
            shrink_factor: 0.9,
            stagnation_decay: 0.9,
            seed: None,
        }
    }
}

/// Outcome of a calibration run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// Chosen filter size, in bits. Always a positive multiple of 64.
    pub nbits: usize,
    /// The rate measured for `nbits`, or the target rate when the first
    /// trial already missed it.
    ///
    /// When every trial passed, `nbits` is the next, never measured size
    /// while this is the rate of the last trial, taken at the larger size
    /// before it. The two fields then describe different filters.
    pub probability: f64,
    /// Number of filters built.
    pub trials: usize,
}

/// Searches for the smallest filter meeting a false positive target.
pub struct Calibrator<H = SipHashFamily> {
    hasher: H,
    config: Config,
    generator: StringGenerator,
    last: Option<Calibration>,
}

impl Calibrator<SipHashFamily> {
    /// Return a calibrator using the default hash family and settings.
    pub fn new() -> Self {
        Self::with_hasher(SipHashFamily::new(), Config::default())
    }
}

impl Default for Calibrator<SipHashFamily> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashFamily> Calibrator<H> {
    /// Return a calibrator building filters hashed by `hasher`.
    pub fn with_hasher(hasher: H, config: Config) -> Self {
        let generator = match config.seed {
            Some(seed) => StringGenerator::with_seed(seed),
            None => StringGenerator::new(),
        };
        Self {
            hasher,
            config,
            generator,
            last: None,
        }
    }

    /// The calibration settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The result of the last successful calibration, if any.
    pub fn last(&self) -> Option<&Calibration> {
        self.last.as_ref()
    }

    /// Calibrate over `n` synthetic unique words. Odd `n` is rounded up.
    pub fn measure_synthetic(&mut self, n: usize, p: f64) -> Result<Calibration> {
        let n = n + n % 2;
        let items = self.generator.generate_unique(n);

        self.measure_size(&items, p)
    }

    /// Calibrate over the items of a text file, one per line.
    pub fn measure_file<P: AsRef<Path>>(&mut self, path: P, p: f64) -> Result<Calibration> {
        let items = source::read_lines(path)?;

        self.measure_size(&items, p)
    }

    /// Find the smallest filter size whose measured false positive rate on
    /// `items` stays within `p`.
    ///
    /// Starts from [`calc::optimize_size_with_hashes`] and shrinks the size
    /// after every passing trial. Returns the last passing size as soon as a
    /// trial fails, or the first size if the very first trial fails. When no
    /// trial fails, returns the size following the last trial, paired with
    /// the rate of the last trial (see [`Calibration::probability`]).
    ///
    /// A false negative aborts the run with [`Error::FalseNegative`]. Invalid
    /// settings are rejected with [`Error::InvalidConfig`] before any filter
    /// is built.
    pub fn measure_size<S: AsRef<str>>(&mut self, items: &[S], p: f64) -> Result<Calibration> {
        self.config.validate()?;

        if items.is_empty() {
            return Err(Error::EmptyInput);
        }
        let k = self.hasher.num_hashes();
        let mut candidate = calc::optimize_size_with_hashes(items.len(), k, p)?;
        let mut accepted = 0;
        let mut accepted_rate = p;
        let mut shrink_factor = self.config.shrink_factor;

        debug!(items = items.len(), k, p, nbits = candidate, "calibrating");

        for trial in 0..self.config.max_trials {
            let rate = self.measure_one(items, candidate)?;

            if rate > p {
                let calibration = if trial == 0 {
                    Calibration {
                        nbits: candidate,
                        probability: p,
                        trials: 1,
                    }
                } else {
                    Calibration {
                        nbits: accepted,
                        probability: accepted_rate,
                        trials: trial + 1,
                    }
                };
                debug!(trial, nbits = calibration.nbits, "target exceeded");

                return Ok(self.finish(calibration));
            }
            if candidate == accepted {
                shrink_factor *= self.config.stagnation_decay;
            } else {
                accepted = candidate;
            }
            accepted_rate = rate;
            candidate = shrink(candidate, shrink_factor);
        }
        debug!(nbits = candidate, "trials exhausted");

        Ok(self.finish(Calibration {
            nbits: candidate,
            probability: accepted_rate,
            trials: self.config.max_trials,
        }))
    }

    fn measure_one<S: AsRef<str>>(&mut self, items: &[S], nbits: usize) -> Result<f64> {
        let mut store = BloomStore::with_hasher(nbits, &self.hasher)?;

        for item in items {
            store.insert(item.as_ref());
        }
        for item in items {
            let item = item.as_ref();
            if !store.contains(item) {
                return Err(Error::FalseNegative {
                    item: item.to_owned(),
                    nbits,
                });
            }
        }

        let control = self.generator.generate_disjoint(items);
        let hits = control.iter().filter(|c| store.contains(c)).count();
        let rate = hits as f64 / nbits as f64;
        debug!(nbits, hits, rate, "trial");

        Ok(rate)
    }

    fn finish(&mut self, calibration: Calibration) -> Calibration {
        self.last = Some(calibration);
        calibration
    }
}

fn shrink(nbits: usize, factor: f64) -> usize {
    calc::make_multiple((nbits as f64 * factor) as usize).max(WORD_BITS)
}
