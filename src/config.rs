// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! Attempt budgets for the randomized searches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Budgets bounding every randomized loop in this crate.
///
/// The defaults are the ones the algorithms were designed around; they only
/// need changing to make a test deterministic or to bound work on
/// adversarial inputs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SearchConfig {
    /// Random points sampled per narrowing round of the isomorphism aligner
    /// before the sampling variety is extended.
    pub narrowing_samples: usize,
    /// Random lifts tried when looking for a point of infinite order over a
    /// number field.
    pub infinite_order_attempts: usize,
    /// Largest total degree any base-field extension may reach.
    pub max_extension_degree: u32,
}

impl SearchConfig {
    /// Default budgets: 20 samples per round, 100 lifts, extensions up to
    /// degree 64.
    pub const fn new() -> Self {
        SearchConfig {
            narrowing_samples: 20,
            infinite_order_attempts: 100,
            max_extension_degree: 64,
        }
    }

    /// Set the number of samples per narrowing round.
    pub const fn with_narrowing_samples(mut self, samples: usize) -> Self {
        self.narrowing_samples = samples;
        self
    }

    /// Set the number of lifts tried in the infinite-order search.
    pub const fn with_infinite_order_attempts(mut self, attempts: usize) -> Self {
        self.infinite_order_attempts = attempts;
        self
    }

    /// Set the cap on the total extension degree.
    pub const fn with_max_extension_degree(mut self, degree: u32) -> Self {
        self.max_extension_degree = degree;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig::new()
    }
}
