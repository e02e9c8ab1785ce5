// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! The injectable random source shared by the randomized algorithms.

use core::fmt;

use rand_core::RngCore;

use crate::config::SearchConfig;
use crate::errors::MorphismError;
use crate::traits::{GroupVariety, PointOrder};

/// A random number generator together with the budgets that bound its use.
///
/// Every randomized algorithm in this crate draws from a `Sampler`, so
/// seeding the generator makes the whole computation reproducible.
pub struct Sampler<'a> {
    rng: &'a mut dyn RngCore,
    config: SearchConfig,
}

impl<'a> Sampler<'a> {
    /// Wrap `rng` with the default [`SearchConfig`].
    pub fn new(rng: &'a mut dyn RngCore) -> Self {
        Sampler::with_config(rng, SearchConfig::default())
    }

    /// Wrap `rng` with explicit budgets.
    pub fn with_config(rng: &'a mut dyn RngCore, config: SearchConfig) -> Self {
        Sampler { rng, config }
    }

    /// The budgets in effect.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The underlying generator.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }
}

impl fmt::Debug for Sampler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Lift random field elements to points on `curve` until one of infinite
/// order turns up.
///
/// Torsion points are skipped: both maps may fix one by coincidence, which
/// would prove nothing about the maps themselves.
pub(crate) fn find_infinite_order_point<V: GroupVariety>(
    curve: &V,
    sampler: &mut Sampler<'_>,
) -> Result<V::Point, MorphismError> {
    let attempts = sampler.config().infinite_order_attempts;
    for attempt in 0..attempts {
        let x = curve.random_element(sampler.rng())?;
        let point = curve.lift_x(&x)?;
        if curve.order(&point)? == PointOrder::Infinite {
            tracing::trace!(attempt, "found a point of infinite order");
            return Ok(point);
        }
    }
    tracing::warn!(attempts, "no point of infinite order found");
    Err(MorphismError::search_exhausted(
        "a point of infinite order",
        attempts,
    ))
}
