// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! Recovering the isomorphism that aligns two morphisms.
//!
//! Given `φ: E → E'` and `ψ: E → E''` with `ψ = α ∘ φ` for some unknown
//! isomorphism `α: E' → E''` (e.g. two isogenies with the same kernel),
//! [`find_post_isomorphism`] determines `α` by elimination: start from every
//! isomorphism `E' → E''` and discard those that disagree with `ψ` on some
//! point.
//!
//! Over a finite field all rational points may lie in a subgroup on which
//! several candidates coincide (for instance `±1` on the 2-torsion).  The
//! elimination therefore runs as a small state machine that extends the
//! base field whenever a full round of samples fails to single out a
//! candidate:
//!
//! ```text
//!   Sampling ──sample──▶ Narrowing ──≤1 left──▶ Done
//!      ▲   │                 │
//!      │   └─round over──▶ Extending ──cap hit──▶ Failed
//!      └──────────────────────┘
//! ```

use crate::errors::{ArgumentError, InternalError, MorphismError, Unsolvable};
use crate::hom::{Hom, Morphism};
use crate::sampler::{find_infinite_order_point, Sampler};
use crate::traits::{BaseField, GroupVariety};

/// Find the isomorphism `α` with `ψ = α ∘ φ`.
///
/// # Errors
///
/// * [`ArgumentError::DomainMismatch`](crate::ArgumentError) if `φ` and
///   `ψ` have different domains.
/// * [`Unsolvable::CodomainsNotIsomorphic`] if there is no isomorphism
///   between the codomains, and
///   [`Unsolvable::NotEqualUpToPostIsomorphism`] if none of them aligns the
///   two morphisms.
/// * [`ErrorKind::SearchExhausted`](crate::ErrorKind) if the searches run
///   out of budget or more than one candidate survives.
pub fn find_post_isomorphism<V: GroupVariety>(
    phi: &dyn Morphism<V>,
    psi: &dyn Morphism<V>,
    sampler: &mut Sampler<'_>,
) -> Result<Hom<V>, MorphismError> {
    let curve = phi.domain();
    if psi.domain() != curve {
        return Err(ArgumentError::DomainMismatch.into());
    }

    let candidates = phi.codomain().isomorphisms(psi.codomain())?;
    if candidates.is_empty() {
        return Err(MorphismError::no_solution(Unsolvable::CodomainsNotIsomorphic));
    }
    tracing::debug!(candidates = candidates.len(), "aligning up to post-isomorphism");

    let mut survivors = match curve.base_field() {
        BaseField::Finite { .. } => Alignment::new(curve.clone(), candidates).run(phi, psi, sampler)?,
        BaseField::Number { .. } => {
            let point = find_infinite_order_point(curve, sampler)?;
            let mut candidates = candidates;
            retain_aligning(&mut candidates, phi, psi, &point)?;
            candidates
        }
        BaseField::Other => {
            let ratio = psi.scaling_factor()? / phi.scaling_factor()?;
            let mut kept = Vec::with_capacity(candidates.len());
            for alpha in candidates {
                if alpha.scaling_factor()? == ratio {
                    kept.push(alpha);
                }
            }
            kept
        }
    };

    match survivors.len() {
        0 => Err(MorphismError::no_solution(
            Unsolvable::NotEqualUpToPostIsomorphism,
        )),
        1 => Ok(survivors.remove(0)),
        candidates => Err(MorphismError(InternalError::AmbiguousAlignment { candidates })),
    }
}

/// Keep the candidates `α` with `α(φ(P)) == ψ(P)`.
fn retain_aligning<V: GroupVariety>(
    candidates: &mut Vec<Hom<V>>,
    phi: &dyn Morphism<V>,
    psi: &dyn Morphism<V>,
    point: &V::Point,
) -> Result<(), MorphismError> {
    let image_phi = phi.evaluate(point)?;
    let image_psi = psi.evaluate(point)?;
    let mut kept = Vec::with_capacity(candidates.len());
    for alpha in candidates.drain(..) {
        if alpha.evaluate(&image_phi)? == image_psi {
            kept.push(alpha);
        }
    }
    *candidates = kept;
    Ok(())
}

/// States of the finite-field elimination.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AlignmentState<P> {
    /// Draw the next random point, or end the round.
    Sampling,
    /// Filter the candidates with one sampled point.
    Narrowing(P),
    /// Move the sampling variety to a quadratic extension.
    Extending,
    /// At most one candidate is left.
    Done,
    /// The extension cap was reached with several candidates left.
    Failed,
}

/// The finite-field elimination, one transition per [`Alignment::step`].
#[derive(Debug)]
pub(crate) struct Alignment<V: GroupVariety> {
    /// Where points are sampled: the common domain, possibly extended.
    curve: V,
    candidates: Vec<Hom<V>>,
    /// Total degree of `curve`'s base field over the original one.
    extension_degree: u32,
    samples_this_round: usize,
    state: AlignmentState<V::Point>,
}

impl<V: GroupVariety> Alignment<V> {
    pub(crate) fn new(curve: V, candidates: Vec<Hom<V>>) -> Self {
        Alignment {
            curve,
            candidates,
            extension_degree: 1,
            samples_this_round: 0,
            state: AlignmentState::Sampling,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &AlignmentState<V::Point> {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn extension_degree(&self) -> u32 {
        self.extension_degree
    }

    /// Perform a single transition.
    pub(crate) fn step(
        &mut self,
        phi: &dyn Morphism<V>,
        psi: &dyn Morphism<V>,
        sampler: &mut Sampler<'_>,
    ) -> Result<(), MorphismError> {
        let state = core::mem::replace(&mut self.state, AlignmentState::Done);
        self.state = match state {
            AlignmentState::Sampling => {
                if self.candidates.len() <= 1 {
                    AlignmentState::Done
                } else if self.samples_this_round >= sampler.config().narrowing_samples {
                    AlignmentState::Extending
                } else {
                    AlignmentState::Narrowing(self.curve.random_point(sampler.rng())?)
                }
            }
            AlignmentState::Narrowing(point) => {
                retain_aligning(&mut self.candidates, phi, psi, &point)?;
                self.samples_this_round += 1;
                tracing::trace!(
                    remaining = self.candidates.len(),
                    sample = self.samples_this_round,
                    "narrowed candidates"
                );
                if self.candidates.len() <= 1 {
                    AlignmentState::Done
                } else {
                    AlignmentState::Sampling
                }
            }
            AlignmentState::Extending => {
                let next = self.extension_degree.saturating_mul(2);
                if next > sampler.config().max_extension_degree {
                    AlignmentState::Failed
                } else {
                    tracing::debug!(
                        extension_degree = next,
                        remaining = self.candidates.len(),
                        "candidates coincide on sampled points, extending"
                    );
                    self.curve = self.curve.base_extend(2)?;
                    self.extension_degree = next;
                    self.samples_this_round = 0;
                    AlignmentState::Sampling
                }
            }
            terminal @ (AlignmentState::Done | AlignmentState::Failed) => terminal,
        };
        Ok(())
    }

    /// Step until a terminal state and return the surviving candidates.
    pub(crate) fn run(
        mut self,
        phi: &dyn Morphism<V>,
        psi: &dyn Morphism<V>,
        sampler: &mut Sampler<'_>,
    ) -> Result<Vec<Hom<V>>, MorphismError> {
        loop {
            match self.state {
                AlignmentState::Done => return Ok(self.candidates),
                AlignmentState::Failed => {
                    tracing::warn!(
                        remaining = self.candidates.len(),
                        extension_degree = self.extension_degree,
                        "extension cap reached while aligning"
                    );
                    return Err(MorphismError::extension_cap_reached(
                        "points separating the candidate isomorphisms",
                        sampler.config().max_extension_degree,
                    ));
                }
                _ => self.step(phi, psi, sampler)?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::SearchConfig;
    use crate::errors::ErrorKind;
    use crate::hom::{compose, equal};
    use crate::mocks::{LatticeCurve, LatticeHom};

    fn setup(
        curve: impl Fn(&'static str, u32) -> LatticeCurve,
    ) -> (Hom<LatticeCurve>, Hom<LatticeCurve>, Hom<LatticeCurve>) {
        let e = curve("E", 0);
        let e1 = curve("E1", 1);
        let e2 = curve("E2", 1);
        let phi = LatticeHom::isogeny(&e, &e1, [[1, 1], [0, 2]]).unwrap();
        let alpha = LatticeHom::isomorphism(&e1, &e2, -1).unwrap();
        let psi = compose(&alpha, &phi).unwrap();
        (phi, alpha, psi)
    }

    #[test]
    fn finite_field_alignment() {
        let mut rng = StdRng::seed_from_u64(20);
        let mut sampler = Sampler::new(&mut rng);
        let (phi, alpha, psi) = setup(|l, c| LatticeCurve::finite(l, c, 7));

        let found = find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap();
        assert!(equal(&found, &alpha, &mut sampler).unwrap());
    }

    #[test]
    fn two_torsion_only_forces_an_extension() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut sampler = Sampler::new(&mut rng);
        // Over F_4 every point is 2-torsion, where ±1 agree.
        let (phi, alpha, psi) = setup(|l, c| LatticeCurve::finite(l, c, 2));

        let e = phi.domain().clone();
        let candidates = phi.codomain().isomorphisms(psi.codomain()).unwrap();
        let mut alignment = Alignment::new(e, candidates);
        // two transitions per sample, then the end of the round
        for _ in 0..2 * sampler.config().narrowing_samples + 1 {
            alignment.step(&*phi, &*psi, &mut sampler).unwrap();
        }
        assert_eq!(alignment.state(), &AlignmentState::Extending);
        assert_eq!(alignment.extension_degree(), 1);
        alignment.step(&*phi, &*psi, &mut sampler).unwrap();
        assert_eq!(alignment.extension_degree(), 2);

        let survivors = alignment.run(&*phi, &*psi, &mut sampler).unwrap();
        assert_eq!(survivors.len(), 1);
        assert!(equal(&survivors[0], &alpha, &mut sampler).unwrap());
    }

    #[test]
    fn extension_cap_bounds_the_search() {
        let mut rng = StdRng::seed_from_u64(22);
        let config = SearchConfig::default()
            .with_narrowing_samples(3)
            .with_max_extension_degree(1);
        let mut sampler = Sampler::with_config(&mut rng, config);
        let (phi, _, psi) = setup(|l, c| LatticeCurve::finite(l, c, 2));

        let err = find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SearchExhausted);
        assert_eq!(
            err.to_string(),
            "couldn't find points separating the candidate isomorphisms \
             within extensions of degree at most 1"
        );
    }

    #[test]
    fn number_field_alignment() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut sampler = Sampler::new(&mut rng);
        let (phi, alpha, psi) = setup(|l, c| LatticeCurve::number(l, c, 1));

        let found = find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap();
        assert!(equal(&found, &alpha, &mut sampler).unwrap());
    }

    #[test]
    fn scaling_factor_fallback() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut sampler = Sampler::new(&mut rng);
        let (phi, alpha, psi) = setup(LatticeCurve::other);

        let found = find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap();
        assert!(equal(&found, &alpha, &mut sampler).unwrap());
    }

    #[test]
    fn non_isomorphic_codomains() {
        let mut rng = StdRng::seed_from_u64(25);
        let mut sampler = Sampler::new(&mut rng);
        let e = LatticeCurve::finite("E", 0, 5);
        let e1 = LatticeCurve::finite("E1", 1, 5);
        let e2 = LatticeCurve::finite("E2", 2, 5);
        let phi = LatticeHom::isogeny(&e, &e1, [[1, 0], [0, 2]]).unwrap();
        let psi = LatticeHom::isogeny(&e, &e2, [[1, 0], [0, 2]]).unwrap();

        let err = find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSolution);
        assert_eq!(err.to_string(), "codomains not isomorphic");
    }

    #[test]
    fn unrelated_isogenies_have_no_alignment() {
        let mut rng = StdRng::seed_from_u64(26);
        let mut sampler = Sampler::new(&mut rng);
        let e = LatticeCurve::finite("E", 0, 5);
        let e1 = LatticeCurve::finite("E1", 1, 5);
        let phi = LatticeHom::isogeny(&e, &e1, [[1, 0], [0, 2]]).unwrap();
        let psi = LatticeHom::isogeny(&e, &e1, [[2, 0], [0, 1]]).unwrap();

        let err = find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap_err();
        assert_eq!(
            err.unsolvable(),
            Some(Unsolvable::NotEqualUpToPostIsomorphism)
        );
    }

    #[test]
    fn domains_must_match() {
        let mut rng = StdRng::seed_from_u64(27);
        let mut sampler = Sampler::new(&mut rng);
        let e = LatticeCurve::finite("E", 0, 5);
        let e1 = LatticeCurve::finite("E1", 1, 5);
        let phi = LatticeHom::isogeny(&e, &e1, [[1, 0], [0, 2]]).unwrap();
        let psi = LatticeHom::isogeny(&e1, &e, [[1, 0], [0, 2]]).unwrap();

        let err = find_post_isomorphism(&*phi, &*psi, &mut sampler).unwrap_err();
        assert_eq!(err.argument_error(), Some(ArgumentError::DomainMismatch));
        assert_eq!(err.to_string(), "domains do not match");
    }
}
