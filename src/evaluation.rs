// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! Deciding equality of two morphisms by evaluating them at points.
//!
//! Two distinct morphisms of degree `d` between the same curves agree on at
//! most `4d` points, so agreement on a generating set of a point group with
//! more than `4d` elements proves equality.  Over a finite field the base
//! field is extended until its point group is large enough; by the Hasse
//! bound an extension of degree `O(log d)` always suffices.  Over a number
//! field a single point of infinite order settles the question.

use crate::errors::MorphismError;
use crate::hom::Morphism;
use crate::sampler::{find_infinite_order_point, Sampler};
use crate::traits::{BaseField, GroupVariety};

/// Decide whether `left` and `right` are equal by evaluating them at points
/// of their common domain.
///
/// Morphisms with different domains, codomains or degrees are reported
/// unequal without evaluating anything.
///
/// # Errors
///
/// * [`ErrorKind::UnsupportedDomain`](crate::ErrorKind) when the base field
///   is neither finite nor a number field.
/// * [`ErrorKind::SearchExhausted`](crate::ErrorKind) when no large enough
///   extension or no point of infinite order was found within the budgets of
///   the [`Sampler`].
pub fn compare_by_evaluation<V: GroupVariety>(
    left: &dyn Morphism<V>,
    right: &dyn Morphism<V>,
    sampler: &mut Sampler<'_>,
) -> Result<bool, MorphismError> {
    if left.domain() != right.domain() {
        return Ok(false);
    }
    if left.codomain() != right.codomain() {
        return Ok(false);
    }
    let degree = left.degree()?;
    if degree != right.degree()? {
        return Ok(false);
    }

    let curve = left.domain();
    match curve.base_field() {
        BaseField::Finite { cardinality } => {
            let bound = 4u128 * u128::from(degree);
            let extension = sufficient_extension(curve, cardinality, degree, bound, sampler)?;
            tracing::debug!(degree, extension, "comparing by evaluation at generators");

            let extended = curve.base_extend(extension)?;
            for point in extended.generators()? {
                if left.evaluate(&point)? != right.evaluate(&point)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        BaseField::Number { .. } => {
            let point = find_infinite_order_point(curve, sampler)?;
            Ok(left.evaluate(&point)? == right.evaluate(&point)?)
        }
        BaseField::Other => Err(MorphismError::unsupported_domain("compare_by_evaluation")),
    }
}

/// The smallest extension degree over which `curve` has more than `bound`
/// points.
///
/// The Hasse estimate only bounds how many point counts are requested; the
/// answer always comes from actual counts.  Should the estimate fall short,
/// the window doubles up to the configured cap.
fn sufficient_extension<V: GroupVariety>(
    curve: &V,
    cardinality: u128,
    degree: u64,
    bound: u128,
    sampler: &Sampler<'_>,
) -> Result<u32, MorphismError> {
    let cap = sampler.config().max_extension_degree.max(1);
    let mut window = (hasse_extension_estimate(cardinality, degree) + 1).min(cap);
    loop {
        let counts = curve.count_points(window)?;
        if let Some(extension) = first_exceeding(&counts, bound) {
            return Ok(extension);
        }
        if window >= cap {
            tracing::warn!(window, %bound, "no extension with enough points");
            return Err(MorphismError::extension_cap_reached("enough points", cap));
        }
        window = window.saturating_mul(2).min(cap);
    }
}

/// `floor(1 + 2·log_q(2·√d + 1))`: from the Hasse bound, the extension
/// degree after which `#E(F_{q^e})` must exceed `4d`.
pub(crate) fn hasse_extension_estimate(cardinality: u128, degree: u64) -> u32 {
    let q = cardinality as f64;
    if q <= 1.0 {
        return 1;
    }
    let d = degree as f64;
    let estimate = 1.0 + 2.0 * (2.0 * d.sqrt() + 1.0).ln() / q.ln();
    // the estimate is at least 1, and tiny for any realistic degree
    estimate.floor() as u32
}

/// The 1-based position of the first count above `bound`.
pub(crate) fn first_exceeding(counts: &[u128], bound: u128) -> Option<u32> {
    counts
        .iter()
        .position(|&n| n > bound)
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::SearchConfig;
    use crate::errors::ErrorKind;
    use crate::hom::{compose, Hom};
    use crate::mocks::{LatticeCurve, LatticeHom};

    #[test]
    fn hasse_estimate() {
        // 2·√4 + 1 = 5 and log_9(5) ≈ 0.73
        assert_eq!(hasse_extension_estimate(9, 4), 2);
        assert_eq!(hasse_extension_estimate(1 << 64, 4), 1);
        assert_eq!(hasse_extension_estimate(4, 1), 2);
    }

    #[test]
    fn first_count_above_bound() {
        assert_eq!(first_exceeding(&[9, 81, 729], 16), Some(2));
        assert_eq!(first_exceeding(&[9, 81, 729], 8), Some(1));
        assert_eq!(first_exceeding(&[9, 81], 100), None);
    }

    fn two_isogeny_and_dual() -> (LatticeCurve, Hom<LatticeCurve>, Hom<LatticeCurve>) {
        let e = LatticeCurve::finite("E", 0, 3);
        let e1 = LatticeCurve::finite("E1", 1, 3);
        let phi = LatticeHom::isogeny(&e, &e1, [[1, 0], [0, 2]]).unwrap();
        let dual = phi.dual().unwrap();
        (e, phi, dual)
    }

    #[test]
    fn dual_composed_with_isogeny_is_multiplication_by_degree() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sampler = Sampler::new(&mut rng);
        let (e, phi, dual) = two_isogeny_and_dual();

        let psi = compose(&dual, &phi).unwrap();
        let two = LatticeHom::scalar(&e, 2);
        assert!(compare_by_evaluation(&*psi, &*two, &mut sampler).unwrap());
        assert!(compare_by_evaluation(&*two, &*psi, &mut sampler).unwrap());
    }

    #[test]
    fn distinct_maps_of_equal_degree_are_told_apart() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut sampler = Sampler::new(&mut rng);
        let (e, phi, dual) = two_isogeny_and_dual();

        let psi = compose(&dual, &phi).unwrap();
        let other = LatticeHom::isogeny(&e, &e, [[4, 0], [0, 1]]).unwrap();
        assert!(!compare_by_evaluation(&*psi, &*other, &mut sampler).unwrap());
    }

    #[test]
    fn mismatched_invariants_short_circuit() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut sampler = Sampler::new(&mut rng);
        let (e, phi, _) = two_isogeny_and_dual();
        let three = LatticeHom::scalar(&e, 3);
        let one = LatticeHom::scalar(&e, 1);

        assert!(!compare_by_evaluation(&*phi, &*three, &mut sampler).unwrap());
        assert!(!compare_by_evaluation(&*one, &*three, &mut sampler).unwrap());
    }

    #[test]
    fn number_field_uses_a_point_of_infinite_order() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut sampler = Sampler::new(&mut rng);
        let e = LatticeCurve::number("E", 0, 1);
        let e1 = LatticeCurve::number("E1", 1, 1);
        let phi = LatticeHom::isogeny(&e, &e1, [[2, 1], [1, 2]]).unwrap();
        let psi = compose(&phi.dual().unwrap(), &phi).unwrap();
        let three = LatticeHom::scalar(&e, 3);
        let other = LatticeHom::isogeny(&e, &e, [[1, 0], [0, 9]]).unwrap();

        assert!(compare_by_evaluation(&*psi, &*three, &mut sampler).unwrap());
        assert!(!compare_by_evaluation(&*psi, &*other, &mut sampler).unwrap());
    }

    #[test]
    fn rank_zero_number_field_exhausts_the_search() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = SearchConfig::default().with_infinite_order_attempts(5);
        let mut sampler = Sampler::with_config(&mut rng, config);
        let e = LatticeCurve::number("E", 0, 0);
        let two = LatticeHom::scalar(&e, 2);
        let iso = LatticeHom::isogeny(&e, &e, [[2, 0], [0, 2]]).unwrap();

        let err = compare_by_evaluation(&*two, &*iso, &mut sampler).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SearchExhausted);
        assert_eq!(
            err.to_string(),
            "couldn't find a point of infinite order after 5 attempts"
        );
    }

    #[test]
    fn other_base_rings_are_unsupported() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut sampler = Sampler::new(&mut rng);
        let e = LatticeCurve::other("E", 0);
        let two = LatticeHom::scalar(&e, 2);

        let err = compare_by_evaluation(&*two, &*two, &mut sampler).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedDomain);
    }

    #[test]
    fn small_extension_cap_is_a_fault() {
        let mut rng = StdRng::seed_from_u64(13);
        let config = SearchConfig::default().with_max_extension_degree(1);
        let mut sampler = Sampler::with_config(&mut rng, config);
        // F_4 has 4 points; degree 4 needs more than 16
        let e = LatticeCurve::finite("E", 0, 2);
        let two = LatticeHom::scalar(&e, 2);
        let other = LatticeHom::isogeny(&e, &e, [[2, 0], [0, 2]]).unwrap();

        let err = compare_by_evaluation(&*two, &*other, &mut sampler).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SearchExhausted);
        assert_eq!(
            err.to_string(),
            "couldn't find enough points within extensions of degree at most 1"
        );
    }
}
