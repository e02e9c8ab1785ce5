// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! Morphisms represented as an ordered chain of factors.
//!
//! This is the representation of last resort for compositions: it only
//! needs the capability contract of its factors, so it can chain any mix of
//! representations.  Over finite and number fields, equality of composites
//! is decided by evaluation (see [`compare_by_evaluation`]), since chaining
//! rational maps is usually far more expensive than evaluating at a handful
//! of points.  Over other base rings the rational maps decide.

use core::any::Any;

use std::rc::Rc;

use crate::errors::{ArgumentError, MorphismError};
use crate::evaluation::compare_by_evaluation;
use crate::hom::{ComparisonOp, Hom, Morphism, MorphismCache, MorphismKind};
use crate::sampler::Sampler;
use crate::traits::{BaseField, GroupVariety, RationalFunction, RationalMaps};

/// The composite `φ_n ∘ ... ∘ φ_2 ∘ φ_1` of its factors.
#[derive(Clone, Debug)]
pub struct Composite<V: GroupVariety> {
    /// In order of application: `factors[0]` is applied first.
    factors: Vec<Hom<V>>,
    cache: MorphismCache,
}

impl<V: GroupVariety> Composite<V> {
    /// Chain `factors`, the first one being applied first.
    ///
    /// Each factor's codomain must be the next factor's domain.
    pub fn from_factors(factors: Vec<Hom<V>>) -> Result<Self, MorphismError> {
        if factors.is_empty() {
            return Err(ArgumentError::EmptyComposite.into());
        }
        for pair in factors.windows(2) {
            if pair[0].codomain() != pair[1].domain() {
                return Err(ArgumentError::IncompatibleComposition.into());
            }
        }
        Ok(Composite {
            factors,
            cache: MorphismCache::new(),
        })
    }

    /// The factors, in order of application.
    pub fn factors(&self) -> &[Hom<V>] {
        &self.factors
    }

    /// The factors of `h` as seen from a composite: its own factors when it
    /// is a composite, itself otherwise.
    fn factors_of(h: &Hom<V>) -> Vec<Hom<V>> {
        match h.as_any().downcast_ref::<Composite<V>>() {
            Some(composite) => composite.factors.clone(),
            None => vec![h.clone()],
        }
    }

    fn first(&self) -> &Hom<V> {
        &self.factors[0]
    }

    fn last(&self) -> &Hom<V> {
        &self.factors[self.factors.len() - 1]
    }
}

impl<V: GroupVariety> Morphism<V> for Composite<V> {
    fn kind(&self) -> MorphismKind {
        MorphismKind::Composite
    }

    fn domain(&self) -> &V {
        self.first().domain()
    }

    fn codomain(&self) -> &V {
        self.last().codomain()
    }

    fn degree(&self) -> Result<u64, MorphismError> {
        self.factors.iter().try_fold(1u64, |acc, phi| {
            acc.checked_mul(phi.degree()?)
                .ok_or(MorphismError::collaborator("composite degree overflows u64"))
        })
    }

    fn rational_maps(&self) -> Result<V::Maps, MorphismError> {
        let mut maps = self.first().rational_maps()?;
        for phi in &self.factors[1..] {
            maps = phi.rational_maps()?.after(&maps);
        }
        Ok(maps)
    }

    fn x_rational_map(&self) -> Result<<V::Maps as RationalMaps>::XMap, MorphismError> {
        let mut x = self.first().x_rational_map()?;
        for phi in &self.factors[1..] {
            x = phi.x_rational_map()?.after(&x);
        }
        Ok(x)
    }

    /// A single factor answers for itself; longer chains read the kernel off
    /// the chained `x`-map.
    fn kernel_polynomial(&self) -> Result<V::Polynomial, MorphismError> {
        if let [phi] = self.factors.as_slice() {
            return phi.kernel_polynomial();
        }
        self.domain().kernel_polynomial_of(&self.x_rational_map()?)
    }

    fn scaling_factor(&self) -> Result<V::Element, MorphismError> {
        let mut u = self.first().scaling_factor()?;
        for phi in &self.factors[1..] {
            u = phi.scaling_factor()? * u;
        }
        Ok(u)
    }

    fn is_separable(&self) -> Result<bool, MorphismError> {
        for phi in &self.factors {
            if !phi.is_separable()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn dual(&self) -> Result<Hom<V>, MorphismError> {
        let duals = self
            .factors
            .iter()
            .rev()
            .map(|phi| phi.dual())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Rc::new(Composite::from_factors(duals)?))
    }

    fn evaluate(&self, point: &V::Point) -> Result<V::Point, MorphismError> {
        let mut image = point.clone();
        for phi in &self.factors {
            image = phi.evaluate(&image)?;
        }
        Ok(image)
    }

    /// Flatten nested composites into one chain.
    fn compose_hook(&self, outer: &Hom<V>, inner: &Hom<V>) -> Result<Option<Hom<V>>, MorphismError> {
        if outer.kind() != MorphismKind::Composite && inner.kind() != MorphismKind::Composite {
            return Ok(None);
        }
        let mut factors = Self::factors_of(inner);
        factors.extend(Self::factors_of(outer));
        Ok(Some(Rc::new(Composite::from_factors(factors)?)))
    }

    fn compare_hook(
        &self,
        left: &Hom<V>,
        right: &Hom<V>,
        op: ComparisonOp,
        sampler: &mut Sampler<'_>,
    ) -> Result<Option<bool>, MorphismError> {
        if left.kind() != MorphismKind::Composite && right.kind() != MorphismKind::Composite {
            return Ok(None);
        }
        // Evaluation cannot decide over other rings; the rational maps will.
        if left.domain().base_field() == BaseField::Other {
            return Ok(None);
        }
        let eq = compare_by_evaluation(&**left, &**right, sampler)?;
        Ok(Some(match op {
            ComparisonOp::Eq => eq,
            ComparisonOp::Ne => !eq,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn cache(&self) -> Option<&MorphismCache> {
        Some(&self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::ErrorKind;
    use crate::hom::{compose, negate};
    use crate::mocks::{
        Fraction, LatticeCurve, LatticeHom, LatticeKernel, LatticeMaps, LatticePoint, LatticeXMap,
    };

    fn chain() -> (LatticeCurve, LatticeCurve, Hom<LatticeCurve>, Hom<LatticeCurve>) {
        let e = LatticeCurve::finite("E", 0, 5);
        let e1 = LatticeCurve::finite("E1", 1, 5);
        let phi = LatticeHom::isogeny(&e, &e1, [[1, 1], [0, 2]]).unwrap();
        let psi = LatticeHom::isogeny(&e1, &e, [[3, 0], [1, 1]]).unwrap();
        (e, e1, phi, psi)
    }

    #[test]
    fn factors_must_chain() {
        let (_, _, phi, _) = chain();
        let err = Composite::from_factors(vec![phi.clone(), phi]).unwrap_err();
        assert_eq!(
            err.argument_error(),
            Some(ArgumentError::IncompatibleComposition)
        );
        let err = Composite::<LatticeCurve>::from_factors(vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn invariants_are_products() {
        let (e, _, phi, psi) = chain();
        let c = Composite::from_factors(vec![phi.clone(), psi.clone()]).unwrap();

        assert_eq!(c.domain(), &e);
        assert_eq!(c.codomain(), &e);
        assert_eq!(c.degree().unwrap(), 6);
        assert!(c.is_separable().unwrap());
        assert_eq!(c.scaling_factor().unwrap(), Fraction::from(1));
        // row convention: phi's matrix first
        assert_eq!(
            c.rational_maps().unwrap(),
            LatticeMaps::new([[4, 1], [2, 2]])
        );
    }

    #[test]
    fn x_map_and_kernel_chain_through_factors() {
        let (_, _, phi, psi) = chain();
        let c: Hom<LatticeCurve> = Rc::new(Composite::from_factors(vec![phi.clone(), psi]).unwrap());

        assert_eq!(c.x_rational_map().unwrap(), LatticeXMap::new([[4, 1], [2, 2]]));
        let kernel = c.kernel_polynomial().unwrap();
        assert_eq!(kernel, LatticeKernel::of(&[[4, 1], [2, 2]]));
        assert_eq!(kernel.order(), c.degree().unwrap());

        // [-1] moves no abscissa
        let minus = negate(&c).unwrap();
        assert_eq!(minus.kind(), MorphismKind::Composite);
        assert_eq!(minus.x_rational_map().unwrap(), c.x_rational_map().unwrap());
        assert_eq!(minus.kernel_polynomial().unwrap(), kernel);

        let single = Composite::from_factors(vec![phi.clone()]).unwrap();
        assert_eq!(single.kernel_polynomial().unwrap(), phi.kernel_polynomial().unwrap());
    }

    #[test]
    fn evaluation_chains_through_factors() {
        let (_, _, phi, psi) = chain();
        let c = Composite::from_factors(vec![phi.clone(), psi.clone()]).unwrap();
        let p = LatticePoint::torsion(1, 3, 5);
        let expected = psi.evaluate(&phi.evaluate(&p).unwrap()).unwrap();
        assert_eq!(c.evaluate(&p).unwrap(), expected);
    }

    #[test]
    fn nested_composites_flatten() {
        let (_, _, phi, psi) = chain();
        let a = compose(&psi, &phi).unwrap();
        let b = compose(&phi, &a).unwrap();
        let c = compose(&a, &a).unwrap();
        let d = compose(&c, &a).unwrap();

        let b = b.as_any().downcast_ref::<Composite<LatticeCurve>>().unwrap();
        assert_eq!(b.factors().len(), 3);
        let d = d.as_any().downcast_ref::<Composite<LatticeCurve>>().unwrap();
        assert_eq!(d.factors().len(), 6);
        assert_eq!(d.degree().unwrap(), 6 * 6 * 6);
    }

    #[test]
    fn dual_reverses_the_chain() {
        let (e, _, phi, psi) = chain();
        let c = Composite::from_factors(vec![phi, psi]).unwrap();
        let dual = c.dual().unwrap();
        assert_eq!(dual.domain(), &e);
        assert_eq!(dual.degree().unwrap(), 6);

        // dual ∘ c is multiplication by the degree
        let p = LatticePoint::torsion(2, 1, 5);
        let image = dual.evaluate(&c.evaluate(&p).unwrap()).unwrap();
        assert_eq!(image, p.times(6));
    }
}
