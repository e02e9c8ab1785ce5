// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! The action of a morphism on an `n`-torsion subgroup, as a matrix.

use crate::errors::{ArgumentError, MorphismError};
use crate::hom::{is_endomorphism, Morphism};
use crate::matrix::TorsionMatrix;
use crate::traits::{GroupVariety, PointOrder};

/// An ordered pair `(P, Q)` of points meant to generate `E[n]`.
///
/// Nothing is checked on construction; [`matrix_on_subgroup`] verifies that
/// both points have order `n` and that they are independent.
#[derive(Clone, Debug, PartialEq)]
pub struct TorsionBasis<P> {
    first: P,
    second: P,
}

impl<P> TorsionBasis<P> {
    /// The basis `(first, second)`.
    pub fn new(first: P, second: P) -> Self {
        TorsionBasis { first, second }
    }

    /// The first generator, `P`.
    pub fn first(&self) -> &P {
        &self.first
    }

    /// The second generator, `Q`.
    pub fn second(&self) -> &P {
        &self.second
    }
}

/// The matrix of `f` restricted to the subgroup generated by
/// `domain_basis = (P, Q)`, with respect to `codomain_basis = (R, S)`.
///
/// The rows are the coordinates of `f(P)` and `f(Q)`, so that
///
/// ```text
/// (c, d) = (a, b)·M   ⇒   f(aP + bQ) = cR + dS.
/// ```
///
/// An endomorphism may omit `codomain_basis`, in which case `(P, Q)` is used
/// on both sides.
///
/// # Errors
///
/// [`ErrorKind::InvalidArgument`](crate::ErrorKind) when the codomain basis
/// is missing for a non-endomorphism, when the four points do not share one
/// finite order, or when either pair is dependent.
pub fn matrix_on_subgroup<V: GroupVariety>(
    f: &dyn Morphism<V>,
    domain_basis: &TorsionBasis<V::Point>,
    codomain_basis: Option<&TorsionBasis<V::Point>>,
) -> Result<TorsionMatrix, MorphismError> {
    let codomain_basis = match codomain_basis {
        Some(basis) => basis,
        None if is_endomorphism(f) => domain_basis,
        None => return Err(ArgumentError::CodomainBasisRequired.into()),
    };
    let (domain, codomain) = (f.domain(), f.codomain());
    let (p, q) = (domain_basis.first(), domain_basis.second());
    let (r, s) = (codomain_basis.first(), codomain_basis.second());

    let n = match domain.order(p)? {
        PointOrder::Finite(n) => n,
        PointOrder::Infinite => return Err(ArgumentError::MixedGeneratorOrders.into()),
    };
    let orders = [domain.order(q)?, codomain.order(r)?, codomain.order(s)?];
    if orders.iter().any(|order| *order != PointOrder::Finite(n)) {
        return Err(ArgumentError::MixedGeneratorOrders.into());
    }

    if domain.pairing_order(p, q, n)? != n {
        return Err(ArgumentError::DependentDomainGenerators.into());
    }
    if codomain.pairing_order(r, s, n)? != n {
        return Err(ArgumentError::DependentCodomainGenerators.into());
    }

    let basis = [r.clone(), s.clone()];
    let mut rows = [[0u64; 2]; 2];
    for (row, point) in rows.iter_mut().zip([p, q]) {
        let image = f.evaluate(point)?;
        match codomain.discrete_log(&image, &basis, &[n, n])?[..] {
            [c, d] => *row = [c, d],
            _ => return Err(MorphismError::collaborator("discrete_log must return two coordinates")),
        }
    }
    tracing::debug!(n, ?rows, "torsion action computed");

    TorsionMatrix::from_rows(n, rows)
}
