// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! Module for the services this crate consumes from variety arithmetic.
//!
//! Nothing in here is implemented by `ec-morphism` itself: a backend that
//! knows how to add points, count them, pair them and solve discrete
//! logarithms implements [`GroupVariety`] once, and every algorithm in the
//! crate becomes available for its morphisms.

use core::fmt::Debug;
use core::hash::Hash;
use core::ops::{Div, Mul};

use rand_core::RngCore;

use crate::errors::MorphismError;
use crate::hom::Hom;

// ------------------------------------------------------------------------
// Descriptors
// ------------------------------------------------------------------------

/// What the algorithms need to know about a base ring.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BaseField {
    /// A finite field with `cardinality` elements.
    Finite {
        /// The number of elements, `q`.
        cardinality: u128,
    },
    /// A number field of the given absolute degree.
    Number {
        /// Degree over the rationals.
        degree: u32,
    },
    /// Any other base ring (p-adic fields, function fields, ...).
    Other,
}

/// The order of a point in its group.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointOrder {
    /// The point is torsion of exactly this order.
    Finite(u64),
    /// The point generates an infinite cyclic subgroup.
    Infinite,
}

// ------------------------------------------------------------------------
// Public Traits
// ------------------------------------------------------------------------

/// A univariate rational function of `x`, such as the map a morphism
/// induces on `x`-coordinates.
pub trait RationalFunction: Clone + PartialEq + Hash + Debug {
    /// The function `x ↦ self(inner(x))`.
    fn after(&self, inner: &Self) -> Self;
}

/// An explicit representation of a morphism as a pair of rational maps.
///
/// Equality is structural: two values are equal exactly when their
/// rational-function expressions coincide.
pub trait RationalMaps: Clone + PartialEq + Hash + Debug {
    /// The type of the `x`-coordinate component.
    type XMap: RationalFunction;

    /// The maps of `self ∘ inner`, i.e. `inner` substituted into `self`.
    fn after(&self, inner: &Self) -> Self;

    /// The first component, which depends on `x` alone.
    fn x_map(&self) -> Self::XMap;
}

/// An algebraic group variety together with the arithmetic services the
/// morphism algorithms call into.
///
/// Points handed to the point services may be defined over any extension of
/// the base field of `self`; a point returned by [`GroupVariety::lift_x`]
/// or sampled from a variety produced by [`GroupVariety::base_extend`] is
/// valid input for the original variety's services.
pub trait GroupVariety: Clone + Eq + Hash + Debug + 'static {
    /// A point on this variety or one of its base extensions.
    type Point: Clone + PartialEq + Debug;

    /// An element of the base ring.
    type Element: Clone + PartialEq + Debug + Mul<Output = Self::Element> + Div<Output = Self::Element>;

    /// The explicit rational-map representation of morphisms.
    type Maps: RationalMaps;

    /// A univariate polynomial over the base ring, used for kernel
    /// polynomials.
    type Polynomial: Clone + PartialEq + Hash + Debug;

    /// Describe the base ring.
    fn base_field(&self) -> BaseField;

    /// The multiplicative identity of the base ring.
    fn one(&self) -> Self::Element;

    /// This variety over the extension of its base field of the given
    /// `degree`.
    ///
    /// Extensions are named deterministically, so extending twice by the
    /// same degree yields equal varieties.
    fn base_extend(&self, degree: u32) -> Result<Self, MorphismError>;

    /// The number of points over the extensions of degree
    /// `1, 2, ..., max_degree`, in that order.
    fn count_points(&self, max_degree: u32) -> Result<Vec<u128>, MorphismError>;

    /// A generating set of the group of rational points.
    fn generators(&self) -> Result<Vec<Self::Point>, MorphismError>;

    /// A uniformly random rational point.
    fn random_point(&self, rng: &mut dyn RngCore) -> Result<Self::Point, MorphismError>;

    /// A random element of the base ring.
    fn random_element(&self, rng: &mut dyn RngCore) -> Result<Self::Element, MorphismError>;

    /// A point with `x` as its first coordinate, extending the base field
    /// when `x` is not the abscissa of a rational point.
    fn lift_x(&self, x: &Self::Element) -> Result<Self::Point, MorphismError>;

    /// The order of `point`.
    fn order(&self, point: &Self::Point) -> Result<PointOrder, MorphismError>;

    /// The multiplicative order of the `n`-th pairing of `p` and `q`.
    ///
    /// Two points of order `n` generate the full `n`-torsion exactly when
    /// this is `n`.
    fn pairing_order(&self, p: &Self::Point, q: &Self::Point, n: u64) -> Result<u64, MorphismError>;

    /// Coordinates of `point` in the group generated by `basis`, whose
    /// invariant factors are `invariants`.
    fn discrete_log(
        &self,
        point: &Self::Point,
        basis: &[Self::Point],
        invariants: &[u64],
    ) -> Result<Vec<u64>, MorphismError>;

    /// Every isomorphism from `self` to `other` (empty when there is none).
    fn isomorphisms(&self, other: &Self) -> Result<Vec<Hom<Self>>, MorphismError>;

    /// The kernel polynomial of a separable morphism out of `self` whose
    /// `x`-coordinate map is `x_map`: the squarefree monic polynomial
    /// vanishing at the abscissas of the kernel points.
    fn kernel_polynomial_of(
        &self,
        x_map: &<Self::Maps as RationalMaps>::XMap,
    ) -> Result<Self::Polynomial, MorphismError> {
        let _ = x_map;
        Err(MorphismError::not_implemented("kernel_polynomial_of"))
    }

    /// The negation automorphism `[-1]` of this variety.
    fn negation(&self) -> Result<Hom<Self>, MorphismError> {
        Err(MorphismError::not_implemented("negation"))
    }
}
