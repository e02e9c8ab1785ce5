// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! The capability contract every morphism representation implements, and
//! the dispatchers that compose and compare morphisms through it.
//!
//! # Dispatch
//!
//! Representations recognize each other through [`Morphism::kind`] and
//! [`Morphism::as_any`].  When asked to compose or compare a pair, each
//! side gets a chance to produce a specialized answer through its hooks
//! ([`Morphism::compose_hook`], [`Morphism::compare_hook`]).  A hook that
//! does not know the other side returns `Ok(None)`, and the dispatcher moves
//! on to the next strategy:
//!
//! * composition falls back to a [`Composite`] of the two factors;
//! * comparison falls back to structural equality of the
//!   [`rational_maps`](Morphism::rational_maps).
//!
//! ```ignore
//! let psi = compose(&dual, &phi)?;           // dual ∘ phi
//! assert!(equal(&psi, &scalar_two, &mut sampler)?);
//! ```

use core::any::Any;
use core::cell::OnceCell;
use core::fmt::Debug;
use core::hash::{Hash, Hasher};

use std::collections::hash_map::DefaultHasher;
use std::rc::Rc;

use crate::composite::Composite;
use crate::errors::{ArgumentError, MorphismError};
use crate::sampler::Sampler;
use crate::traits::{GroupVariety, RationalMaps};

/// A shared, immutable morphism of some representation.
pub type Hom<V> = Rc<dyn Morphism<V>>;

/// Tag naming the family a representation belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MorphismKind {
    /// An isogeny given by explicit kernel data or rational maps.
    Primitive,
    /// An ordered chain of factors.
    Composite,
    /// Multiplication by an integer.
    Scalar,
    /// A power of the Frobenius endomorphism.
    Frobenius,
    /// An isogeny evaluated with square-root Vélu formulas.
    VeluSqrt,
    /// An isomorphism of Weierstrass models.
    Isomorphism,
}

/// The comparison asked of a [`Morphism::compare_hook`].
///
/// Morphisms carry no meaningful order, so only (in)equality exists.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ComparisonOp {
    /// `left == right`
    Eq,
    /// `left != right`
    Ne,
}

/// Lazily computed values scoped to one morphism instance.
///
/// A representation that owns one of these and returns it from
/// [`Morphism::cache`] gets its hash computed at most once.
#[derive(Clone, Debug, Default)]
pub struct MorphismCache {
    hash: OnceCell<u64>,
}

impl MorphismCache {
    /// An empty cache.
    pub fn new() -> Self {
        MorphismCache::default()
    }
}

/// The capability contract of a morphism between two group varieties.
///
/// Only the accessors, [`evaluate`](Morphism::evaluate) and
/// [`as_any`](Morphism::as_any) are required.  The remaining operations
/// fail with [`ErrorKind::NotImplemented`](crate::ErrorKind) until a
/// representation provides them; hooks decline by default.
pub trait Morphism<V: GroupVariety>: Debug {
    /// The family this representation belongs to.
    fn kind(&self) -> MorphismKind;

    /// The source variety.
    fn domain(&self) -> &V;

    /// The target variety.
    fn codomain(&self) -> &V;

    /// The degree; 1 for isomorphisms.
    fn degree(&self) -> Result<u64, MorphismError> {
        Err(MorphismError::not_implemented("degree"))
    }

    /// The explicit pair of rational maps.
    fn rational_maps(&self) -> Result<V::Maps, MorphismError> {
        Err(MorphismError::not_implemented("rational_maps"))
    }

    /// The map on `x`-coordinates, the first of the
    /// [`rational_maps`](Morphism::rational_maps).
    fn x_rational_map(&self) -> Result<<V::Maps as RationalMaps>::XMap, MorphismError> {
        Ok(self.rational_maps()?.x_map())
    }

    /// The monic polynomial whose roots are the `x`-coordinates of the
    /// nonzero points of the kernel.
    fn kernel_polynomial(&self) -> Result<V::Polynomial, MorphismError> {
        Err(MorphismError::not_implemented("kernel_polynomial"))
    }

    /// The constant `u` with `φ*(ω') = u·ω` for the invariant differentials.
    fn scaling_factor(&self) -> Result<V::Element, MorphismError> {
        Err(MorphismError::not_implemented("scaling_factor"))
    }

    /// Whether this morphism is separable.
    fn is_separable(&self) -> Result<bool, MorphismError> {
        Err(MorphismError::not_implemented("is_separable"))
    }

    /// The dual morphism.
    fn dual(&self) -> Result<Hom<V>, MorphismError> {
        Err(MorphismError::not_implemented("dual"))
    }

    /// The image of `point`, which may be defined over an extension of the
    /// base field of the domain.
    fn evaluate(&self, point: &V::Point) -> Result<V::Point, MorphismError>;

    /// Specialized composition `outer ∘ inner`, where `self` is one of the
    /// two operands.  `Ok(None)` declines.
    fn compose_hook(&self, outer: &Hom<V>, inner: &Hom<V>) -> Result<Option<Hom<V>>, MorphismError> {
        let _ = (outer, inner);
        Ok(None)
    }

    /// Specialized comparison of `left` and `right`, where `self` is one of
    /// the two operands.  Called only once domain, codomain and degree are
    /// known to agree.  `Ok(None)` declines.
    fn compare_hook(
        &self,
        left: &Hom<V>,
        right: &Hom<V>,
        op: ComparisonOp,
        sampler: &mut Sampler<'_>,
    ) -> Result<Option<bool>, MorphismError> {
        let _ = (left, right, op, sampler);
        Ok(None)
    }

    /// Upcast for downcasting in hooks.
    fn as_any(&self) -> &dyn Any;

    /// Per-instance memo storage, if the representation keeps one.
    fn cache(&self) -> Option<&MorphismCache> {
        None
    }
}

// ------------------------------------------------------------------------
// Dispatchers
// ------------------------------------------------------------------------

/// Compose two morphisms: `f ∘ g`, applying `g` first.
pub fn compose<V: GroupVariety>(f: &Hom<V>, g: &Hom<V>) -> Result<Hom<V>, MorphismError> {
    if g.codomain() != f.domain() {
        return Err(ArgumentError::IncompatibleComposition.into());
    }

    if let Some(h) = f.compose_hook(f, g)? {
        return Ok(h);
    }
    if let Some(h) = g.compose_hook(f, g)? {
        return Ok(h);
    }

    let composite = Composite::from_factors(vec![g.clone(), f.clone()])?;
    Ok(Rc::new(composite))
}

/// Decide whether `f` and `g` are the same morphism.
///
/// Domain, codomain and degree are compared first; only when they agree do
/// the representations' hooks run, and only when both decline are the
/// rational maps compared.
pub fn equal<V: GroupVariety>(
    f: &Hom<V>,
    g: &Hom<V>,
    sampler: &mut Sampler<'_>,
) -> Result<bool, MorphismError> {
    if f.domain() != g.domain() {
        return Ok(false);
    }
    if f.codomain() != g.codomain() {
        return Ok(false);
    }
    if f.degree()? != g.degree()? {
        return Ok(false);
    }

    if let Some(eq) = f.compare_hook(f, g, ComparisonOp::Eq, sampler)? {
        return Ok(eq);
    }
    if let Some(eq) = g.compare_hook(f, g, ComparisonOp::Eq, sampler)? {
        return Ok(eq);
    }

    Ok(f.rational_maps()? == g.rational_maps()?)
}

/// The negation of [`equal`].
pub fn not_equal<V: GroupVariety>(
    f: &Hom<V>,
    g: &Hom<V>,
    sampler: &mut Sampler<'_>,
) -> Result<bool, MorphismError> {
    equal(f, g, sampler).map(|eq| !eq)
}

// ------------------------------------------------------------------------
// Derived properties
// ------------------------------------------------------------------------

/// Whether `f` maps a variety to itself.
pub fn is_endomorphism<V: GroupVariety>(f: &dyn Morphism<V>) -> bool {
    f.domain() == f.codomain()
}

/// Whether `f` pulls the codomain's invariant differential back to the
/// domain's, i.e. its scaling factor is one.
pub fn is_normalized<V: GroupVariety>(f: &dyn Morphism<V>) -> Result<bool, MorphismError> {
    Ok(f.scaling_factor()? == f.domain().one())
}

/// Whether `f` is surjective.  Every non-constant morphism of curves is.
pub fn is_surjective<V: GroupVariety>(f: &dyn Morphism<V>) -> Result<bool, MorphismError> {
    Ok(f.degree()? != 0)
}

/// Whether `f` has trivial kernel.
///
/// Only decidable from the degree for separable morphisms; inseparable ones
/// report [`ErrorKind::NotImplemented`](crate::ErrorKind).
pub fn is_injective<V: GroupVariety>(f: &dyn Morphism<V>) -> Result<bool, MorphismError> {
    if !f.is_separable()? {
        return Err(MorphismError::not_implemented("is_injective for inseparable morphisms"));
    }
    Ok(f.degree()? == 1)
}

/// Whether `f` is the constant zero map.
pub fn is_zero<V: GroupVariety>(f: &dyn Morphism<V>) -> Result<bool, MorphismError> {
    Ok(f.degree()? == 0)
}

/// `[-1] ∘ f`, using the negation automorphism of the codomain.
pub fn negate<V: GroupVariety>(f: &Hom<V>) -> Result<Hom<V>, MorphismError> {
    let negation = f.codomain().negation()?;
    compose(&negation, f)
}

/// A hash of `f` consistent with [`equal`]: it covers the domain, the
/// codomain and the rational maps.
///
/// Representations exposing a [`MorphismCache`] compute it only once.
pub fn hash_morphism<V: GroupVariety>(f: &dyn Morphism<V>) -> Result<u64, MorphismError> {
    if let Some(hash) = f.cache().and_then(|cache| cache.hash.get()) {
        return Ok(*hash);
    }

    let mut hasher = DefaultHasher::new();
    f.domain().hash(&mut hasher);
    f.codomain().hash(&mut hasher);
    f.rational_maps()?.hash(&mut hasher);
    let hash = hasher.finish();

    if let Some(cache) = f.cache() {
        // A concurrent initialization is impossible; the cell is !Sync.
        let _ = cache.hash.set(hash);
    }
    Ok(hash)
}
