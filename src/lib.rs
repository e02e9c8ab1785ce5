// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

//! # ec-morphism
//!
//! Generic machinery for morphisms between elliptic curves (isogenies,
//! isomorphisms, endomorphisms), independent of how a particular morphism is
//! represented.
//!
//! Concrete representations implement the [`Morphism`] capability contract;
//! the variety arithmetic they rely on comes from a [`GroupVariety`]
//! backend.  On top of that contract this crate provides:
//!
//! * composition with per-representation specializations and a generic
//!   [`Composite`] fallback ([`compose`]);
//! * equality, decided by representation hooks, by evaluation at enough
//!   points ([`compare_by_evaluation`]) or by comparing rational maps
//!   ([`equal`]);
//! * recovery of the isomorphism `α` with `ψ = α ∘ φ`
//!   ([`find_post_isomorphism`]);
//! * the matrix of a morphism on an `n`-torsion subgroup
//!   ([`matrix_on_subgroup`]).
//!
//! Randomized algorithms draw from a [`Sampler`], which wraps any
//! [`rand_core::RngCore`] together with the [`SearchConfig`] budgets.
//!
//! ```ignore
//! use ec_morphism::{compose, equal, Sampler};
//!
//! let mut sampler = Sampler::new(&mut rng);
//! let psi = compose(&phi.dual()?, &phi)?;
//! assert!(equal(&psi, &multiplication_by_degree, &mut sampler)?);
//! ```
//!
//! The `mocks` feature exposes the lattice model used by the test suite, a
//! toy backend in which every algorithm can be exercised.

//------------------------------------------------------------------------
// Internal macros. Must come first!
//------------------------------------------------------------------------

#[macro_use]
pub(crate) mod macros;

//------------------------------------------------------------------------
// ec-morphism public modules
//------------------------------------------------------------------------

// Errors and error kinds
pub mod errors;

// Search budgets
pub mod config;

// Collaborator services consumed from variety arithmetic
pub mod traits;

// The injectable random source
pub mod sampler;

// The capability contract and its dispatchers
pub mod hom;

// The generic composite representation
pub mod composite;

// Equality by evaluation
pub mod evaluation;

// Alignment up to post-isomorphism
pub mod isomorphism;

// 2×2 matrices over Z/n
pub mod matrix;

// Torsion-action matrices
pub mod torsion;

// Lattice model of curves and morphisms
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;


//------------------------------------------------------------------------
// Re-exports
//------------------------------------------------------------------------

pub use crate::composite::Composite;
pub use crate::config::SearchConfig;
pub use crate::errors::{ArgumentError, ErrorKind, MorphismError, Unsolvable};
pub use crate::evaluation::compare_by_evaluation;
pub use crate::hom::{
    compose, equal, hash_morphism, is_endomorphism, is_injective, is_normalized, is_surjective,
    is_zero, negate, not_equal, ComparisonOp, Hom, Morphism, MorphismCache, MorphismKind,
};
pub use crate::isomorphism::find_post_isomorphism;
pub use crate::matrix::TorsionMatrix;
pub use crate::sampler::Sampler;
pub use crate::torsion::{matrix_on_subgroup, TorsionBasis};
pub use crate::traits::{BaseField, GroupVariety, PointOrder, RationalFunction, RationalMaps};
