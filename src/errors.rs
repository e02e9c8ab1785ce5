// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! Errors which may occur while composing, comparing or analysing morphisms.

use core::fmt;
use core::fmt::Display;

/// Internal errors.  Most callers will only need [`MorphismError::kind`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) enum InternalError {
    /// A provided method of the capability contract was not overridden.
    NotImplemented { operation: &'static str },
    InvalidArgument(ArgumentError),
    UnsupportedDomain { operation: &'static str },
    /// A bounded random search ran out of attempts.
    SearchExhausted {
        search: &'static str,
        attempts: usize,
    },
    /// A search over field extensions hit the degree cap.
    ExtensionCapReached { search: &'static str, degree: u32 },
    /// More than one isomorphism survived the alignment filters.
    AmbiguousAlignment { candidates: usize },
    NoSolution(Unsolvable),
    Collaborator { reason: &'static str },
}

impl Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InternalError::NotImplemented { operation } => {
                write!(f, "{} is not implemented by this morphism", operation)
            }
            InternalError::InvalidArgument(ref e) => write!(f, "{}", e),
            InternalError::UnsupportedDomain { operation } => {
                write!(f, "{} is not implemented for this base field", operation)
            }
            InternalError::SearchExhausted { search, attempts } => {
                write!(f, "couldn't find {} after {} attempts", search, attempts)
            }
            InternalError::ExtensionCapReached { search, degree } => write!(
                f,
                "couldn't find {} within extensions of degree at most {}",
                search, degree
            ),
            InternalError::AmbiguousAlignment { candidates } => write!(
                f,
                "ambiguous alignment: {} isomorphisms survived filtering",
                candidates
            ),
            InternalError::NoSolution(ref e) => write!(f, "{}", e),
            InternalError::Collaborator { reason } => write!(f, "{}", reason),
        }
    }
}

/// The broad class of a [`MorphismError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// A capability-contract operation was invoked on a representation
    /// that never provided it.  Always a programming error.
    NotImplemented,
    /// The inputs do not satisfy the preconditions of the operation.
    InvalidArgument,
    /// The base ring is neither a finite field nor a number field.
    UnsupportedDomain,
    /// A bounded search failed where the mathematics guarantees success.
    ///
    /// This is an internal-consistency fault, never a legitimate result.
    SearchExhausted,
    /// No isomorphism with the requested property exists.
    NoSolution,
    /// An external collaborator (variety arithmetic, pairing, discrete
    /// logarithm, ...) reported a failure.
    Collaborator,
}

/// Mismatched or malformed arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ArgumentError {
    /// The codomain of the inner morphism is not the domain of the outer one.
    IncompatibleComposition,
    /// A composite was requested from an empty list of factors.
    EmptyComposite,
    /// The two morphisms handed to the aligner have different domains.
    DomainMismatch,
    /// No codomain basis was given for a morphism that is not an
    /// endomorphism.
    CodomainBasisRequired,
    /// The four torsion generators do not share one finite order.
    MixedGeneratorOrders,
    /// The domain generators pair to an order smaller than their own.
    DependentDomainGenerators,
    /// The codomain generators pair to an order smaller than their own.
    DependentCodomainGenerators,
    /// A matrix was built over the zero ring or multiplied with a matrix over
    /// a different ring.
    ModulusMismatch,
}

impl Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match *self {
            ArgumentError::IncompatibleComposition => {
                "cannot compose morphisms whose domain and codomain do not match"
            }
            ArgumentError::EmptyComposite => "a composite needs at least one factor",
            ArgumentError::DomainMismatch => "domains do not match",
            ArgumentError::CodomainBasisRequired => {
                "basis of codomain subgroup is required for non-endomorphisms"
            }
            ArgumentError::MixedGeneratorOrders => "generator points must all have the same order",
            ArgumentError::DependentDomainGenerators => {
                "generator points on domain are not independent"
            }
            ArgumentError::DependentCodomainGenerators => {
                "generator points on codomain are not independent"
            }
            ArgumentError::ModulusMismatch => "matrices must live over the same nonzero ring Z/n",
        };
        f.write_str(msg)
    }
}

/// Reasons an alignment has no answer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Unsolvable {
    /// There is no isomorphism between the two codomains at all.
    CodomainsNotIsomorphic,
    /// Isomorphisms exist, but none of them aligns the two morphisms.
    NotEqualUpToPostIsomorphism,
}

impl Display for Unsolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Unsolvable::CodomainsNotIsomorphic => f.write_str("codomains not isomorphic"),
            Unsolvable::NotEqualUpToPostIsomorphism => {
                f.write_str("isogenies not equal up to post-isomorphism")
            }
        }
    }
}

/// Errors which may occur while working with elliptic-curve morphisms.
///
/// This error may arise due to:
///
/// * A concrete morphism type that does not provide an operation of the
///   capability contract.
///
/// * Arguments violating a precondition, such as a torsion basis whose
///   points are dependent or of different orders.
///
/// * A base ring for which the point-evaluation algorithms are undefined.
///
/// * A bounded random search that ran out of attempts, or a search over
///   field extensions that reached the degree cap.
///
/// * Two morphisms that are not equal up to any post-isomorphism.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct MorphismError(pub(crate) InternalError);

impl MorphismError {
    /// Error for a contract `operation` that the representation lacks.
    pub fn not_implemented(operation: &'static str) -> Self {
        MorphismError(InternalError::NotImplemented { operation })
    }

    /// Error for arguments violating a precondition.
    pub fn invalid_argument(error: ArgumentError) -> Self {
        MorphismError(InternalError::InvalidArgument(error))
    }

    /// Error for an `operation` undefined over the given base ring.
    pub fn unsupported_domain(operation: &'static str) -> Self {
        MorphismError(InternalError::UnsupportedDomain { operation })
    }

    /// Error reported by an external collaborator.
    pub fn collaborator(reason: &'static str) -> Self {
        MorphismError(InternalError::Collaborator { reason })
    }

    pub(crate) fn search_exhausted(search: &'static str, attempts: usize) -> Self {
        MorphismError(InternalError::SearchExhausted { search, attempts })
    }

    pub(crate) fn extension_cap_reached(search: &'static str, degree: u32) -> Self {
        MorphismError(InternalError::ExtensionCapReached { search, degree })
    }

    pub(crate) fn no_solution(reason: Unsolvable) -> Self {
        MorphismError(InternalError::NoSolution(reason))
    }

    /// The class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.0 {
            InternalError::NotImplemented { .. } => ErrorKind::NotImplemented,
            InternalError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            InternalError::UnsupportedDomain { .. } => ErrorKind::UnsupportedDomain,
            InternalError::SearchExhausted { .. }
            | InternalError::ExtensionCapReached { .. }
            | InternalError::AmbiguousAlignment { .. } => ErrorKind::SearchExhausted,
            InternalError::NoSolution(_) => ErrorKind::NoSolution,
            InternalError::Collaborator { .. } => ErrorKind::Collaborator,
        }
    }

    /// The argument error, if this is an [`ErrorKind::InvalidArgument`].
    pub fn argument_error(&self) -> Option<ArgumentError> {
        match self.0 {
            InternalError::InvalidArgument(e) => Some(e),
            _ => None,
        }
    }

    /// The reason, if this is an [`ErrorKind::NoSolution`].
    pub fn unsolvable(&self) -> Option<Unsolvable> {
        match self.0 {
            InternalError::NoSolution(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for MorphismError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for MorphismError {}

impl From<ArgumentError> for MorphismError {
    fn from(error: ArgumentError) -> Self {
        MorphismError::invalid_argument(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failed_precondition() {
        let e = MorphismError::invalid_argument(ArgumentError::DependentDomainGenerators);
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(e.to_string(), "generator points on domain are not independent");

        let e = MorphismError::no_solution(Unsolvable::CodomainsNotIsomorphic);
        assert_eq!(e.kind(), ErrorKind::NoSolution);
        assert_eq!(e.unsolvable(), Some(Unsolvable::CodomainsNotIsomorphic));
        assert_eq!(e.to_string(), "codomains not isomorphic");
    }

    #[test]
    fn ambiguity_is_an_internal_fault() {
        let e = MorphismError(InternalError::AmbiguousAlignment { candidates: 2 });
        assert_eq!(e.kind(), ErrorKind::SearchExhausted);
        assert_eq!(e.argument_error(), None);
    }

    #[test]
    fn exhausted_search_reports_attempts() {
        let e = MorphismError::search_exhausted("a point of infinite order", 100);
        assert_eq!(
            e.to_string(),
            "couldn't find a point of infinite order after 100 attempts"
        );
    }

    #[test]
    fn extension_cap_names_the_degree() {
        let e = MorphismError::extension_cap_reached("enough points", 64);
        assert_eq!(e.kind(), ErrorKind::SearchExhausted);
        assert_eq!(
            e.to_string(),
            "couldn't find enough points within extensions of degree at most 64"
        );
    }
}
