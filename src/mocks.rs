// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! A lattice model of curves and morphisms, for tests and benchmarks.
//!
//! A [`LatticeCurve`] stands in for an elliptic curve whose point group is
//! modelled by a lattice:
//!
//! * over a finite field with `q = m²` elements the rational points are
//!   `(Z/m)²`, written `(a, b)/m`, and extending the field by degree `k`
//!   replaces `m` with `m^k`;
//! * over a number field of rank `r > 0` the points are `Z²` (free
//!   points) plus the 2-torsion;
//! * other base rings get free points only.
//!
//! A [`LatticeHom`] acts on row vectors through an integer 2×2 matrix, so
//! degrees are determinants, duals are adjugates and composition is matrix
//! multiplication.  Curves with the same `class` are isomorphic, through
//! `±1`.
//!
//! None of this is real curve arithmetic; it is just rich enough that the
//! morphism algorithms hit every branch.

use core::any::Any;
use core::ops::{Add, Div, Mul};

use std::rc::Rc;

use rand_core::RngCore;

use crate::errors::MorphismError;
use crate::hom::{ComparisonOp, Hom, Morphism, MorphismKind};
use crate::matrix::{gcd, inverse_mod};
use crate::sampler::Sampler;
use crate::traits::{BaseField, GroupVariety, PointOrder, RationalFunction, RationalMaps};

// ------------------------------------------------------------------------
// Base ring elements
// ------------------------------------------------------------------------

/// A reduced rational number with positive denominator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Fraction {
    num: i64,
    den: i64,
}

impl Fraction {
    /// `num / den`.
    ///
    /// # Panics
    ///
    /// If `den` is zero.
    pub fn new(num: i64, den: i64) -> Fraction {
        assert!(den != 0, "zero denominator");
        let g = gcd(u128::from(num.unsigned_abs()), u128::from(den.unsigned_abs())) as i64;
        let sign = den.signum();
        Fraction {
            num: sign * num / g,
            den: sign * den / g,
        }
    }

    /// The numerator, carrying the sign.
    pub fn numerator(&self) -> i64 {
        self.num
    }

    /// The denominator, always positive.
    pub fn denominator(&self) -> i64 {
        self.den
    }
}

impl From<i64> for Fraction {
    fn from(n: i64) -> Fraction {
        Fraction { num: n, den: 1 }
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        Fraction::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl Div for Fraction {
    type Output = Fraction;

    fn div(self, rhs: Fraction) -> Fraction {
        Fraction::new(self.num * rhs.den, self.den * rhs.num)
    }
}

// ------------------------------------------------------------------------
// Points
// ------------------------------------------------------------------------

/// A point: a free part in `Z²` plus a torsion part `(a, b)/den`.
///
/// The torsion part is kept reduced, so `den` is its order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LatticePoint {
    free: [i64; 2],
    torsion: [u64; 2],
    den: u64,
}

impl LatticePoint {
    /// The neutral element.
    pub fn identity() -> LatticePoint {
        LatticePoint {
            free: [0, 0],
            torsion: [0, 0],
            den: 1,
        }
    }

    /// The torsion point `(a, b)/den`.
    ///
    /// # Panics
    ///
    /// If `den` is zero.
    pub fn torsion(a: u64, b: u64, den: u64) -> LatticePoint {
        assert!(den != 0, "zero denominator");
        LatticePoint::reduced([0, 0], [i128::from(a), i128::from(b)], den)
    }

    /// The point `(x, y)` of the free part.
    pub fn free(x: i64, y: i64) -> LatticePoint {
        LatticePoint {
            free: [x, y],
            torsion: [0, 0],
            den: 1,
        }
    }

    fn reduced(free: [i64; 2], numerators: [i128; 2], den: u64) -> LatticePoint {
        let d = i128::from(den);
        let a = numerators[0].rem_euclid(d) as u128;
        let b = numerators[1].rem_euclid(d) as u128;
        let g = gcd(gcd(a, b), u128::from(den));
        LatticePoint {
            free,
            torsion: [(a / g) as u64, (b / g) as u64],
            den: (u128::from(den) / g) as u64,
        }
    }

    /// `[k]P`.
    pub fn times(&self, k: i64) -> LatticePoint {
        let k128 = i128::from(k);
        LatticePoint::reduced(
            [self.free[0] * k, self.free[1] * k],
            [i128::from(self.torsion[0]) * k128, i128::from(self.torsion[1]) * k128],
            self.den,
        )
    }

    /// The row vector `self·m`.
    pub fn act(&self, m: &[[i64; 2]; 2]) -> LatticePoint {
        let [x, y] = self.free;
        let (a, b) = (i128::from(self.torsion[0]), i128::from(self.torsion[1]));
        let w = m.map(|row| row.map(i128::from));
        LatticePoint::reduced(
            [x * m[0][0] + y * m[1][0], x * m[0][1] + y * m[1][1]],
            [a * w[0][0] + b * w[1][0], a * w[0][1] + b * w[1][1]],
            self.den,
        )
    }

    fn is_torsion(&self) -> bool {
        self.free == [0, 0]
    }

    /// Torsion numerators rescaled to denominator `n`.
    fn numerators_over(&self, n: u64) -> Result<[u128; 2], MorphismError> {
        if !self.is_torsion() || n % self.den != 0 {
            return Err(MorphismError::collaborator("point is not n-torsion"));
        }
        let scale = u128::from(n / self.den);
        Ok([
            u128::from(self.torsion[0]) * scale,
            u128::from(self.torsion[1]) * scale,
        ])
    }
}

impl<'a, 'b> Add<&'b LatticePoint> for &'a LatticePoint {
    type Output = LatticePoint;

    fn add(self, other: &'b LatticePoint) -> LatticePoint {
        let den = self.den / gcd(u128::from(self.den), u128::from(other.den)) as u64 * other.den;
        let s = i128::from(den / self.den);
        let o = i128::from(den / other.den);
        LatticePoint::reduced(
            [self.free[0] + other.free[0], self.free[1] + other.free[1]],
            [
                i128::from(self.torsion[0]) * s + i128::from(other.torsion[0]) * o,
                i128::from(self.torsion[1]) * s + i128::from(other.torsion[1]) * o,
            ],
            den,
        )
    }
}

define_add_variants!(LHS = LatticePoint, RHS = LatticePoint, Output = LatticePoint);

// ------------------------------------------------------------------------
// Curves
// ------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
enum Field {
    Finite { base: u64 },
    Number { rank: u32 },
    Other,
}

/// The matrix of a [`LatticeHom`], as its rational maps.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LatticeMaps {
    matrix: [[i64; 2]; 2],
}

impl LatticeMaps {
    /// The maps of the morphism acting through `matrix`.
    pub fn new(matrix: [[i64; 2]; 2]) -> LatticeMaps {
        LatticeMaps { matrix }
    }
}

impl RationalMaps for LatticeMaps {
    type XMap = LatticeXMap;

    fn after(&self, inner: &LatticeMaps) -> LatticeMaps {
        LatticeMaps::new(mat_mul(&inner.matrix, &self.matrix))
    }

    fn x_map(&self) -> LatticeXMap {
        LatticeXMap::new(self.matrix)
    }
}

/// The `x`-coordinate map of a [`LatticeHom`]: its matrix up to sign, since
/// `x(P) = x(-P)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LatticeXMap {
    matrix: [[i64; 2]; 2],
}

impl LatticeXMap {
    /// The class of `±matrix`, normalized so its first nonzero entry is
    /// positive.
    pub fn new(matrix: [[i64; 2]; 2]) -> LatticeXMap {
        let lead = matrix.iter().flatten().find(|&&e| e != 0).copied().unwrap_or(0);
        let s = if lead < 0 { -1 } else { 1 };
        LatticeXMap {
            matrix: matrix.map(|row| row.map(|e| s * e)),
        }
    }
}

impl RationalFunction for LatticeXMap {
    fn after(&self, inner: &LatticeXMap) -> LatticeXMap {
        LatticeXMap::new(mat_mul(&inner.matrix, &self.matrix))
    }
}

/// The kernel polynomial of a [`LatticeHom`], identified with its kernel.
///
/// The kernel of `v ↦ v·M` on the torsion `(Q/Z)²` is `Z²·M⁻¹ / Z²`; scaled
/// by `det M` it is the row lattice of the adjugate, kept here in Hermite
/// normal form `[[a, b], [0, c]]` with `a, c > 0` and `0 ≤ b < c`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LatticeKernel {
    hermite: [[i64; 2]; 2],
}

impl LatticeKernel {
    /// The kernel of the morphism acting through `matrix`.
    pub fn of(matrix: &[[i64; 2]; 2]) -> LatticeKernel {
        let [[a, b], [c, d]] = *matrix;
        LatticeKernel {
            hermite: row_hermite_form([[d, -b], [-c, a]]),
        }
    }

    /// The number of kernel points, which is the degree.
    pub fn order(&self) -> u64 {
        (self.hermite[0][0] * self.hermite[1][1]).unsigned_abs()
    }
}

fn row_hermite_form(m: [[i64; 2]; 2]) -> [[i64; 2]; 2] {
    let [mut r, mut s] = m;
    while s[0] != 0 {
        let q = r[0] / s[0];
        r = [r[0] - q * s[0], r[1] - q * s[1]];
        core::mem::swap(&mut r, &mut s);
    }
    if r[0] < 0 {
        r = [-r[0], -r[1]];
    }
    if s[1] < 0 {
        s = [0, -s[1]];
    }
    if s[1] != 0 {
        r[1] = r[1].rem_euclid(s[1]);
    }
    [r, s]
}

/// A curve of the lattice model.  See the module documentation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LatticeCurve {
    label: &'static str,
    class: u32,
    field: Field,
    extension: u32,
}

impl LatticeCurve {
    /// A curve over the field with `base²` elements, whose points are
    /// `(Z/base)²`.
    pub fn finite(label: &'static str, class: u32, base: u64) -> LatticeCurve {
        LatticeCurve {
            label,
            class,
            field: Field::Finite { base },
            extension: 1,
        }
    }

    /// A curve over the rationals whose free part has the given rank.
    pub fn number(label: &'static str, class: u32, rank: u32) -> LatticeCurve {
        LatticeCurve {
            label,
            class,
            field: Field::Number { rank },
            extension: 1,
        }
    }

    /// A curve over some base ring that is neither finite nor a number
    /// field.
    pub fn other(label: &'static str, class: u32) -> LatticeCurve {
        LatticeCurve {
            label,
            class,
            field: Field::Other,
            extension: 1,
        }
    }

    /// The `m` of `(Z/m)²` over the current extension.
    fn torsion_modulus(&self, degree: u32) -> Result<u64, MorphismError> {
        match self.field {
            Field::Finite { base } => self
                .extension
                .checked_mul(degree)
                .and_then(|e| base.checked_pow(e))
                .ok_or(MorphismError::collaborator("torsion modulus overflows u64")),
            _ => Err(MorphismError::unsupported_domain("torsion_modulus")),
        }
    }

    fn has_free_points(&self) -> bool {
        match self.field {
            Field::Finite { .. } => false,
            Field::Number { rank } => rank > 0,
            Field::Other => true,
        }
    }
}

fn small(rng: &mut dyn RngCore, bound: u32) -> i64 {
    i64::from(rng.next_u32() % (2 * bound + 1)) - i64::from(bound)
}

impl GroupVariety for LatticeCurve {
    type Point = LatticePoint;
    type Element = Fraction;
    type Maps = LatticeMaps;
    type Polynomial = LatticeKernel;

    fn base_field(&self) -> BaseField {
        match self.field {
            Field::Finite { base } => BaseField::Finite {
                cardinality: u128::from(base).saturating_pow(2 * self.extension),
            },
            Field::Number { .. } => BaseField::Number { degree: 1 },
            Field::Other => BaseField::Other,
        }
    }

    fn one(&self) -> Fraction {
        Fraction::from(1)
    }

    fn base_extend(&self, degree: u32) -> Result<LatticeCurve, MorphismError> {
        let extension = self
            .extension
            .checked_mul(degree)
            .ok_or(MorphismError::collaborator("extension degree overflows u32"))?;
        Ok(LatticeCurve {
            extension,
            ..self.clone()
        })
    }

    fn count_points(&self, max_degree: u32) -> Result<Vec<u128>, MorphismError> {
        (1..=max_degree)
            .map(|j| {
                let m = u128::from(self.torsion_modulus(j)?);
                m.checked_mul(m)
                    .ok_or(MorphismError::collaborator("point count overflows u128"))
            })
            .collect()
    }

    fn generators(&self) -> Result<Vec<LatticePoint>, MorphismError> {
        if self.has_free_points() {
            return Ok(vec![LatticePoint::free(1, 0), LatticePoint::free(0, 1)]);
        }
        let m = match self.field {
            Field::Finite { .. } => self.torsion_modulus(1)?,
            _ => 2,
        };
        Ok(vec![LatticePoint::torsion(1, 0, m), LatticePoint::torsion(0, 1, m)])
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Result<LatticePoint, MorphismError> {
        if self.has_free_points() {
            return Ok(LatticePoint::free(small(rng, 50), small(rng, 50)));
        }
        let m = match self.field {
            Field::Finite { .. } => self.torsion_modulus(1)?,
            _ => 2,
        };
        Ok(LatticePoint::torsion(rng.next_u64() % m, rng.next_u64() % m, m))
    }

    fn random_element(&self, rng: &mut dyn RngCore) -> Result<Fraction, MorphismError> {
        Ok(Fraction::from(small(rng, 100)))
    }

    /// Abscissas divisible by 5 lift to a 2-torsion point, as do all of
    /// them on a curve without free points.
    fn lift_x(&self, x: &Fraction) -> Result<LatticePoint, MorphismError> {
        match self.field {
            Field::Finite { .. } => {
                let m = self.torsion_modulus(1)?;
                let a = i128::from(x.num).rem_euclid(i128::from(m)) as u64;
                Ok(LatticePoint::torsion(a, 1, m))
            }
            _ if !self.has_free_points() || x.num % 5 == 0 => Ok(LatticePoint::torsion(1, 0, 2)),
            _ => Ok(LatticePoint::free(x.num, 1)),
        }
    }

    fn order(&self, point: &LatticePoint) -> Result<PointOrder, MorphismError> {
        if point.is_torsion() {
            Ok(PointOrder::Finite(point.den))
        } else {
            Ok(PointOrder::Infinite)
        }
    }

    fn pairing_order(&self, p: &LatticePoint, q: &LatticePoint, n: u64) -> Result<u64, MorphismError> {
        let n128 = u128::from(n);
        let [a0, a1] = p.numerators_over(n)?;
        let [b0, b1] = q.numerators_over(n)?;
        let det = (a0 * b1 % n128 + n128 - a1 * b0 % n128) % n128;
        Ok((n128 / gcd(det, n128)) as u64)
    }

    fn discrete_log(
        &self,
        point: &LatticePoint,
        basis: &[LatticePoint],
        invariants: &[u64],
    ) -> Result<Vec<u64>, MorphismError> {
        let n = match (basis, invariants) {
            ([_, _], [n0, n1]) if n0 == n1 => *n0,
            _ => return Err(MorphismError::collaborator("expected a basis of (Z/n)^2")),
        };
        let n128 = u128::from(n);
        let [r0, r1] = basis[0].numerators_over(n)?;
        let [s0, s1] = basis[1].numerators_over(n)?;
        let [t0, t1] = point.numerators_over(n)?;

        let minus = |x: u128, y: u128| (x % n128 + n128 - y % n128) % n128;
        let det = minus(r0 * s1, r1 * s0);
        if gcd(det, n128) != 1 {
            return Err(MorphismError::collaborator("basis is degenerate"));
        }
        let inv = inverse_mod(det, n128);
        let c = minus(t0 * s1, t1 * s0) * inv % n128;
        let d = minus(r0 * t1, r1 * t0) * inv % n128;
        Ok(vec![c as u64, d as u64])
    }

    fn isomorphisms(&self, other: &LatticeCurve) -> Result<Vec<Hom<LatticeCurve>>, MorphismError> {
        if self.class != other.class {
            return Ok(Vec::new());
        }
        Ok(vec![
            LatticeHom::isomorphism(self, other, 1)?,
            LatticeHom::isomorphism(self, other, -1)?,
        ])
    }

    fn kernel_polynomial_of(&self, x_map: &LatticeXMap) -> Result<LatticeKernel, MorphismError> {
        Ok(LatticeKernel::of(&x_map.matrix))
    }

    fn negation(&self) -> Result<Hom<LatticeCurve>, MorphismError> {
        LatticeHom::isomorphism(self, self, -1)
    }
}

// ------------------------------------------------------------------------
// Morphisms
// ------------------------------------------------------------------------

fn mat_mul(a: &[[i64; 2]; 2], b: &[[i64; 2]; 2]) -> [[i64; 2]; 2] {
    let entry = |i: usize, j: usize| a[i][0] * b[0][j] + a[i][1] * b[1][j];
    [[entry(0, 0), entry(0, 1)], [entry(1, 0), entry(1, 1)]]
}

fn det(m: &[[i64; 2]; 2]) -> i64 {
    m[0][0] * m[1][1] - m[0][1] * m[1][0]
}

/// A morphism of the lattice model, acting through an integer matrix.
#[derive(Clone, Debug)]
pub struct LatticeHom {
    domain: LatticeCurve,
    codomain: LatticeCurve,
    matrix: [[i64; 2]; 2],
    scaling: Fraction,
    kind: MorphismKind,
}

impl LatticeHom {
    /// A normalized separable isogeny acting through `matrix`.
    pub fn isogeny(
        domain: &LatticeCurve,
        codomain: &LatticeCurve,
        matrix: [[i64; 2]; 2],
    ) -> Result<Hom<LatticeCurve>, MorphismError> {
        if det(&matrix) == 0 {
            return Err(MorphismError::collaborator("isogeny matrix is singular"));
        }
        Ok(Rc::new(LatticeHom {
            domain: domain.clone(),
            codomain: codomain.clone(),
            matrix,
            scaling: Fraction::from(1),
            kind: MorphismKind::Primitive,
        }))
    }

    /// Multiplication by `m` on `curve`.
    pub fn scalar(curve: &LatticeCurve, m: i64) -> Hom<LatticeCurve> {
        Rc::new(LatticeHom {
            domain: curve.clone(),
            codomain: curve.clone(),
            matrix: [[m, 0], [0, m]],
            scaling: Fraction::from(m),
            kind: MorphismKind::Scalar,
        })
    }

    /// The isomorphism `sign·1` between two curves of the same class.
    pub fn isomorphism(
        domain: &LatticeCurve,
        codomain: &LatticeCurve,
        sign: i64,
    ) -> Result<Hom<LatticeCurve>, MorphismError> {
        if domain.class != codomain.class {
            return Err(MorphismError::collaborator("curves are not isomorphic"));
        }
        let s = sign.signum();
        Ok(Rc::new(LatticeHom {
            domain: domain.clone(),
            codomain: codomain.clone(),
            matrix: [[s, 0], [0, s]],
            scaling: Fraction::from(s),
            kind: MorphismKind::Isomorphism,
        }))
    }

    fn diagonal(&self) -> i64 {
        self.matrix[0][0]
    }
}

impl Morphism<LatticeCurve> for LatticeHom {
    fn kind(&self) -> MorphismKind {
        self.kind
    }

    fn domain(&self) -> &LatticeCurve {
        &self.domain
    }

    fn codomain(&self) -> &LatticeCurve {
        &self.codomain
    }

    fn degree(&self) -> Result<u64, MorphismError> {
        Ok(det(&self.matrix).unsigned_abs())
    }

    fn rational_maps(&self) -> Result<LatticeMaps, MorphismError> {
        Ok(LatticeMaps::new(self.matrix))
    }

    fn kernel_polynomial(&self) -> Result<LatticeKernel, MorphismError> {
        Ok(LatticeKernel::of(&self.matrix))
    }

    fn scaling_factor(&self) -> Result<Fraction, MorphismError> {
        Ok(self.scaling)
    }

    fn is_separable(&self) -> Result<bool, MorphismError> {
        Ok(true)
    }

    fn dual(&self) -> Result<Hom<LatticeCurve>, MorphismError> {
        let [[a, b], [c, d]] = self.matrix;
        Ok(Rc::new(LatticeHom {
            domain: self.codomain.clone(),
            codomain: self.domain.clone(),
            matrix: [[d, -b], [-c, a]],
            scaling: Fraction::from(det(&self.matrix)) / self.scaling,
            kind: self.kind,
        }))
    }

    fn evaluate(&self, point: &LatticePoint) -> Result<LatticePoint, MorphismError> {
        Ok(point.act(&self.matrix))
    }

    /// `[m]∘[k] = [mk]`, and isomorphisms compose by multiplying signs.
    fn compose_hook(
        &self,
        outer: &Hom<LatticeCurve>,
        inner: &Hom<LatticeCurve>,
    ) -> Result<Option<Hom<LatticeCurve>>, MorphismError> {
        let (Some(f), Some(g)) = (
            outer.as_any().downcast_ref::<LatticeHom>(),
            inner.as_any().downcast_ref::<LatticeHom>(),
        ) else {
            return Ok(None);
        };
        match (f.kind, g.kind) {
            (MorphismKind::Scalar, MorphismKind::Scalar) if f.domain == g.domain => {
                Ok(Some(LatticeHom::scalar(&f.domain, f.diagonal() * g.diagonal())))
            }
            (MorphismKind::Isomorphism, MorphismKind::Isomorphism) => {
                LatticeHom::isomorphism(&g.domain, &f.codomain, f.diagonal() * g.diagonal()).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn compare_hook(
        &self,
        left: &Hom<LatticeCurve>,
        right: &Hom<LatticeCurve>,
        op: ComparisonOp,
        _sampler: &mut Sampler<'_>,
    ) -> Result<Option<bool>, MorphismError> {
        let (Some(f), Some(g)) = (
            left.as_any().downcast_ref::<LatticeHom>(),
            right.as_any().downcast_ref::<LatticeHom>(),
        ) else {
            return Ok(None);
        };
        let comparable = matches!(
            (f.kind, g.kind),
            (MorphismKind::Scalar, MorphismKind::Scalar)
                | (MorphismKind::Isomorphism, MorphismKind::Isomorphism)
        );
        if !comparable {
            return Ok(None);
        }
        let eq = f.domain == g.domain && f.codomain == g.codomain && f.matrix == g.matrix;
        Ok(Some(match op {
            ComparisonOp::Eq => eq,
            ComparisonOp::Ne => !eq,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_are_reduced() {
        assert_eq!(Fraction::new(6, -4), Fraction::new(-3, 2));
        assert_eq!(Fraction::new(3, 2) * Fraction::new(2, 3), Fraction::from(1));
        assert_eq!(Fraction::from(-1) / Fraction::from(1), Fraction::from(-1));
        assert_eq!(Fraction::new(-3, 2).denominator(), 2);
    }

    #[test]
    fn torsion_points_are_reduced() {
        assert_eq!(LatticePoint::torsion(5, 0, 15), LatticePoint::torsion(1, 0, 3));
        assert_eq!(LatticePoint::torsion(5, 10, 5), LatticePoint::identity());
        let p = LatticePoint::torsion(1, 2, 5);
        assert_eq!(p.times(5), LatticePoint::identity());
        assert_eq!(p.times(-1), LatticePoint::torsion(4, 3, 5));
        assert_eq!(p + p, p.times(2));
        assert_eq!(
            LatticePoint::torsion(1, 0, 2) + LatticePoint::torsion(0, 1, 3),
            LatticePoint::torsion(3, 2, 6)
        );
    }

    #[test]
    fn pairing_detects_dependence() {
        let e = LatticeCurve::finite("E", 0, 5);
        let p = LatticePoint::torsion(1, 0, 5);
        let q = LatticePoint::torsion(1, 1, 5);
        assert_eq!(e.pairing_order(&p, &q, 5).unwrap(), 5);
        assert_eq!(e.pairing_order(&p, &p.times(2), 5).unwrap(), 1);
    }

    #[test]
    fn discrete_log_in_a_skew_basis() {
        let e = LatticeCurve::finite("E", 0, 7);
        let r = LatticePoint::torsion(1, 2, 7);
        let s = LatticePoint::torsion(3, 1, 7);
        let target = r.times(4) + s.times(6);
        let logs = e.discrete_log(&target, &[r, s], &[7, 7]).unwrap();
        assert_eq!(logs, vec![4, 6]);
    }

    #[test]
    fn extension_grows_the_torsion() {
        let e = LatticeCurve::finite("E", 0, 3);
        assert_eq!(e.base_field(), BaseField::Finite { cardinality: 9 });
        assert_eq!(e.count_points(3).unwrap(), vec![9, 81, 729]);
        let e2 = e.base_extend(2).unwrap();
        assert_eq!(e2.base_field(), BaseField::Finite { cardinality: 81 });
        assert_eq!(
            e2.generators().unwrap(),
            vec![LatticePoint::torsion(1, 0, 9), LatticePoint::torsion(0, 1, 9)]
        );
    }

    #[test]
    fn kernels_are_hermite_forms_of_the_adjugate() {
        // adj [[1, 1], [0, 2]] = [[2, -1], [0, 1]], kernel of order 2
        let k = LatticeKernel::of(&[[1, 1], [0, 2]]);
        assert_eq!(k.hermite, [[2, 0], [0, 1]]);
        assert_eq!(k.order(), 2);
        // unchanged by a sign or a later automorphism
        assert_eq!(LatticeKernel::of(&[[-1, -1], [0, -2]]), k);
        assert_eq!(LatticeKernel::of(&[[1, 2], [0, 2]]), k);
        assert_ne!(LatticeKernel::of(&[[1, 1], [1, 3]]), k);
        assert_eq!(LatticeKernel::of(&[[3, 0], [0, 3]]).hermite, [[3, 0], [0, 3]]);
        assert_eq!(LatticeKernel::of(&[[-1, 0], [0, -1]]).order(), 1);
    }

    #[test]
    fn x_maps_forget_the_sign() {
        let m = LatticeMaps::new([[0, -2], [1, 3]]);
        assert_eq!(m.x_map(), LatticeXMap::new([[0, 2], [-1, -3]]));
        let minus = LatticeMaps::new([[-1, 0], [0, -1]]);
        assert_eq!(minus.after(&m).x_map(), m.x_map());
    }

    #[test]
    fn dual_composes_to_the_degree() {
        let e = LatticeCurve::finite("E", 0, 7);
        let e1 = LatticeCurve::finite("E1", 1, 7);
        let phi = LatticeHom::isogeny(&e, &e1, [[2, 1], [1, 3]]).unwrap();
        let dual = phi.dual().unwrap();
        let p = LatticePoint::torsion(3, 4, 7);
        let image = dual.evaluate(&phi.evaluate(&p).unwrap()).unwrap();
        assert_eq!(image, p.times(5));
        assert_eq!(dual.scaling_factor().unwrap(), Fraction::from(5));
    }
}
