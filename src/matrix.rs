// -*- mode: rust; -*-
//
// This file is part of ec-morphism.
// See LICENSE for licensing information.

//! 2×2 matrices over `Z/n`, describing the action of a morphism on an
//! `n`-torsion subgroup.
//!
//! Points are row vectors: the image of `(a, b)` under a matrix `M` is
//! `(a, b)·M`.  With that convention matrix products follow composition,
//! `M(g ∘ f) = M(f)·M(g)`.

use core::fmt;
use core::ops::Mul;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{ArgumentError, MorphismError};

/// A 2×2 matrix with entries in `Z/n`, `n > 0`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TorsionMatrix {
    modulus: u64,
    /// Entries, always reduced modulo `modulus`.
    rows: [[u64; 2]; 2],
}

impl TorsionMatrix {
    /// The matrix with the given rows, reduced modulo `n`.
    pub fn from_rows(n: u64, rows: [[u64; 2]; 2]) -> Result<TorsionMatrix, MorphismError> {
        if n == 0 {
            return Err(ArgumentError::ModulusMismatch.into());
        }
        Ok(TorsionMatrix {
            modulus: n,
            rows: [
                [rows[0][0] % n, rows[0][1] % n],
                [rows[1][0] % n, rows[1][1] % n],
            ],
        })
    }

    /// The identity over `Z/n`.
    pub fn identity(n: u64) -> Result<TorsionMatrix, MorphismError> {
        TorsionMatrix::scalar(n, 1)
    }

    /// `k` times the identity over `Z/n`: the action of `[k]`.
    pub fn scalar(n: u64, k: u64) -> Result<TorsionMatrix, MorphismError> {
        TorsionMatrix::from_rows(n, [[k, 0], [0, k]])
    }

    /// The `n` of `Z/n`.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// The entries, row by row, reduced into `[0, n)`.
    pub fn rows(&self) -> [[u64; 2]; 2] {
        self.rows
    }

    /// The entry in row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// If `i` or `j` is not 0 or 1.
    pub fn entry(&self, i: usize, j: usize) -> u64 {
        self.rows[i][j]
    }

    /// The product `self·other`, or an error when the rings differ.
    pub fn checked_mul(&self, other: &TorsionMatrix) -> Result<TorsionMatrix, MorphismError> {
        if self.modulus != other.modulus {
            return Err(ArgumentError::ModulusMismatch.into());
        }
        Ok(self.product(other))
    }

    fn product(&self, other: &TorsionMatrix) -> TorsionMatrix {
        let n = self.modulus;
        let a = &self.rows;
        let b = &other.rows;
        let entry = |i: usize, j: usize| {
            add_mod(mul_mod(a[i][0], b[0][j], n), mul_mod(a[i][1], b[1][j], n), n)
        };
        TorsionMatrix {
            modulus: n,
            rows: [[entry(0, 0), entry(0, 1)], [entry(1, 0), entry(1, 1)]],
        }
    }

    /// The row vector `v·self`.
    pub fn act_on_row(&self, v: [u64; 2]) -> [u64; 2] {
        let n = self.modulus;
        let m = &self.rows;
        let (a, b) = (v[0] % n, v[1] % n);
        [
            add_mod(mul_mod(a, m[0][0], n), mul_mod(b, m[1][0], n), n),
            add_mod(mul_mod(a, m[0][1], n), mul_mod(b, m[1][1], n), n),
        ]
    }

    /// The determinant modulo `n`.
    pub fn determinant(&self) -> u64 {
        let n = self.modulus;
        let m = &self.rows;
        sub_mod(mul_mod(m[0][0], m[1][1], n), mul_mod(m[0][1], m[1][0], n), n)
    }

    /// The trace modulo `n`.
    pub fn trace(&self) -> u64 {
        add_mod(self.rows[0][0], self.rows[1][1], self.modulus)
    }

    /// Generators of the left kernel `{v : v·self = 0}` of `self`.
    ///
    /// For the matrix of an isogeny on the `n`-torsion this is the part of
    /// its kernel inside that subgroup.  The result is a pair `(g, b)`,
    /// `(0, h)` with `g` and `h` dividing `n`; either vector may be zero.
    pub fn kernel_basis(&self) -> [[u64; 2]; 2] {
        let n = u128::from(self.modulus);
        let m = &self.rows;

        // Solve each column equation x·a + y·b ≡ 0 separately: x must be a
        // multiple of `step`, and then y ≡ (x/step)·u mod `period`.
        let column = |j: usize| -> (u128, u128, u128) {
            let a = u128::from(m[0][j]);
            let b = u128::from(m[1][j]);
            let gb = gcd(b, n);
            let period = n / gb;
            let step = gb / gcd(gb, a);
            let rhs = (n - (step * a) % n) % n;
            let u = (rhs / gb) * inverse_mod(b / gb, period) % period;
            (step, u, period)
        };
        let (x0, u0, n0) = column(0);
        let (x1, u1, n1) = column(1);

        let x = lcm(x0, x1);
        let v0 = (x / x0) % n0 * u0 % n0;
        let v1 = (x / x1) % n1 * u1 % n1;
        // Both congruences for y must agree modulo gcd(n0, n1).
        let g = gcd(n0, n1);
        let drift = (v0 + g - v1 % g) % g;
        let t = g / gcd(g, drift);

        let h = lcm(n0, n1);
        let b = crt(t * v0 % n0, n0, t * v1 % n1, n1);
        [
            [((x * t) % n) as u64, (b % n) as u64],
            [0, (h % n) as u64],
        ]
    }
}

/// `&a * &b` is the product `a·b`.
///
/// # Panics
///
/// If the two matrices live over different rings; see
/// [`TorsionMatrix::checked_mul`] for the fallible version.
impl<'a, 'b> Mul<&'b TorsionMatrix> for &'a TorsionMatrix {
    type Output = TorsionMatrix;

    fn mul(self, other: &'b TorsionMatrix) -> TorsionMatrix {
        assert_eq!(
            self.modulus, other.modulus,
            "cannot multiply matrices over different rings"
        );
        self.product(other)
    }
}

define_mul_variants!(LHS = TorsionMatrix, RHS = TorsionMatrix, Output = TorsionMatrix);

impl fmt::Display for TorsionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [[a, b], [c, d]] = self.rows;
        write!(f, "[{} {}]\n[{} {}]", a, b, c, d)
    }
}

// ------------------------------------------------------------------------
// Modular helpers
// ------------------------------------------------------------------------

fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(n)) as u64
}

fn add_mod(a: u64, b: u64, n: u64) -> u64 {
    ((u128::from(a) + u128::from(b)) % u128::from(n)) as u64
}

fn sub_mod(a: u64, b: u64, n: u64) -> u64 {
    ((u128::from(a) + u128::from(n) - u128::from(b % n)) % u128::from(n)) as u64
}

pub(crate) fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn lcm(a: u128, b: u128) -> u128 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// The inverse of `a` modulo `m`, for `a` coprime to `m`; 0 modulo 1.
pub(crate) fn inverse_mod(a: u128, m: u128) -> u128 {
    if m <= 1 {
        return 0;
    }
    let (mut r0, mut r1) = (m as i128, (a % m) as i128);
    let (mut t0, mut t1) = (0i128, 1i128);
    while r1 != 0 {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (t0, t1) = (t1, t0 - q * t1);
    }
    t0.rem_euclid(m as i128) as u128
}

/// The solution modulo `lcm(m0, m1)` of `y ≡ r0 (m0)`, `y ≡ r1 (m1)`, for
/// compatible congruences.
fn crt(r0: u128, m0: u128, r1: u128, m1: u128) -> u128 {
    let g = gcd(m0, m1);
    let l = lcm(m0, m1);
    let m = m1 / g;
    let diff = (r1 + m1 - r0 % m1) % m1;
    let k = (diff / g) % m * inverse_mod(m0 / g, m) % m;
    (r0 + m0 * k) % l
}
