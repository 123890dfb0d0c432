//! Domain & Transform Primitives
//!
//! This module defines radix-2 multiplicative subgroups `H = <ω>` of the
//! BN254 scalar field together with the transforms the lookup prover needs:
//! forward/inverse NTTs under two decimation conventions, an optional coset
//! shift, and bit-reversal helpers.
//!
//! Conventions (these pin the layout of every buffer in the prover):
//! - [`Decimation::Dif`]: input in **natural** order, output **bit-reversed**.
//! - [`Decimation::Dit`]: input **bit-reversed**, output in **natural** order.
//! - With `coset = true` the forward transform evaluates on `g·H` and the
//!   inverse transform removes the shift again, where `g = F::GENERATOR`.
//!
//! The shifted-neighbour addressing used by the quotient builder lives in
//! [`CosetIndexer`] so that no caller has to do bit-reversal arithmetic inline.

#![forbid(unsafe_code)]

use ark_ff::{FftField, Field, One, Zero};
use thiserror::Error;

use crate::F;

/// Failures while building a domain descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Requested size was zero.
    #[error("domain size must be positive")]
    Empty,
    /// No subgroup of the requested size exists in the field.
    #[error("domain size {size} exceeds the field's two-adicity (at most 2^{max_log})")]
    TooLarge {
        /// Requested (rounded-up) size.
        size: u64,
        /// `F::TWO_ADICITY`.
        max_log: u32,
    },
    /// An exact size was required but it is not a power of two.
    #[error("domain size {0} is not a power of two")]
    NotPowerOfTwo(u64),
    /// The root returned by the field does not have exact order `n`.
    #[error("omega is not a primitive {0}-th root of unity")]
    NotPrimitive(usize),
}

/// Decimation convention of a transform (see module docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decimation {
    /// Natural order in, bit-reversed order out.
    Dif,
    /// Bit-reversed order in, natural order out.
    Dit,
}

/// Multiplicative subgroup of size `n = 2^log_n` plus its coset data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Domain size `N` (power of two).
    pub n: usize,
    /// `log2(N)`.
    pub log_n: u32,
    /// Generator `ω` (primitive N-th root of unity).
    pub omega: F,
    /// `ω^{-1}`.
    pub omega_inv: F,
    /// Coset shift `g` (the field's multiplicative generator).
    pub coset_shift: F,
    /// `g^{-1}`.
    pub coset_shift_inv: F,
    /// `N^{-1}` in the field.
    pub n_inv: F,
}

impl Domain {
    /// Smallest power-of-two domain with at least `min_size` points.
    pub fn new(min_size: usize) -> Result<Self, DomainError> {
        if min_size == 0 {
            return Err(DomainError::Empty);
        }
        let n = min_size
            .checked_next_power_of_two()
            .ok_or(DomainError::TooLarge { size: min_size as u64, max_log: F::TWO_ADICITY })?;
        Self::from_size(n as u64)
    }

    /// Domain of exactly `size` points. Used by the verifier, which reads the
    /// size from an untrusted proof.
    pub fn from_size(size: u64) -> Result<Self, DomainError> {
        if size == 0 {
            return Err(DomainError::Empty);
        }
        if !size.is_power_of_two() {
            return Err(DomainError::NotPowerOfTwo(size));
        }
        let log_n = size.trailing_zeros();
        let too_large = DomainError::TooLarge { size, max_log: F::TWO_ADICITY };
        if log_n > F::TWO_ADICITY {
            return Err(too_large);
        }
        let n = usize::try_from(size).map_err(|_| too_large.clone())?;
        let omega = F::get_root_of_unity(size).ok_or(too_large)?;
        validate_root(n, omega)?;

        let omega_inv = omega.inverse().ok_or(DomainError::NotPrimitive(n))?;
        let coset_shift = F::GENERATOR;
        let coset_shift_inv = coset_shift.inverse().ok_or(DomainError::NotPrimitive(n))?;
        let n_inv = F::from(size).inverse().ok_or(DomainError::NotPrimitive(n))?;

        Ok(Self { n, log_n, omega, omega_inv, coset_shift, coset_shift_inv, n_inv })
    }

    /// `ω^i`.
    pub fn element(&self, i: usize) -> F {
        pow_u64(self.omega, (i % self.n) as u64)
    }

    /// Points of the coset `g·H` in natural order: `g, g·ω, g·ω², …`.
    pub fn coset_elements(&self) -> Vec<F> {
        let mut out = Vec::with_capacity(self.n);
        let mut acc = self.coset_shift;
        for _ in 0..self.n {
            out.push(acc);
            acc *= self.omega;
        }
        out
    }

    /// Forward transform: coefficients → evaluations.
    pub fn fft(&self, a: &mut [F], decimation: Decimation, coset: bool) {
        debug_assert_eq!(a.len(), self.n, "buffer length must equal the domain size");
        match decimation {
            Decimation::Dif => {
                if coset {
                    scale_by_powers(a, self.coset_shift);
                }
                ntt_in_place(a, self.omega);
                bit_reverse(a);
            }
            Decimation::Dit => {
                bit_reverse(a);
                if coset {
                    scale_by_powers(a, self.coset_shift);
                }
                ntt_in_place(a, self.omega);
            }
        }
    }

    /// Inverse transform: evaluations → coefficients.
    pub fn fft_inverse(&self, a: &mut [F], decimation: Decimation, coset: bool) {
        debug_assert_eq!(a.len(), self.n, "buffer length must equal the domain size");
        match decimation {
            Decimation::Dif => {
                self.intt_in_place(a);
                if coset {
                    scale_by_powers(a, self.coset_shift_inv);
                }
                bit_reverse(a);
            }
            Decimation::Dit => {
                bit_reverse(a);
                self.intt_in_place(a);
                if coset {
                    scale_by_powers(a, self.coset_shift_inv);
                }
            }
        }
    }

    /// Natural-order evaluations on `H` → natural-order (canonical) coefficients.
    pub fn interpolate(&self, evals: &[F]) -> Vec<F> {
        let mut coeffs = evals.to_vec();
        coeffs.resize(self.n, F::zero());
        self.fft_inverse(&mut coeffs, Decimation::Dif, false);
        bit_reverse(&mut coeffs);
        coeffs
    }

    /// Canonical coefficients (at most `N` of them) → evaluations on `g·H`,
    /// stored in **bit-reversed** order.
    pub fn lift_to_coset(&self, coeffs: &[F]) -> Vec<F> {
        debug_assert!(coeffs.len() <= self.n, "polynomial does not fit the domain");
        let mut evals = coeffs.to_vec();
        evals.resize(self.n, F::zero());
        self.fft(&mut evals, Decimation::Dif, true);
        evals
    }

    fn intt_in_place(&self, a: &mut [F]) {
        ntt_in_place(a, self.omega_inv);
        for x in a.iter_mut() {
            *x *= self.n_inv;
        }
    }
}

/// Addressing helper for evaluations on a big coset stored in bit-reversed order.
///
/// For a natural index `i` on the big domain, the point `x_i = g·ω_big^i`
/// multiplied by the small-domain generator is `x_{i+step}` where
/// `step = N_big / N_small`. [`CosetIndexer::locate`] returns the storage
/// slots of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosetIndexer {
    n: usize,
    log_n: u32,
    step: usize,
}

impl CosetIndexer {
    /// Indexer for `big`, with neighbours shifted by the generator of `small`.
    pub fn new(big: &Domain, small: &Domain) -> Self {
        debug_assert!(big.n >= small.n && big.n % small.n == 0);
        Self { n: big.n, log_n: big.log_n, step: big.n / small.n }
    }

    /// Number of points on the big coset.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false; domains are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Storage slot of natural index `i`.
    #[inline]
    pub fn storage(&self, i: usize) -> usize {
        bit_reverse_index(i, self.log_n)
    }

    /// Storage slot of the point `ω_small · x_i`.
    #[inline]
    pub fn shifted(&self, i: usize) -> usize {
        bit_reverse_index((i + self.step) % self.n, self.log_n)
    }

    /// `(storage(i), shifted(i))`.
    #[inline]
    pub fn locate(&self, i: usize) -> (usize, usize) {
        (self.storage(i), self.shifted(i))
    }
}

/// `base^exp` by square-and-multiply.
#[inline]
pub(crate) fn pow_u64(mut base: F, mut exp: u64) -> F {
    let mut acc = F::one();
    while exp > 0 {
        if (exp & 1) == 1 {
            acc *= base;
        }
        base.square_in_place();
        exp >>= 1;
    }
    acc
}

/// Reverse the low `log_n` bits of `i`.
#[inline]
pub fn bit_reverse_index(i: usize, log_n: u32) -> usize {
    if log_n == 0 {
        return 0;
    }
    i.reverse_bits() >> (usize::BITS - log_n)
}

/// In-place bit-reversal permutation of a power-of-two length buffer.
pub fn bit_reverse(a: &mut [F]) {
    let n = a.len();
    debug_assert!(n == 0 || n.is_power_of_two());
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            a.swap(i, j);
        }
    }
}

// ------------------------- Hygiene / Validation -------------------------

// For power-of-two N, ω has exact order N iff ω^N = 1 and ω^{N/2} ≠ 1.
fn validate_root(n: usize, omega: F) -> Result<(), DomainError> {
    if !pow_u64(omega, n as u64).is_one() {
        return Err(DomainError::NotPrimitive(n));
    }
    if n >= 2 && pow_u64(omega, (n / 2) as u64).is_one() {
        return Err(DomainError::NotPrimitive(n));
    }
    Ok(())
}

// ------------------------- NTT kernels -------------------------

/// Multiply `a[i]` by `shift^i`.
fn scale_by_powers(a: &mut [F], shift: F) {
    let mut acc = F::one();
    for x in a.iter_mut() {
        *x *= acc;
        acc *= shift;
    }
}

/// In-place iterative Cooley–Tukey radix-2 NTT, natural order in and out.
fn ntt_in_place(a: &mut [F], root: F) {
    let n = a.len();
    debug_assert!(n.is_power_of_two());

    bit_reverse(a);

    let mut len = 2;
    while len <= n {
        // w_len = root^{n/len}
        let w_len = pow_u64(root, (n / len) as u64);
        let half = len / 2;
        for start in (0..n).step_by(len) {
            let mut w = F::one();
            for i in 0..half {
                let u = a[start + i];
                let v = a[start + i + half] * w;
                a[start + i] = u + v;
                a[start + i + half] = u - v;
                w *= w_len;
            }
        }
        len <<= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opening::evaluate;
    use ark_ff::UniformRand;
    use rand_chacha::ChaCha20Rng;
    use rand::SeedableRng;

    fn random_vec(rng: &mut ChaCha20Rng, n: usize) -> Vec<F> {
        (0..n).map(|_| F::rand(rng)).collect()
    }

    #[test]
    fn sizes_round_up_and_reject_bad_inputs() {
        assert_eq!(Domain::new(5).unwrap().n, 8);
        assert_eq!(Domain::new(8).unwrap().n, 8);
        assert_eq!(Domain::new(1).unwrap().n, 1);
        assert_eq!(Domain::new(0), Err(DomainError::Empty));
        assert_eq!(Domain::from_size(12), Err(DomainError::NotPowerOfTwo(12)));
        assert!(matches!(
            Domain::from_size(1u64 << 40),
            Err(DomainError::TooLarge { .. })
        ));
    }

    #[test]
    fn generator_has_exact_order() {
        let d = Domain::new(16).unwrap();
        assert!(pow_u64(d.omega, 16).is_one());
        assert!(!pow_u64(d.omega, 8).is_one());
        assert_eq!(d.omega * d.omega_inv, F::one());
        assert_eq!(d.element(15), d.omega_inv);
    }

    #[test]
    fn interpolation_matches_direct_evaluation() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let d = Domain::new(32).unwrap();
        let evals = random_vec(&mut rng, d.n);
        let coeffs = d.interpolate(&evals);
        for (i, e) in evals.iter().enumerate() {
            assert_eq!(evaluate(&coeffs, d.element(i)), *e);
        }
    }

    #[test]
    fn coset_lift_is_bit_reversed() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let d = Domain::new(16).unwrap();
        let coeffs = random_vec(&mut rng, 7);
        let lifted = d.lift_to_coset(&coeffs);
        for (i, x) in d.coset_elements().into_iter().enumerate() {
            assert_eq!(lifted[bit_reverse_index(i, d.log_n)], evaluate(&coeffs, x));
        }
    }

    #[test]
    fn dif_forward_then_dit_inverse_round_trips() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let d = Domain::new(64).unwrap();
        let coeffs = random_vec(&mut rng, d.n);
        for coset in [false, true] {
            let mut buf = coeffs.clone();
            d.fft(&mut buf, Decimation::Dif, coset);
            d.fft_inverse(&mut buf, Decimation::Dit, coset);
            assert_eq!(buf, coeffs);

            let mut buf = coeffs.clone();
            bit_reverse(&mut buf);
            d.fft(&mut buf, Decimation::Dit, coset);
            d.fft_inverse(&mut buf, Decimation::Dif, coset);
            bit_reverse(&mut buf);
            assert_eq!(buf, coeffs);
        }
    }

    #[test]
    fn bit_reverse_agrees_with_index_helper() {
        let d = Domain::new(32).unwrap();
        let natural: Vec<F> = (0..d.n as u64).map(F::from).collect();
        let mut permuted = natural.clone();
        bit_reverse(&mut permuted);
        for i in 0..d.n {
            assert_eq!(permuted[bit_reverse_index(i, d.log_n)], natural[i]);
        }
        bit_reverse(&mut permuted);
        assert_eq!(permuted, natural);
        assert_eq!(bit_reverse_index(0, 0), 0);
    }

    #[test]
    fn indexer_neighbour_is_small_generator_multiple() {
        let small = Domain::new(8).unwrap();
        let big = Domain::new(16).unwrap();
        let idx = CosetIndexer::new(&big, &small);
        let points = big.coset_elements();
        let mut stored = points.clone();
        bit_reverse(&mut stored);
        for i in 0..idx.len() {
            let (at, next) = idx.locate(i);
            assert_eq!(stored[at], points[i]);
            assert_eq!(stored[next], points[i] * small.omega);
        }
    }
}
