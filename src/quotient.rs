//! Coset evaluator and quotient builder
//!
//! The lookup constraints are evaluated on the coset `g·H_big` of the
//! doubled domain (`|H_big| = 2s`), where polynomials of degree up to `3s`
//! can be divided by `X^s − 1` without aliasing the quotient:
//!
//! ```text
//!   h    = (X − ω^{s-1}) · [ Z·(1+β)(γ+f)(γ(1+β) + t + β·t(ωX))
//!                          − Z(ωX)·(γ(1+β) + h1 + β·h1(ωX))(γ(1+β) + h2 + β·h2(ωX)) ]
//!   h0   = L0(X) · (Z − 1)             L0 = (X^s − 1)/(X − 1)
//!   hn   = Ln(X) · (Z − 1)             Ln = (X^s − 1)/(X − ω^{s-1})
//!   h1h2 = Ln(X) · (h1 − h2(ωX))
//!
//!   Q    = (((h1h2·α + hn)·α + h0)·α + h) / (X^s − 1)
//! ```
//!
//! Every buffer here holds coset evaluations in **bit-reversed** order;
//! addressing goes through [`CosetIndexer`]. On the coset, `X^s − 1` only
//! takes two values, selected by the parity of the natural index.

#![forbid(unsafe_code)]

use ark_ff::{batch_inversion, One};

use crate::accumulator::compress_pair;
use crate::domain::{pow_u64, CosetIndexer, Decimation, Domain};
use crate::F;

/// `z, h1, h2, t, f` evaluated on the big coset (bit-reversed order).
#[derive(Debug, Clone)]
pub struct CosetEvals {
    /// Accumulator.
    pub z: Vec<F>,
    /// Lower half of the sorted merge.
    pub h1: Vec<F>,
    /// Upper half of the sorted merge.
    pub h2: Vec<F>,
    /// Sorted table.
    pub t: Vec<F>,
    /// Vector.
    pub f: Vec<F>,
}

impl CosetEvals {
    /// Lift canonical small-domain polynomials to the big coset.
    pub fn lift(big: &Domain, z: &[F], h1: &[F], h2: &[F], t: &[F], f: &[F]) -> Self {
        #[cfg(feature = "parallel")]
        let (z, (h1, (h2, (t, f)))) = rayon::join(
            || big.lift_to_coset(z),
            || {
                rayon::join(
                    || big.lift_to_coset(h1),
                    || {
                        rayon::join(
                            || big.lift_to_coset(h2),
                            || rayon::join(|| big.lift_to_coset(t), || big.lift_to_coset(f)),
                        )
                    },
                )
            },
        );
        #[cfg(not(feature = "parallel"))]
        let (z, h1, h2, t, f) = (
            big.lift_to_coset(z),
            big.lift_to_coset(h1),
            big.lift_to_coset(h2),
            big.lift_to_coset(t),
            big.lift_to_coset(f),
        );
        Self { z, h1, h2, t, f }
    }
}

/// `X^s − 1` on `g·H_big`: index 0 for even natural indices, 1 for odd.
pub fn xn_minus_one_on_coset(big: &Domain) -> [F; 2] {
    let s = (big.n / 2) as u64;
    let shift = pow_u64(big.coset_shift, s);
    [shift - F::one(), -(shift + F::one())]
}

/// `1/(x_i − root)` for every coset point `x_i`, natural order.
fn inverse_linear_on_coset(points: &[F], root: F) -> Vec<F> {
    let mut den: Vec<F> = points.iter().map(|&x| x - root).collect();
    batch_inversion(&mut den);
    den
}

/// Transition constraint `h`, bit-reversed.
pub fn evaluate_transition(
    evals: &CosetEvals,
    beta: F,
    gamma: F,
    idx: &CosetIndexer,
    points: &[F],
    last: F,
) -> Vec<F> {
    let one_plus_beta = F::one() + beta;
    let c = gamma * one_plus_beta;
    let mut num = vec![F::one(); idx.len()];

    for (i, &x) in points.iter().enumerate() {
        let (at, next) = idx.locate(i);

        // m = z·(1+β)·(γ+f)·(γ(1+β) + t + β·t(ωX))
        let m = evals.z[at]
            * one_plus_beta
            * (gamma + evals.f[at])
            * compress_pair(evals.t[at], evals.t[next], beta, c);

        // n = z(ωX)·(γ(1+β) + h1 + β·h1(ωX))·(γ(1+β) + h2 + β·h2(ωX))
        let n = evals.z[next]
            * compress_pair(evals.h1[at], evals.h1[next], beta, c)
            * compress_pair(evals.h2[at], evals.h2[next], beta, c);

        num[at] = (m - n) * (x - last);
    }
    num
}

/// `L0·(Z − 1)`, bit-reversed.
pub fn evaluate_z_starts_at_one(
    z: &[F],
    xn_minus_one: &[F; 2],
    den_l0: &[F],
    idx: &CosetIndexer,
) -> Vec<F> {
    let mut res = vec![F::one(); idx.len()];
    for (i, d) in den_l0.iter().enumerate() {
        let at = idx.storage(i);
        res[at] = (z[at] - F::one()) * xn_minus_one[i % 2] * d;
    }
    res
}

/// `Ln·(Z − 1)`, bit-reversed.
pub fn evaluate_z_ends_at_one(
    z: &[F],
    xn_minus_one: &[F; 2],
    den_ln: &[F],
    idx: &CosetIndexer,
) -> Vec<F> {
    let mut res = vec![F::one(); idx.len()];
    for (i, d) in den_ln.iter().enumerate() {
        let at = idx.storage(i);
        res[at] = (z[at] - F::one()) * xn_minus_one[i % 2] * d;
    }
    res
}

/// `Ln·(h1 − h2(ωX))`, bit-reversed.
pub fn evaluate_h1_h2_overlap(
    h1: &[F],
    h2: &[F],
    xn_minus_one: &[F; 2],
    den_ln: &[F],
    idx: &CosetIndexer,
) -> Vec<F> {
    let mut res = vec![F::one(); idx.len()];
    for (i, d) in den_ln.iter().enumerate() {
        let (at, next) = idx.locate(i);
        res[at] = (h1[at] - h2[next]) * xn_minus_one[i % 2] * d;
    }
    res
}

/// Fold the four constraint pieces with `alpha`, divide by `X^s − 1`, and
/// return the quotient in canonical basis (`2s` coefficients).
pub fn compute_quotient(
    evals: &CosetEvals,
    beta: F,
    gamma: F,
    alpha: F,
    big: &Domain,
    small: &Domain,
) -> Vec<F> {
    let idx = CosetIndexer::new(big, small);
    let points = big.coset_elements();
    let last = small.element(small.n - 1);
    let xn_minus_one = xn_minus_one_on_coset(big);
    let den_l0 = inverse_linear_on_coset(&points, F::one());
    let den_ln = inverse_linear_on_coset(&points, last);

    #[cfg(feature = "parallel")]
    let ((lh, lh0), (lhn, lh1h2)) = rayon::join(
        || {
            rayon::join(
                || evaluate_transition(evals, beta, gamma, &idx, &points, last),
                || evaluate_z_starts_at_one(&evals.z, &xn_minus_one, &den_l0, &idx),
            )
        },
        || {
            rayon::join(
                || evaluate_z_ends_at_one(&evals.z, &xn_minus_one, &den_ln, &idx),
                || evaluate_h1_h2_overlap(&evals.h1, &evals.h2, &xn_minus_one, &den_ln, &idx),
            )
        },
    );
    #[cfg(not(feature = "parallel"))]
    let (lh, lh0, lhn, lh1h2) = (
        evaluate_transition(evals, beta, gamma, &idx, &points, last),
        evaluate_z_starts_at_one(&evals.z, &xn_minus_one, &den_l0, &idx),
        evaluate_z_ends_at_one(&evals.z, &xn_minus_one, &den_ln, &idx),
        evaluate_h1_h2_overlap(&evals.h1, &evals.h2, &xn_minus_one, &den_ln, &idx),
    );

    // 1/(X^s − 1); both values are non-zero because g ∉ H_big.
    let mut inv_xn = xn_minus_one;
    batch_inversion(&mut inv_xn);

    let mut res = vec![F::one(); idx.len()];
    for i in 0..idx.len() {
        let at = idx.storage(i);
        res[at] = (((lh1h2[at] * alpha + lhn[at]) * alpha + lh0[at]) * alpha + lh[at])
            * inv_xn[i % 2];
    }

    big.fft_inverse(&mut res, Decimation::Dit, true);
    res
}
