//! Polynomial evaluation helpers
//!
//! Coefficient-basis helpers shared by the commitment scheme and the tests:
//! Horner evaluation, synthetic division by `(X - ζ)`, and random linear
//! folding of several polynomials into one.
//!
//! All slices are **canonical** (natural-order monomial coefficients,
//! lowest degree first).

#![forbid(unsafe_code)]

use ark_ff::Zero;

use crate::F;

/// Evaluate `p(ζ)` with Horner's scheme.
pub fn evaluate(coeffs: &[F], zeta: F) -> F {
    coeffs
        .iter()
        .rev()
        .fold(F::zero(), |acc, &a| acc * zeta + a)
}

/// Divide `p(X)` by `(X - ζ)`.
///
/// Returns `(w, r)` with `p(X) = w(X)·(X - ζ) + r`, so `r = p(ζ)`.
/// Works high → low: `b_{i-1} = a_i + ζ·b_i`.
pub fn divide_by_linear(coeffs: &[F], zeta: F) -> (Vec<F>, F) {
    if coeffs.is_empty() {
        return (Vec::new(), F::zero());
    }
    let mut w_high_to_low: Vec<F> = Vec::with_capacity(coeffs.len());
    let mut w_next = F::zero();
    for &a_i in coeffs.iter().rev() {
        let b = a_i + zeta * w_next;
        w_high_to_low.push(b);
        w_next = b;
    }
    let remainder = w_high_to_low.pop().unwrap_or_else(F::zero);
    w_high_to_low.reverse();
    (w_high_to_low, remainder)
}

/// `Σ_i r^i · p_i(X)`; the result is as long as the longest input.
pub fn fold(polys: &[&[F]], r: F) -> Vec<F> {
    let len = polys.iter().map(|p| p.len()).max().unwrap_or(0);
    let mut out = vec![F::zero(); len];
    let mut acc = F::from(1u64);
    for p in polys {
        for (o, &c) in out.iter_mut().zip(p.iter()) {
            *o += acc * c;
        }
        acc *= r;
    }
    out
}

/// `Σ_i r^i · v_i`, matching [`fold`] on evaluations.
pub fn fold_values(values: &[F], r: F) -> F {
    values
        .iter()
        .rev()
        .fold(F::zero(), |acc, &v| acc * r + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn synthetic_division_reconstructs_polynomial() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let p: Vec<F> = (0..9).map(|_| F::rand(&mut rng)).collect();
        let zeta = F::rand(&mut rng);
        let x = F::rand(&mut rng);

        let (w, r) = divide_by_linear(&p, zeta);
        assert_eq!(w.len(), p.len() - 1);
        assert_eq!(r, evaluate(&p, zeta));
        assert_eq!(evaluate(&p, x), evaluate(&w, x) * (x - zeta) + r);
    }

    #[test]
    fn folding_commutes_with_evaluation() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let a: Vec<F> = (0..4).map(|_| F::rand(&mut rng)).collect();
        let b: Vec<F> = (0..7).map(|_| F::rand(&mut rng)).collect();
        let r = F::rand(&mut rng);
        let x = F::rand(&mut rng);

        let folded = fold(&[&a, &b], r);
        assert_eq!(folded.len(), 7);
        assert_eq!(
            evaluate(&folded, x),
            fold_values(&[evaluate(&a, x), evaluate(&b, x)], r)
        );
    }

    #[test]
    fn constant_and_empty_inputs() {
        let c = F::from(42u64);
        assert_eq!(evaluate(&[], c), F::zero());
        assert_eq!(divide_by_linear(&[c], F::from(3u64)), (Vec::new(), c));
        assert_eq!(divide_by_linear(&[], c), (Vec::new(), F::zero()));
    }
}
