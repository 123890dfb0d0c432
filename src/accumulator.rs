//! Grand-product accumulator of the lookup argument
//!
//! `Z` is built in Lagrange form over the small domain:
//!
//! ```text
//!   Z[0]   = 1
//!   Z[i+1] = Z[i] · (1+β)(γ+f_i)(γ(1+β) + t_i + β·t_{i+1})
//!                 / ((γ(1+β) + h1_i + β·h1_{i+1}) (γ(1+β) + h2_i + β·h2_{i+1}))
//! ```
//!
//! If every `f_i` occurs in `t`, the numerator and denominator multisets
//! coincide and the product closes: `Z[s-1] = 1`.
//!
//! All `s-1` denominators are inverted with one batch inversion.

#![forbid(unsafe_code)]

use ark_ff::{batch_inversion, One};

use crate::F;

/// `γ(1+β) + a + β·b`, the compressed form of an adjacent pair `(a, b)`.
#[inline]
pub fn compress_pair(a: F, b: F, beta: F, gamma_one_plus_beta: F) -> F {
    gamma_one_plus_beta + a + beta * b
}

/// Build `Z` in Lagrange form.
///
/// - `lf`: vector values (padded), `lt`: sorted table (padded),
/// - `lh1`, `lh2`: the two halves of the sorted merge,
/// - `beta`, `gamma`: challenges.
///
/// All slices must have the small-domain length `s ≥ 1`.
pub fn evaluate_accumulation(
    lf: &[F],
    lt: &[F],
    lh1: &[F],
    lh2: &[F],
    beta: F,
    gamma: F,
) -> Vec<F> {
    let n = lt.len();
    debug_assert!(n >= 1);
    debug_assert!(lf.len() == n && lh1.len() == n && lh2.len() == n);

    let one_plus_beta = F::one() + beta;
    let c = gamma * one_plus_beta;

    let mut den: Vec<F> = (0..n - 1)
        .map(|i| {
            compress_pair(lh1[i], lh1[i + 1], beta, c) * compress_pair(lh2[i], lh2[i + 1], beta, c)
        })
        .collect();
    batch_inversion(&mut den);

    let mut z = Vec::with_capacity(n);
    z.push(F::one());
    for i in 0..n - 1 {
        let num = (gamma + lf[i]) * one_plus_beta * compress_pair(lt[i], lt[i + 1], beta, c);
        let next = z[i] * num * den[i];
        z.push(next);
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::table::{small_domain_size, PreparedInputs, SortedMerge};
    use ark_ff::UniformRand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn accumulate(f: &[u64], t: &[u64], seed: u64) -> Vec<F> {
        let f: Vec<F> = f.iter().copied().map(F::from).collect();
        let t: Vec<F> = t.iter().copied().map(F::from).collect();
        let d = Domain::new(small_domain_size(f.len(), t.len())).unwrap();
        let prepared = PreparedInputs::new(&f, &t, &d);
        let merge = SortedMerge::new(&prepared);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let (beta, gamma) = (F::rand(&mut rng), F::rand(&mut rng));
        evaluate_accumulation(&prepared.lf, &prepared.lt, &merge.h1, &merge.h2, beta, gamma)
    }

    #[test]
    fn accumulator_starts_and_closes_at_one() {
        let cases: [(&[u64], &[u64]); 4] = [
            (&[1, 2, 3], &[1, 2, 3, 4]),
            (&[4, 4, 4, 4, 4, 1, 2], &[1, 2, 3, 4]),
            (&[5], &[9, 8, 7, 6, 5]),
            (&[1], &[1]),
        ];
        for (i, (f, t)) in cases.iter().enumerate() {
            let z = accumulate(f, t, i as u64);
            assert_eq!(z[0], F::one());
            assert_eq!(*z.last().unwrap(), F::one(), "case {i}");
        }
    }

    #[test]
    fn accumulator_does_not_close_for_non_members() {
        let z = accumulate(&[1, 2, 5], &[1, 2, 3, 4], 3);
        assert_eq!(z[0], F::one());
        assert_ne!(*z.last().unwrap(), F::one());

        let z = accumulate(&[5, 1, 2], &[1, 2, 3, 4], 4);
        assert_ne!(*z.last().unwrap(), F::one());
    }

    #[test]
    fn compressed_pair_layout() {
        let (a, b, beta, c) = (F::from(2u64), F::from(3u64), F::from(5u64), F::from(7u64));
        assert_eq!(compress_pair(a, b, beta, c), F::from(7u64 + 2 + 15));
    }
}
