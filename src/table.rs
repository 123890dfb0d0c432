//! Table/vector preparation and the sorted-merge split
//!
//! Builds the Lagrange-form inputs of the lookup argument over the small
//! domain of size `s`:
//! - `f` padded to `s` by repeating its last element,
//! - `t` padded to `s` by repeating its last element, then sorted,
//! - the sorted merge of `t` and `f[0..s-1]` (length `2s-1`), split into two
//!   overlapping halves `h1 = merge[0..s]`, `h2 = merge[s-1..]`.
//!
//! The last padded entry of `f` never enters any constraint, so the merge
//! only takes the first `s-1` entries of the padded vector.

#![forbid(unsafe_code)]

use crate::domain::Domain;
use crate::F;

/// Size the small domain must have for a vector of `n_f` and a table of
/// `n_t` entries (before rounding up to a power of two).
#[inline]
pub fn small_domain_size(n_f: usize, n_t: usize) -> usize {
    if n_t <= n_f {
        n_f + 1
    } else {
        n_t
    }
}

/// Copy `v` and pad it to `len` entries by repeating its last element.
fn pad_with_last(v: &[F], len: usize) -> Vec<F> {
    let mut out = Vec::with_capacity(len.max(v.len()));
    out.extend_from_slice(v);
    if let Some(&last) = v.last() {
        out.resize(len.max(v.len()), last);
    }
    out
}

/// Padded vector and padded sorted table, in Lagrange form on the small domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInputs {
    /// `f` padded to `s` (natural order).
    pub lf: Vec<F>,
    /// `t` padded to `s` and sorted ascending.
    pub lt: Vec<F>,
}

impl PreparedInputs {
    /// Pad `f` and `t` to `domain.n` and sort the table.
    ///
    /// Callers must pass non-empty slices no longer than the domain.
    pub fn new(f: &[F], t: &[F], domain: &Domain) -> Self {
        debug_assert!(!f.is_empty() && !t.is_empty());
        debug_assert!(f.len() <= domain.n && t.len() <= domain.n);
        let lf = pad_with_last(f, domain.n);
        let mut lt = pad_with_last(t, domain.n);
        lt.sort();
        Self { lf, lt }
    }

    /// Whether every entry of the (unpadded) vector `f` occurs in the table.
    ///
    /// Returns the position of the first non-member.
    pub fn first_non_member(&self, f: &[F]) -> Option<usize> {
        f.iter().position(|v| self.lt.binary_search(v).is_err())
    }
}

/// `h1`, `h2`: the sorted merge of table and vector, split with a one-element overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedMerge {
    /// `merge[0..s]`.
    pub h1: Vec<F>,
    /// `merge[s-1..2s-1]`.
    pub h2: Vec<F>,
}

impl SortedMerge {
    /// Merge the sorted table `lt` with `lf[0..s-1]` and split.
    pub fn new(inputs: &PreparedInputs) -> Self {
        let s = inputs.lt.len();
        debug_assert_eq!(inputs.lf.len(), s);
        debug_assert!(s >= 1);

        let mut merged: Vec<F> = Vec::with_capacity(2 * s - 1);
        merged.extend_from_slice(&inputs.lt);
        merged.extend_from_slice(&inputs.lf[..s - 1]);
        merged.sort();

        let h1 = merged[..s].to_vec();
        let h2 = merged[s - 1..].to_vec();
        Self { h1, h2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elems(v: &[u64]) -> Vec<F> {
        v.iter().copied().map(F::from).collect()
    }

    #[test]
    fn small_domain_size_follows_the_longer_input() {
        assert_eq!(small_domain_size(3, 4), 4);
        assert_eq!(small_domain_size(4, 4), 5);
        assert_eq!(small_domain_size(7, 2), 8);
        assert_eq!(Domain::new(small_domain_size(4, 4)).unwrap().n, 8);
    }

    #[test]
    fn padding_repeats_last_and_sorts_table() {
        let d = Domain::new(8).unwrap();
        let prepared = PreparedInputs::new(&elems(&[3, 1, 2]), &elems(&[4, 2, 3, 1]), &d);
        assert_eq!(prepared.lf, elems(&[3, 1, 2, 2, 2, 2, 2, 2]));
        assert_eq!(prepared.lt, elems(&[1, 1, 1, 1, 1, 2, 3, 4]));
        assert_eq!(prepared.first_non_member(&elems(&[3, 1, 2])), None);
        assert_eq!(prepared.first_non_member(&elems(&[3, 9, 2])), Some(1));
    }

    #[test]
    fn merge_halves_overlap_by_one() {
        let d = Domain::new(4).unwrap();
        let prepared = PreparedInputs::new(&elems(&[2, 2, 4]), &elems(&[1, 2, 3, 4]), &d);
        let merge = SortedMerge::new(&prepared);
        // merge of [1,2,3,4] and [2,2,4] = [1,2,2,2,3,4,4]
        assert_eq!(merge.h1, elems(&[1, 2, 2, 2]));
        assert_eq!(merge.h2, elems(&[2, 3, 4, 4]));
        assert_eq!(merge.h1[3], merge.h2[0]);
    }

    #[test]
    fn last_padded_vector_entry_is_excluded() {
        let d = Domain::new(2).unwrap();
        let prepared = PreparedInputs::new(&elems(&[7]), &elems(&[7]), &d);
        let merge = SortedMerge::new(&prepared);
        assert_eq!(merge.h1, elems(&[7, 7]));
        assert_eq!(merge.h2, elems(&[7, 7]));
    }
}
