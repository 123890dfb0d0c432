//! Fiat–Shamir transcript with domain separation and ordered labels
//!
//! A transcript is declared up front with the ordered list of challenge
//! labels it will produce. [`Transcript::bind`] derives the next challenge
//! from the running BLAKE3 state, the label, and the values bound to it, and
//! then chains the challenge back into the state. Using a label out of order,
//! reusing one, or drawing past the last label is an error, so a challenge can
//! never be derived before the values it depends on are fixed.
//!
//! Encoding:
//! - Commitments are absorbed using **compressed G1** encoding.
//! - Items are length-delimited and tagged to pin transcript identity.
//! - Challenges reduce 64 bytes of BLAKE3 XOF output modulo `Fr`.

#![forbid(unsafe_code)]

use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;
use blake3::Hasher;
use thiserror::Error;

use crate::{pcs, F};

/// Misuse of the declared challenge schedule, or an encoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    /// `bind` was called with a label other than the next declared one.
    #[error("challenge label {got:?} used out of order (expected {expected:?})")]
    UnexpectedLabel {
        /// Next label in the declared schedule.
        expected: &'static str,
        /// Label supplied by the caller.
        got: &'static str,
    },
    /// Every declared label has already been consumed.
    #[error("challenge label {0:?} requested after the schedule was exhausted")]
    Exhausted(&'static str),
    /// A bound value could not be serialized.
    #[error("failed to serialize transcript input: {0}")]
    Serialization(String),
}

/// Fiat–Shamir transcript over an ordered set of challenge labels.
pub struct Transcript {
    /// Domain-separation string for this transcript instance.
    dst: &'static str,
    /// Declared challenge labels, in derivation order.
    labels: Vec<&'static str>,
    /// Index of the next label to be consumed.
    cursor: usize,
    /// Running hash state (BLAKE3).
    hasher: Hasher,
}

impl Transcript {
    /// Create a transcript with domain separator `dst` that will derive one
    /// challenge per entry of `labels`, in that order.
    pub fn new(dst: &'static str, labels: &[&'static str]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(b"plookup.transcript.v1");
        hasher.update(&(dst.len() as u64).to_be_bytes());
        hasher.update(dst.as_bytes());
        for label in labels {
            hasher.update(b"label:");
            hasher.update(label.as_bytes());
        }
        Self { dst, labels: labels.to_vec(), cursor: 0, hasher }
    }

    /// Label the next call to [`Transcript::bind`] must use, if any.
    pub fn next_label(&self) -> Option<&'static str> {
        self.labels.get(self.cursor).copied()
    }

    /// Derive the challenge `label`, bound to `commitments`.
    pub fn bind(
        &mut self,
        label: &'static str,
        commitments: &[&pcs::Commitment],
    ) -> Result<F, TranscriptError> {
        self.bind_with_scalars(label, commitments, &[])
    }

    /// Derive the challenge `label`, bound to `commitments` and then `scalars`.
    pub fn bind_with_scalars(
        &mut self,
        label: &'static str,
        commitments: &[&pcs::Commitment],
        scalars: &[F],
    ) -> Result<F, TranscriptError> {
        match self.next_label() {
            None => return Err(TranscriptError::Exhausted(label)),
            Some(expected) if expected != label => {
                return Err(TranscriptError::UnexpectedLabel { expected, got: label })
            }
            Some(_) => {}
        }

        self.hasher.update(b"challenge:");
        self.hasher.update(label.as_bytes());
        for c in commitments {
            let mut bytes = Vec::with_capacity(32);
            c.0.serialize_compressed(&mut bytes)
                .map_err(|e| TranscriptError::Serialization(e.to_string()))?;
            self.absorb_bytes("commitment", &bytes);
        }
        for s in scalars {
            let mut bytes = Vec::with_capacity(32);
            s.serialize_compressed(&mut bytes)
                .map_err(|e| TranscriptError::Serialization(e.to_string()))?;
            self.absorb_bytes("scalar", &bytes);
        }

        let challenge = hash_to_field(&self.hasher, self.dst, label, self.cursor as u64);

        // Chain the challenge so later draws depend on it.
        let mut bytes = Vec::with_capacity(32);
        challenge
            .serialize_compressed(&mut bytes)
            .map_err(|e| TranscriptError::Serialization(e.to_string()))?;
        self.absorb_bytes(label, &bytes);

        self.cursor += 1;
        Ok(challenge)
    }

    /// Absorb arbitrary bytes with an item label (length-delimited).
    fn absorb_bytes(&mut self, label: &'static str, bytes: &[u8]) {
        self.hasher.update(b"item:");
        self.hasher.update(label.as_bytes());
        self.hasher.update(b":len:");
        self.hasher.update(&(bytes.len() as u64).to_be_bytes());
        self.hasher.update(b":data:");
        self.hasher.update(bytes);
    }
}

// ------------------------ Internals ------------------------

/// Derive a field element from (a clone of) `base`.
///
/// The running hasher is not mutated here; the caller chains the result.
fn hash_to_field(base: &Hasher, dst: &'static str, label: &'static str, ctr: u64) -> F {
    let mut h = base.clone();
    h.update(b"challenge:");
    h.update(b":dst:");
    h.update(dst.as_bytes());
    h.update(b":label:");
    h.update(label.as_bytes());
    h.update(b":ctr:");
    h.update(&ctr.to_be_bytes());

    let mut xof = h.finalize_xof();
    let mut buf = [0u8; 64];
    xof.fill(&mut buf);
    F::from_le_bytes_mod_order(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcs::Commitment;
    use ark_ec::AffineRepr;

    const LABELS: [&str; 3] = ["a", "b", "c"];

    fn commitment() -> Commitment {
        Commitment(crate::G1::generator())
    }

    #[test]
    fn same_inputs_same_challenges() {
        let c = commitment();
        let mut t1 = Transcript::new("test", &LABELS);
        let mut t2 = Transcript::new("test", &LABELS);
        for label in LABELS {
            assert_eq!(t1.bind(label, &[&c]).unwrap(), t2.bind(label, &[&c]).unwrap());
        }
    }

    #[test]
    fn bindings_and_dst_change_challenges() {
        let c = commitment();
        let mut plain = Transcript::new("test", &LABELS);
        let mut bound = Transcript::new("test", &LABELS);
        let mut other_dst = Transcript::new("other", &LABELS);
        let a = plain.bind("a", &[]).unwrap();
        assert_ne!(a, bound.bind("a", &[&c]).unwrap());
        assert_ne!(a, other_dst.bind("a", &[]).unwrap());
    }

    #[test]
    fn challenges_are_chained() {
        let c = commitment();
        let mut t1 = Transcript::new("test", &LABELS);
        let mut t2 = Transcript::new("test", &LABELS);
        t1.bind("a", &[]).unwrap();
        t2.bind("a", &[&c]).unwrap();
        // Same inputs for "b", different history.
        assert_ne!(t1.bind("b", &[]).unwrap(), t2.bind("b", &[]).unwrap());
    }

    #[test]
    fn scalars_are_bound() {
        let mut t1 = Transcript::new("test", &LABELS);
        let mut t2 = Transcript::new("test", &LABELS);
        let x = t1.bind_with_scalars("a", &[], &[F::from(1u64)]).unwrap();
        let y = t2.bind_with_scalars("a", &[], &[F::from(2u64)]).unwrap();
        assert_ne!(x, y);
    }

    #[test]
    fn schedule_is_enforced() {
        let mut t = Transcript::new("test", &LABELS);
        assert_eq!(
            t.bind("b", &[]),
            Err(TranscriptError::UnexpectedLabel { expected: "a", got: "b" })
        );
        t.bind("a", &[]).unwrap();
        assert_eq!(
            t.bind("a", &[]),
            Err(TranscriptError::UnexpectedLabel { expected: "b", got: "a" })
        );
        t.bind("b", &[]).unwrap();
        t.bind("c", &[]).unwrap();
        assert_eq!(t.next_label(), None);
        assert_eq!(t.bind("c", &[]), Err(TranscriptError::Exhausted("c")));
    }
}
