//! Public surface & core types
//!
//! A plookup vector lookup argument over BN254: the prover convinces the
//! verifier that every entry of a vector `f` occurs in a table `t`, with KZG
//! commitments and a BLAKE3 Fiat–Shamir transcript.
//!
//! This file defines the crate's public API, the [`Proof`] object produced by
//! the prover and consumed by the verifier, and the error type aggregating
//! every failure of the pipeline.
//!
//! ## Transcript & Ordering (Public Contract)
//!
//! The verifier **replays** the Fiat–Shamir transcript in the following order:
//!
//! 1. Commitments `t, f, h1, h2` → challenge `β`.
//! 2. Challenge `γ` (no new binding).
//! 3. Accumulator commitment `z` → challenge `α`.
//! 4. Quotient commitment `h` → evaluation point `ν`.
//!
//! The two **opening sets** are fixed:
//! ```text
//!   at ν   : [ h1, h2, t, z, f, h ]
//!   at ν·ω : [ h1, h2, t, z ]
//! ```
//! and the claimed values of each batch follow the same order.
//!
//! ## Example
//!
//! ```no_run
//! use plookup::{pcs::Srs, prove_lookup_vector, verify_lookup_vector, F};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let srs = Srs::setup(&mut rng, 1 << 10);
//! let t: Vec<F> = (0u64..16).map(F::from).collect();
//! let f: Vec<F> = [3u64, 3, 7, 0].iter().copied().map(F::from).collect();
//!
//! let proof = prove_lookup_vector(&srs, &f, &t)?;
//! verify_lookup_vector(&srs.verifier_key()?, &proof)?;
//! # Ok::<(), plookup::LookupError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

use std::sync::Arc;

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use thiserror::Error;

/// Domain & transforms (radix-2 subgroups, DIF/DIT NTT, coset addressing).
pub mod domain;
/// Horner evaluation, division by `X − ζ`, and linear folding.
pub mod opening;
/// Fiat–Shamir transcript (ordered labels, hash→field).
pub mod transcript;
/// KZG commitments and batched single-point openings.
pub mod pcs;
/// Padding, sorting, and the sorted-merge split.
pub mod table;
/// Grand-product accumulator `Z`.
pub mod accumulator;
/// Constraint evaluation on the big coset and the quotient `h`.
pub mod quotient;
/// Verifier-side identity at `ν`.
pub mod identity;
/// Prover/verifier orchestration in Fiat–Shamir order.
pub mod scheduler;

pub use pcs::{BatchOpeningProof, Commitment, PcsError, Srs, VerifierKey};
pub use scheduler::{Prover, Verifier};

/// Scalar field used across the crate (BN254).
pub type F = ark_bn254::Fr;

/// G1 affine group element used for commitments.
pub type G1 = ark_bn254::G1Affine;

/// Every way proving or verifying a lookup can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The table has no entries.
    #[error("lookup table is empty")]
    EmptyTable,
    /// The vector has no entries.
    #[error("lookup vector is empty")]
    EmptyVector,
    /// Eager membership check failed (see [`ProveParams::reject_non_members`]).
    #[error("vector entry at position {position} is not in the table")]
    NotInTable {
        /// Index into the vector of the first non-member.
        position: usize,
    },
    /// Domain construction failed.
    #[error(transparent)]
    Domain(#[from] domain::DomainError),
    /// Committing or opening failed on the prover side.
    #[error(transparent)]
    Commitment(#[from] PcsError),
    /// Challenge derivation failed.
    #[error(transparent)]
    Transcript(#[from] transcript::TranscriptError),
    /// The proof has an invalid domain size or claimed-value counts.
    #[error("malformed proof")]
    MalformedProof,
    /// A batch is opened at a point other than the one the transcript dictates.
    #[error("opening point does not match the transcript")]
    OpeningPoint,
    /// A batched opening does not verify.
    #[error("batched opening at {point} failed: {source}")]
    Opening {
        /// `"nu"` or `"nu*omega"`.
        point: &'static str,
        /// Underlying PCS failure.
        source: PcsError,
    },
    /// The folded lookup identity does not hold at `ν`.
    #[error("lookup identity does not hold")]
    VerificationFailed,
}

/// Parameters required by the prover.
#[derive(Clone, Debug)]
pub struct ProveParams {
    /// Structured reference string; must support degree `2s − 2`.
    pub srs: Arc<Srs>,
    /// Fail with [`LookupError::NotInTable`] before committing anything when
    /// the vector has a non-member. Off by default: the proof is produced and
    /// the verifier rejects it.
    pub reject_non_members: bool,
}

impl ProveParams {
    /// Default options over `srs`.
    pub fn new(srs: Arc<Srs>) -> Self {
        Self { srs, reject_non_members: false }
    }
}

/// Parameters required by the verifier.
#[derive(Clone, Copy, Debug)]
pub struct VerifyParams {
    /// Verifier key extracted from the prover's SRS.
    pub vk: VerifierKey,
}

/// The plookup proof object.
///
/// Six commitments and two batched openings. The small-domain size is carried
/// explicitly so the verifier does not need the input lengths.
#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof {
    /// Small-domain size `s` (power of two).
    pub size: u64,
    /// Lower half of the sorted merge.
    pub h1: Commitment,
    /// Upper half of the sorted merge.
    pub h2: Commitment,
    /// Padded sorted table.
    pub t: Commitment,
    /// Grand-product accumulator.
    pub z: Commitment,
    /// Padded vector.
    pub f: Commitment,
    /// Quotient.
    pub h: Commitment,
    /// `h1, h2, t, z, f, h` opened at `ν`.
    pub batched_proof: BatchOpeningProof,
    /// `h1, h2, t, z` opened at `ν·ω`.
    pub batched_proof_shifted: BatchOpeningProof,
}

/// Prove that every entry of `f` occurs in `t`.
///
/// A non-member in `f` does not make this fail: the proof is produced and
/// rejected by [`verify_lookup_vector`]. Use [`Prover`] with
/// [`ProveParams::reject_non_members`] for an early error.
pub fn prove_lookup_vector(srs: &Srs, f: &[F], t: &[F]) -> Result<Proof, LookupError> {
    scheduler::prove_with_srs(srs, false, f, t)
}

/// Verify a proof produced by [`prove_lookup_vector`].
pub fn verify_lookup_vector(vk: &VerifierKey, proof: &Proof) -> Result<(), LookupError> {
    let params = VerifyParams { vk: *vk };
    Verifier { params: &params }.verify(proof)
}
