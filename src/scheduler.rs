//! Prover & verifier orchestration
//!
//! This module wires the lookup argument in **Fiat–Shamir order**. Each
//! challenge is bound to exactly the commitments fixed before it:
//!
//! 1. commit `t, f, h1, h2`  → `β`
//! 2. (nothing new)          → `γ`
//! 3. commit `z`             → `α`
//! 4. commit `h` (quotient)  → `ν`
//!
//! and the proof closes with two batched KZG openings: `h1, h2, t, z, f, h`
//! at `ν`, and `h1, h2, t, z` at `ν·ω`.
//!
//! The verifier replays the same transcript, checks that both batches are
//! opened at the expected points, verifies the pairings, and then checks the
//! folded identity (see [`crate::identity`]).

#![forbid(unsafe_code)]

use crate::{
    accumulator::evaluate_accumulation,
    domain::Domain,
    identity::{self, OpeningClaims},
    pcs::{self, Commitment, Srs},
    quotient::{compute_quotient, CosetEvals},
    table::{small_domain_size, PreparedInputs, SortedMerge},
    transcript::{Transcript, TranscriptError},
    LookupError, Proof, F,
};

/// Domain separator of the proof transcript.
pub const PROOF_DST: &str = "plookup.vector";

/// Challenge labels, in derivation order.
pub const CHALLENGE_LABELS: [&str; 4] = ["beta", "gamma", "alpha", "nu"];

/// The four Fiat–Shamir challenges of a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenges {
    /// Compression scalar for adjacent pairs.
    pub beta: F,
    /// Shift of compressed values.
    pub gamma: F,
    /// Folding scalar of the four constraints.
    pub alpha: F,
    /// Evaluation point.
    pub nu: F,
}

/// Prover orchestrator.
pub struct Prover<'a> {
    /// SRS and prover options.
    pub params: &'a crate::ProveParams,
}

/// Verifier orchestrator (replays the prover's transcript and checks KZG).
pub struct Verifier<'a> {
    /// Verifier key.
    pub params: &'a crate::VerifyParams,
}

impl<'a> Prover<'a> {
    /// Prove that every entry of `f` occurs in `t`.
    ///
    /// Unless [`crate::ProveParams::reject_non_members`] is set, a vector with
    /// non-members still yields a proof; the verifier rejects it.
    pub fn prove(&self, f: &[F], t: &[F]) -> Result<Proof, LookupError> {
        prove_with_srs(&self.params.srs, self.params.reject_non_members, f, t)
    }
}

#[tracing::instrument(skip_all, name = "plookup::prove", fields(n_f = f.len(), n_t = t.len()))]
pub(crate) fn prove_with_srs(
    srs: &Srs,
    reject_non_members: bool,
    f: &[F],
    t: &[F],
) -> Result<Proof, LookupError> {
    if t.is_empty() {
        return Err(LookupError::EmptyTable);
    }
    if f.is_empty() {
        return Err(LookupError::EmptyVector);
    }

    let small = Domain::new(small_domain_size(f.len(), t.len()))?;
    let big = Domain::new(2 * small.n)?;
    tracing::debug!(small = small.n, big = big.n, "domains sized");

    let prepared = PreparedInputs::new(f, t, &small);
    if reject_non_members {
        if let Some(position) = prepared.first_non_member(f) {
            return Err(LookupError::NotInTable { position });
        }
    }

    let mut fs = Transcript::new(PROOF_DST, &CHALLENGE_LABELS);

    // =========================================================================
    // Phase A: table, vector and sorted merge → β, γ
    // =========================================================================
    let merge = SortedMerge::new(&prepared);
    let ct = small.interpolate(&prepared.lt);
    let cf = small.interpolate(&prepared.lf);
    let ch1 = small.interpolate(&merge.h1);
    let ch2 = small.interpolate(&merge.h2);

    let t_comm = pcs::commit(srs, &ct)?;
    let f_comm = pcs::commit(srs, &cf)?;
    let h1_comm = pcs::commit(srs, &ch1)?;
    let h2_comm = pcs::commit(srs, &ch2)?;

    let beta = fs.bind("beta", &[&t_comm, &f_comm, &h1_comm, &h2_comm])?;
    let gamma = fs.bind("gamma", &[])?;

    // =========================================================================
    // Phase B: accumulator → α
    // =========================================================================
    let lz = evaluate_accumulation(&prepared.lf, &prepared.lt, &merge.h1, &merge.h2, beta, gamma);
    let cz = small.interpolate(&lz);
    drop(lz);
    let z_comm = pcs::commit(srs, &cz)?;
    let alpha = fs.bind("alpha", &[&z_comm])?;

    // =========================================================================
    // Phase C: quotient on the big coset → ν
    // =========================================================================
    let evals = CosetEvals::lift(&big, &cz, &ch1, &ch2, &ct, &cf);
    let ch = compute_quotient(&evals, beta, gamma, alpha, &big, &small);
    drop(evals);
    let h_comm = pcs::commit(srs, &ch)?;
    let nu = fs.bind("nu", &[&h_comm])?;

    // =========================================================================
    // Phase D: batched openings at ν and ν·ω
    // =========================================================================
    let batched_proof = pcs::batch_open_single_point(
        srs,
        &[&ch1, &ch2, &ct, &cz, &cf, &ch],
        &[h1_comm, h2_comm, t_comm, z_comm, f_comm, h_comm],
        nu,
    )?;
    let batched_proof_shifted = pcs::batch_open_single_point(
        srs,
        &[&ch1, &ch2, &ct, &cz],
        &[h1_comm, h2_comm, t_comm, z_comm],
        nu * small.omega,
    )?;

    Ok(Proof {
        size: small.n as u64,
        h1: h1_comm,
        h2: h2_comm,
        t: t_comm,
        z: z_comm,
        f: f_comm,
        h: h_comm,
        batched_proof,
        batched_proof_shifted,
    })
}

/// Rebuild the proof transcript from its commitments.
pub fn replay_challenges(proof: &Proof) -> Result<Challenges, TranscriptError> {
    let mut fs = Transcript::new(PROOF_DST, &CHALLENGE_LABELS);
    let beta = fs.bind("beta", &[&proof.t, &proof.f, &proof.h1, &proof.h2])?;
    let gamma = fs.bind("gamma", &[])?;
    let alpha = fs.bind("alpha", &[&proof.z])?;
    let nu = fs.bind("nu", &[&proof.h])?;
    Ok(Challenges { beta, gamma, alpha, nu })
}

impl<'a> Verifier<'a> {
    /// Verify a lookup proof.
    #[tracing::instrument(skip_all, name = "plookup::verify", fields(size = proof.size))]
    pub fn verify(&self, proof: &Proof) -> Result<(), LookupError> {
        let res = self.check(proof);
        if let Err(e) = &res {
            tracing::warn!(error = %e, "lookup proof rejected");
        }
        res
    }

    fn check(&self, proof: &Proof) -> Result<(), LookupError> {
        if proof.size < 2 {
            return Err(LookupError::MalformedProof);
        }
        let small = Domain::from_size(proof.size).map_err(|_| LookupError::MalformedProof)?;
        let claims = OpeningClaims::new(&proof.batched_proof, &proof.batched_proof_shifted)?;

        let challenges = replay_challenges(proof)?;
        if proof.batched_proof.point != challenges.nu
            || proof.batched_proof_shifted.point != challenges.nu * small.omega
        {
            return Err(LookupError::OpeningPoint);
        }

        let vk = &self.params.vk;
        let at_nu: [Commitment; 6] = [proof.h1, proof.h2, proof.t, proof.z, proof.f, proof.h];
        pcs::batch_verify_single_point(vk, &at_nu, &proof.batched_proof)
            .map_err(|source| LookupError::Opening { point: "nu", source })?;
        pcs::batch_verify_single_point(vk, &at_nu[..4], &proof.batched_proof_shifted)
            .map_err(|source| LookupError::Opening { point: "nu*omega", source })?;

        identity::check(&claims, &challenges, &small)
    }
}
