//! Polynomial Commitment Scheme (PCS): KZG on BN254
//!
//! Commitments are MSMs of canonical coefficients against the G1 powers of
//! the SRS, accumulated chunk by chunk through an [`Aggregator`]. Openings
//! are batched per evaluation point: several polynomials opened at the same
//! `ζ` share one witness, after folding with powers of a Fiat–Shamir scalar
//! bound to the digests, the point and the claimed values.
//!
//! The SRS is an explicit value handed to every call; nothing here touches
//! process-global state.
//!
//! Dev-mode behavior (`--features dev-srs`):
//! - [`Srs::dev`] synthesizes the SRS from a deterministic τ.

#![forbid(unsafe_code)]

use ark_bn254::{Bn254, G1Affine, G1Projective, G2Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{One, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::Rng;
use thiserror::Error;

use crate::opening::{divide_by_linear, evaluate, fold, fold_values};
use crate::transcript::{Transcript, TranscriptError};
use crate::{F, G1};

/// Domain separator of the per-batch folding transcript.
const BATCH_DST: &str = "plookup.kzg.batch";
/// Label of the folding scalar.
const BATCH_LABEL: &str = "gamma";

const CHUNK: usize = 1 << 12;

/// Failures of the commitment scheme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PcsError {
    /// The polynomial has more coefficients than the SRS has G1 powers.
    #[error("polynomial of degree {degree} exceeds SRS max degree {supported}")]
    DegreeTooLarge {
        /// Degree of the rejected polynomial.
        degree: usize,
        /// Largest degree the SRS supports.
        supported: usize,
    },
    /// SRS without any G1 power.
    #[error("empty SRS provided")]
    EmptySrs,
    /// Number of polynomials, digests and claimed values disagree.
    #[error("shape mismatch: expected {expected} items, got {got}")]
    Shape {
        /// Expected item count.
        expected: usize,
        /// Supplied item count.
        got: usize,
    },
    /// The final pairing equation does not hold.
    #[error("final pairing check failed")]
    PairingCheck,
    /// Folding-scalar derivation failed.
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

/// PCS commitment newtype (keeps API stable if backend changes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Commitment(pub G1);

/// Structured reference string: `[τ^i]G1` for `i = 0..=d`, plus `G2`, `[τ]G2`.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Srs {
    /// Powers `[τ^0]G1, …, [τ^d]G1`.
    pub g1_powers: Vec<G1Affine>,
    /// G2 generator.
    pub g2: G2Affine,
    /// `[τ]G2`.
    pub tau_g2: G2Affine,
}

/// The part of the SRS the verifier needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifierKey {
    /// `[1]G1`.
    pub g1: G1Affine,
    /// G2 generator.
    pub g2: G2Affine,
    /// `[τ]G2`.
    pub tau_g2: G2Affine,
}

impl Srs {
    /// Sample τ from `rng` and build an SRS supporting degree `max_degree`.
    ///
    /// τ is dropped on return; this is a local trusted setup for tests and
    /// tooling, not a ceremony.
    pub fn setup<R: Rng>(rng: &mut R, max_degree: usize) -> Self {
        let tau = F::rand(rng);
        Self::from_tau(tau, max_degree)
    }

    /// Deterministic SRS for development builds.
    #[cfg(feature = "dev-srs")]
    pub fn dev(max_degree: usize) -> Self {
        use rand::{rngs::StdRng, SeedableRng};
        let mut rng = StdRng::from_seed([42u8; 32]);
        Self::setup(&mut rng, max_degree)
    }

    /// Wrap externally produced powers (e.g. from a ceremony transcript).
    pub fn from_powers(
        g1_powers: Vec<G1Affine>,
        g2: G2Affine,
        tau_g2: G2Affine,
    ) -> Result<Self, PcsError> {
        if g1_powers.is_empty() {
            return Err(PcsError::EmptySrs);
        }
        Ok(Self { g1_powers, g2, tau_g2 })
    }

    fn from_tau(tau: F, max_degree: usize) -> Self {
        let g1 = G1Projective::from(G1Affine::generator());
        let g2 = G2Affine::generator();
        let mut powers = Vec::with_capacity(max_degree + 1);
        let mut acc = F::one();
        for _ in 0..=max_degree {
            powers.push(g1 * acc);
            acc *= tau;
        }
        let tau_g2 = (g2 * tau).into_affine();
        Self { g1_powers: G1Projective::normalize_batch(&powers), g2, tau_g2 }
    }

    /// Largest committable degree.
    pub fn max_degree(&self) -> usize {
        self.g1_powers.len().saturating_sub(1)
    }

    /// Extract the verifier key.
    pub fn verifier_key(&self) -> Result<VerifierKey, PcsError> {
        let g1 = *self.g1_powers.first().ok_or(PcsError::EmptySrs)?;
        Ok(VerifierKey { g1, g2: self.g2, tau_g2: self.tau_g2 })
    }
}

// ----------------------- Aggregator -----------------------

/// Linear aggregator over coefficient chunks (low → high).
pub struct Aggregator<'a> {
    srs: &'a Srs,
    poly_id: &'static str,
    acc: G1Projective,
    cursor: usize,
}

impl<'a> Aggregator<'a> {
    /// Create a new aggregator for a single polynomial.
    pub fn new(srs: &'a Srs, poly_id: &'static str) -> Self {
        Self { srs, poly_id, acc: G1Projective::zero(), cursor: 0 }
    }

    /// Add the next chunk of coefficients.
    pub fn add_block_coeffs(&mut self, coeffs: &[F]) -> Result<(), PcsError> {
        let end = self.cursor + coeffs.len();
        if end > self.srs.g1_powers.len() {
            return Err(PcsError::DegreeTooLarge {
                degree: end - 1,
                supported: self.srs.max_degree(),
            });
        }
        let bases = &self.srs.g1_powers[self.cursor..end];
        let term = G1Projective::msm(bases, coeffs).map_err(|got| PcsError::Shape {
            expected: bases.len(),
            got,
        })?;
        self.acc += term;
        self.cursor = end;
        Ok(())
    }

    /// Finalize and return the **aggregate** commitment.
    pub fn finalize(self) -> Commitment {
        tracing::trace!(poly = self.poly_id, coeffs = self.cursor, "commitment finalized");
        Commitment(self.acc.into_affine())
    }
}

/// Commit to a polynomial given by its canonical coefficients.
///
/// Trailing zero coefficients do not count towards the degree bound.
#[tracing::instrument(skip_all, name = "KZG::commit")]
pub fn commit(srs: &Srs, coeffs: &[F]) -> Result<Commitment, PcsError> {
    let len = coeffs.iter().rposition(|c| !c.is_zero()).map_or(0, |i| i + 1);
    let mut agg = Aggregator::new(srs, "poly");
    for tile in coeffs[..len].chunks(CHUNK) {
        agg.add_block_coeffs(tile)?;
    }
    Ok(agg.finalize())
}

// ----------------------- Openings -----------------------

/// Opening of several committed polynomials at one point.
#[derive(Debug, Clone, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct BatchOpeningProof {
    /// Evaluation point `ζ`.
    pub point: F,
    /// Claimed `p_i(ζ)`, in the order of the opened polynomials.
    pub claimed_values: Vec<F>,
    /// Commitment to `W(X) = (Σ r^i p_i(X) − Σ r^i p_i(ζ)) / (X − ζ)`.
    pub witness: Commitment,
}

/// Open every polynomial in `polys` at `point` with a single witness.
///
/// `digests[i]` must be the commitment of `polys[i]`.
#[tracing::instrument(skip_all, name = "KZG::batch_open_single_point", fields(n = polys.len()))]
pub fn batch_open_single_point(
    srs: &Srs,
    polys: &[&[F]],
    digests: &[Commitment],
    point: F,
) -> Result<BatchOpeningProof, PcsError> {
    if polys.len() != digests.len() {
        return Err(PcsError::Shape { expected: digests.len(), got: polys.len() });
    }
    let claimed_values: Vec<F> = polys.iter().map(|p| evaluate(p, point)).collect();

    let r = folding_scalar(digests, point, &claimed_values)?;
    let folded = fold(polys, r);
    let (witness_poly, _) = divide_by_linear(&folded, point);
    let witness = commit(srs, &witness_poly)?;

    Ok(BatchOpeningProof { point, claimed_values, witness })
}

/// Check a [`BatchOpeningProof`] against `digests`.
///
/// Verifies `e(C − v·G1 + ζ·W, G2) = e(W, [τ]G2)` where `C` and `v` are the
/// folded digest and value.
#[tracing::instrument(skip_all, name = "KZG::batch_verify_single_point", fields(n = digests.len()))]
pub fn batch_verify_single_point(
    vk: &VerifierKey,
    digests: &[Commitment],
    proof: &BatchOpeningProof,
) -> Result<(), PcsError> {
    if digests.len() != proof.claimed_values.len() {
        return Err(PcsError::Shape {
            expected: digests.len(),
            got: proof.claimed_values.len(),
        });
    }
    let r = folding_scalar(digests, proof.point, &proof.claimed_values)?;

    let mut powers = Vec::with_capacity(digests.len());
    let mut acc = F::one();
    for _ in digests {
        powers.push(acc);
        acc *= r;
    }
    let bases: Vec<G1Affine> = digests.iter().map(|d| d.0).collect();
    let folded_digest = G1Projective::msm(&bases, &powers)
        .map_err(|got| PcsError::Shape { expected: bases.len(), got })?;
    let folded_value = fold_values(&proof.claimed_values, r);

    let lhs = (folded_digest - vk.g1 * folded_value + proof.witness.0 * proof.point).into_affine();
    let minus_w = (-proof.witness.0.into_group()).into_affine();

    let a = [
        <Bn254 as Pairing>::G1Prepared::from(lhs),
        <Bn254 as Pairing>::G1Prepared::from(minus_w),
    ];
    let b = [
        <Bn254 as Pairing>::G2Prepared::from(vk.g2),
        <Bn254 as Pairing>::G2Prepared::from(vk.tau_g2),
    ];
    let mlo = <Bn254 as Pairing>::multi_miller_loop(a, b);
    match <Bn254 as Pairing>::final_exponentiation(mlo) {
        Some(fe) if fe.0.is_one() => Ok(()),
        _ => Err(PcsError::PairingCheck),
    }
}

fn folding_scalar(digests: &[Commitment], point: F, claimed: &[F]) -> Result<F, PcsError> {
    let mut fs = Transcript::new(BATCH_DST, &[BATCH_LABEL]);
    let refs: Vec<&Commitment> = digests.iter().collect();
    let mut scalars = Vec::with_capacity(claimed.len() + 1);
    scalars.push(point);
    scalars.extend_from_slice(claimed);
    Ok(fs.bind_with_scalars(BATCH_LABEL, &refs, &scalars)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn random_poly(rng: &mut ChaCha20Rng, len: usize) -> Vec<F> {
        (0..len).map(|_| F::rand(rng)).collect()
    }

    fn setup(max_degree: usize) -> (Srs, VerifierKey, ChaCha20Rng) {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let srs = Srs::setup(&mut rng, max_degree);
        let vk = srs.verifier_key().unwrap();
        (srs, vk, rng)
    }

    #[test]
    fn commitment_is_linear() {
        let (srs, _, mut rng) = setup(16);
        let a = random_poly(&mut rng, 10);
        let b = random_poly(&mut rng, 16);
        let sum = fold(&[&a, &b], F::one());
        let ca = commit(&srs, &a).unwrap();
        let cb = commit(&srs, &b).unwrap();
        let cs = commit(&srs, &sum).unwrap();
        assert_eq!((ca.0 + cb.0).into_affine(), cs.0);
    }

    #[test]
    fn batch_open_and_verify() {
        let (srs, vk, mut rng) = setup(32);
        let polys: Vec<Vec<F>> = [8, 32, 17, 1].iter().map(|&l| random_poly(&mut rng, l)).collect();
        let refs: Vec<&[F]> = polys.iter().map(|p| p.as_slice()).collect();
        let digests: Vec<Commitment> = polys.iter().map(|p| commit(&srs, p).unwrap()).collect();
        let point = F::rand(&mut rng);

        let proof = batch_open_single_point(&srs, &refs, &digests, point).unwrap();
        assert_eq!(proof.claimed_values[1], evaluate(&polys[1], point));
        batch_verify_single_point(&vk, &digests, &proof).unwrap();
    }

    #[test]
    fn tampered_batches_are_rejected() {
        let (srs, vk, mut rng) = setup(16);
        let polys: Vec<Vec<F>> = (0..3).map(|_| random_poly(&mut rng, 16)).collect();
        let refs: Vec<&[F]> = polys.iter().map(|p| p.as_slice()).collect();
        let digests: Vec<Commitment> = polys.iter().map(|p| commit(&srs, p).unwrap()).collect();
        let proof = batch_open_single_point(&srs, &refs, &digests, F::from(5u64)).unwrap();

        let mut bad_value = proof.clone();
        bad_value.claimed_values[2] += F::one();
        assert_eq!(
            batch_verify_single_point(&vk, &digests, &bad_value),
            Err(PcsError::PairingCheck)
        );

        let mut bad_point = proof.clone();
        bad_point.point += F::one();
        assert!(batch_verify_single_point(&vk, &digests, &bad_point).is_err());

        let mut bad_witness = proof.clone();
        bad_witness.witness = Commitment((proof.witness.0 + vk.g1).into_affine());
        assert!(batch_verify_single_point(&vk, &digests, &bad_witness).is_err());

        let mut swapped = digests.clone();
        swapped.swap(0, 1);
        assert!(batch_verify_single_point(&vk, &swapped, &proof).is_err());

        assert_eq!(
            batch_verify_single_point(&vk, &digests[..2], &proof),
            Err(PcsError::Shape { expected: 2, got: 3 })
        );
    }

    #[test]
    fn degree_bound_is_enforced() {
        let (srs, _, mut rng) = setup(7);
        let too_long = random_poly(&mut rng, 9);
        assert_eq!(
            commit(&srs, &too_long),
            Err(PcsError::DegreeTooLarge { degree: 8, supported: 7 })
        );
        // Zero padding beyond the bound is fine.
        let mut padded = random_poly(&mut rng, 8);
        padded.resize(20, F::zero());
        assert_eq!(commit(&srs, &padded).unwrap(), commit(&srs, &padded[..8]).unwrap());
    }

    #[test]
    fn empty_srs_is_rejected() {
        assert_eq!(
            Srs::from_powers(Vec::new(), G2Affine::generator(), G2Affine::generator()),
            Err(PcsError::EmptySrs)
        );
    }
}
