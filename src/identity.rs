//! Verifier equation at the evaluation point
//!
//! Given the ten claimed evaluations of the two batched openings, the
//! verifier rebuilds the folded constraint at `ν` and compares it with
//! `h(ν)·(ν^N − 1)`:
//!
//! ```text
//!   lhs  = (ν − g)·z·(1+β)(γ+f)(t + β·t_s + γ(1+β))
//!   rhs  = (ν − g)·z_s·(h1 + β·h1_s + γ(1+β))(h2 + β·h2_s + γ(1+β))
//!   L0   = (ν^N − 1)/(ν − 1),  Ln = (ν^N − 1)/(ν − g),  g = ω^{N-1}
//!   fold = (((Ln·(h1 − h2_s))·α + Ln·(z − 1))·α + L0·(z − 1))·α + (lhs − rhs)
//! ```
//!
//! Values suffixed `_s` are taken at `ν·ω`.

#![forbid(unsafe_code)]

use ark_ff::{Field, One};

use crate::accumulator::compress_pair;
use crate::domain::{pow_u64, Domain};
use crate::pcs::BatchOpeningProof;
use crate::scheduler::Challenges;
use crate::{LookupError, F};

/// Number of polynomials opened at `ν` (`h1, h2, t, z, f, h`).
pub const OPENED_AT_NU: usize = 6;
/// Number of polynomials opened at `ν·ω` (`h1, h2, t, z`).
pub const OPENED_AT_SHIFTED_NU: usize = 4;

/// Claimed evaluations, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningClaims {
    /// `h1(ν)`.
    pub h1: F,
    /// `h2(ν)`.
    pub h2: F,
    /// `t(ν)`.
    pub t: F,
    /// `z(ν)`.
    pub z: F,
    /// `f(ν)`.
    pub f: F,
    /// Quotient `h(ν)`.
    pub h: F,
    /// `h1(ν·ω)`.
    pub h1_s: F,
    /// `h2(ν·ω)`.
    pub h2_s: F,
    /// `t(ν·ω)`.
    pub t_s: F,
    /// `z(ν·ω)`.
    pub z_s: F,
}

impl OpeningClaims {
    /// Read the claims out of the two batches, checking their shapes.
    pub fn new(at_nu: &BatchOpeningProof, at_shifted: &BatchOpeningProof) -> Result<Self, LookupError> {
        match (at_nu.claimed_values.as_slice(), at_shifted.claimed_values.as_slice()) {
            (&[h1, h2, t, z, f, h], &[h1_s, h2_s, t_s, z_s]) => {
                Ok(Self { h1, h2, t, z, f, h, h1_s, h2_s, t_s, z_s })
            }
            _ => Err(LookupError::MalformedProof),
        }
    }
}

/// Check the folded lookup identity at `challenges.nu` over `small`.
pub fn check(claims: &OpeningClaims, challenges: &Challenges, small: &Domain) -> Result<(), LookupError> {
    let Challenges { beta, gamma, alpha, nu } = *challenges;
    let one = F::one();
    let g = small.element(small.n - 1);
    let c = gamma * (one + beta);

    let lhs = (nu - g)
        * claims.z
        * (one + beta)
        * (gamma + claims.f)
        * compress_pair(claims.t, claims.t_s, beta, c);
    let rhs = (nu - g)
        * claims.z_s
        * compress_pair(claims.h1, claims.h1_s, beta, c)
        * compress_pair(claims.h2, claims.h2_s, beta, c);

    let xn = pow_u64(nu, small.n as u64) - one;
    let inv_nu_minus_one = (nu - one).inverse().ok_or(LookupError::VerificationFailed)?;
    let inv_nu_minus_g = (nu - g).inverse().ok_or(LookupError::VerificationFailed)?;
    let l0 = xn * inv_nu_minus_one;
    let ln = xn * inv_nu_minus_g;

    let h0 = l0 * (claims.z - one);
    let hn = ln * (claims.z - one);
    let h1h2 = ln * (claims.h1 - claims.h2_s);

    let folded = ((h1h2 * alpha + hn) * alpha + h0) * alpha + (lhs - rhs);
    if folded == claims.h * xn {
        Ok(())
    } else {
        Err(LookupError::VerificationFailed)
    }
}
