// BRAVO: Ballot-polling Risk-limiting Audits to Verify Outcomes,
// Mark Lindeman, Philip B. Stark, Vincent S. Yates.
// 2012 Electronic Voting Technology Workshop/Workshop on Trustworthy Elections (EVT/WOTE '12)
// https://www.usenix.org/conference/evtwote12/workshop-program/presentation/lindeman

use log::warn;
use thiserror::Error;

/// The error type for sample-size estimates that cannot be computed.
///
/// The winner not leading is *not* an error: it is a defined zero result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AsnError {
    /// The contest reports no ballots cast.
    #[error("no ballots cast in contest")]
    NoBallotsCast,
    /// The risk limit lies outside the open interval (0, 1).
    #[error("risk limit must lie strictly between 0 and 1")]
    RiskLimitOutOfRange,
    /// The likelihood-ratio denominator vanished, so no finite
    /// sample size bounds the audit.
    #[error("vote shares yield no usable likelihood ratio")]
    DegenerateShares,
    /// Intermediate arithmetic produced a non-finite value.
    #[error("sample size estimate is not finite")]
    NonFinite,
}

/// Computes the BRAVO Average Sample Number: the expected number of ballots
/// a ballot-polling audit draws before confirming the reported outcome at
/// the given risk limit.
///
/// Returns 0 both when the reported winner does not strictly lead the
/// reported loser (no estimate is defined) and when the computation fails
/// on degenerate input; failures are additionally reported through the
/// [`log`] facade. Callers that need to tell the two zeros apart should use
/// [`try_bravo_asn`].
pub fn bravo_asn(total_ballots: u64, risk_limit: f64, winner_votes: u64, loser_votes: u64) -> u64 {
    try_bravo_asn(total_ballots, risk_limit, winner_votes, loser_votes).unwrap_or_else(|err| {
        warn!(
            "sample size not computable for {winner_votes} vs {loser_votes} votes out of {total_ballots} ballots at risk limit {risk_limit}: {err}"
        );
        0
    })
}

/// Computes the BRAVO Average Sample Number, distinguishing failures.
///
/// Returns `Ok(0)` when the reported winner does not strictly lead, and a
/// typed [`AsnError`] whenever the estimate is undefined for the inputs.
/// Whenever the winner leads and the inputs are sound, the estimate is a
/// positive ballot count, rounded up so the plan never under-samples.
pub fn try_bravo_asn(
    total_ballots: u64,
    risk_limit: f64,
    winner_votes: u64,
    loser_votes: u64,
) -> Result<u64, AsnError> {
    if winner_votes <= loser_votes {
        return Ok(0);
    }
    if total_ballots == 0 {
        return Err(AsnError::NoBallotsCast);
    }
    if risk_limit <= 0f64 || risk_limit >= 1f64 {
        return Err(AsnError::RiskLimitOutOfRange);
    }

    let n_wl = (winner_votes + loser_votes) as f64;
    // Winner's share of the votes within this pairing.
    let s_w = winner_votes as f64 / n_wl;
    let z_w = (2f64 * s_w).ln();
    // ln is undefined at 0 when the loser received no votes; the losing-side
    // term is defined as exactly 0 in that case.
    let z_l = if 2f64 * (1f64 - s_w) > 0f64 {
        (2f64 * (1f64 - s_w)).ln()
    } else {
        0f64
    };

    let p_w = winner_votes as f64 / n_wl;
    let p_l = loser_votes as f64 / n_wl;
    // Fraction of all cast ballots that went to either candidate.
    let p = n_wl / total_ballots as f64;

    let denominator = p * (p_w * z_w + p_l * z_l);
    if denominator <= 0f64 {
        return Err(AsnError::DegenerateShares);
    }
    let asn = ((1f64 / risk_limit).ln() + z_w / 2f64) / denominator;
    if !asn.is_finite() {
        return Err(AsnError::NonFinite);
    }
    Ok(asn.ceil() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_contest() {
        // Hand-derived from the formula: z_w = ln 1.12, z_l = ln 0.88,
        // numerator ~ 2.3592494, denominator ~ 0.0072174.
        assert_eq!(bravo_asn(10_000, 0.1, 5_600, 4_400), 327);
    }

    #[test]
    fn tie_has_no_estimate() {
        assert_eq!(bravo_asn(1_000, 0.1, 50, 50), 0);
        assert_eq!(try_bravo_asn(1_000, 0.1, 50, 50), Ok(0));
    }

    #[test]
    fn trailing_winner_has_no_estimate() {
        assert_eq!(bravo_asn(1_000, 0.1, 40, 60), 0);
        assert_eq!(try_bravo_asn(1_000, 0.1, 40, 60), Ok(0));
    }

    #[test]
    fn loser_without_votes() {
        // Exercises the z_l guard: 2 * (1 - s_w) == 0 must not hit ln.
        let asn = try_bravo_asn(1_000, 0.1, 100, 0).expect("estimate is defined");
        assert!(asn > 0);
    }

    #[test]
    fn no_ballots_cast() {
        assert_eq!(
            try_bravo_asn(0, 0.1, 60, 40),
            Err(AsnError::NoBallotsCast)
        );
        assert_eq!(bravo_asn(0, 0.1, 60, 40), 0);
    }

    #[test]
    fn risk_limit_bounds() {
        for risk_limit in [0f64, -0.2, 1f64, 1.5] {
            assert_eq!(
                try_bravo_asn(1_000, risk_limit, 60, 40),
                Err(AsnError::RiskLimitOutOfRange)
            );
            assert_eq!(bravo_asn(1_000, risk_limit, 60, 40), 0);
        }
    }

    #[test]
    fn tighter_risk_limit_never_shrinks_sample() {
        let mut previous = 0;
        for risk_limit in [0.2, 0.1, 0.05, 0.01, 0.001] {
            let asn = bravo_asn(10_000, risk_limit, 5_600, 4_400);
            assert!(asn >= previous);
            previous = asn;
        }
    }

    #[test]
    fn leading_winner_yields_positive_integer() {
        for (winner, loser) in [(51, 49), (600, 400), (9_000, 1_000)] {
            let asn = try_bravo_asn(10_000, 0.05, winner, loser).expect("estimate is defined");
            assert!(asn > 0);
        }
    }
}
