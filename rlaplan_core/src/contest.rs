//! Reported contest totals and their decomposition into winner/loser pairings.
//!
//! The audit math in [`crate::bravo_asn`] applies to one winner/loser pair
//! at a time. A multi-candidate contest decomposes into one pairing per
//! reported winner and reported loser; the pairing with the smallest margin
//! drives the planning estimate, since it is the hardest to confirm.

use crate::asn::{bravo_asn, try_bravo_asn, AsnError};
use thiserror::Error;

/// The error type for operations on [`ContestTotals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContestError {
    /// The contest must elect at least one winner.
    #[error("the contest elects no winners")]
    NoWinners,
    /// There must be strictly more candidates than winners,
    /// or no winner/loser pairing exists.
    #[error("the contest needs more candidates than winners")]
    NotEnoughCandidates,
}

/// Reported results of a contest, as supplied by audit-planning tooling:
/// per-candidate vote totals, the number of ballots cast, and how many
/// winners the contest elects.
///
/// Totals are anonymous counts; the caller keeps track of which candidate
/// each entry belongs to.
#[derive(Debug, Clone)]
pub struct ContestTotals {
    totals: Vec<u64>,
    ballots_cast: u64,
    winners: usize,
}

impl ContestTotals {
    /// Creates validated contest totals.
    ///
    /// Fails unless the contest elects at least one winner and has strictly
    /// more candidates than winners.
    pub fn new(
        totals: Vec<u64>,
        ballots_cast: u64,
        winners: usize,
    ) -> Result<Self, ContestError> {
        if winners == 0 {
            return Err(ContestError::NoWinners);
        }
        if totals.len() <= winners {
            return Err(ContestError::NotEnoughCandidates);
        }
        Ok(Self {
            totals,
            ballots_cast,
            winners,
        })
    }

    /// The number of ballots cast in the contest.
    pub fn ballots_cast(&self) -> u64 {
        self.ballots_cast
    }

    /// The number of winners the contest elects.
    pub fn winners(&self) -> usize {
        self.winners
    }

    /// The winner/loser pairing with the smallest reported margin:
    /// the lowest-ranked reported winner against the highest-ranked
    /// reported loser.
    pub fn closest_pair(&self) -> (u64, u64) {
        let ranked = self.ranked_totals();
        (ranked[self.winners - 1], ranked[self.winners])
    }

    /// Every winner/loser pairing, highest-ranked winners first.
    pub fn pairings(&self) -> Vec<(u64, u64)> {
        let ranked = self.ranked_totals();
        let (winners, losers) = ranked.split_at(self.winners);
        winners
            .iter()
            .flat_map(|w| losers.iter().map(|l| (*w, *l)))
            .collect()
    }

    /// Estimated number of ballots to sample to confirm the contest at the
    /// given risk limit, driven by the closest pairing.
    ///
    /// Returns 0 when no estimate is computable, see [`bravo_asn`].
    pub fn estimated_sample_size(&self, risk_limit: f64) -> u64 {
        let (winner_votes, loser_votes) = self.closest_pair();
        bravo_asn(self.ballots_cast, risk_limit, winner_votes, loser_votes)
    }

    /// Fallible variant of [`Self::estimated_sample_size`].
    pub fn try_estimated_sample_size(&self, risk_limit: f64) -> Result<u64, AsnError> {
        let (winner_votes, loser_votes) = self.closest_pair();
        try_bravo_asn(self.ballots_cast, risk_limit, winner_votes, loser_votes)
    }

    fn ranked_totals(&self) -> Vec<u64> {
        let mut ranked = self.totals.clone();
        ranked.sort_unstable_by(|a, b| b.cmp(a));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_pair_single_winner() {
        let contest = ContestTotals::new(vec![4_400, 5_600], 10_000, 1).unwrap();
        assert_eq!(contest.closest_pair(), (5_600, 4_400));
    }

    #[test]
    fn closest_pair_multi_winner() {
        // Two seats: the weaker winner (3000) faces the stronger loser (2000).
        let contest = ContestTotals::new(vec![2_000, 5_000, 3_000, 500], 12_000, 2).unwrap();
        assert_eq!(contest.closest_pair(), (3_000, 2_000));
    }

    #[test]
    fn pairing_table_is_winners_by_losers() {
        let contest = ContestTotals::new(vec![5_000, 3_000, 2_000, 500], 12_000, 2).unwrap();
        let pairings = contest.pairings();
        assert_eq!(pairings.len(), 4);
        assert_eq!(pairings[0], (5_000, 2_000));
        assert_eq!(pairings[3], (3_000, 500));
    }

    #[test]
    fn rejects_degenerate_contests() {
        assert_eq!(
            ContestTotals::new(vec![100, 50], 200, 0).unwrap_err(),
            ContestError::NoWinners
        );
        assert_eq!(
            ContestTotals::new(vec![100, 50], 200, 2).unwrap_err(),
            ContestError::NotEnoughCandidates
        );
    }
}
