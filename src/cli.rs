use anyhow::Context;
use clap::Parser;
use rlaplan_core::bravo_asn;
use rlaplan_core::contest::ContestTotals;
use serde::Deserialize;
use std::{fs::File, path::PathBuf};

/// A sample-size planner for ballot-polling risk-limiting election audits
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path of reported results file (JSON planning request or results CSV)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    results: PathBuf,
    /// Risk limit: the accepted chance of not catching a wrong outcome
    #[arg(short, long, default_value = "0.05")]
    risk_limit: f64,
    /// Number of winners the contest elects
    #[arg(short, long, default_value = "1")]
    winners: usize,
    /// Ballots cast in the contest, when higher than the reported vote total
    #[arg(short, long)]
    ballots: Option<u64>,
    /// Office to plan for, when a results CSV covers several
    #[arg(long)]
    office: Option<String>,
    /// Print the estimate for every winner/loser pairing
    #[arg(long, default_value = "false")]
    pairwise: bool,
}

/// A JSON planning request, with the field names audit tooling already uses.
#[derive(Debug, Deserialize)]
struct PlanRequest {
    candidate_votes: Vec<u64>,
    num_ballots_cast: Option<u64>,
    num_winners: Option<usize>,
}

impl Cli {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self.results.extension().and_then(|ext| ext.to_str()) {
            Some("json") => self.plan_from_request(),
            Some("csv") => self.plan_from_results_csv(),
            _ => Err(format!(
                "cannot tell the format of '{}': expected a .json or .csv file",
                self.results.display()
            )
            .into()),
        }
    }

    fn plan_from_request(&self) -> Result<(), Box<dyn std::error::Error>> {
        let reader = File::open(&self.results).with_context(|| {
            format!("failed to open planning request '{}'", self.results.display())
        })?;
        let request: PlanRequest = serde_json::de::from_reader(reader).with_context(|| {
            format!("failed to parse planning request '{}'", self.results.display())
        })?;

        let reported_votes = request.candidate_votes.iter().sum();
        let ballots_cast = self
            .ballots
            .or(request.num_ballots_cast)
            .unwrap_or(reported_votes);
        let winners = request.num_winners.unwrap_or(self.winners);
        let contest = ContestTotals::new(request.candidate_votes, ballots_cast, winners)?;

        let name = self
            .results
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("???");
        self.report(name, &contest);
        Ok(())
    }

    fn plan_from_results_csv(&self) -> Result<(), Box<dyn std::error::Error>> {
        let results = rlaplan_fmt_csv::load(&self.results, self.office.as_deref())?;
        println!(
            "Found {} candidates with {} reported votes for '{}'",
            results.totals.len(),
            results.total_votes,
            results.office
        );
        let contest = results.contest(self.winners, self.ballots)?;
        self.report(&results.office, &contest);
        Ok(())
    }

    fn report(&self, name: &str, contest: &ContestTotals) {
        println!(
            "Planning ballot-polling audit for '{name}' with risk limit {}",
            self.risk_limit
        );
        let (winner_votes, loser_votes) = contest.closest_pair();
        println!(
            "Closest pairing: {winner_votes} vs {loser_votes} votes out of {} ballots cast",
            contest.ballots_cast()
        );
        match contest.try_estimated_sample_size(self.risk_limit) {
            Ok(0) => println!("No estimate: the reported winner does not lead this pairing"),
            Ok(asn) => println!("Estimated ballots to sample: {asn}"),
            Err(err) => println!("No estimate: {err}"),
        }
        if self.pairwise {
            println!("Pairwise estimates:");
            for (winner_votes, loser_votes) in contest.pairings() {
                let asn = bravo_asn(
                    contest.ballots_cast(),
                    self.risk_limit,
                    winner_votes,
                    loser_votes,
                );
                println!("  {winner_votes} vs {loser_votes}: {asn}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlanRequest;

    #[test]
    fn planning_request_needs_only_votes() {
        let request: PlanRequest =
            serde_json::from_str(r#"{"candidate_votes": [5600, 4400]}"#).unwrap();
        assert_eq!(request.candidate_votes, vec![5_600, 4_400]);
        assert!(request.num_ballots_cast.is_none());
        assert!(request.num_winners.is_none());
    }

    #[test]
    fn planning_request_full_form() {
        let request: PlanRequest = serde_json::from_str(
            r#"{"candidate_votes": [5600, 4400], "num_ballots_cast": 10000, "num_winners": 1}"#,
        )
        .unwrap();
        assert_eq!(request.num_ballots_cast, Some(10_000));
        assert_eq!(request.num_winners, Some(1));
    }
}
