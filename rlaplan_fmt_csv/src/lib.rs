//! Loader for reported election results in OpenElections-style CSV exports.
//!
//! The loader expects a header row naming at least the `office`, `candidate`
//! and `votes` columns (any further columns, such as `county`, `precinct` or
//! `party`, are ignored). Rows are filtered to a single office and the votes
//! of the remaining rows are summed per candidate, yielding the reported
//! totals that audit planning starts from.

use anyhow::Context;
use log::info;
use rlaplan_core::contest::{ContestError, ContestTotals};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// The error type for results files that parse but cannot be planned from.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// No row matched the requested office.
    #[error("no results found for office '{0}'")]
    UnknownOffice(String),
    /// The file contains no candidate rows at all.
    #[error("the results file contains no candidate rows")]
    NoCandidates,
}

/// Reported vote totals for one office, summed across precinct rows.
#[derive(Debug, Clone)]
pub struct ElectionTotals {
    /// The office the totals belong to.
    pub office: String,
    /// Reported votes per candidate.
    pub totals: BTreeMap<String, u64>,
    /// Sum of all reported votes for the office.
    pub total_votes: u64,
}

impl ElectionTotals {
    /// Builds validated [`ContestTotals`] for these results.
    ///
    /// Ballots cast defaults to the office-wide vote total when the caller
    /// has no better figure; the true count is usually higher, which makes
    /// the resulting estimate conservative in the sampling fraction.
    pub fn contest(
        &self,
        winners: usize,
        ballots_cast: Option<u64>,
    ) -> Result<ContestTotals, ContestError> {
        ContestTotals::new(
            self.totals.values().copied().collect(),
            ballots_cast.unwrap_or(self.total_votes),
            winners,
        )
    }
}

#[derive(Debug, Deserialize)]
struct ResultsRow {
    office: String,
    candidate: String,
    votes: u64,
}

/// Loads per-candidate vote totals from an OpenElections-style CSV export.
///
/// Rows are filtered to `office` when one is given, otherwise to the first
/// office encountered in the file.
pub fn load(path: &Path, office: Option<&str>) -> anyhow::Result<ElectionTotals> {
    info!("loading reported results from '{}'", path.display());
    let file = File::open(path)
        .with_context(|| format!("failed to open results file '{}'", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut first_office: Option<String> = None;
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for (index, record) in reader.deserialize().enumerate() {
        // Header is line 1, so the first data row is line 2.
        let row: ResultsRow = record.with_context(|| {
            format!("malformed results row on line {} of '{}'", index + 2, path.display())
        })?;
        if row.candidate.trim().is_empty() {
            continue;
        }
        let keep = if let Some(wanted) = office {
            row.office == wanted
        } else if let Some(first) = first_office.as_deref() {
            row.office == first
        } else {
            first_office = Some(row.office.clone());
            true
        };
        if keep {
            *totals.entry(row.candidate).or_default() += row.votes;
        }
    }

    let office = match office {
        Some(wanted) if totals.is_empty() => {
            return Err(LoadError::UnknownOffice(wanted.to_owned()).into());
        }
        Some(wanted) => wanted.to_owned(),
        None => first_office.ok_or(LoadError::NoCandidates)?,
    };
    let total_votes = totals.values().sum();
    Ok(ElectionTotals {
        office,
        totals,
        total_votes,
    })
}
