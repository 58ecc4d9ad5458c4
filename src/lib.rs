//! `rlaplan` estimates sample sizes for ballot-polling risk-limiting
//! election audits, using the BRAVO Average Sample Number.
//!
//! Reported results are accepted in two formats:
//!
//! - [x] JSON planning request (per-candidate vote totals)
//! - [x] OpenElections-style results CSV
//!
//! The math lives in [`rlaplan_core`]; this crate is the command-line
//! front-end used by audit planners.

mod cli;

pub use cli::Cli;
pub use rlaplan_fmt_csv;
