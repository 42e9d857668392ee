use serde::Serialize;

use super::aggregate::{round2, SgpaResult};
use super::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterSummary {
    pub sgpa: f64,
    pub credits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CgpaResult {
    pub semesters: Vec<SemesterSummary>,
    pub total_credits: u64,
    pub total_weighted: f64,
    pub cgpa: f64,
}

/// Cumulative GPA over several semesters.
///
/// Weighted by credits through the unrounded semester sums, so a rounded
/// SGPA never leaks into the cumulative figure.
pub fn calculate_cgpa(semesters: &[SgpaResult]) -> Result<CgpaResult, EngineError> {
    if semesters.is_empty() {
        return Err(EngineError::invalid("semesters", "at least one semester is required"));
    }

    let total_credits = semesters
        .iter()
        .try_fold(0u64, |acc, s| acc.checked_add(s.total_credits))
        .ok_or_else(|| EngineError::invalid("semesters", "total credits overflow"))?;
    if total_credits == 0 {
        return Err(EngineError::invalid("semesters", "total credits must be positive"));
    }
    let total_weighted: f64 = semesters.iter().map(|s| s.total_weighted).sum();

    Ok(CgpaResult {
        semesters: semesters
            .iter()
            .map(|s| SemesterSummary {
                sgpa: s.sgpa,
                credits: s.total_credits,
            })
            .collect(),
        total_credits,
        total_weighted,
        cgpa: round2(total_weighted / total_credits as f64),
    })
}
