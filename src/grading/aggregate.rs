use serde::Serialize;
use tracing::trace;

use super::config::{GradingConfig, Subject};
use super::error::EngineError;
use super::mapper::{calculate_total, calculate_weighted_points, gp_for_total};
use super::validation::{check_grading, validate_subjects};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub code: String,
    pub total: f64,
    pub gp: u32,
    pub credits: u32,
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SgpaResult {
    /// One entry per input subject, in input order
    pub subjects: Vec<SubjectResult>,
    /// Summed in 64 bits so large per-subject credits cannot overflow
    pub total_credits: u64,
    pub total_weighted: f64,
    /// `total_weighted / total_credits`, rounded to two decimals
    pub sgpa: f64,
}

/// Compute the credit-weighted SGPA for a set of subjects.
///
/// Subjects and config are validated before anything is computed. Duplicate
/// subject codes are not detected.
pub fn calculate_sgpa(subjects: &[Subject], config: &GradingConfig) -> Result<SgpaResult, EngineError> {
    check_grading(config)?;
    validate_subjects(subjects, config)?;
    Ok(aggregate(subjects, config))
}

/// Aggregation over already-validated input. Planners call this on the
/// hypothetical subject sets they build.
pub(crate) fn aggregate(subjects: &[Subject], config: &GradingConfig) -> SgpaResult {
    let mut total_credits: u64 = 0;
    let mut total_weighted = 0.0;

    let results = subjects
        .iter()
        .map(|subject| {
            let total = calculate_total(subject.cie, subject.see, config);
            let gp = gp_for_total(total, config);
            let weighted = calculate_weighted_points(gp, subject.credits);
            trace!(code = %subject.code, total, gp, weighted, "subject graded");

            total_credits += u64::from(subject.credits);
            total_weighted += weighted;

            SubjectResult {
                code: subject.code.clone(),
                total,
                gp,
                credits: subject.credits,
                weighted,
            }
        })
        .collect();

    SgpaResult {
        subjects: results,
        total_credits,
        total_weighted,
        sgpa: round2(total_weighted / total_credits as f64),
    }
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
