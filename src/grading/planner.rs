use serde::Serialize;
use tracing::debug;

use super::aggregate::aggregate;
use super::config::{GradingConfig, Subject};
use super::error::EngineError;
use super::validation::{check_grading, validate_subjects, validate_target};

/// Outcome of raising a single subject's exam score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinglePlan {
    pub code: String,
    pub current_see: f64,
    pub possible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_see_to_reach_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_sgpa: Option<f64>,
}

impl SinglePlan {
    /// Extra exam marks needed over the current score
    pub fn increase(&self) -> Option<f64> {
        self.min_see_to_reach_target
            .map(|see| (see - self.current_see).max(0.0))
    }
}

/// Find the smallest whole-mark exam score for `target_code` that lifts the
/// SGPA to `target_sgpa`, holding every other subject at its current score.
///
/// Scores are never lowered. When the current score already meets the target
/// it is returned as is; otherwise the search covers `[ceil(current_see), max_see]`.
/// SGPA is non-decreasing in a single subject's exam score, so a binary search
/// over that range finds the minimum.
pub fn find_minimal_see_for_target(
    subjects: &[Subject],
    target_code: &str,
    target_sgpa: f64,
    config: &GradingConfig,
) -> Result<SinglePlan, EngineError> {
    check_grading(config)?;
    validate_subjects(subjects, config)?;
    validate_target(target_sgpa)?;

    let index = subjects
        .iter()
        .position(|s| s.code == target_code)
        .ok_or_else(|| EngineError::UnknownSubject {
            code: target_code.to_string(),
        })?;
    let current_see = subjects[index].see;

    let mut scenario = subjects.to_vec();
    let mut sgpa_at = |see: f64| {
        scenario[index] = subjects[index].with_see(see);
        aggregate(&scenario, config).sgpa
    };

    let current_sgpa = sgpa_at(current_see);
    if current_sgpa >= target_sgpa {
        debug!(code = target_code, target_sgpa, "target already met");
        return Ok(SinglePlan {
            code: target_code.to_string(),
            current_see,
            possible: true,
            min_see_to_reach_target: Some(current_see),
            achieved_sgpa: Some(current_sgpa),
        });
    }

    let mut low = current_see.ceil();
    let mut high = config.max_see.floor();

    let unreachable = SinglePlan {
        code: target_code.to_string(),
        current_see,
        possible: false,
        min_see_to_reach_target: None,
        achieved_sgpa: None,
    };

    if low > high || sgpa_at(high) < target_sgpa {
        debug!(
            code = target_code,
            target_sgpa, "target out of reach for a single subject"
        );
        return Ok(unreachable);
    }

    // Invariant: `high` satisfies the target, everything below `low` does not
    while low < high {
        let mid = ((low + high) / 2.0).floor();
        if sgpa_at(mid) >= target_sgpa {
            high = mid;
        } else {
            low = mid + 1.0;
        }
    }

    let achieved = sgpa_at(high);
    debug!(
        code = target_code,
        from = current_see,
        to = high,
        achieved,
        "single-subject plan found"
    );

    Ok(SinglePlan {
        code: target_code.to_string(),
        current_see,
        possible: true,
        min_see_to_reach_target: Some(high),
        achieved_sgpa: Some(achieved),
    })
}
