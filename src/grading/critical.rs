use serde::Serialize;

use super::config::GradingConfig;
use super::error::EngineError;
use super::mapper::{calculate_total, gp_for_total};
use super::validation::{check_grading, validate_cie};

/// Minimum exam score needed to reach one grade tier for a fixed `cie`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPoint {
    pub cutoff_total: f64,
    pub grade_point: u32,
    /// Unclamped: negative when `cie` alone already clears the tier
    pub see_crit: f64,
    pub reachable: bool,
}

impl CriticalPoint {
    /// The tier is met even with a zero exam score
    pub fn is_guaranteed(&self) -> bool {
        self.see_crit <= 0.0
    }

    /// Smallest exam score that is actually attainable for this tier
    pub fn min_score(&self) -> f64 {
        self.see_crit.max(0.0)
    }
}

/// The closest higher tier a subject can still move into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierAdvance {
    /// Whole-mark exam score that first earns `grade_point`
    pub target_see: f64,
    pub grade_point: u32,
}

/// Critical exam scores for every cutoff tier, in config order.
///
/// `see_crit = (cutoff_total - cie) / see_scale`. A tier is reachable unless
/// its critical score exceeds `max_see`. No clamping is applied.
pub fn calculate_critical_see_values(
    cie: f64,
    config: &GradingConfig,
) -> Result<Vec<CriticalPoint>, EngineError> {
    check_grading(config)?;
    validate_cie(cie, config)?;
    Ok(critical_points(cie, config))
}

pub(crate) fn critical_points(cie: f64, config: &GradingConfig) -> Vec<CriticalPoint> {
    config
        .cutoffs
        .iter()
        .map(|cutoff| {
            let see_crit = (cutoff.total - cie) / config.see_scale;
            CriticalPoint {
                cutoff_total: cutoff.total,
                grade_point: cutoff.grade_point,
                see_crit,
                reachable: see_crit <= config.max_see,
            }
        })
        .collect()
}

/// Smallest whole-mark exam score above `see` that earns a higher grade point.
///
/// Returns `None` when the subject is already in the best tier it can reach.
/// Both planners go through here so they agree on what a score buys.
pub fn next_tier(cie: f64, see: f64, config: &GradingConfig) -> Option<TierAdvance> {
    let current_gp = gp_for_total(calculate_total(cie, see, config), config);
    let earns = |score: f64| gp_for_total(calculate_total(cie, score, config), config);

    // Lowest tier first, so the first hit is the nearest one
    critical_points(cie, config)
        .iter()
        .rev()
        .filter(|point| point.reachable && point.grade_point > current_gp)
        .find_map(|point| {
            let floor = point.see_crit.floor();
            let target = if floor > see && earns(floor) >= point.grade_point {
                floor
            } else {
                point.see_crit.ceil()
            };
            let target = target.min(config.max_see);

            let grade_point = earns(target);
            (grade_point > current_gp).then_some(TierAdvance {
                target_see: target,
                grade_point,
            })
        })
}
