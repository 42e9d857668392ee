use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, trace};

use super::aggregate::aggregate;
use super::config::{GradingConfig, Subject};
use super::critical::next_tier;
use super::error::EngineError;
use super::mapper::{calculate_total, gp_for_total};
use super::validation::{check_grading, validate_subjects, validate_target};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanStep {
    pub code: String,
    pub from_see: f64,
    pub to_see: f64,
    pub increase_see_by: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalPlan {
    pub steps: Vec<PlanStep>,
    pub initial_sgpa: f64,
    pub final_sgpa: f64,
    pub target_reached: bool,
    /// SGPA with every exam at the maximum score
    pub best_attainable_sgpa: f64,
}

impl GlobalPlan {
    /// Total exam marks added across all steps
    pub fn total_increase(&self) -> f64 {
        self.steps.iter().map(|step| step.increase_see_by).sum()
    }
}

/// A subject that can move up one tier, with what that move costs and buys.
#[derive(Debug, Clone)]
struct Candidate {
    index: usize,
    credits: u32,
    to_see: f64,
    increase: f64,
    weighted_gain: f64,
}

impl Candidate {
    fn efficiency(&self) -> f64 {
        self.weighted_gain / self.increase
    }

    /// Best first: higher gain per mark, then more credits, then input order
    fn rank(&self, other: &Self) -> Ordering {
        other
            .efficiency()
            .total_cmp(&self.efficiency())
            .then_with(|| other.credits.cmp(&self.credits))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Raise exam scores across subjects until the SGPA reaches `target_sgpa`.
///
/// Each round moves one subject up to its next grade tier, picking the move
/// with the best weighted grade-point gain per exam mark. The loop stops once
/// the target is met or no subject can move up any further. When even perfect
/// exam scores fall short (`best_attainable_sgpa < target_sgpa`) the steps
/// taken are still reported, with `target_reached = false`.
pub fn greedy_global_plan(
    subjects: &[Subject],
    target_sgpa: f64,
    config: &GradingConfig,
) -> Result<GlobalPlan, EngineError> {
    check_grading(config)?;
    validate_subjects(subjects, config)?;
    validate_target(target_sgpa)?;

    let ceiling: Vec<Subject> = subjects
        .iter()
        .map(|subject| subject.with_see(config.max_see))
        .collect();
    let best_attainable_sgpa = aggregate(&ceiling, config).sgpa;

    let mut current = subjects.to_vec();
    let initial_sgpa = aggregate(&current, config).sgpa;
    let mut sgpa = initial_sgpa;
    let mut steps = Vec::new();

    if best_attainable_sgpa < target_sgpa {
        debug!(
            best_attainable_sgpa,
            target_sgpa, "target exceeds the best attainable SGPA"
        );
    }

    while sgpa < target_sgpa {
        let Some(best) = best_candidate(&current, config) else {
            debug!(sgpa, "no subject can move up another tier");
            break;
        };

        let subject = &mut current[best.index];
        let step = PlanStep {
            code: subject.code.clone(),
            from_see: subject.see,
            to_see: best.to_see,
            increase_see_by: best.to_see - subject.see,
        };
        subject.see = best.to_see;

        sgpa = aggregate(&current, config).sgpa;
        debug!(
            code = %step.code,
            from = step.from_see,
            to = step.to_see,
            sgpa,
            "greedy step applied"
        );
        steps.push(step);
    }

    Ok(GlobalPlan {
        steps,
        initial_sgpa,
        final_sgpa: sgpa,
        target_reached: sgpa >= target_sgpa,
        best_attainable_sgpa,
    })
}

fn best_candidate(subjects: &[Subject], config: &GradingConfig) -> Option<Candidate> {
    subjects
        .iter()
        .enumerate()
        .filter(|(_, subject)| subject.see < config.max_see)
        .filter_map(|(index, subject)| {
            let current_gp = gp_for_total(calculate_total(subject.cie, subject.see, config), config);
            let advance = next_tier(subject.cie, subject.see, config)?;
            let candidate = Candidate {
                index,
                credits: subject.credits,
                to_see: advance.target_see,
                increase: advance.target_see - subject.see,
                weighted_gain: f64::from(subject.credits)
                    * f64::from(advance.grade_point - current_gp),
            };
            trace!(
                code = %subject.code,
                to_see = candidate.to_see,
                efficiency = candidate.efficiency(),
                "greedy candidate"
            );
            Some(candidate)
        })
        .min_by(|a, b| a.rank(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::calculate_sgpa;
    use proptest::prelude::*;

    fn assert_step_invariants(plan: &GlobalPlan, max_see: f64) {
        for step in &plan.steps {
            assert!(step.to_see >= step.from_see);
            assert!(step.to_see <= max_see);
            assert_eq!(step.increase_see_by, step.to_see - step.from_see);
        }
    }

    #[test]
    fn test_synthetic_case_reaches_target() {
        let subjects = vec![
            Subject::new("SUB1", "Subject 1", 35.0, 50.0, 4),
            Subject::new("SUB2", "Subject 2", 38.0, 55.0, 3),
            Subject::new("SUB3", "Subject 3", 42.0, 60.0, 3),
        ];
        let config = GradingConfig::default();
        let plan = greedy_global_plan(&subjects, 7.5, &config).unwrap();

        assert!(plan.best_attainable_sgpa >= 7.5);
        assert!(plan.target_reached);
        assert!(plan.final_sgpa >= 7.5);
        assert!(!plan.steps.is_empty());
        assert_step_invariants(&plan, config.max_see);
    }

    #[test]
    fn test_unreachable_target() {
        let subjects = vec![
            Subject::new("SUB1", "Subject 1", 20.0, 50.0, 4),
            Subject::new("SUB2", "Subject 2", 25.0, 55.0, 3),
        ];
        let config = GradingConfig::default();
        let plan = greedy_global_plan(&subjects, 10.0, &config).unwrap();

        assert!(!plan.target_reached);
        assert!(plan.best_attainable_sgpa < 10.0);
        // Every subject ends in its best reachable tier
        assert_eq!(plan.final_sgpa, plan.best_attainable_sgpa);
        assert_step_invariants(&plan, config.max_see);
    }

    #[test]
    fn test_best_attainable_matches_all_max() {
        let subjects = vec![
            Subject::new("A", "", 30.0, 40.0, 4),
            Subject::new("B", "", 45.0, 10.0, 2),
        ];
        let config = GradingConfig::default();
        let plan = greedy_global_plan(&subjects, 9.0, &config).unwrap();

        let all_max: Vec<Subject> = subjects.iter().map(|s| s.with_see(100.0)).collect();
        let expected = calculate_sgpa(&all_max, &config).unwrap().sgpa;
        assert_eq!(plan.best_attainable_sgpa, expected);
    }

    #[test]
    fn test_no_steps_when_already_met() {
        let subjects = vec![Subject::new("A", "", 45.0, 90.0, 4)];
        let plan = greedy_global_plan(&subjects, 9.0, &GradingConfig::default()).unwrap();
        assert!(plan.steps.is_empty());
        assert!(plan.target_reached);
        assert_eq!(plan.final_sgpa, plan.initial_sgpa);
        assert_eq!(plan.total_increase(), 0.0);
    }

    #[test]
    fn test_prefers_cheapest_gain() {
        // A: total 79 (gp 8), one tier up costs 2 marks for 4 weighted points.
        // B: total 65 (gp 7), one tier up costs 10 marks for 4 weighted points.
        let subjects = vec![
            Subject::new("A", "", 40.0, 78.0, 4),
            Subject::new("B", "", 40.0, 50.0, 4),
        ];
        let plan = greedy_global_plan(&subjects, 8.0, &GradingConfig::default()).unwrap();

        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].code, "A");
        assert_eq!(plan.steps[0].from_see, 78.0);
        assert_eq!(plan.steps[0].to_see, 80.0);
        assert_eq!(plan.steps[0].increase_see_by, 2.0);
        assert_eq!(plan.final_sgpa, 8.0);
    }

    #[test]
    fn test_tie_prefers_more_credits() {
        // A: total 85 (gp 9), +10 marks for 2 weighted points -> 0.2
        // B: total 80 (gp 9), +20 marks for 4 weighted points -> 0.2
        let subjects = vec![
            Subject::new("A", "", 40.0, 90.0, 2),
            Subject::new("B", "", 40.0, 80.0, 4),
        ];
        let plan = greedy_global_plan(&subjects, 9.1, &GradingConfig::default()).unwrap();
        assert_eq!(plan.steps[0].code, "B");
        assert_eq!(plan.steps[0].increase_see_by, 20.0);
    }

    #[test]
    fn test_tie_falls_back_to_input_order() {
        let subjects = vec![
            Subject::new("A", "", 40.0, 50.0, 3),
            Subject::new("B", "", 40.0, 50.0, 3),
        ];
        let plan = greedy_global_plan(&subjects, 7.1, &GradingConfig::default()).unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].code, "A");
        assert_eq!(plan.final_sgpa, 7.5);
    }

    #[test]
    fn test_subject_at_max_is_skipped() {
        let subjects = vec![
            Subject::new("DONE", "", 30.0, 100.0, 4),
            Subject::new("OPEN", "", 40.0, 40.0, 2),
        ];
        let plan = greedy_global_plan(&subjects, 9.5, &GradingConfig::default()).unwrap();
        assert!(plan.steps.iter().all(|step| step.code == "OPEN"));
        assert!(!plan.target_reached);
    }

    #[test]
    fn test_input_not_mutated() {
        let subjects = vec![
            Subject::new("A", "", 35.0, 50.0, 4),
            Subject::new("B", "", 38.0, 55.0, 3),
        ];
        let before = subjects.clone();
        let _ = greedy_global_plan(&subjects, 9.0, &GradingConfig::default()).unwrap();
        assert_eq!(subjects, before);
    }

    #[test]
    fn test_invalid_input_fails_fast() {
        let subjects = vec![Subject::new("A", "", 35.0, 150.0, 4)];
        let err = greedy_global_plan(&subjects, 8.0, &GradingConfig::default()).unwrap_err();
        assert_eq!(err.field(), Some("subjects[0].see"));
    }

    #[test]
    fn test_idempotent() {
        let subjects = vec![
            Subject::new("SUB1", "", 35.0, 50.0, 4),
            Subject::new("SUB2", "", 38.0, 55.0, 3),
            Subject::new("SUB3", "", 42.0, 60.0, 3),
        ];
        let config = GradingConfig::default();
        let first = greedy_global_plan(&subjects, 8.5, &config).unwrap();
        let second = greedy_global_plan(&subjects, 8.5, &config).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_greedy_invariants(
            marks in prop::collection::vec((0u32..=50, 0u32..=100, 1u32..=5), 1..6),
            target in 4.0f64..10.5,
        ) {
            let subjects: Vec<Subject> = marks
                .iter()
                .enumerate()
                .map(|(i, (cie, see, credits))| {
                    Subject::new(&format!("S{}", i), "", f64::from(*cie), f64::from(*see), *credits)
                })
                .collect();
            let config = GradingConfig::default();
            let plan = greedy_global_plan(&subjects, target, &config).unwrap();

            for step in &plan.steps {
                prop_assert!(step.to_see >= step.from_see);
                prop_assert!(step.to_see <= config.max_see);
                prop_assert_eq!(step.increase_see_by, step.to_see - step.from_see);
            }
            prop_assert_eq!(plan.target_reached, plan.final_sgpa >= target);
            prop_assert!(plan.final_sgpa <= plan.best_attainable_sgpa);
            if plan.best_attainable_sgpa < target {
                prop_assert!(!plan.target_reached);
            } else {
                prop_assert!(plan.target_reached);
            }
        }
    }
}
