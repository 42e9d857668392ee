pub mod aggregate;
pub mod cgpa;
pub mod config;
pub mod critical;
pub mod error;
pub mod greedy;
pub mod mapper;
pub mod planner;
pub mod validation;

pub use aggregate::{calculate_sgpa, SgpaResult, SubjectResult};
pub use cgpa::{calculate_cgpa, CgpaResult, SemesterSummary};
pub use config::*;
pub use critical::{calculate_critical_see_values, next_tier, CriticalPoint, TierAdvance};
pub use error::EngineError;
pub use greedy::{greedy_global_plan, GlobalPlan, PlanStep};
pub use mapper::{calculate_total, calculate_weighted_points, gp_for_total, scale_see};
pub use planner::{find_minimal_see_for_target, SinglePlan};
pub use validation::{validate_cie, validate_grading, validate_subjects, validate_target};
