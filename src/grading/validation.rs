use super::config::{GradingConfig, Subject};
use super::error::EngineError;

/// Validate grading configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_grading(config: &GradingConfig) -> Result<(), Vec<EngineError>> {
    let mut errors = Vec::new();

    if !(config.see_scale.is_finite() && config.see_scale > 0.0) {
        errors.push(EngineError::invalid(
            "grading.see_scale",
            format!("must be a positive number, got {}", config.see_scale),
        ));
    }

    if !(config.max_cie.is_finite() && config.max_cie > 0.0) {
        errors.push(EngineError::invalid(
            "grading.max_cie",
            format!("must be a positive number, got {}", config.max_cie),
        ));
    }

    if !(config.max_see.is_finite() && config.max_see > 0.0) {
        errors.push(EngineError::invalid(
            "grading.max_see",
            format!("must be a positive number, got {}", config.max_see),
        ));
    }

    if config.cutoffs.is_empty() {
        errors.push(EngineError::invalid(
            "grading.cutoffs",
            "must contain at least one tier",
        ));
    }

    for (i, cutoff) in config.cutoffs.iter().enumerate() {
        if !cutoff.total.is_finite() {
            errors.push(EngineError::invalid(
                format!("grading.cutoffs[{}].total", i),
                format!("must be a finite number, got {}", cutoff.total),
            ));
            continue;
        }
        if i == 0 {
            continue;
        }

        let prev = &config.cutoffs[i - 1];
        if cutoff.total >= prev.total {
            errors.push(EngineError::invalid(
                format!("grading.cutoffs[{}].total", i),
                format!(
                    "must be lower than the previous tier ({} >= {})",
                    cutoff.total, prev.total
                ),
            ));
        }
        if cutoff.grade_point > prev.grade_point {
            errors.push(EngineError::invalid(
                format!("grading.cutoffs[{}].grade_point", i),
                format!(
                    "must not exceed the previous tier ({} > {})",
                    cutoff.grade_point, prev.grade_point
                ),
            ));
        }
    }

    // The floor sits below every tier, so it cannot outrank the lowest one
    if let Some(lowest) = config.cutoffs.last() {
        if config.floor_grade_point > lowest.grade_point {
            errors.push(EngineError::invalid(
                "grading.floor_grade_point",
                format!(
                    "must not exceed the lowest tier ({} > {})",
                    config.floor_grade_point, lowest.grade_point
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Fail-fast form of [`validate_grading`] for engine entry points.
pub(crate) fn check_grading(config: &GradingConfig) -> Result<(), EngineError> {
    validate_grading(config).map_err(|mut errors| errors.remove(0))
}

/// Validate subject marks and credits against the configured ceilings.
pub fn validate_subjects(subjects: &[Subject], config: &GradingConfig) -> Result<(), EngineError> {
    if subjects.is_empty() {
        return Err(EngineError::invalid("subjects", "at least one subject is required"));
    }

    for (i, subject) in subjects.iter().enumerate() {
        check_mark(subject.cie, config.max_cie, &format!("subjects[{}].cie", i))?;
        check_mark(subject.see, config.max_see, &format!("subjects[{}].see", i))?;
        if subject.credits == 0 {
            return Err(EngineError::invalid(
                format!("subjects[{}].credits", i),
                format!("subject '{}' must carry at least 1 credit", subject.code),
            ));
        }
    }

    Ok(())
}

/// Validate a standalone internal-assessment mark.
pub fn validate_cie(cie: f64, config: &GradingConfig) -> Result<(), EngineError> {
    check_mark(cie, config.max_cie, "cie")
}

/// Validate a target SGPA. Any finite, non-negative value is accepted;
/// targets above the top grade point are simply unreachable.
pub fn validate_target(target_sgpa: f64) -> Result<(), EngineError> {
    if !target_sgpa.is_finite() || target_sgpa < 0.0 {
        return Err(EngineError::invalid(
            "target_sgpa",
            format!("must be a non-negative number, got {}", target_sgpa),
        ));
    }
    Ok(())
}

fn check_mark(value: f64, max: f64, field: &str) -> Result<(), EngineError> {
    if !value.is_finite() || value < 0.0 || value > max {
        return Err(EngineError::invalid(
            field,
            format!("must be within [0, {}], got {}", max, value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::Cutoff;

    fn config_with_cutoffs(cutoffs: Vec<Cutoff>) -> GradingConfig {
        GradingConfig {
            cutoffs,
            ..GradingConfig::default()
        }
    }

    fn field_of(err: &EngineError) -> &str {
        err.field().unwrap_or_default()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_grading(&GradingConfig::default()).is_ok());
    }

    #[test]
    fn test_non_positive_scale() {
        let config = GradingConfig {
            see_scale: 0.0,
            ..GradingConfig::default()
        };
        let errors = validate_grading(&config).unwrap_err();
        assert_eq!(field_of(&errors[0]), "grading.see_scale");
    }

    #[test]
    fn test_empty_cutoffs() {
        let errors = validate_grading(&config_with_cutoffs(vec![])).unwrap_err();
        assert_eq!(field_of(&errors[0]), "grading.cutoffs");
    }

    #[test]
    fn test_unsorted_cutoffs() {
        let config = config_with_cutoffs(vec![Cutoff::new(80.0, 9), Cutoff::new(90.0, 9)]);
        let errors = validate_grading(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(field_of(&errors[0]), "grading.cutoffs[1].total");
    }

    #[test]
    fn test_duplicate_cutoff_total() {
        let config = config_with_cutoffs(vec![Cutoff::new(80.0, 9), Cutoff::new(80.0, 8)]);
        let errors = validate_grading(&config).unwrap_err();
        assert_eq!(field_of(&errors[0]), "grading.cutoffs[1].total");
    }

    #[test]
    fn test_non_monotonic_grade_points() {
        let config = config_with_cutoffs(vec![Cutoff::new(90.0, 8), Cutoff::new(80.0, 9)]);
        let errors = validate_grading(&config).unwrap_err();
        assert_eq!(field_of(&errors[0]), "grading.cutoffs[1].grade_point");
    }

    #[test]
    fn test_floor_above_lowest_tier() {
        let config = GradingConfig {
            floor_grade_point: 5,
            ..GradingConfig::default()
        };
        let errors = validate_grading(&config).unwrap_err();
        assert_eq!(field_of(&errors[0]), "grading.floor_grade_point");
    }

    #[test]
    fn test_collects_all_errors() {
        let config = GradingConfig {
            see_scale: -1.0,                                           // Error 1
            cutoffs: vec![Cutoff::new(50.0, 6), Cutoff::new(60.0, 7)], // Errors 2 and 3
            floor_grade_point: 4,
            max_cie: 50.0,
            max_see: 0.0, // Error 4
        };
        let errors = validate_grading(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_check_grading_returns_first() {
        let config = GradingConfig {
            see_scale: f64::NAN,
            max_see: -5.0,
            ..GradingConfig::default()
        };
        let err = check_grading(&config).unwrap_err();
        assert_eq!(field_of(&err), "grading.see_scale");
    }

    #[test]
    fn test_empty_subjects() {
        let err = validate_subjects(&[], &GradingConfig::default()).unwrap_err();
        assert_eq!(field_of(&err), "subjects");
    }

    #[test]
    fn test_zero_credits() {
        let subjects = vec![
            Subject::new("A", "", 40.0, 80.0, 3),
            Subject::new("B", "", 40.0, 80.0, 0),
        ];
        let err = validate_subjects(&subjects, &GradingConfig::default()).unwrap_err();
        assert_eq!(field_of(&err), "subjects[1].credits");
    }

    #[test]
    fn test_marks_out_of_range() {
        let config = GradingConfig::default();

        let cie_high = vec![Subject::new("A", "", 51.0, 80.0, 3)];
        assert_eq!(
            field_of(&validate_subjects(&cie_high, &config).unwrap_err()),
            "subjects[0].cie"
        );

        let see_negative = vec![Subject::new("A", "", 40.0, -1.0, 3)];
        assert_eq!(
            field_of(&validate_subjects(&see_negative, &config).unwrap_err()),
            "subjects[0].see"
        );

        let see_nan = vec![Subject::new("A", "", 40.0, f64::NAN, 3)];
        assert!(validate_subjects(&see_nan, &config).is_err());
    }

    #[test]
    fn test_marks_at_ceiling_accepted() {
        let subjects = vec![Subject::new("A", "", 50.0, 100.0, 4)];
        assert!(validate_subjects(&subjects, &GradingConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_cie() {
        let config = GradingConfig::default();
        assert!(validate_cie(0.0, &config).is_ok());
        assert!(validate_cie(50.0, &config).is_ok());
        assert!(validate_cie(50.5, &config).is_err());
    }

    #[test]
    fn test_validate_target() {
        assert!(validate_target(8.5).is_ok());
        assert!(validate_target(0.0).is_ok());
        assert!(validate_target(12.0).is_ok());
        assert!(validate_target(-0.1).is_err());
        assert!(validate_target(f64::INFINITY).is_err());
    }
}
