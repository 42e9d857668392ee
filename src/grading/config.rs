use serde::{Deserialize, Serialize};

/// Grading policy.
///
/// Defines how exam marks are scaled and how a subject total maps to a
/// grade point. Every field is optional in a config file and falls back to
/// the 10-point convention below.
///
/// Example YAML:
/// ```yaml
/// grading:
///   see_scale: 0.5
///   floor_grade_point: 4
///   cutoffs:
///     - { total: 90, grade_point: 10 }
///     - { total: 80, grade_point: 9 }
///     - { total: 40, grade_point: 4 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GradingConfig {
    /// Factor applied to the raw exam (SEE) score before it joins the total
    pub see_scale: f64,

    /// Grade tiers, highest total first. Each total is an inclusive lower bound.
    pub cutoffs: Vec<Cutoff>,

    /// Grade point for totals below every cutoff
    pub floor_grade_point: u32,

    /// Ceiling for internal assessment (CIE) marks
    pub max_cie: f64,

    /// Ceiling for raw exam (SEE) marks
    pub max_see: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            see_scale: 0.5,
            cutoffs: vec![
                Cutoff::new(90.0, 10),
                Cutoff::new(80.0, 9),
                Cutoff::new(70.0, 8),
                Cutoff::new(60.0, 7),
                Cutoff::new(50.0, 6),
                Cutoff::new(45.0, 5),
                Cutoff::new(40.0, 4),
            ],
            floor_grade_point: 4,
            max_cie: 50.0,
            max_see: 100.0,
        }
    }
}

/// One grade tier: totals at or above `total` earn `grade_point`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Cutoff {
    pub total: f64,
    pub grade_point: u32,
}

impl Cutoff {
    pub fn new(total: f64, grade_point: u32) -> Self {
        Self { total, grade_point }
    }
}

/// A subject with the marks earned so far.
///
/// `cie` is the continuous internal evaluation, `see` the raw semester-end
/// exam score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Subject {
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub cie: f64,
    pub see: f64,
    pub credits: u32,
}

impl Subject {
    pub fn new(code: &str, name: &str, cie: f64, see: f64, credits: u32) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            cie,
            see,
            credits,
        }
    }

    /// Copy of this subject with a different exam score
    pub fn with_see(&self, see: f64) -> Self {
        Self {
            see,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grading_config() {
        let config = GradingConfig::default();

        assert_eq!(config.see_scale, 0.5);
        assert_eq!(config.floor_grade_point, 4);
        assert_eq!(config.max_cie, 50.0);
        assert_eq!(config.max_see, 100.0);
        assert_eq!(config.cutoffs.len(), 7);
        assert_eq!(config.cutoffs[0], Cutoff::new(90.0, 10));
        assert_eq!(config.cutoffs[6], Cutoff::new(40.0, 4));
    }

    #[test]
    fn test_grading_config_serde_roundtrip() {
        let config = GradingConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: GradingConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_grading_config_parse() {
        let yaml = r#"
see_scale: 0.6
max_see: 80
"#;
        let config: GradingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.see_scale, 0.6);
        assert_eq!(config.max_see, 80.0);
        // Untouched fields keep their defaults
        assert_eq!(config.cutoffs, GradingConfig::default().cutoffs);
        assert_eq!(config.max_cie, 50.0);
    }

    #[test]
    fn test_custom_cutoffs_parse() {
        let yaml = r#"
cutoffs:
  - { total: 85, grade_point: 10 }
  - { total: 50, grade_point: 5 }
floor_grade_point: 0
"#;
        let config: GradingConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.cutoffs.len(), 2);
        assert_eq!(config.cutoffs[1], Cutoff::new(50.0, 5));
        assert_eq!(config.floor_grade_point, 0);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "see_scaling: 0.5";
        let result: Result<GradingConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_subject_name_defaults_to_empty() {
        let yaml = r#"
code: MA101
cie: 40
see: 72
credits: 4
"#;
        let subject: Subject = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(subject.code, "MA101");
        assert!(subject.name.is_empty());
        assert_eq!(subject.credits, 4);
    }

    #[test]
    fn test_with_see_leaves_original_untouched() {
        let subject = Subject::new("CS201", "Data Structures", 38.0, 55.0, 3);
        let raised = subject.with_see(80.0);
        assert_eq!(raised.see, 80.0);
        assert_eq!(raised.cie, 38.0);
        assert_eq!(subject.see, 55.0);
    }
}
