use serde::{Deserialize, Serialize};

use crate::grading::Subject;

/// One semester's subjects as read from a YAML or JSON file.
///
/// Example YAML:
/// ```yaml
/// name: Semester 3
/// subjects:
///   - { code: MA301, name: Probability, cie: 38, see: 62, credits: 4 }
///   - { code: CS302, name: Operating Systems, cie: 44, see: 70, credits: 3 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Semester {
    #[serde(default)]
    pub name: Option<String>,
    pub subjects: Vec<Subject>,
}

impl Semester {
    /// Display name, falling back to the given label (usually the file name)
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    pub fn subject(&self, code: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_semester() {
        let yaml = r#"
name: Semester 3
subjects:
  - { code: MA301, name: Probability, cie: 38, see: 62, credits: 4 }
  - { code: CS302, cie: 44.5, see: 70, credits: 3 }
"#;
        let semester: Semester = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(semester.display_name("file"), "Semester 3");
        assert_eq!(semester.subjects.len(), 2);
        assert_eq!(semester.subjects[1].cie, 44.5);
        assert!(semester.subject("MA301").is_some());
        assert!(semester.subject("XX000").is_none());
    }

    #[test]
    fn test_display_name_fallback() {
        let semester: Semester = serde_json::from_str(r#"{"subjects": []}"#).unwrap();
        assert_eq!(semester.display_name("sem1.json"), "sem1.json");
    }
}
