use super::types::Semester;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a semester from a file.
///
/// `.json` files are parsed as JSON; anything else is treated as YAML.
pub fn load_semester(path: &Path) -> Result<Semester> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read semester file at {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let semester: Semester = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse semester: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse semester: invalid YAML in {}", path.display()))?
    };

    debug!(
        path = %path.display(),
        subjects = semester.subjects.len(),
        "semester loaded"
    );
    Ok(semester)
}
