use serde::{Deserialize, Serialize};

use crate::grading::GradingConfig;

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Grading policy; built-in 10-point defaults when absent
    #[serde(default)]
    pub grading: Option<GradingConfig>,
}

impl Config {
    /// The grading policy in effect for this config
    pub fn grading(&self) -> GradingConfig {
        self.grading.clone().unwrap_or_default()
    }
}
