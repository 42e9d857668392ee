use super::config::GradingConfig;

/// Scale a raw exam score by the configured factor. No rounding.
pub fn scale_see(see: f64, config: &GradingConfig) -> f64 {
    see * config.see_scale
}

/// Subject total: internal marks plus the scaled exam score.
pub fn calculate_total(cie: f64, see: f64, config: &GradingConfig) -> f64 {
    cie + scale_see(see, config)
}

/// Map a total to its grade point.
///
/// Cutoffs are inclusive lower bounds scanned from the highest tier down, so a
/// total exactly on a cutoff earns that tier. Totals below every cutoff get
/// the floor grade point; totals above the top cutoff stay in the top tier.
pub fn gp_for_total(total: f64, config: &GradingConfig) -> u32 {
    config
        .cutoffs
        .iter()
        .find(|cutoff| cutoff.total <= total)
        .map(|cutoff| cutoff.grade_point)
        .unwrap_or(config.floor_grade_point)
}

/// Credit-weighted grade points for one subject.
pub fn calculate_weighted_points(gp: u32, credits: u32) -> f64 {
    f64::from(gp) * f64::from(credits)
}
