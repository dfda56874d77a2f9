use super::config::ScoringConfig;
use super::engine::checked_max_score;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.grids.is_empty() {
        errors.push("scoring.grids: at least one grid size must be configured".to_string());
    }

    // A fuller line must never score less than an emptier one
    for (grid, weights) in &config.grids {
        if weights.line < weights.n_minus_1 {
            errors.push(format!(
                "scoring.grids.{}.line: {} is below n_minus_1 ({})",
                grid, weights.line, weights.n_minus_1
            ));
        }
        if weights.n_minus_1 < weights.n_minus_2 {
            errors.push(format!(
                "scoring.grids.{}.n_minus_1: {} is below n_minus_2 ({})",
                grid, weights.n_minus_1, weights.n_minus_2
            ));
        }
        if checked_max_score(*grid, weights).is_none() {
            errors.push(format!(
                "scoring.grids.{}: a full house would exceed {} points",
                grid,
                u32::MAX
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
