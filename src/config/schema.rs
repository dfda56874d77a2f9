use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Point tables per grid size; built-in defaults when absent
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Scoring config in effect: the configured one, or the built-in table
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GridSize;

    #[test]
    fn test_empty_config_uses_default_scoring() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert!(config.scoring.is_none());
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
    }

    #[test]
    fn test_configured_scoring_replaces_defaults() {
        let yaml = r#"
scoring:
  grids:
    "5x5": { cell: 2, line: 40, n_minus_1: 8, n_minus_2: 2, corners: 20 }
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let scoring = config.effective_scoring();
        assert_eq!(scoring.grids.len(), 1);
        assert!(scoring.weights_for(GridSize::Three).is_err());
        assert_eq!(scoring.weights_for(GridSize::Five).unwrap().line, 40);
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        assert!(serde_saphyr::from_str::<Config>("queries: []").is_err());
    }
}
