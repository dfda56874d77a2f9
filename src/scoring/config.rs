use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::game::GridSize;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("configuration error: no scoring weights for {0} grids (add scoring.grids.\"{0}\")")]
    MissingWeights(GridSize),
}

/// Points awarded by each rule for one grid size.
///
/// Example YAML:
/// ```yaml
/// cell: 1
/// line: 25
/// n_minus_1: 5
/// n_minus_2: 2
/// corners: 15
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    /// Per matched numeric cell (free spaces never count)
    pub cell: u32,

    /// Per full row or column
    pub line: u32,

    /// Per row or column missing exactly one cell
    #[serde(alias = "nMinus1")]
    pub n_minus_1: u32,

    /// Per row or column missing exactly two cells
    #[serde(alias = "nMinus2")]
    pub n_minus_2: u32,

    /// Once, when all four corners are filled
    pub corners: u32,
}

/// Main scoring configuration: one weight table per grid size.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   grids:
///     "4x4": { cell: 1, line: 25, n_minus_1: 5, n_minus_2: 2, corners: 15 }
///     "5x5": { cell: 1, line: 50, n_minus_1: 10, n_minus_2: 3, corners: 25 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub grids: BTreeMap<GridSize, Weights>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut grids = BTreeMap::new();
        grids.insert(
            GridSize::Three,
            Weights {
                cell: 1,
                line: 10,
                n_minus_1: 3,
                n_minus_2: 0,
                corners: 0,
            },
        );
        grids.insert(
            GridSize::Four,
            Weights {
                cell: 1,
                line: 25,
                n_minus_1: 5,
                n_minus_2: 2,
                corners: 15,
            },
        );
        grids.insert(
            GridSize::Five,
            Weights {
                cell: 1,
                line: 50,
                n_minus_1: 10,
                n_minus_2: 3,
                corners: 25,
            },
        );
        Self { grids }
    }
}

impl ScoringConfig {
    /// Weight table for `grid`, or a configuration error when none is configured.
    pub fn weights_for(&self, grid: GridSize) -> Result<&Weights, ScoringError> {
        self.grids
            .get(&grid)
            .ok_or(ScoringError::MissingWeights(grid))
    }
}
