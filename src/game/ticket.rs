use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::grid::{Cell, GridSize};
use super::universe::NumberUniverse;

/// A player's N×N grid for one game.
///
/// Cells are stored row-major. Tickets are read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u32,
    pub player: String,
    pub size: GridSize,
    pub cells: Vec<Cell>,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    pub fn new(id: u32, player: impl Into<String>, size: GridSize, cells: Vec<Cell>) -> Self {
        Self {
            id,
            player: player.into(),
            size,
            cells,
            created_at: Utc::now(),
        }
    }

    /// Cell at row-major `index`; out-of-range reads as empty
    pub fn cell(&self, index: usize) -> Cell {
        self.cells.get(index).copied().unwrap_or(Cell::Empty)
    }

    /// Numeric cells in row-major order
    pub fn numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.iter().filter_map(|c| c.number())
    }

    pub fn number_set(&self) -> HashSet<u32> {
        self.numbers().collect()
    }

    pub fn rows(&self) -> Vec<Vec<Cell>> {
        let n = self.size.dimension();
        (0..n)
            .map(|r| (0..n).map(|c| self.cell(r * n + c)).collect())
            .collect()
    }

    pub fn columns(&self) -> Vec<Vec<Cell>> {
        let n = self.size.dimension();
        (0..n)
            .map(|c| (0..n).map(|r| self.cell(r * n + c)).collect())
            .collect()
    }

    /// All scorable lines: rows first, then columns
    pub fn lines(&self) -> Vec<Vec<Cell>> {
        let mut lines = self.rows();
        lines.extend(self.columns());
        lines
    }

    pub fn corners(&self) -> [Cell; 4] {
        self.size.corner_indices().map(|i| self.cell(i))
    }

    pub fn has_free_space(&self) -> bool {
        self.cells.iter().any(|c| c.is_free())
    }

    /// Check the ticket is complete and consistent with the game's numbers.
    /// Returns all issues at once (not just the first).
    pub fn validate(&self, universe: &NumberUniverse) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let expected = self.size.cell_count();
        if self.cells.len() != expected {
            errors.push(format!(
                "{} grid needs {} cells, got {}",
                self.size,
                expected,
                self.cells.len()
            ));
        }

        let empty = self.cells.iter().filter(|c| **c == Cell::Empty).count();
        if empty > 0 {
            errors.push(format!("incomplete grid: {} empty cell(s)", empty));
        }

        let mut seen = HashSet::new();
        let duplicates: BTreeSet<u32> = self.numbers().filter(|n| !seen.insert(*n)).collect();
        if !duplicates.is_empty() {
            errors.push(format!("duplicate numbers: {}", join_numbers(&duplicates)));
        }

        let outside: BTreeSet<u32> = self.numbers().filter(|n| !universe.contains(*n)).collect();
        if !outside.is_empty() {
            errors.push(format!("numbers not in this game: {}", join_numbers(&outside)));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn join_numbers(numbers: &BTreeSet<u32>) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
