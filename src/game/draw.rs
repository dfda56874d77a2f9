use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::grid::{Cell, GridSize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("number {0} has already been drawn")]
    Duplicate(u32),
    #[error("drawn numbers must be positive")]
    Zero,
}

/// Numbers in the order they were drawn.
///
/// Append-only; every entry is a distinct positive integer. Order matters
/// for tie-breaking, so positions are exposed alongside membership.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct DrawSequence {
    draws: Vec<u32>,
}

impl DrawSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(draws: Vec<u32>) -> Result<Self, DrawError> {
        let mut sequence = Self::new();
        for n in draws {
            sequence.push(n)?;
        }
        Ok(sequence)
    }

    pub fn push(&mut self, n: u32) -> Result<(), DrawError> {
        if n == 0 {
            return Err(DrawError::Zero);
        }
        if self.draws.contains(&n) {
            return Err(DrawError::Duplicate(n));
        }
        self.draws.push(n);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn contains(&self, n: u32) -> bool {
        self.draws.contains(&n)
    }

    /// 0-based draw position of `n`
    pub fn position(&self, n: u32) -> Option<usize> {
        self.draws.iter().position(|&d| d == n)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.draws.iter().copied()
    }

    /// Set form used by the scorer
    pub fn drawn_set(&self) -> HashSet<u32> {
        self.draws.iter().copied().collect()
    }

    /// Reference board filled one-to-one from the draws in row-major order.
    ///
    /// Unfilled cells stay empty. A game stops drawing once every cell is
    /// filled, so the board and the draws stay one-to-one.
    pub fn golden_ticket(&self, size: GridSize) -> Vec<Cell> {
        let mut cells = vec![Cell::Empty; size.cell_count()];
        for (cell, &n) in cells.iter_mut().zip(&self.draws) {
            *cell = Cell::Number(n);
        }
        cells
    }
}

impl TryFrom<Vec<u32>> for DrawSequence {
    type Error = DrawError;

    fn try_from(draws: Vec<u32>) -> Result<Self, DrawError> {
        Self::from_vec(draws)
    }
}

impl From<DrawSequence> for Vec<u32> {
    fn from(sequence: DrawSequence) -> Self {
        sequence.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appends_in_order() {
        let mut draws = DrawSequence::new();
        draws.push(12).unwrap();
        draws.push(3).unwrap();
        assert_eq!(draws.as_slice(), &[12, 3]);
        assert_eq!(draws.position(3), Some(1));
        assert_eq!(draws.position(99), None);
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut draws = DrawSequence::from_vec(vec![5, 6]).unwrap();
        assert_eq!(draws.push(5), Err(DrawError::Duplicate(5)));
        assert_eq!(draws.len(), 2);
    }

    #[test]
    fn test_rejects_zero() {
        assert_eq!(DrawSequence::from_vec(vec![1, 0]), Err(DrawError::Zero));
    }

    #[test]
    fn test_json_is_plain_array() {
        let draws = DrawSequence::from_vec(vec![4, 8, 15]).unwrap();
        assert_eq!(serde_json::to_string(&draws).unwrap(), "[4,8,15]");
        let parsed: DrawSequence = serde_json::from_str("[4,8,15]").unwrap();
        assert_eq!(parsed, draws);
    }

    #[test]
    fn test_json_rejects_duplicates() {
        assert!(serde_json::from_str::<DrawSequence>("[1,2,1]").is_err());
    }

    #[test]
    fn test_golden_ticket_partial() {
        let draws = DrawSequence::from_vec(vec![7, 2, 9]).unwrap();
        let golden = draws.golden_ticket(GridSize::Three);
        assert_eq!(golden.len(), 9);
        assert_eq!(&golden[..3], &[Cell::Number(7), Cell::Number(2), Cell::Number(9)]);
        assert!(golden[3..].iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn test_golden_ticket_full() {
        let draws = DrawSequence::from_vec((11..=19).rev().collect()).unwrap();
        let golden = draws.golden_ticket(GridSize::Three);
        assert_eq!(golden.len(), 9);
        assert_eq!(golden[0], Cell::Number(19));
        assert_eq!(golden[8], Cell::Number(11));
        assert!(golden.iter().all(|c| *c != Cell::Empty));
    }
}
