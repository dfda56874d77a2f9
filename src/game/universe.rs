use std::collections::BTreeSet;
use thiserror::Error;

use super::grid::GridSize;

/// Largest number list a game accepts
pub const MAX_UNIVERSE_SIZE: usize = 10_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UniverseError {
    #[error("invalid number '{0}'")]
    InvalidToken(String),
    #[error("invalid range '{0}': start must not exceed end")]
    InvertedRange(String),
    #[error("numbers must be positive, got 0 in '{0}'")]
    Zero(String),
    #[error("number lists are limited to {limit} numbers")]
    TooManyNumbers { limit: usize },
    #[error("a {grid} grid requires at least {required} unique numbers, {available} provided")]
    NotEnoughNumbers {
        grid: GridSize,
        required: usize,
        available: usize,
    },
}

/// The set of numbers a game can draw from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NumberUniverse {
    numbers: BTreeSet<u32>,
}

impl NumberUniverse {
    /// Parse a number list such as `"1-75"` or `"1-20, 33, 40-45"`.
    ///
    /// Tokens are separated by commas; each is a positive integer or an
    /// inclusive `start-end` range. Repeated values collapse. At most
    /// [`MAX_UNIVERSE_SIZE`] distinct numbers are accepted.
    pub fn parse(input: &str) -> Result<Self, UniverseError> {
        let mut numbers = BTreeSet::new();
        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start = parse_positive(start, token)?;
                let end = parse_positive(end, token)?;
                if start > end {
                    return Err(UniverseError::InvertedRange(token.to_string()));
                }
                if (end - start) as usize >= MAX_UNIVERSE_SIZE {
                    return Err(UniverseError::TooManyNumbers {
                        limit: MAX_UNIVERSE_SIZE,
                    });
                }
                numbers.extend(start..=end);
            } else {
                numbers.insert(parse_positive(token, token)?);
            }
            if numbers.len() > MAX_UNIVERSE_SIZE {
                return Err(UniverseError::TooManyNumbers {
                    limit: MAX_UNIVERSE_SIZE,
                });
            }
        }
        Ok(Self { numbers })
    }

    pub fn contains(&self, n: u32) -> bool {
        self.numbers.contains(&n)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.numbers.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Check the universe is large enough to host a game on `grid`.
    pub fn ensure_supports(&self, grid: GridSize) -> Result<(), UniverseError> {
        let required = grid.min_numbers();
        if self.len() < required {
            return Err(UniverseError::NotEnoughNumbers {
                grid,
                required,
                available: self.len(),
            });
        }
        Ok(())
    }
}

fn parse_positive(value: &str, token: &str) -> Result<u32, UniverseError> {
    let n: u32 = value
        .trim()
        .parse()
        .map_err(|_| UniverseError::InvalidToken(token.to_string()))?;
    if n == 0 {
        return Err(UniverseError::Zero(token.to_string()));
    }
    Ok(n)
}
