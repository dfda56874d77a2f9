use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use super::config::Weights;
use crate::game::{Cell, GridSize, Ticket};

/// A scoring rule that can fire for a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Cell,
    Line,
    NMinus1,
    NMinus2,
    Corners,
}

impl Rule {
    pub fn label(self) -> &'static str {
        match self {
            Rule::Cell => "Completed cells",
            Rule::Line => "Full lines",
            Rule::NMinus1 => "N-1 lines",
            Rule::NMinus2 => "N-2 lines",
            Rule::Corners => "Corners",
        }
    }

    /// Weight this rule awards per count
    pub fn weight(self, weights: &Weights) -> u32 {
        match self {
            Rule::Cell => weights.cell,
            Rule::Line => weights.line,
            Rule::NMinus1 => weights.n_minus_1,
            Rule::NMinus2 => weights.n_minus_2,
            Rule::Corners => weights.corners,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleContribution {
    pub rule: Rule,
    pub count: u32, // e.g. matched cells, lines, or 1 for the corner bonus
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// Only rules that fired, in evaluation order
    pub entries: Vec<RuleContribution>,
    pub total: u32,
    /// Filled corners out of 4; `None` where the corner rule does not apply
    pub corners_filled: Option<u32>,
}

impl ScoreBreakdown {
    pub fn points_for(&self, rule: Rule) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.rule == rule)
            .map(|e| e.points)
            .sum()
    }

    pub fn count_for(&self, rule: Rule) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.rule == rule)
            .map(|e| e.count)
            .sum()
    }
}

/// Score one ticket against the set of drawn numbers.
///
/// A cell is filled when its number was drawn or it is a free space. Each
/// row and column scores under at most one of the line rules. Only the
/// membership of `drawn` matters, never draw order.
pub fn score_ticket(ticket: &Ticket, drawn: &HashSet<u32>, weights: &Weights) -> ScoreBreakdown {
    let n = ticket.size.dimension();
    let is_filled = |cell: Cell| match cell {
        Cell::Number(v) => drawn.contains(&v),
        Cell::Free => true,
        Cell::Empty => false,
    };

    let matched_cells = ticket.numbers().filter(|v| drawn.contains(v)).count() as u32;

    let mut full_lines = 0;
    let mut n1_lines = 0;
    let mut n2_lines = 0;
    for line in ticket.lines() {
        let filled = line.iter().filter(|c| is_filled(**c)).count();
        if filled == n {
            full_lines += 1;
        } else if filled + 1 == n {
            n1_lines += 1;
        } else if n > 2 && filled + 2 == n {
            n2_lines += 1;
        }
    }

    // Corners are meaningless below 3x3
    let corners_filled = if n > 2 {
        Some(ticket.corners().iter().filter(|c| is_filled(**c)).count() as u32)
    } else {
        None
    };
    let corner_bonus = u32::from(corners_filled == Some(4));

    let mut entries = Vec::new();
    for (rule, count) in [
        (Rule::Cell, matched_cells),
        (Rule::Line, full_lines),
        (Rule::NMinus1, n1_lines),
        (Rule::NMinus2, n2_lines),
        (Rule::Corners, corner_bonus),
    ] {
        if count > 0 {
            entries.push(RuleContribution {
                rule,
                count,
                points: count.saturating_mul(rule.weight(weights)),
            });
        }
    }
    let total = entries
        .iter()
        .fold(0u32, |sum, e| sum.saturating_add(e.points));

    debug!(
        player = %ticket.player,
        matched_cells,
        full_lines,
        n1_lines,
        n2_lines,
        total,
        "ticket scored"
    );

    ScoreBreakdown {
        entries,
        total,
        corners_filled,
    }
}

/// Highest score a ticket of `size` can reach: every cell matched, every
/// line full, and the corner bonus. Saturates at `u32::MAX`.
pub fn max_score(size: GridSize, weights: &Weights) -> u32 {
    checked_max_score(size, weights).unwrap_or(u32::MAX)
}

/// Like [`max_score`], but `None` when the ceiling does not fit in a `u32`.
pub fn checked_max_score(size: GridSize, weights: &Weights) -> Option<u32> {
    let cells = size.cell_count() as u32;
    let lines = size.line_count() as u32;
    let corners = if size.dimension() > 2 { weights.corners } else { 0 };
    cells
        .checked_mul(weights.cell)?
        .checked_add(lines.checked_mul(weights.line)?)?
        .checked_add(corners)
}
