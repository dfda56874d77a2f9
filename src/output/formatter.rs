use owo_colors::OwoColorize;
use std::collections::HashSet;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::game::{Cell, DrawSequence, GridSize};
use crate::scoring::{max_score, RankedTicket, Rule, ScoreBreakdown, ScoringConfig, Weights};

const SEPARATOR: &str = "  ";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// 1-based draw number, or "-" for a ticket that never matched
fn format_draw_position(index: Option<usize>) -> String {
    match index {
        Some(i) => format!("#{}", i + 1),
        None => "-".to_string(),
    }
}

fn format_metrics(ranked: &RankedTicket) -> String {
    format!(
        "first {:>4}  last {:>4}  strike {:>5}",
        format_draw_position(ranked.metrics.first_match),
        format_draw_position(ranked.metrics.last_match),
        ranked.metrics.strike_rank
    )
}

/// Format the leaderboard with columns: Index, Score, Player, tie-break metrics
/// The winner comes first. Index column: 3 chars, right-aligned with a trailing dot.
pub fn format_leaderboard(ranked: &[RankedTicket], use_colors: bool) -> String {
    if ranked.is_empty() {
        return "No tickets found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = ranked
        .iter()
        .map(|r| r.score().to_string().len())
        .max()
        .unwrap_or(1)
        .max(5);
    let metrics: Vec<String> = ranked.iter().map(format_metrics).collect();
    let metrics_width = metrics.iter().map(|m| m.len()).max().unwrap_or(0);
    let fixed_width = index_width + 1 + score_width + SEPARATOR.len() * 2 + metrics_width;

    let name_cap = term_width.map(|width| {
        if width > fixed_width + 10 {
            width - fixed_width
        } else {
            // Very narrow terminal
            20
        }
    });
    let longest_name = ranked
        .iter()
        .map(|r| r.ticket.player.chars().count())
        .max()
        .unwrap_or(0);
    let name_width = name_cap.map_or(longest_name, |cap| longest_name.min(cap));

    ranked
        .iter()
        .zip(&metrics)
        .enumerate()
        .map(|(idx, (r, metrics))| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>width$}", r.score(), width = score_width);
            let name = truncate_name(&r.ticket.player, name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);

            if use_colors {
                let name_colored = if idx == 0 {
                    name_padded.green().bold().to_string()
                } else {
                    name_padded
                };
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    SEPARATOR,
                    name_colored,
                    SEPARATOR,
                    metrics.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_str, SEPARATOR, name_padded, SEPARATOR, metrics
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the leaderboard as tab-separated values for scripting
/// Columns: rank, player, score, first, last, strike (no headers, no colors)
pub fn format_tsv(ranked: &[RankedTicket]) -> String {
    if ranked.is_empty() {
        return String::new();
    }

    ranked
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let position = |i: Option<usize>| i.map_or("-".to_string(), |i| (i + 1).to_string());
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                idx + 1,
                r.ticket.player,
                r.score(),
                position(r.metrics.first_match),
                position(r.metrics.last_match),
                r.metrics.strike_rank
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a score breakdown, one line per rule plus the total
///
/// The corner rule is listed with its filled count even when the bonus did
/// not fire, so players can see how close they came.
pub fn format_breakdown(breakdown: &ScoreBreakdown, weights: &Weights, use_colors: bool) -> String {
    let mut rows: Vec<(String, String, u32)> = breakdown
        .entries
        .iter()
        .map(|entry| {
            let label = if entry.rule == Rule::Corners {
                "Corners (4/4)".to_string()
            } else {
                format!("{} ({})", entry.rule.label(), entry.count)
            };
            let unit = match entry.rule {
                Rule::Cell => "cells",
                Rule::Corners => "bonus",
                _ => "lines",
            };
            let calculation = format!(
                "{} {} × {} pts",
                entry.count,
                unit,
                entry.rule.weight(weights)
            );
            (label, calculation, entry.points)
        })
        .collect();

    if let Some(filled) = breakdown.corners_filled.filter(|f| *f < 4) {
        rows.push((
            format!("Corners ({}/4)", filled),
            format!("0 bonus × {} pts", weights.corners),
            0,
        ));
    }

    if rows.is_empty() {
        rows.push(("No matches yet".to_string(), String::new(), 0));
    }

    let label_width = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(0);
    let calc_width = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(0);
    let points_width = breakdown.total.to_string().len().max(3);

    let mut lines: Vec<String> = rows
        .iter()
        .map(|(label, calculation, points)| {
            format!(
                "{:<lw$}{}{:<cw$}{}{:>pw$}",
                label,
                SEPARATOR,
                calculation,
                SEPARATOR,
                points,
                lw = label_width,
                cw = calc_width,
                pw = points_width
            )
        })
        .collect();

    let total_label = format!(
        "{:<width$}{:>pw$}",
        "Total",
        breakdown.total,
        width = label_width + calc_width + SEPARATOR.len() * 2,
        pw = points_width
    );
    lines.push(if use_colors {
        total_label.bold().to_string()
    } else {
        total_label
    });

    lines.join("\n")
}

/// Render a grid row by row. Drawn numbers are highlighted (bracketed
/// without colors), free spaces read `FREE`, empty cells `.`.
pub fn format_grid(cells: &[Cell], size: GridSize, drawn: &HashSet<u32>, use_colors: bool) -> String {
    let n = size.dimension();
    let width = cells
        .iter()
        .filter_map(|c| c.number())
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1)
        .max(4);

    (0..n)
        .map(|row| {
            (0..n)
                .map(|col| {
                    let cell = cells.get(row * n + col).copied().unwrap_or(Cell::Empty);
                    let text = match cell {
                        Cell::Number(v) => v.to_string(),
                        Cell::Free => "FREE".to_string(),
                        Cell::Empty => ".".to_string(),
                    };
                    let matched = match cell {
                        Cell::Number(v) => drawn.contains(&v),
                        _ => false,
                    };
                    if use_colors {
                        let padded = format!("{:^width$}", text, width = width + 2);
                        if matched {
                            padded.green().bold().to_string()
                        } else if cell.is_free() {
                            padded.yellow().to_string()
                        } else {
                            padded
                        }
                    } else if matched {
                        format!("[{:^width$}]", text, width = width)
                    } else {
                        format!(" {:^width$} ", text, width = width)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the weight tables with the highest reachable score per grid
pub fn format_weights(config: &ScoringConfig, only: Option<GridSize>) -> String {
    let header = format!(
        "{:<5}{:>6}{:>6}{:>6}{:>6}{:>9}{:>6}",
        "Grid", "Cell", "Line", "N-1", "N-2", "Corners", "Max"
    );

    let rows: Vec<String> = config
        .grids
        .iter()
        .filter(|(grid, _)| only.map_or(true, |g| g == **grid))
        .map(|(grid, w)| {
            format!(
                "{:<5}{:>6}{:>6}{:>6}{:>6}{:>9}{:>6}",
                grid.to_string(),
                w.cell,
                w.line,
                w.n_minus_1,
                w.n_minus_2,
                w.corners,
                max_score(*grid, w)
            )
        })
        .collect();

    if rows.is_empty() {
        return "No weights configured.".to_string();
    }

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the draw sequence in draw order
pub fn format_draws(draws: &DrawSequence) -> String {
    if draws.is_empty() {
        return "No numbers drawn yet.".to_string();
    }
    let numbers = draws
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Drawn ({}): {}", draws.len(), numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Ticket;
    use crate::scoring::{rank_tickets, score_ticket};

    fn sample_tickets() -> Vec<Ticket> {
        vec![
            Ticket::new(
                1,
                "Asha",
                GridSize::Three,
                (1..=9).map(Cell::Number).collect(),
            ),
            Ticket::new(
                2,
                "Ben",
                GridSize::Three,
                (11..=19).map(Cell::Number).collect(),
            ),
        ]
    }

    fn weights_3x3() -> Weights {
        *ScoringConfig::default().weights_for(GridSize::Three).unwrap()
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Asha", 20), "Asha");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("Bartholomew the Great", 10), "Bartho...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Bartholomew", 3), "Bar");
    }

    #[test]
    fn test_format_draw_position() {
        assert_eq!(format_draw_position(Some(0)), "#1");
        assert_eq!(format_draw_position(None), "-");
    }

    #[test]
    fn test_format_leaderboard_empty() {
        assert_eq!(format_leaderboard(&[], false), "No tickets found.");
    }

    #[test]
    fn test_format_leaderboard_order_and_index() {
        let tickets = sample_tickets();
        let draws = DrawSequence::from_vec(vec![11, 1, 2, 3]).unwrap();
        let ranked = rank_tickets(&tickets, &draws, &weights_3x3());
        let result = format_leaderboard(&ranked, false);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains("Asha"));
        // 3 cells + full row
        assert!(lines[0].contains("13"));
        assert!(lines[0].contains("first   #2"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].contains("Ben"));
    }

    #[test]
    fn test_format_tsv() {
        let tickets = sample_tickets();
        let draws = DrawSequence::from_vec(vec![11, 1, 2, 3]).unwrap();
        let ranked = rank_tickets(&tickets, &draws, &weights_3x3());
        let result = format_tsv(&ranked);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines[0], "1\tAsha\t13\t2\t4\t9");
        assert_eq!(lines[1].split('\t').count(), 6);
        assert!(lines[1].starts_with("2\tBen\t"));
    }

    #[test]
    fn test_format_tsv_no_match_uses_dash() {
        let tickets = sample_tickets();
        let ranked = rank_tickets(&tickets, &DrawSequence::new(), &weights_3x3());
        assert!(format_tsv(&ranked).lines().all(|l| l.ends_with("\t0\t-\t-\t0")));
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_breakdown() {
        let mut cells: Vec<Cell> = (1..=9).map(Cell::Number).collect();
        cells[4] = Cell::Free;
        let ticket = Ticket::new(1, "Asha", GridSize::Three, cells);
        let drawn: HashSet<u32> = [1, 2, 3, 4, 6, 7, 8, 9].into_iter().collect();
        let breakdown = score_ticket(&ticket, &drawn, &weights_3x3());

        let result = format_breakdown(&breakdown, &weights_3x3(), false);
        assert!(result.contains("Completed cells (8)"));
        assert!(result.contains("8 cells × 1 pts"));
        assert!(result.contains("Full lines (6)"));
        assert!(result.contains("6 lines × 10 pts"));
        assert!(result.lines().last().unwrap().starts_with("Total"));
        assert!(result.lines().last().unwrap().ends_with("68"));
    }

    #[test]
    fn test_format_breakdown_shows_partial_corners() {
        let ticket = Ticket::new(1, "Asha", GridSize::Three, (1..=9).map(Cell::Number).collect());
        let drawn: HashSet<u32> = [1, 3].into_iter().collect();
        let breakdown = score_ticket(&ticket, &drawn, &weights_3x3());
        let result = format_breakdown(&breakdown, &weights_3x3(), false);
        assert!(result.contains("Corners (2/4)"));
    }

    #[test]
    fn test_format_grid_marks_drawn() {
        let mut cells: Vec<Cell> = (1..=9).map(Cell::Number).collect();
        cells[4] = Cell::Free;
        cells[8] = Cell::Empty;
        let drawn: HashSet<u32> = [1].into_iter().collect();
        let result = format_grid(&cells, GridSize::Three, &drawn, false);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[ 1  ]"));
        assert!(lines[1].contains("FREE"));
        assert!(lines[2].contains('.'));
    }

    #[test]
    fn test_format_weights() {
        let result = format_weights(&ScoringConfig::default(), None);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Grid"));
        assert!(lines[2].starts_with("4x4"));
        assert!(lines[2].ends_with("231"));
    }

    #[test]
    fn test_format_weights_single_grid() {
        let result = format_weights(&ScoringConfig::default(), Some(GridSize::Five));
        assert_eq!(result.lines().count(), 2);
        assert!(result.contains("5x5"));
    }

    #[test]
    fn test_format_draws() {
        assert_eq!(format_draws(&DrawSequence::new()), "No numbers drawn yet.");
        let draws = DrawSequence::from_vec(vec![5, 17]).unwrap();
        assert_eq!(format_draws(&draws), "Drawn (2): 5, 17");
    }
}
