use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use super::config::{ScoringConfig, ScoringError, Weights};
use super::engine::{score_ticket, ScoreBreakdown};
use crate::game::{DrawSequence, Game, Ticket};

/// When a ticket's numbers came up in the draw sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MatchMetrics {
    /// 0-based position of the earliest draw on the ticket; `None` never matched
    pub first_match: Option<usize>,
    /// 0-based position of the latest draw on the ticket
    pub last_match: Option<usize>,
    /// Sum of (position + 1) over every matching draw. Lower struck earlier.
    pub strike_rank: u64,
}

impl MatchMetrics {
    pub fn from_draws(ticket: &Ticket, draws: &DrawSequence) -> Self {
        let numbers = ticket.number_set();
        let mut metrics = Self::default();
        for (index, n) in draws.iter().enumerate() {
            if numbers.contains(&n) {
                metrics.first_match.get_or_insert(index);
                metrics.last_match = Some(index);
                metrics.strike_rank += index as u64 + 1;
            }
        }
        metrics
    }
}

/// A ticket with its score and tie-break metrics
#[derive(Debug, Clone, Serialize)]
pub struct RankedTicket<'a> {
    pub ticket: &'a Ticket,
    pub breakdown: ScoreBreakdown,
    pub metrics: MatchMetrics,
}

impl RankedTicket<'_> {
    pub fn score(&self) -> u32 {
        self.breakdown.total
    }

    /// True when no scoring or tie-break criterion separates the two
    pub fn ties_with(&self, other: &RankedTicket<'_>) -> bool {
        compare_ranked(self, other) == Ordering::Equal
    }
}

// "No match" sorts after every real position
fn cmp_match_index(a: Option<usize>, b: Option<usize>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Winner-first ordering: score desc, then first match, last match and
/// strike rank ascending.
pub fn compare_ranked(a: &RankedTicket<'_>, b: &RankedTicket<'_>) -> Ordering {
    b.score()
        .cmp(&a.score())
        .then_with(|| cmp_match_index(a.metrics.first_match, b.metrics.first_match))
        .then_with(|| cmp_match_index(a.metrics.last_match, b.metrics.last_match))
        .then_with(|| a.metrics.strike_rank.cmp(&b.metrics.strike_rank))
}

// Settles exact ties so the ranking never depends on input order
fn compare_identity(a: &Ticket, b: &Ticket) -> Ordering {
    a.player
        .to_lowercase()
        .cmp(&b.player.to_lowercase())
        .then_with(|| a.player.cmp(&b.player))
        .then_with(|| a.id.cmp(&b.id))
}

/// Score every ticket and sort winner first. Index 0 is the winner.
pub fn rank_tickets<'a>(
    tickets: &'a [Ticket],
    draws: &DrawSequence,
    weights: &Weights,
) -> Vec<RankedTicket<'a>> {
    let drawn = draws.drawn_set();

    let mut ranked: Vec<_> = tickets
        .iter()
        .map(|ticket| RankedTicket {
            ticket,
            breakdown: score_ticket(ticket, &drawn, weights),
            metrics: MatchMetrics::from_draws(ticket, draws),
        })
        .collect();

    ranked.sort_by(|a, b| compare_ranked(a, b).then_with(|| compare_identity(a.ticket, b.ticket)));

    debug!(tickets = ranked.len(), draws = draws.len(), "tickets ranked");
    ranked
}

/// Rank a game's tickets with the weights configured for its grid size.
pub fn rank_game<'a>(game: &'a Game, config: &ScoringConfig) -> Result<Vec<RankedTicket<'a>>, ScoringError> {
    let weights = config.weights_for(game.grid)?;
    Ok(rank_tickets(&game.tickets, &game.draws, weights))
}
