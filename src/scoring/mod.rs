pub mod config;
pub mod engine;
pub mod rank;
pub mod validation;

pub use config::*;
pub use engine::{checked_max_score, max_score, score_ticket, Rule, RuleContribution, ScoreBreakdown};
pub use rank::{compare_ranked, rank_game, rank_tickets, MatchMetrics, RankedTicket};
pub use validation::validate_scoring;
