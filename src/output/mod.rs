pub mod formatter;

pub use formatter::{
    format_breakdown, format_draws, format_grid, format_leaderboard, format_tsv, format_weights,
    should_use_colors,
};
