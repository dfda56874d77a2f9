use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bingo_rank::game::{
    load_game, parse_cells, save_game, DrawError, Game, GameError, GameRng, GridSize, Ticket,
    UniverseError,
};
use bingo_rank::output;
use bingo_rank::scoring::{self, ScoringConfig, ScoringError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_GAME: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new game file
    New {
        /// Path of the game file to create
        file: PathBuf,
        /// Display name of the game
        #[arg(long)]
        name: String,
        /// Grid size: 3x3, 4x4 or 5x5
        #[arg(long, default_value = "4x4")]
        grid: GridSize,
        /// Numbers to draw from, e.g. "1-75" or "1-20, 30-40"
        #[arg(long)]
        numbers: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Issue a ticket to a player (generated unless --cells is given)
    Ticket {
        file: PathBuf,
        player: String,
        /// Hand-entered cells, row-major, e.g. "1 2 3 4 FREE 6 7 8 9"
        #[arg(long)]
        cells: Option<String>,
        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Draw numbers without replacement
    Draw {
        file: PathBuf,
        /// How many numbers to draw
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the leaderboard, winner first
    Rank {
        file: PathBuf,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Show the score breakdown of a player's ticket or of hand-entered cells
    Score {
        file: PathBuf,
        /// Player whose ticket to score
        #[arg(required_unless_present = "cells")]
        player: Option<String>,
        /// Score these cells instead, row-major
        #[arg(long, conflicts_with = "player")]
        cells: Option<String>,
    },
    /// Print the scoring weights in effect
    Weights {
        /// Only this grid size
        #[arg(long)]
        grid: Option<GridSize>,
    },
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "bingo-rank")]
#[command(about = "Host a Bingo game and rank its tickets", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bingo-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "bingo_rank=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Map an error to its exit code by the library error it wraps
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ScoringError>().is_some() {
        EXIT_CONFIG
    } else if error.downcast_ref::<GameError>().is_some()
        || error.downcast_ref::<UniverseError>().is_some()
        || error.downcast_ref::<DrawError>().is_some()
    {
        EXIT_GAME
    } else {
        EXIT_IO
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.map(PathBuf::from);

    // Init writes the config, so it must not require a loadable one
    if let Commands::Init { force } = cli.command {
        match bingo_rank::config::write_default_config(config_path, force) {
            Ok(path) => {
                println!("Wrote default config to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Load config
    let config = match bingo_rank::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.effective_scoring();
    if let Err(errors) = scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    debug!(grids = scoring.grids.len(), "scoring config validated");

    let use_colors = output::should_use_colors();
    let result = match cli.command {
        Commands::New {
            file,
            name,
            grid,
            numbers,
            force,
        } => cmd_new(&file, &name, grid, &numbers, force),
        Commands::Ticket {
            file,
            player,
            cells,
            seed,
        } => cmd_ticket(&file, &player, cells.as_deref(), seed, use_colors),
        Commands::Draw { file, count, seed } => cmd_draw(&file, count, seed, use_colors),
        Commands::Rank { file, tsv } => cmd_rank(&file, &scoring, tsv, use_colors),
        Commands::Score {
            file,
            player,
            cells,
        } => cmd_score(&file, &scoring, player.as_deref(), cells.as_deref(), use_colors),
        Commands::Weights { grid } => {
            println!("{}", output::format_weights(&scoring, grid));
            Ok(())
        }
        Commands::Init { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code_for(&e));
    }

    std::process::exit(EXIT_SUCCESS);
}

fn cmd_new(file: &Path, name: &str, grid: GridSize, numbers: &str, force: bool) -> Result<()> {
    if file.exists() && !force {
        anyhow::bail!(
            "Game file already exists at {} (use --force to overwrite)",
            file.display()
        );
    }

    let game = Game::new(name, grid, numbers)?;
    let universe = game.universe()?;
    save_game(file, &game)?;

    println!(
        "Created \"{}\": {} grid, {} numbers, saved to {}",
        game.name,
        game.grid,
        universe.len(),
        file.display()
    );
    println!(
        "Issue at least {} tickets before the first draw.",
        game.grid.min_tickets()
    );
    Ok(())
}

fn cmd_ticket(
    file: &Path,
    player: &str,
    cells: Option<&str>,
    seed: Option<u64>,
    use_colors: bool,
) -> Result<()> {
    let mut game = load_game(file)?;

    let ticket: Ticket = match cells {
        Some(input) => {
            let cells = parse_cells(input).context("Failed to parse --cells")?;
            game.add_ticket_with_cells(player, cells)?.clone()
        }
        None => {
            let mut rng = GameRng::from_seed_option(seed);
            game.add_ticket(player, &mut rng)?.clone()
        }
    };
    save_game(file, &game)?;

    println!("Ticket #{} for {}", ticket.id, ticket.player);
    println!(
        "{}",
        output::format_grid(&ticket.cells, ticket.size, &Default::default(), use_colors)
    );

    let missing = game.grid.min_tickets().saturating_sub(game.tickets.len());
    if missing > 0 {
        println!();
        println!("{} more ticket(s) needed before drawing.", missing);
    }
    Ok(())
}

fn cmd_draw(file: &Path, count: usize, seed: Option<u64>, use_colors: bool) -> Result<()> {
    let mut game = load_game(file)?;
    let mut rng = GameRng::from_seed_option(seed);

    // The game keeps whatever was drawn before a failure
    let before = game.draws.len();
    let result = game.draw_many(count, &mut rng);
    for (offset, n) in game.draws.as_slice()[before..].iter().enumerate() {
        println!("Drew {} (draw #{})", n, before + offset + 1);
    }
    save_game(file, &game)?;
    result?;

    println!();
    println!("{}", output::format_draws(&game.draws));
    println!();
    println!("Golden ticket:");
    println!(
        "{}",
        output::format_grid(&game.golden_ticket(), game.grid, &game.draws.drawn_set(), use_colors)
    );
    Ok(())
}

fn cmd_rank(file: &Path, scoring: &ScoringConfig, tsv: bool, use_colors: bool) -> Result<()> {
    let game = load_game(file)?;
    let ranked = scoring::rank_game(&game, scoring)?;

    if tsv {
        println!("{}", output::format_tsv(&ranked));
        return Ok(());
    }

    println!(
        "{} ({}), {} tickets, {} numbers drawn",
        game.name,
        game.grid,
        game.tickets.len(),
        game.draws.len()
    );
    println!();
    println!("{}", output::format_leaderboard(&ranked, use_colors));

    if let Some(winner) = ranked.first() {
        println!();
        println!("Winner: {} with {} points", winner.ticket.player, winner.score());
        if ranked.get(1).is_some_and(|second| winner.ties_with(second)) {
            println!("(Tied on every criterion; settled by player name.)");
        }
    }
    Ok(())
}

fn cmd_score(
    file: &Path,
    scoring: &ScoringConfig,
    player: Option<&str>,
    cells: Option<&str>,
    use_colors: bool,
) -> Result<()> {
    let game = load_game(file)?;
    let weights = scoring.weights_for(game.grid)?;

    let ticket = match (player, cells) {
        (_, Some(input)) => {
            let cells = parse_cells(input).context("Failed to parse --cells")?;
            let ticket = Ticket::new(0, "calculator", game.grid, cells);
            ticket
                .validate(&game.universe()?)
                .map_err(|issues| GameError::InvalidTicket {
                    player: ticket.player.clone(),
                    issues,
                })?;
            ticket
        }
        (Some(name), None) => game
            .ticket(name)
            .cloned()
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))?,
        (None, None) => anyhow::bail!("Give a player name or --cells"),
    };

    let drawn = game.draws.drawn_set();
    let breakdown = scoring::score_ticket(&ticket, &drawn, weights);

    println!("{} ({}), {} numbers drawn", game.name, game.grid, game.draws.len());
    println!();
    println!("{}", output::format_grid(&ticket.cells, ticket.size, &drawn, use_colors));
    println!();
    println!("{}", output::format_breakdown(&breakdown, weights, use_colors));

    if player.is_some() {
        let ranked = scoring::rank_game(&game, scoring)?;
        if let Some(position) = ranked.iter().position(|r| r.ticket.id == ticket.id) {
            println!();
            println!("Rank {} of {}", position + 1, ranked.len());
        }
    }
    Ok(())
}
