use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use super::draw::{DrawError, DrawSequence};
use super::grid::{Cell, GridSize};
use super::rng::GameRng;
use super::ticket::Ticket;
use super::universe::{NumberUniverse, UniverseError};

pub const GAME_VERSION: u32 = 1;

// Failsafe for universes too small to yield another distinct ticket
const MAX_GENERATION_ATTEMPTS: usize = 100;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("game name must not be empty")]
    EmptyName,
    #[error("player name must not be empty")]
    EmptyPlayer,
    #[error("a ticket for \"{0}\" already exists")]
    DuplicatePlayer(String),
    #[error("no ticket for player \"{0}\"")]
    UnknownPlayer(String),
    #[error("could not generate a unique ticket after {0} attempts; try a longer number list")]
    GenerationExhausted(usize),
    #[error("invalid ticket for \"{player}\": {}", .issues.join("; "))]
    InvalidTicket { player: String, issues: Vec<String> },
    #[error("tickets are closed once drawing has started")]
    TicketsClosed,
    #[error("a {grid} game needs at least {required} tickets before drawing, {available} generated")]
    TooFewTickets {
        grid: GridSize,
        required: usize,
        available: usize,
    },
    #[error("all {0} numbers have been drawn")]
    UniverseExhausted(usize),
    #[error("the golden ticket is full: all {0} cells have been drawn")]
    GridFull(usize),
    #[error("unsupported game file version: {0}")]
    UnsupportedVersion(u32),
    #[error("inconsistent game data:\n  - {}", .0.join("\n  - "))]
    Inconsistent(Vec<String>),
    #[error(transparent)]
    Universe(#[from] UniverseError),
    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// A hosted game: its configuration, the tickets handed out, and the draws so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub version: u32,
    pub name: String,
    pub grid: GridSize,
    /// Number list as entered, e.g. "1-75"
    pub numbers: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub draws: DrawSequence,
}

impl Game {
    pub fn new(name: &str, grid: GridSize, numbers: &str) -> Result<Self, GameError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyName);
        }
        NumberUniverse::parse(numbers)?.ensure_supports(grid)?;

        Ok(Self {
            version: GAME_VERSION,
            name: name.to_string(),
            grid,
            numbers: numbers.trim().to_string(),
            created_at: Utc::now(),
            tickets: Vec::new(),
            draws: DrawSequence::new(),
        })
    }

    pub fn universe(&self) -> Result<NumberUniverse, GameError> {
        Ok(NumberUniverse::parse(&self.numbers)?)
    }

    /// Look up a ticket by player name (case-insensitive)
    pub fn ticket(&self, player: &str) -> Option<&Ticket> {
        let player = player.trim();
        self.tickets
            .iter()
            .find(|t| same_player(&t.player, player))
    }

    /// Generate a ticket for `player` from a shuffle of the game's numbers.
    ///
    /// The new ticket's number set differs from every existing ticket's.
    /// Generated tickets carry no free space.
    pub fn add_ticket(&mut self, player: &str, rng: &mut GameRng) -> Result<&Ticket, GameError> {
        let player = self.check_new_player(player)?;
        let universe = self.universe()?;
        let cell_count = self.grid.cell_count();
        if universe.len() < cell_count {
            return Err(UniverseError::NotEnoughNumbers {
                grid: self.grid,
                required: cell_count,
                available: universe.len(),
            }
            .into());
        }

        let existing: HashSet<Vec<u32>> = self.tickets.iter().map(sorted_numbers).collect();
        let mut pool = universe.to_vec();

        let mut attempts = 0;
        let numbers = loop {
            attempts += 1;
            if attempts > MAX_GENERATION_ATTEMPTS {
                return Err(GameError::GenerationExhausted(MAX_GENERATION_ATTEMPTS));
            }
            rng.shuffle(&mut pool);
            let candidate = pool[..cell_count].to_vec();
            let mut key = candidate.clone();
            key.sort_unstable();
            if !existing.contains(&key) {
                break candidate;
            }
            debug!(player = %player, attempts, "generated ticket collides with an existing one");
        };

        let cells = numbers.into_iter().map(Cell::Number).collect();
        Ok(self.push_ticket(player, cells))
    }

    /// Register a hand-entered ticket after validating it against the game.
    pub fn add_ticket_with_cells(&mut self, player: &str, cells: Vec<Cell>) -> Result<&Ticket, GameError> {
        let player = self.check_new_player(player)?;
        let universe = self.universe()?;
        let candidate = Ticket::new(0, player.clone(), self.grid, cells);
        candidate
            .validate(&universe)
            .map_err(|issues| GameError::InvalidTicket {
                player: player.clone(),
                issues,
            })?;
        Ok(self.push_ticket(player, candidate.cells))
    }

    fn check_new_player(&self, player: &str) -> Result<String, GameError> {
        if !self.draws.is_empty() {
            return Err(GameError::TicketsClosed);
        }
        let player = player.trim();
        if player.is_empty() {
            return Err(GameError::EmptyPlayer);
        }
        if self.ticket(player).is_some() {
            return Err(GameError::DuplicatePlayer(player.to_string()));
        }
        Ok(player.to_string())
    }

    fn push_ticket(&mut self, player: String, cells: Vec<Cell>) -> &Ticket {
        let id = self.tickets.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        info!(player = %player, id, "ticket issued");
        self.tickets.push(Ticket::new(id, player, self.grid, cells));
        &self.tickets[self.tickets.len() - 1]
    }

    /// Numbers not drawn yet, ascending
    pub fn remaining_numbers(&self) -> Result<Vec<u32>, GameError> {
        Ok(self
            .universe()?
            .iter()
            .filter(|n| !self.draws.contains(*n))
            .collect())
    }

    /// Draw one number uniformly from those not yet drawn.
    pub fn draw(&mut self, rng: &mut GameRng) -> Result<u32, GameError> {
        let mut drawn = self.draw_many(1, rng)?;
        drawn
            .pop()
            .ok_or(GameError::UniverseExhausted(self.draws.len()))
    }

    /// Draw up to `count` numbers, parsing the number list once.
    ///
    /// Drawing stops when the golden ticket is full (one draw per cell).
    /// On error the game keeps every number drawn before it.
    pub fn draw_many(&mut self, count: usize, rng: &mut GameRng) -> Result<Vec<u32>, GameError> {
        let required = self.grid.min_tickets();
        if self.tickets.len() < required {
            return Err(GameError::TooFewTickets {
                grid: self.grid,
                required,
                available: self.tickets.len(),
            });
        }

        let mut remaining = self.remaining_numbers()?;
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            if self.draws.len() >= self.grid.cell_count() {
                return Err(GameError::GridFull(self.grid.cell_count()));
            }
            let n = match rng.choose(&remaining) {
                Some(&n) => n,
                None => return Err(GameError::UniverseExhausted(self.draws.len())),
            };
            remaining.retain(|&r| r != n);
            self.draws.push(n)?;
            debug!(number = n, position = self.draws.len(), "number drawn");
            drawn.push(n);
        }
        Ok(drawn)
    }

    /// Golden ticket for this game's grid
    pub fn golden_ticket(&self) -> Vec<Cell> {
        self.draws.golden_ticket(self.grid)
    }

    /// Check a loaded game is internally consistent.
    /// Returns all issues at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let universe = match self.universe() {
            Ok(u) => u,
            Err(e) => {
                return Err(vec![format!("numbers: {}", e)]);
            }
        };
        if let Err(e) = universe.ensure_supports(self.grid) {
            errors.push(format!("numbers: {}", e));
        }

        if self.draws.len() > self.grid.cell_count() {
            errors.push(format!(
                "draws: {} numbers drawn, a {} grid holds {}",
                self.draws.len(),
                self.grid,
                self.grid.cell_count()
            ));
        }
        for n in self.draws.iter() {
            if !universe.contains(n) {
                errors.push(format!("draws: {} is not in this game's numbers", n));
            }
        }

        let mut players = HashSet::new();
        for ticket in &self.tickets {
            if !players.insert(player_key(&ticket.player)) {
                errors.push(format!("tickets: duplicate player \"{}\"", ticket.player));
            }
            if ticket.size != self.grid {
                errors.push(format!(
                    "tickets[{}]: {} ticket in a {} game",
                    ticket.player, ticket.size, self.grid
                ));
            }
            if let Err(issues) = ticket.validate(&universe) {
                for issue in issues {
                    errors.push(format!("tickets[{}]: {}", ticket.player, issue));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// Player names are unique per game under this folding
fn player_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn same_player(a: &str, b: &str) -> bool {
    player_key(a) == player_key(b)
}

fn sorted_numbers(ticket: &Ticket) -> Vec<u32> {
    let mut numbers: Vec<u32> = ticket.numbers().collect();
    numbers.sort_unstable();
    numbers
}
