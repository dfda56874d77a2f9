pub mod draw;
pub mod grid;
pub mod rng;
pub mod state;
pub mod storage;
pub mod ticket;
pub mod universe;

pub use draw::{DrawError, DrawSequence};
pub use grid::{parse_cells, Cell, GridSize};
pub use rng::GameRng;
pub use state::{Game, GameError, GAME_VERSION};
pub use storage::{load_game, save_game};
pub use ticket::Ticket;
pub use universe::{NumberUniverse, UniverseError, MAX_UNIVERSE_SIZE};
