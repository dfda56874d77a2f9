use super::state::{Game, GameError, GAME_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

/// Load a game from a JSON file
///
/// Fails if the file is missing, has an unsupported version, or holds
/// tickets/draws inconsistent with the game's grid and numbers.
pub fn load_game(path: &Path) -> Result<Game> {
    if !path.exists() {
        anyhow::bail!(
            "Game file not found at {}. Create one with `bingo-rank new`",
            path.display()
        );
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open game file at {}", path.display()))?;

    let game: Game = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse game file at {}", path.display()))?;

    // Version check
    if game.version != GAME_VERSION {
        return Err(GameError::UnsupportedVersion(game.version))
            .with_context(|| format!("Cannot load game file at {}", path.display()));
    }

    game.validate()
        .map_err(GameError::Inconsistent)
        .with_context(|| format!("Cannot load game file at {}", path.display()))?;

    Ok(game)
}

/// Save a game to a JSON file atomically
///
/// The file is never left half-written. Parent directories are created.
pub fn save_game(path: &Path, game: &Game) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, game).context("Failed to serialize game")?;

    file.commit().context("Failed to save game")?;

    Ok(())
}
