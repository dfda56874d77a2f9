use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use crate::config::{get_config_path, Config};
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# bingo-rank configuration
#
# Points per rule for each grid size:
#   cell       per matched number (free spaces never count)
#   line       per full row or column
#   n_minus_1  per row or column missing one cell
#   n_minus_2  per row or column missing two cells
#   corners    once, when all four corners are filled
";

/// Write a starter config containing the built-in weight tables.
///
/// If `path` is None, writes to the default config path. Refuses to replace
/// an existing file unless `force` is set. Returns the path written.
pub fn write_default_config(path: Option<PathBuf>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
    }

    let config = Config {
        scoring: Some(ScoringConfig::default()),
    };
    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize default config")?;

    let mut file = AtomicWriteFile::open(&config_path)
        .with_context(|| format!("Failed to open atomic write file at {}", config_path.display()))?;
    file.write_all(HEADER.as_bytes())
        .and_then(|_| file.write_all(yaml.as_bytes()))
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    info!(path = %config_path.display(), "config written");
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let written = write_default_config(Some(path.clone()), false).unwrap();
        assert_eq!(written, path);

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "{}").unwrap();

        let err = write_default_config(Some(path.clone()), false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        write_default_config(Some(path.clone()), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("n_minus_1"));
    }
}
