use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".gh-feed.toml";

/// Candidate config files, in lookup order
///
/// 1. `.gh-feed.toml` in the current working directory
/// 2. `.gh-feed.toml` in the home directory
/// 3. `config.toml` in the platform config directory
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];

    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(CONFIG_FILE));
    }

    match crate::paths::app_config_path() {
        Ok(path) => candidates.push(path),
        Err(e) => log::debug!("No platform config directory: {}", e),
    }

    candidates
}

/// Load the first config file found among `config_candidates()`
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    read_first(&config_candidates())
}

/// Content of the first readable file in `candidates`
pub(crate) fn read_first(candidates: &[PathBuf]) -> Option<String> {
    candidates.iter().find_map(|path| read_config(path))
}

fn read_config(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            log::debug!("Loaded config from {}", path.display());
            Some(content)
        }
        Err(_) => None,
    }
}
