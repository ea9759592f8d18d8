use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::JarvisConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["jarvis.toml", "jarvis.yaml", "jarvis.yml", "jarvis.json"];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Restrict config discovery to `path`. Each call replaces the previous
/// override.
pub fn set_config_dir(path: PathBuf) {
    if let Ok(mut slot) = CONFIG_DIR_OVERRIDE.lock() {
        *slot = Some(path);
    }
}

/// Clear the config directory override, restoring default discovery.
pub fn clear_config_dir() {
    if let Ok(mut slot) = CONFIG_DIR_OVERRIDE.lock() {
        *slot = None;
    }
}

fn config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .lock()
        .ok()
        .and_then(|slot| slot.clone())
}

/// Load config from the given path (toml, yaml or json by extension).
pub fn load_config(path: &Path) -> anyhow::Result<JarvisConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./jarvis.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/jarvis/jarvis.{toml,yaml,yml,json}` (user-global)
///
/// Returns `JarvisConfig::default()` if nothing is found or the file fails
/// to parse.
pub fn discover_and_load() -> JarvisConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return JarvisConfig::default();
    };
    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            JarvisConfig::default()
        },
    }
}

/// When an override is set, only that directory is searched.
fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return first_existing(&dir);
    }

    first_existing(Path::new(".")).or_else(|| user_config_dir().and_then(|d| first_existing(&d)))
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the config directory: override, or `~/.config/jarvis/`.
pub fn config_dir() -> Option<PathBuf> {
    config_dir_override().or_else(user_config_dir)
}

fn user_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("jarvis"))
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<JarvisConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
