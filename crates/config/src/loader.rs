use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::VoiraConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["voira.toml", "voira.yaml", "voira.yml", "voira.json"];

static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);
static DATA_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Override the config directory (`--config-dir`).
pub fn set_config_dir(dir: PathBuf) {
    *CONFIG_DIR_OVERRIDE.lock().unwrap_or_else(|e| e.into_inner()) = Some(dir);
}

pub fn clear_config_dir() {
    *CONFIG_DIR_OVERRIDE.lock().unwrap_or_else(|e| e.into_inner()) = None;
}

/// Override the data directory (`--data-dir`).
pub fn set_data_dir(dir: PathBuf) {
    *DATA_DIR_OVERRIDE.lock().unwrap_or_else(|e| e.into_inner()) = Some(dir);
}

pub fn clear_data_dir() {
    *DATA_DIR_OVERRIDE.lock().unwrap_or_else(|e| e.into_inner()) = None;
}

/// Returns the user-global config directory (`~/.config/voira/`), or the
/// override when one is set.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
    {
        return Some(dir);
    }
    directories::ProjectDirs::from("", "", "voira").map(|d| d.config_dir().to_path_buf())
}

/// Returns the data directory holding persisted onboarding sessions.
///
/// Falls back to `./.voira` when no platform data dir can be determined.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = DATA_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
    {
        return dir;
    }
    directories::ProjectDirs::from("", "", "voira")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".voira"))
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<VoiraConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations, then apply env
/// overrides.
///
/// Search order:
/// 1. `./voira.{toml,yaml,yml,json}` (project-local)
/// 2. `<config_dir>/voira.{toml,yaml,yml,json}` (user-global)
///
/// Falls back to `VoiraConfig::default()` when nothing is found or the file
/// fails to parse.
pub fn discover_and_load() -> VoiraConfig {
    let config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            match load_config(&path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                    VoiraConfig::default()
                },
            }
        },
        None => {
            debug!("no config file found, using defaults");
            VoiraConfig::default()
        },
    };
    apply_env_overrides(config)
}

/// Fill ingestion credentials from the environment when the process sets them.
pub fn apply_env_overrides(config: VoiraConfig) -> VoiraConfig {
    apply_env_overrides_with(config, |name| std::env::var(name).ok())
}

fn apply_env_overrides_with(
    mut config: VoiraConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> VoiraConfig {
    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
    if let Some(url) = non_empty("WEAVIATE_URL") {
        config.ingest.weaviate_url = Some(url);
    }
    if let Some(key) = non_empty("WEAVIATE_API_KEY") {
        config.ingest.weaviate_api_key = Some(Secret::new(key));
    }
    if let Some(key) = non_empty("OPENAI_API_KEY") {
        config.ingest.openai_api_key = Some(Secret::new(key));
    }
    config
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<VoiraConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
