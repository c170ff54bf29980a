//! Configuration loading and env substitution.
//!
//! Config files: `voira.toml`, `voira.yaml`, or `voira.json`
//! Searched in `./` then `~/.config/voira/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        apply_env_overrides, clear_config_dir, clear_data_dir, config_dir, data_dir,
        discover_and_load, load_config, set_config_dir, set_data_dir,
    },
    schema::{
        DEFAULT_STORAGE_KEY, IngestConfig, OnboardingConfig, ServerConfig, ServicesConfig,
        VoiraConfig,
    },
};
