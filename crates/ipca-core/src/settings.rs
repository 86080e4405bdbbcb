use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{IpcaError, Result};

pub const DEFAULT_INPUT_DIR: &str = "data/raw";
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/ipca_grupos_regioes_long.csv";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Reshape monthly IPCA tables into a long table and serve it as JSON
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ipca",
    about = "Reshape monthly IPCA tables into a long table and serve it as JSON",
    version
)]
pub struct Settings {
    /// What to run: the batch transform, the HTTP endpoint, or both in sequence
    #[arg(long, env = "IPCA_MODE", default_value = "etl", value_parser = ["etl", "serve", "all"])]
    pub mode: String,

    /// Directory holding the raw `YYYY_MM.csv` files
    #[arg(long, env = "IPCA_INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Location of the tab-delimited long table
    #[arg(long, env = "IPCA_OUTPUT_PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: PathBuf,

    /// Address the HTTP endpoint listens on
    #[arg(long, env = "IPCA_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Directory of static dashboard files served as the router fallback
    #[arg(long, env = "IPCA_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, env = "IPCA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, env = "IPCA_LOG_LEVEL", default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, env = "IPCA_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Explicit configuration handed to the entry points ─────────────────────────

/// Paths used by the batch transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
}

/// Everything the HTTP endpoint needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub output_path: PathBuf,
    pub static_dir: Option<PathBuf>,
}

// ── ConfigFile ─────────────────────────────────────────────────────────────────

/// Optional JSON file supplying defaults for the path and bind options.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Load a config file. Unlike a cache, an explicitly named config file
    /// that is missing or malformed is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| IpcaError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and merge the config file, if any.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Result<Self> {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        // Parse into the typed struct using the same args.
        let mut settings = Settings::parse_from(args);

        if let Some(config_path) = settings.config.clone() {
            let file = ConfigFile::load_from(&config_path)?;
            tracing::debug!("loaded config file {}", config_path.display());
            settings.merge_config_file(file, &matches);
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Fill options the user did not supply (on the command line or through
    /// the environment) from `file`. Precedence: CLI, env, file, default.
    fn merge_config_file(&mut self, file: ConfigFile, matches: &clap::ArgMatches) {
        // NOTE: clap stores the arg id using the *field name* (underscores),
        // not the long-flag spelling (hyphens).
        if !is_arg_explicitly_set(matches, "input_dir") {
            if let Some(v) = file.input_dir {
                self.input_dir = v;
            }
        }
        if !is_arg_explicitly_set(matches, "output_path") {
            if let Some(v) = file.output_path {
                self.output_path = v;
            }
        }
        if !is_arg_explicitly_set(matches, "bind") {
            if let Some(v) = file.bind {
                self.bind = v;
            }
        }
        if !is_arg_explicitly_set(matches, "static_dir") && self.static_dir.is_none() {
            self.static_dir = file.static_dir;
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input_dir: self.input_dir.clone(),
            output_path: self.output_path.clone(),
        }
    }

    /// Build the server configuration, validating the bind address.
    pub fn server_config(&self) -> Result<ServerConfig> {
        let bind = self
            .bind
            .parse::<SocketAddr>()
            .map_err(|e| IpcaError::Config(format!("invalid bind address {:?}: {}", self.bind, e)))?;
        Ok(ServerConfig {
            bind,
            output_path: self.output_path.clone(),
            static_dir: self.static_dir.clone(),
        })
    }
}

// ── Helper: check if an arg was supplied by the user ───────────────────────────

/// Returns `true` when `name` was supplied on the command line or through its
/// environment variable (not via default value).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(clap::parser::ValueSource::CommandLine) | Some(clap::parser::ValueSource::EnvVariable)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
