use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::engine::driver::MergeConfig;
use crate::engine::errors::ConfigError;
use crate::engine::merge::MergeStrategy;
use crate::engine::session::EngineOptions;
use crate::shared::path::absolutize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub merge: MergeSettings,
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct MergeSettings {
    pub existing_dir: PathBuf,
    pub incoming_dir: PathBuf,
    pub label: String,
    /// 0 or absent processes every file.
    pub max_files: Option<usize>,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_key_columns")]
    pub key_columns: Vec<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    pub output_root: Option<PathBuf>,
    #[serde(default = "default_retain_output")]
    pub retain_output: bool,
    #[serde(default)]
    pub strategy: MergeStrategy,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Exit non-zero when any file failed.
    #[serde(default)]
    pub strict: bool,
    /// Where to write the JSON run summary.
    pub report_path: Option<PathBuf>,
}

fn default_iterations() -> usize {
    1
}

fn default_key_columns() -> Vec<String> {
    vec!["id".to_string()]
}

fn default_file_extension() -> String {
    "parquet".to_string()
}

fn default_retain_output() -> bool {
    true
}

fn default_workers() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Daily-rolling log files go here; stdout only when unset.
    pub log_dir: Option<String>,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

impl Settings {
    /// Validates the settings and freezes them into a run config.
    pub fn merge_config(&self) -> Result<MergeConfig, ConfigError> {
        let merge = &self.merge;
        if merge.label.trim().is_empty() {
            return Err(ConfigError::Invalid("merge.label must not be empty".into()));
        }
        if merge.iterations == 0 {
            return Err(ConfigError::Invalid("merge.iterations must be at least 1".into()));
        }
        if merge.workers == 0 {
            return Err(ConfigError::Invalid("merge.workers must be at least 1".into()));
        }
        if merge.key_columns.is_empty() {
            return Err(ConfigError::Invalid("merge.key_columns must not be empty".into()));
        }
        if self.engine.threads == Some(0) {
            return Err(ConfigError::Invalid("engine.threads must be positive".into()));
        }

        let mut engine = self.engine.clone();
        engine.scratch_root = engine.scratch_root.map(absolutize);

        Ok(MergeConfig {
            existing_dir: absolutize(&merge.existing_dir),
            incoming_dir: absolutize(&merge.incoming_dir),
            label: merge.label.clone(),
            max_files: merge.max_files,
            iterations: merge.iterations,
            key_columns: merge.key_columns.clone(),
            columns: merge.columns.clone(),
            file_extension: merge.file_extension.clone(),
            output_root: merge.output_root.as_ref().map(absolutize),
            retain_output: merge.retain_output,
            strategy: merge.strategy,
            workers: merge.workers,
            engine,
        })
    }
}

/// Loads settings from `$DUCK_MERGE_CONFIG` (default `config/duck_merge`).
pub fn load_settings() -> Result<Settings, ConfigError> {
    let config_path =
        env::var("DUCK_MERGE_CONFIG").unwrap_or_else(|_| "config/duck_merge".to_string());
    load_settings_from(&config_path)
}

/// Loads settings from a file, with `DUCK_MERGE__SECTION__KEY` variables
/// layered on top.
pub fn load_settings_from(config_path: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(config_path))
        .add_source(
            config::Environment::with_prefix("DUCK_MERGE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
