use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use twentyq_core::model::{Attribute, AttributeKind, Schema, SchemaError};
use twentyq_core::session::SessionConfig;

const DEFAULT_RUN_ID: &str = "football";
const DEFAULT_CATALOGUE: &str = "data/players.yaml";
const DEFAULT_TOP_CANDIDATES: usize = 5;
const DEFAULT_MAX_OPTIONS: usize = 10;
const DEFAULT_JSONL: &str = "out/{run_id}/rounds.jsonl";
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root game configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_run_id")]
    pub run_id: String,
    #[serde(default = "default_catalogue")]
    pub catalogue: String,
    /// Ordered attribute schema; empty means the built-in football schema.
    #[serde(default)]
    pub schema: Vec<AttributeConfig>,
    /// File values; `TWENTYQ_*` environment variables override them on load.
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub simulate: SimulateConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Directory relative catalogue paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            run_id: default_run_id(),
            catalogue: default_catalogue(),
            schema: Vec::new(),
            session: SessionConfig::from_env(),
            display: DisplayConfig::default(),
            simulate: SimulateConfig::default(),
            outputs: OutputsConfig::default(),
            logging: LoggingConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: GameConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.base_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        cfg.apply_session_overrides(|key| std::env::var(key).ok());
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Layers per-field session overrides (normally the environment) over the file values.
    pub fn apply_session_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.session = self.session.with_overrides(lookup);
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        if self.catalogue.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "catalogue".to_string(),
                message: "catalogue path must not be empty".to_string(),
            });
        }
        self.schema()?;
        self.session
            .validate()
            .map_err(|err| ValidationError::InvalidField {
                field: "session.confidence_threshold".to_string(),
                message: err.to_string(),
            })?;
        self.display.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// The attribute schema, falling back to the football schema when none is configured.
    pub fn schema(&self) -> Result<Schema, ValidationError> {
        if self.schema.is_empty() {
            return Ok(Schema::football());
        }
        let attributes = self
            .schema
            .iter()
            .map(|attr| Attribute {
                name: attr.name.trim().to_string(),
                kind: attr.kind,
            })
            .collect();
        Schema::new(attributes).map_err(|err: SchemaError| ValidationError::InvalidField {
            field: "schema".to_string(),
            message: err.to_string(),
        })
    }

    /// Question wording for `attribute`.
    pub fn prompt_for(&self, attribute: &str) -> String {
        self.schema
            .iter()
            .find(|attr| attr.name.trim() == attribute)
            .and_then(|attr| attr.prompt.clone())
            .or_else(|| football_prompt(attribute).map(str::to_string))
            .unwrap_or_else(|| format!("What is the value of {attribute}?"))
    }

    pub fn catalogue_path(&self) -> PathBuf {
        let raw = PathBuf::from(&self.catalogue);
        if raw.is_absolute() {
            raw
        } else {
            self.base_dir.join(raw)
        }
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
        }
    }
}

fn default_run_id() -> String {
    DEFAULT_RUN_ID.to_string()
}

fn default_catalogue() -> String {
    DEFAULT_CATALOGUE.to_string()
}

fn football_prompt(attribute: &str) -> Option<&'static str> {
    match attribute {
        "club" => Some("Which club does the player play for?"),
        "position" => Some("Which position does the player play in?"),
        "nationality" => Some("What is the player's nationality?"),
        "retired" => Some("Is the player retired?"),
        "ballon_dor" => Some("Has the player won the Ballon d'Or?"),
        "champions_league" => Some("Has the player won the Champions League?"),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AttributeConfig {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Presentation limits for the interactive terminal.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_top_candidates")]
    pub top: usize,
    #[serde(default = "default_max_options")]
    pub max_options: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP_CANDIDATES,
            max_options: DEFAULT_MAX_OPTIONS,
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.top == 0 {
            return Err(ValidationError::InvalidField {
                field: "display.top".to_string(),
                message: "must show at least one candidate".to_string(),
            });
        }
        if self.max_options == 0 {
            return Err(ValidationError::InvalidField {
                field: "display.max_options".to_string(),
                message: "must show at least one option".to_string(),
            });
        }
        Ok(())
    }
}

fn default_top_candidates() -> usize {
    DEFAULT_TOP_CANDIDATES
}

fn default_max_options() -> usize {
    DEFAULT_MAX_OPTIONS
}

/// Self-play simulation block.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SimulateConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    /// Number of sampled targets; zero plays every entity once in catalogue order.
    #[serde(default)]
    pub rounds: usize,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    #[serde(default = "default_jsonl")]
    pub jsonl: String,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            jsonl: default_jsonl(),
        }
    }
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        if self.jsonl.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        let resolved = resolve_template(run_id, &self.jsonl);
        if resolved.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "resolved path is invalid".to_string(),
            });
        }
        Ok(())
    }
}

fn default_jsonl() -> String {
    DEFAULT_JSONL.to_string()
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
