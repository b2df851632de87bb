//! Configuration loader
//!
//! Loads parser settings (`parser.yaml`) and lexicon tables
//! (`lexicon/*.yaml`) from a config directory. Missing files fall back to
//! the built-in defaults with a warning.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::lexicon::{compile, Lexicon, LexiconConfig, LexiconPatch};
use crate::parser::QueryParser;

/// Below this confidence the parser recommends full-text search.
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.5;

/// Upper price bound implied by "cheap", "budget" and similar keywords.
pub const DEFAULT_CHEAP_PRICE_MAX: i64 = 5;

/// Queries longer than this many characters are truncated.
pub const DEFAULT_MAX_QUERY_CHARS: usize = 512;

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub low_threshold: f64,
    pub cheap_price_max: Decimal,
    pub max_query_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            cheap_price_max: Decimal::from(DEFAULT_CHEAP_PRICE_MAX),
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.low_threshold),
            "low_threshold must be within [0, 1], got {}",
            self.low_threshold
        );
        ensure!(
            !self.cheap_price_max.is_sign_negative(),
            "cheap_price_max must not be negative, got {}",
            self.cheap_price_max
        );
        ensure!(self.max_query_chars > 0, "max_query_chars must be positive");
        Ok(())
    }
}

pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Create loader from NLQ_CONFIG_DIR env var or default to "config"
    ///
    /// Path resolution order:
    /// 1. NLQ_CONFIG_DIR environment variable (explicit override)
    /// 2. Relative "config" path (works when running from the repo root)
    /// 3. CARGO_MANIFEST_DIR/config (works under cargo run/test)
    /// 4. The crate's own config directory at build time
    pub fn from_env() -> Self {
        let config_dir = resolve_config_dir(
            std::env::var_os("NLQ_CONFIG_DIR").map(PathBuf::from),
            Path::new("config"),
            std::env::var_os("CARGO_MANIFEST_DIR").map(PathBuf::from),
        );
        info!(path = %config_dir.display(), "Resolved config directory");
        Self::new(config_dir)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load `parser.yaml`, or defaults if it does not exist.
    pub fn load_parser_config(&self) -> Result<ParserConfig> {
        let path = self.config_dir.join("parser.yaml");
        if !path.exists() {
            warn!(path = %path.display(), "parser.yaml not found, using defaults");
            return Ok(ParserConfig::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ParserConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid parser config in {}", path.display()))?;

        info!(path = %path.display(), "Loaded parser config");
        Ok(config)
    }

    /// Load lexicon tables from `lexicon/*.yaml`.
    ///
    /// Files are applied over the built-in tables in file-name order; each
    /// section present in a file replaces the built-in table of that name.
    pub fn load_lexicon_config(&self) -> Result<LexiconConfig> {
        let lexicon_dir = self.config_dir.join("lexicon");
        let mut config = LexiconConfig::default();

        if !lexicon_dir.is_dir() {
            warn!(
                path = %lexicon_dir.display(),
                "lexicon directory not found, using built-in tables"
            );
            return Ok(config);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&lexicon_dir)
            .with_context(|| format!("Failed to read directory {}", lexicon_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "yaml" || ext == "yml"))
            .collect();
        files.sort();

        if files.is_empty() {
            warn!(
                path = %lexicon_dir.display(),
                "no lexicon files found, using built-in tables"
            );
        }

        for path in files {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let patch: LexiconPatch = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            let sections = patch.sections();
            if sections.is_empty() {
                warn!(path = %path.display(), "lexicon file has no known sections");
            }
            info!(path = %path.display(), sections = ?sections, "Loaded lexicon file");
            config.apply(patch);
        }

        Ok(config)
    }

    /// Load and compile the lexicon.
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        let config = self.load_lexicon_config()?;
        let lexicon = compile(&config).with_context(|| {
            format!(
                "Failed to compile lexicon from {}",
                self.config_dir.join("lexicon").display()
            )
        })?;
        info!(hash = %lexicon.hash, "Compiled lexicon");
        Ok(lexicon)
    }

    /// Build a parser from everything in the config directory.
    pub fn build_parser(&self) -> Result<QueryParser> {
        let config = self.load_parser_config()?;
        let lexicon = self.load_lexicon()?;
        Ok(QueryParser::new(Arc::new(lexicon), config))
    }
}

fn resolve_config_dir(
    env_dir: Option<PathBuf>,
    relative: &Path,
    manifest_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = env_dir {
        return dir;
    }

    if relative.is_dir() {
        return relative.to_path_buf();
    }

    if let Some(config_path) = manifest_dir.map(|dir| dir.join("config")) {
        if config_path.is_dir() {
            return config_path;
        }
    }

    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/config"))
}
