//! Layered configuration for the order exposure tracker.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `OX_`, nested with `__`)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

// ── Default value functions ────────────────────────────────────────────

/// Default log level when `RUST_LOG` is unset.
fn default_log_level() -> String {
    "info".to_string()
}

/// Default diagnostic buffer capacity: 1 024 entries.
fn default_diagnostics_capacity() -> usize {
    1_024
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Tracing output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Order manager behaviour.
    #[serde(default)]
    pub oms: OmsConfig,
}

/// Tracing output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of pretty, human-readable output.
    #[serde(default)]
    pub json: bool,
    /// Filter directive used when `RUST_LOG` is not set (e.g. `"debug"`,
    /// `"ox_oms=trace,info"`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: default_log_level(),
        }
    }
}

/// Order manager configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OmsConfig {
    /// What happens to the order map key when a replace is acknowledged.
    #[serde(default)]
    pub replace_keying: ReplaceKeying,
    /// Maximum number of undrained diagnostics kept in memory. Oldest
    /// entries are evicted first.
    #[serde(default = "default_diagnostics_capacity")]
    pub diagnostics_capacity: usize,
}

impl Default for OmsConfig {
    fn default() -> Self {
        Self {
            replace_keying: ReplaceKeying::default(),
            diagnostics_capacity: default_diagnostics_capacity(),
        }
    }
}

/// Map keying policy applied when a replace request is acknowledged.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplaceKeying {
    /// Move the order to its new identifier. Later notifications must use
    /// the new id.
    #[default]
    Rekey,
    /// Keep the order under the identifier it was inserted with. Only the
    /// order's own tracking id changes.
    Retain,
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `OX_` and `__` as the
    ///    nesting separator (e.g., `OX_OMS__REPLACE_KEYING=retain`).
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            // ── Layer 1: compiled-in defaults ───────────────────────
            .set_default("logging.json", false)?
            .set_default("logging.level", default_log_level())?
            .set_default("oms.replace_keying", "rekey")?
            .set_default(
                "oms.diagnostics_capacity",
                default_diagnostics_capacity() as i64,
            )?;

        // ── Layer 2: TOML file ─────────────────────────────────────
        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // ── Layer 3: env var overrides (OX_ prefix) ────────────────
        // The prefix separator is set explicitly; otherwise the `config`
        // crate reuses the nesting separator and expects `OX__OMS__...`.
        builder = builder.add_source(
            Environment::with_prefix("OX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    fn validate(&self) -> Result<()> {
        if self.oms.diagnostics_capacity == 0 {
            bail!("oms.diagnostics_capacity must be greater than zero");
        }
        if self.logging.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }
        Ok(())
    }
}
