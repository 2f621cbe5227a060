// SPDX-License-Identifier: MIT

//! Runtime settings
//!
//! Defaults, then an optional YAML file, then `RULETABLE_*` environment
//! variables. Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::OutputMode;
use crate::error::{Result, RuleTableError};

pub const ENV_TABLE: &str = "RULETABLE_TABLE";
pub const ENV_OUTPUT_MODE: &str = "RULETABLE_OUTPUT_MODE";
pub const ENV_HOST: &str = "RULETABLE_HOST";
pub const ENV_PORT: &str = "RULETABLE_PORT";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Default table file
    pub table: Option<PathBuf>,
    /// How matched output cells are written
    pub output_mode: OutputMode,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table: None,
            output_mode: OutputMode::Typed,
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Settings {
    /// Load settings from an optional YAML file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    RuleTableError::config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };
        settings.apply_env(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override fields from environment-style lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table) = lookup(ENV_TABLE).filter(|v| !v.is_empty()) {
            self.table = Some(PathBuf::from(table));
        }
        if let Some(mode) = lookup(ENV_OUTPUT_MODE) {
            self.output_mode = mode.parse()?;
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| {
                RuleTableError::config(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }
        Ok(())
    }

    /// The table to use, preferring an explicit path over the configured one
    pub fn table_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        explicit.or_else(|| self.table.clone()).ok_or_else(|| {
            RuleTableError::config(format!(
                "no table given: pass --table or set {}",
                ENV_TABLE
            ))
        })
    }
}
