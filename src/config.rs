//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/critical-css/config.toml`
//! 3. Local config: `<stylesheet dir>/.criticalcss.toml`
//! 4. Environment variables: `CRITICAL_CSS_*` prefix
//! 5. CLI flag overlay (applied by the caller via [`CriticalConfig::merge`])

use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Resolved plugin options, threaded through every component call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CriticalConfig {
    /// Directory destinations are written under
    pub output_path: PathBuf,
    /// Default destination key for markers that name none
    pub output_dest: String,
    /// Keep markers/rules in the original stylesheet after extraction
    pub preserve: bool,
    /// Minify extracted output
    pub minify: bool,
    /// Log extracted output instead of writing files
    pub dry_run: bool,
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self {
            output_path: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            output_dest: "critical.css".to_string(),
            preserve: true,
            minify: true,
            dry_run: false,
        }
    }
}

/// Raw options for intermediate parsing: every field is an `Option` so an
/// unspecified value is distinguishable and inherits from the layer below.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawConfig {
    pub output_path: Option<PathBuf>,
    pub output_dest: Option<String>,
    pub preserve: Option<bool>,
    pub minify: Option<bool>,
    pub dry_run: Option<bool>,
}

impl CriticalConfig {
    /// Merge an overlay onto self: overlay wins only where specified.
    pub fn merge(&self, overlay: &RawConfig) -> Self {
        Self {
            output_path: overlay
                .output_path
                .clone()
                .unwrap_or_else(|| self.output_path.clone()),
            output_dest: overlay
                .output_dest
                .clone()
                .unwrap_or_else(|| self.output_dest.clone()),
            preserve: overlay.preserve.unwrap_or(self.preserve),
            minify: overlay.minify.unwrap_or(self.minify),
            dry_run: overlay.dry_run.unwrap_or(self.dry_run),
        }
    }

    /// Load layered configuration, `local_dir` being the directory searched
    /// for a `.criticalcss.toml`.
    pub fn load(local_dir: &Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(dirs) = ProjectDirs::from("", "", "critical-css") {
            let global = dirs.config_dir().join("config.toml");
            if global.exists() {
                builder = builder.add_source(File::from(global));
            }
        }

        let local = local_dir.join(".criticalcss.toml");
        if local.exists() {
            builder = builder.add_source(File::from(local));
        }

        builder = builder.add_source(Environment::with_prefix("CRITICAL_CSS"));

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        Ok(Self::default().merge(&raw))
    }
}
