//! Configuration file handling.
//!
//! Settings come from an optional `cardioscope.toml` and are then
//! overridden by command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::data::model::Variable;
use crate::views::distribution::{DEFAULT_BINS, MAX_BINS};
use crate::views::table::DEFAULT_ROW_LIMIT;
use crate::views::ViewSettings;

pub const DEFAULT_CONFIG_FILE: &str = "cardioscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub views: ViewsConfig,

    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable debug logging by default.
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset loaded at startup.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    /// Number of equal-width histogram bins.
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Variable selected when the dashboard opens.
    #[serde(default = "default_variable")]
    pub default_variable: Variable,

    /// Rows shown in the table when the dashboard opens.
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,

    /// Choices offered by the row-limit selector.
    #[serde(default = "default_row_limit_options")]
    pub row_limit_options: Vec<usize>,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            default_variable: default_variable(),
            row_limit: default_row_limit(),
            row_limit_options: default_row_limit_options(),
        }
    }
}

fn default_bins() -> usize {
    DEFAULT_BINS
}

fn default_variable() -> Variable {
    Variable::Age
}

fn default_row_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

fn default_row_limit_options() -> Vec<usize> {
    vec![10, 25, 50, 100]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> f32 {
    1400.0
}

fn default_height() -> f32 {
    900.0
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.views.bins == 0 || self.views.bins > MAX_BINS {
            bail!("views.bins must be between 1 and {MAX_BINS}");
        }
        if self.views.row_limit == 0 || self.views.row_limit_options.contains(&0) {
            bail!("row limits must be positive");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref path) = args.data {
            self.data.path = Some(path.clone());
        }
        if let Some(bins) = args.bins {
            self.views.bins = bins;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            bins: self.views.bins,
        }
    }
}
