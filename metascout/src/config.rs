use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{ScoutError, ScoutResult};
use crate::search::DEFAULT_FAN_OUT;

/// Settings for one index session.
///
/// # Configuration Locations
///
/// Files are merged in this order, later ones overriding earlier ones:
/// 1. Global `$CONFIG_DIR/metascout/config.yaml`
/// 2. Local `.metascout.yaml` in the current directory
/// 3. Custom file given with `--config`
///
/// Command-line flags override all of them through [`ScoutConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Directory tree to index
/// root_path: "/home/me"
///
/// # Where the persisted index lives
/// index_path: "./index.bin"
///
/// # Number of parallel search chunks (at most 4096)
/// fan_out: 32
///
/// # Print every matching path when there are fewer matches than this
/// print_threshold: 1000
///
/// # Substring to look for in indexed paths
/// pattern: ".py"
///
/// # Paths left out of the index (glob syntax)
/// ignore_patterns:
///   - "**/.git/**"
///
/// # Rebuild even if a persisted index exists
/// force_reindex: false
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "warn"
/// ```
///
/// Every field is optional; a missing field takes the default shown above,
/// except `root_path`, which defaults to the user's home directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Directory tree to index
    pub root_path: PathBuf,

    /// Location of the persisted index file
    pub index_path: PathBuf,

    /// Number of contiguous chunks searched in parallel
    pub fan_out: usize,

    /// Matching paths are printed only when the count is below this
    pub print_threshold: usize,

    /// Substring matched against every indexed path
    pub pattern: String,

    /// Glob patterns excluded from indexing
    pub ignore_patterns: Vec<String>,

    /// Skip loading and always rebuild the index
    pub force_reindex: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn default_root_path() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            index_path: PathBuf::from("./index.bin"),
            fan_out: DEFAULT_FAN_OUT,
            print_threshold: 1000,
            pattern: ".py".to_string(),
            ignore_patterns: Vec::new(),
            force_reindex: false,
            log_level: "warn".to_string(),
        }
    }
}

/// Values given on the command line; `None` keeps the configured value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_path: Option<PathBuf>,
    pub index_path: Option<PathBuf>,
    pub fan_out: Option<usize>,
    pub print_threshold: Option<usize>,
    pub pattern: Option<String>,
    pub ignore_patterns: Vec<String>,
    pub force_reindex: bool,
    pub log_level: Option<String>,
}

impl ScoutConfig {
    /// Loads configuration from the default locations
    pub fn load() -> ScoutResult<Self> {
        Self::load_from(None)
    }

    /// Loads configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> ScoutResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("metascout/config.yaml")),
            Some(PathBuf::from(".metascout.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ScoutError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Applies command-line values on top of file values
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        if let Some(root) = cli.root_path {
            self.root_path = root;
        }
        if let Some(index) = cli.index_path {
            self.index_path = index;
        }
        if let Some(fan_out) = cli.fan_out {
            self.fan_out = fan_out;
        }
        if let Some(threshold) = cli.print_threshold {
            self.print_threshold = threshold;
        }
        if let Some(pattern) = cli.pattern {
            self.pattern = pattern;
        }
        if !cli.ignore_patterns.is_empty() {
            self.ignore_patterns = cli.ignore_patterns;
        }
        if cli.force_reindex {
            self.force_reindex = true;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Renders the effective configuration as YAML
    pub fn to_yaml(&self) -> ScoutResult<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ScoutError::config_error(format!("failed to serialize configuration: {}", e))
        })
    }
}
