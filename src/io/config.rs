//! Optional TOML configuration file.
//!
//! Every key is optional; values given on the command line (or through the
//! environment) take precedence over the file, and the file takes precedence
//! over the built-in defaults.
//!
//! ```toml
//! wavelet = "db4"
//! variant = "even"
//!
//! [solver]
//! method = "direct"
//! tolerance = 1e-10
//! max_iterations = 1000
//! constraint_tolerance = 1e-8
//!
//! [report]
//! precision = 8
//! show_filters = false
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{SolverMethod, SystemVariant};
use crate::error::InitError;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "daub.toml";

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub wavelet: Option<String>,
    #[serde(default)]
    pub variant: Option<SystemVariant>,
    #[serde(default)]
    pub solver: SolverToml,
    #[serde(default)]
    pub report: ReportToml,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverToml {
    pub method: Option<SolverMethod>,
    pub tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
    pub constraint_tolerance: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportToml {
    pub precision: Option<usize>,
    pub show_filters: Option<bool>,
}

/// Parse configuration text. `origin` only labels errors.
pub fn parse_config(text: &str, origin: &str) -> Result<ConfigFile, InitError> {
    toml::from_str(text).map_err(|e| InitError::ConfigFile {
        path: origin.to_string(),
        reason: e.message().to_string(),
    })
}

/// Read and parse a configuration file.
pub fn read_config(path: &Path) -> Result<ConfigFile, InitError> {
    let text = std::fs::read_to_string(path).map_err(|e| InitError::ConfigFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let config = parse_config(&text, &path.display().to_string())?;
    debug!(path = %path.display(), "loaded configuration file");
    Ok(config)
}

/// Load the explicitly named file, or `daub.toml` if it exists, or nothing.
///
/// A missing explicit file is an error; a missing default file is not.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile, InitError> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                read_config(default)
            } else {
                Ok(ConfigFile::default())
            }
        }
    }
}
