//! Environment file loading.
//!
//! Environment descriptions are YAML by default; a `.json` extension
//! selects JSON.

use std::fs;
use std::path::Path;

use crate::error::{Result, TargetError};

use super::schema::BuildEnvironment;

/// Serialization format of an environment file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentFormat {
    Yaml,
    Json,
}

impl EnvironmentFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Load a single environment file.
///
/// # Errors
///
/// Returns `EnvironmentNotFound` if the file doesn't exist.
/// Returns `EnvironmentParseError` if the content is invalid.
pub fn load_environment(path: &Path) -> Result<BuildEnvironment> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TargetError::EnvironmentNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TargetError::Io(e)
        }
    })?;

    tracing::debug!("Loading environment from {}", path.display());
    parse_environment(&content, EnvironmentFormat::from_path(path), path)
}

/// Parse environment content.
///
/// # Arguments
///
/// * `content` - The YAML or JSON content to parse
/// * `format` - Which parser to use
/// * `source_path` - Path for error reporting
pub fn parse_environment(
    content: &str,
    format: EnvironmentFormat,
    source_path: &Path,
) -> Result<BuildEnvironment> {
    let parsed = match format {
        EnvironmentFormat::Yaml => {
            // An empty document describes an empty environment.
            if content.trim().is_empty() {
                return Ok(BuildEnvironment::default());
            }
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        }
        EnvironmentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| TargetError::EnvironmentParseError {
        path: source_path.to_path_buf(),
        message,
    })
}
