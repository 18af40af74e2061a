//! Configuration file loading for the CLI
//!
//! This module finds and loads the TOML configuration file from an explicit
//! path, the local `pathlight/` directory or the platform config directory,
//! and validates it before use.
//!
//! ```toml
//! [highlight]
//! autocomplete_limit = 5
//!
//! [highlight.styles]
//! stroke = "red"
//! fill-opacity = 0.4
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use pathlight::{PathlightError, config::AppConfig};

const LOCAL_CONFIG: &str = "pathlight/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for PathlightError {
    fn from(err: ConfigError) -> Self {
        PathlightError::Config(err.to_string())
    }
}

/// Find, load and validate configuration
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (`pathlight/config.toml`)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - Config values are invalid (bad colors, zero suggestion limit)
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, PathlightError> {
    let config = find_config(explicit_path)?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

fn find_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, PathlightError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    match ProjectDirs::from("org", "pathlight", "pathlight") {
        Some(proj_dirs) => {
            let system_config = proj_dirs.config_dir().join("config.toml");
            if system_config.exists() {
                info!(path = system_config.display().to_string(); "Loading configuration from system path");
                return load_config_file(system_config);
            }
            debug!(path = system_config.display().to_string(); "System configuration file not found");
        }
        None => debug!("Could not determine platform-specific config directory"),
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Parses a TOML configuration file.
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, PathlightError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write config");
        file
    }

    #[test]
    fn test_load_explicit_config() {
        let file = config_file(
            r#"
[highlight]
autocomplete_limit = 3

[highlight.styles]
stroke = "red"
fill-opacity = 0.4
"#,
        );

        let config = load_config(Some(file.path())).unwrap();
        let highlight = config.highlight();
        assert_eq!(highlight.autocomplete_limit(), 3);
        assert_eq!(highlight.styles().get("stroke"), Some("red"));
        assert_eq!(highlight.styles().get("fill-opacity"), Some("0.4"));
        assert_eq!(highlight.styles().get("fill"), Some("yellow"));
    }

    #[test]
    fn test_missing_explicit_config() {
        let err = load_config(Some("/nonexistent/pathlight.toml")).unwrap_err();
        assert!(matches!(err, PathlightError::Config(_)), "{err}");
    }

    #[test]
    fn test_invalid_toml() {
        let file = config_file("[highlight\nstroke =");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("parse"), "{err}");
    }

    #[test]
    fn test_invalid_style_rejected() {
        let file = config_file("[highlight.styles]\nstroke = \"sparkly\"\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Validation"), "{err}");
    }
}
