use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{AntoraError, Result};
use crate::types::Family;

/// Name of the configuration file stored inside the `.antora-resolve` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding resolver metadata.
pub const CONFIG_DIR: &str = ".antora-resolve";

/// Configuration for resolving references within one documentation project.
///
/// Controls which descriptor files take part in component searches and the
/// family assumed for references that carry no `family$` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Root directory of the documentation project. Upward searches stop here.
    pub root_dir: String,
    /// Glob patterns for paths that are part of the project's scope.
    pub include: Vec<String>,
    /// Glob patterns for library, vendored, or generated paths to skip.
    pub exclude: Vec<String>,
    /// Family used when a reference has no `family$` tag.
    #[serde(default)]
    pub default_family: Option<Family>,
    /// Whether descriptor contents are cached between resolutions.
    #[serde(default = "default_cache_descriptors")]
    pub cache_descriptors: bool,
}

fn default_cache_descriptors() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version: 1,
            root_dir: String::new(),
            include: vec!["**".to_string()],
            exclude: vec![
                "node_modules/**".to_string(),
                "**/node_modules/**".to_string(),
                "target/**".to_string(),
                "build/**".to_string(),
                ".git/**".to_string(),
                ".antora-resolve/**".to_string(),
                "vendor/**".to_string(),
            ],
            default_family: None,
            cache_descriptors: true,
        }
    }
}

/// Returns the path to `.antora-resolve/config.json` under the project root.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns a default configuration
/// with `root_dir` set to the given project root.
pub fn load_config(project_root: &Path) -> Result<ResolverConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(ResolverConfig {
            root_dir: project_root.to_string_lossy().to_string(),
            ..ResolverConfig::default()
        });
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| AntoraError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: ResolverConfig =
        serde_json::from_str(&contents).map_err(|e| AntoraError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(project_root: &Path, config: &ResolverConfig) -> Result<()> {
    let config_path = get_config_path(project_root);
    if let Some(config_dir) = config_path.parent() {
        fs::create_dir_all(config_dir).map_err(|e| AntoraError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                config_dir.display(),
                e
            ),
        })?;
    }
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| AntoraError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| AntoraError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| AntoraError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

fn any_match(patterns: &[String], relative_path: &str) -> bool {
    patterns.iter().any(|p| {
        Pattern::new(p)
            .map(|pattern| pattern.matches_with(relative_path, MATCH_OPTIONS))
            .unwrap_or(false)
    })
}

/// Whether a project-relative path matches an exclude pattern.
///
/// Directories are passed with a trailing `/`, so `target/**` excludes the
/// `target` directory itself.
pub fn is_excluded(relative_path: &str, config: &ResolverConfig) -> bool {
    any_match(&config.exclude, relative_path)
}

/// Determines whether a project-relative path belongs to the indexed scope.
///
/// A path is in scope only if it matches at least one include pattern and
/// no exclude pattern. Paths are expected with forward slashes.
pub fn is_in_scope(relative_path: &str, config: &ResolverConfig) -> bool {
    !is_excluded(relative_path, config) && any_match(&config.include, relative_path)
}
