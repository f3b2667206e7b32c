//! Application configuration for docbuild.
//!
//! User config lives at `~/.docbuild/docbuild.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocBuildError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docbuild.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docbuild";

// ---------------------------------------------------------------------------
// Config structs (matching docbuild.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// External notebook converter invocation.
    #[serde(default)]
    pub converter: ConverterConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// JSON module catalog written by the introspection step.
    #[serde(default = "default_module_catalog")]
    pub module_catalog: PathBuf,

    /// Directory receiving per-module `.rst` files and `index.rst`.
    #[serde(default = "default_module_reference_dir")]
    pub module_reference_dir: PathBuf,

    /// Directory receiving `referenceCorpus.rst`.
    #[serde(default = "default_system_reference_dir")]
    pub system_reference_dir: PathBuf,

    /// Root searched recursively for `*.ipynb` files.
    #[serde(default = "default_notebook_dir")]
    pub notebook_dir: PathBuf,

    /// Root of the corpus listed in the corpus reference.
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            module_catalog: default_module_catalog(),
            module_reference_dir: default_module_reference_dir(),
            system_reference_dir: default_system_reference_dir(),
            notebook_dir: default_notebook_dir(),
            corpus_dir: default_corpus_dir(),
        }
    }
}

fn default_module_catalog() -> PathBuf {
    "documentation/moduleCatalog.json".into()
}
fn default_module_reference_dir() -> PathBuf {
    "documentation/source/moduleReference".into()
}
fn default_system_reference_dir() -> PathBuf {
    "documentation/source/systemReference".into()
}
fn default_notebook_dir() -> PathBuf {
    "documentation/source".into()
}
fn default_corpus_dir() -> PathBuf {
    "corpus".into()
}

/// `[converter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Program to run.
    #[serde(default = "default_converter_command")]
    pub command: String,

    /// Arguments placed before the notebook path.
    #[serde(default = "default_converter_args")]
    pub args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            command: default_converter_command(),
            args: default_converter_args(),
        }
    }
}

fn default_converter_command() -> String {
    "jupyter".into()
}
fn default_converter_args() -> Vec<String> {
    vec!["nbconvert".into(), "--to".into(), "rst".into()]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docbuild/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| DocBuildError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docbuild/docbuild.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocBuildError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocBuildError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocBuildError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| DocBuildError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocBuildError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
