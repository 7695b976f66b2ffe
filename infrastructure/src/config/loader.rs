//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const PROJECT_FILES: [&str; 2] = ["toolflow.toml", ".toolflow.toml"];

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `TOOLFLOW_*` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./toolflow.toml` or `./.toolflow.toml`
    /// 4. Global config: `$XDG_CONFIG_HOME/toolflow/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigLoadError> {
        Self::load_from(config_path, Path::new("."), Self::global_config_path())
    }

    /// Load with an explicit project directory and global file.
    pub fn load_from(
        config_path: Option<&Path>,
        project_dir: &Path,
        global_path: Option<PathBuf>,
    ) -> Result<FileConfig, ConfigLoadError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global_path
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_in(project_dir) {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigLoadError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TOOLFLOW_").split("__"));

        figment.extract().map_err(|e| ConfigLoadError::Parse(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toolflow").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for debugging)
    pub fn config_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push("  [ENV  ] Environment: TOOLFLOW_* (e.g. TOOLFLOW_RETRY__MAX_ATTEMPTS)".to_string());

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./toolflow.toml or ./.toolflow.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", mark, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
