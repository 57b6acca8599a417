use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("toml parse error: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("toml encode error: {0}")]
  Encode(#[from] toml::ser::Error),

  #[error("directories error: could not determine home directory")]
  Directories,
}

#[derive(Debug, Clone)]
pub struct ChirpPaths {
  pub config_dir: PathBuf,
}

impl ChirpPaths {
  /// Resolves the config directory, honoring a `CHIRP_BASE_DIR` override
  /// (used by tests and portable installs) before the platform default.
  pub fn detect() -> Result<Self, ConfigError> {
    let config_dir = if let Ok(base) = std::env::var("CHIRP_BASE_DIR") {
      PathBuf::from(base).join("config")
    } else {
      let proj_dirs = ProjectDirs::from("info", "chirp", "chirp").ok_or(ConfigError::Directories)?;
      proj_dirs.config_dir().to_path_buf()
    };

    std::fs::create_dir_all(&config_dir)?;

    Ok(Self { config_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("chirp.toml")
  }
}
