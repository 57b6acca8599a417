use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::PATHS;
use crate::paths::{ChirpPaths, ConfigError};

/// User-facing sync options persisted between runs, the `[sync]` table of
/// `chirp.toml`. A missing file loads as the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
  /// Fixed output directory; `None` writes alongside each input.
  pub destination: Option<PathBuf>,

  /// Mirror the selected folder's name as a subdirectory of the destination.
  pub mirror_subdirectories: bool,

  /// Optional output file name prefix.
  pub prefix: Option<String>,

  /// Resample output to the synced 192 kHz rate.
  pub resample: bool,

  /// Let the engine auto-resolve ambiguous timestamps.
  pub auto_resolve: bool,

  /// Explicit sync engine binary; `None` searches PATH.
  pub engine: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
  sync: SyncSettings,
}

impl SyncSettings {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&PATHS)
  }

  /// Variant for tests: inject the paths instead of the global singleton.
  pub fn load_from(paths: &ChirpPaths) -> Result<Self, ConfigError> {
    let path = paths.config_file();

    let content = match std::fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
      Err(e) => return Err(e.into()),
    };

    let file: ConfigFile = toml::from_str(&content)?;
    Ok(file.sync)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    self.save_to(&PATHS)
  }

  pub fn save_to(&self, paths: &ChirpPaths) -> Result<(), ConfigError> {
    let file = ConfigFile { sync: self.clone() };
    let serialized = toml::to_string_pretty(&file)?;
    chirp_fs::atomic_write_str(&paths.config_file(), &serialized)?;
    Ok(())
  }
}
