/* packages/render/src/error.rs */

use std::path::PathBuf;

use thiserror::Error;

/// Failure to fetch or decode one resource.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("resource '{key}' not found")]
  NotFound { key: String },

  /// Key is absolute or climbs out of the source root with `..`.
  #[error("resource key '{key}' escapes the source root")]
  PathEscape { key: String },

  #[error("failed to read '{key}': {source}")]
  Io {
    key: String,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid JSON in '{key}': {source}")]
  InvalidJson {
    key: String,
    #[source]
    source: serde_json::Error,
  },
}

impl LoadError {
  pub fn key(&self) -> &str {
    match self {
      LoadError::NotFound { key }
      | LoadError::PathEscape { key }
      | LoadError::Io { key, .. }
      | LoadError::InvalidJson { key, .. } => key,
    }
  }
}

#[derive(Debug, Error)]
pub enum RenderError {
  #[error("template '{name}' could not be loaded")]
  TemplateMissing { name: String },

  #[error("data '{name}' could not be loaded")]
  DataMissing { name: String },

  #[error("destination '{target}' not found")]
  DestinationNotFound { target: String },

  #[error("render task for '{target}' panicked")]
  TaskPanicked { target: String },

  #[error("invalid page config: {0}")]
  Config(String),

  #[error("failed to parse page config: {0}")]
  ConfigSyntax(#[from] toml::de::Error),

  #[error("failed to read page config '{path}': {source}")]
  ConfigIo {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
