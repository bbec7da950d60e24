//! Project context threaded explicitly through every ensure call.
//!
//! The original tool kept the project root in process-wide state; here it
//! is an explicit parameter so the engine stays a pure function of its
//! inputs plus the I/O boundary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Host-supplied project configuration.
///
/// Only the fields the engine actually consumes are modeled; unknown
/// fields in the host's config file are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
  /// Build output directory, relative to the project root.
  pub dist_dir: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      dist_dir: "dist".to_string(),
    }
  }
}

/// Everything the ensure pass needs to know about the target project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Absolute path to the project root.
  pub root: PathBuf,

  /// Host-supplied project configuration.
  pub config: ProjectConfig,

  /// Semantic version of the running tool, used as the fallback pin when
  /// the project manifest declares no tool dependency.
  pub own_version: String,
}

impl ProjectContext {
  /// Context with default config and this crate's own version.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      config: ProjectConfig::default(),
      own_version: env!("CARGO_PKG_VERSION").to_string(),
    }
  }

  /// Replace the project configuration.
  pub fn with_config(mut self, config: ProjectConfig) -> Self {
    self.config = config;
    self
  }

  /// Replace the tool version used as the dependency fallback.
  pub fn with_own_version(mut self, version: impl Into<String>) -> Self {
    self.own_version = version.into();
    self
  }
}
