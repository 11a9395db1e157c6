//! # Engine Configuration Module
//!
//! Provides configuration management for the embedding engine.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `StegoConfig` holding the settings the desktop collaborators and the
//! dispatcher need. It enforces fail-fast validation so a misconfigured host
//! finds out at startup rather than halfway through an embed.
//!
//! The engine itself reads no environment variables and persists nothing;
//! every setting arrives through this struct.
//!
//! ## Settings
//!
//! - `ffmpeg_path` - Transcoder and media-container tag writer (default: `ffmpeg` on `PATH`)
//! - `ffprobe_path` - Media-container tag reader (default: `ffprobe` on `PATH`)
//! - `temp_dir` - Parent directory for per-call conversion workspaces
//!   (default: the system temporary directory)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::StegoConfig;
//!
//! let config = StegoConfig::builder()
//!     .ffmpeg_path("/opt/ffmpeg/bin/ffmpeg")
//!     .ffprobe_path("/opt/ffmpeg/bin/ffprobe")
//!     .temp_dir("/var/tmp/stego")
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! Hosts that keep settings in a file can load the same struct from JSON:
//!
//! ```ignore
//! let config = StegoConfig::from_json_str(r#"{ "ffmpeg_path": "ffmpeg.exe" }"#)?;
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_FFMPEG: &str = "ffmpeg";
const DEFAULT_FFPROBE: &str = "ffprobe";

/// Configuration for the embedding engine.
///
/// Use [`StegoConfigBuilder`] or [`StegoConfig::from_json_str`] to construct
/// validated instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Executable used for transcoding and media-container tag writes
    pub ffmpeg_path: PathBuf,

    /// Executable used for media-container tag reads
    pub ffprobe_path: PathBuf,

    /// Parent directory for scoped conversion workspaces
    pub temp_dir: Option<PathBuf>,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG),
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE),
            temp_dir: None,
        }
    }
}

impl StegoConfig {
    /// Creates a new builder for constructing a `StegoConfig`.
    pub fn builder() -> StegoConfigBuilder {
        StegoConfigBuilder::default()
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: StegoConfig = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid configuration JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Directory under which per-call workspaces are created.
    pub fn workspace_root(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Tool paths are not empty
    /// - The temporary directory, when set, exists and is a directory
    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg_path.as_os_str().is_empty() {
            return Err(Error::Config("ffmpeg path cannot be empty".to_string()));
        }

        if self.ffprobe_path.as_os_str().is_empty() {
            return Err(Error::Config("ffprobe path cannot be empty".to_string()));
        }

        if let Some(dir) = &self.temp_dir {
            validate_temp_dir(dir)?;
        }

        Ok(())
    }
}

fn validate_temp_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(Error::Config(
            "Temporary directory cannot be empty. Omit it to use the system default."
                .to_string(),
        ));
    }

    if !dir.is_dir() {
        return Err(Error::Config(format!(
            "Temporary directory does not exist or is not a directory: {}",
            dir.display()
        )));
    }

    Ok(())
}

/// Builder for constructing [`StegoConfig`] instances.
#[derive(Debug, Default)]
pub struct StegoConfigBuilder {
    ffmpeg_path: Option<PathBuf>,
    ffprobe_path: Option<PathBuf>,
    temp_dir: Option<PathBuf>,
}

impl StegoConfigBuilder {
    /// Sets the ffmpeg executable.
    pub fn ffmpeg_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// Sets the ffprobe executable.
    pub fn ffprobe_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.ffprobe_path = Some(path.into());
        self
    }

    /// Sets the parent directory for conversion workspaces.
    pub fn temp_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.temp_dir = Some(path.into());
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` with an actionable message when a setting is
    /// invalid.
    pub fn build(self) -> Result<StegoConfig> {
        let defaults = StegoConfig::default();
        let config = StegoConfig {
            ffmpeg_path: self.ffmpeg_path.unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: self.ffprobe_path.unwrap_or(defaults.ffprobe_path),
            temp_dir: self.temp_dir,
        };

        config.validate()?;
        Ok(config)
    }
}
