//! Core configuration consumed read-only by the pipeline.
//!
//! The configuration is assembled by the caller (the CLI in practice) and
//! validated once before a run starts. The core never mutates it.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

/// Default extensions considered candidate inputs during discovery.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "m4v", "webm", "wmv"];

/// Default worker pool size for both pipeline passes.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default audio codec for the MP4 profile.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Selects where converted outputs are published, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// No publishing; outputs stay under the output root only.
    Disabled,
    /// Push to a remote object store over HTTP.
    Remote,
    /// Mirror into a local directory tree (the "fake upload" mode).
    Mirror,
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Root of the input tree to walk.
    pub input_root: PathBuf,
    /// Root under which the input tree is mirrored for outputs.
    pub output_root: PathBuf,
    /// Lowercased extension allow-list applied during discovery.
    pub allowed_extensions: Vec<String>,
    /// Worker pool size; applies to both the metadata and main passes.
    pub concurrency: usize,

    // ---- Per-stage toggles ----
    pub encode_webm: bool,
    pub encode_mp4: bool,
    pub generate_thumbnails: bool,
    pub export_metadata: bool,
    pub publish: PublishMode,

    /// Audio codec passed to the encoder for the MP4 profile.
    pub audio_codec: String,

    // ---- External tool binaries ----
    pub encoder_bin: PathBuf,
    pub prober_bin: PathBuf,

    // ---- Publish destination ----
    /// Namespace (bucket) objects are published under.
    pub bucket: String,
    /// Root directory for the local mirror backend.
    pub mirror_root: Option<PathBuf>,
    /// Base URL of the remote object store.
    pub store_endpoint: Option<String>,
    /// Bearer token for the remote object store.
    pub store_token: Option<String>,
}

impl CoreConfig {
    /// Creates a configuration with defaults for everything but the two roots.
    #[must_use]
    pub fn new(input_root: PathBuf, output_root: PathBuf) -> Self {
        Self {
            input_root,
            output_root,
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            concurrency: DEFAULT_CONCURRENCY,
            encode_webm: true,
            encode_mp4: true,
            generate_thumbnails: true,
            export_metadata: false,
            publish: PublishMode::Disabled,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            encoder_bin: PathBuf::from("ffmpeg"),
            prober_bin: PathBuf::from("ffprobe"),
            bucket: "media".to_string(),
            mirror_root: None,
            store_endpoint: None,
            store_token: None,
        }
    }

    /// Validates the configuration before a run.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` when the concurrency limit is zero,
    /// the extension allow-list is empty, the input root does not exist, or a
    /// publish backend is selected without its destination settings.
    pub fn validate(&self) -> CoreResult<()> {
        if self.concurrency == 0 {
            return Err(CoreError::InvalidConfig(
                "concurrency limit must be at least 1".to_string(),
            ));
        }
        if self.allowed_extensions.is_empty() {
            return Err(CoreError::InvalidConfig(
                "extension allow-list must not be empty".to_string(),
            ));
        }
        if !self.input_root.is_dir() {
            return Err(CoreError::InvalidConfig(format!(
                "input root '{}' is not a readable directory",
                self.input_root.display()
            )));
        }
        match self.publish {
            PublishMode::Mirror if self.mirror_root.is_none() => {
                Err(CoreError::InvalidConfig(
                    "mirror publishing selected but no mirror root configured".to_string(),
                ))
            }
            PublishMode::Remote if self.store_endpoint.is_none() => {
                Err(CoreError::InvalidConfig(
                    "remote publishing selected but no store endpoint configured".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}
