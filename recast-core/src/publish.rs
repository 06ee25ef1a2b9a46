//! Deterministic object keys and publish backends.
//!
//! Both backends share one contract: skip when the source input no longer
//! exists, otherwise derive the key and push. The same output at the same
//! logical path always yields the same key, so re-publishing is safe and the
//! remote side can deduplicate.

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of leading directory segments carried into the key.
const KEY_DIR_SEGMENTS: usize = 3;
/// Hex characters of the blake3 fingerprint kept in the key.
const FINGERPRINT_LEN: usize = 16;

/// Lowercases and collapses every non-alphanumeric run into a single `-`.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_separator = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Derives the deterministic object key for an output file.
///
/// The output path relative to the output root contributes its first three
/// directory segments (slugified) and its basename (slugified), followed by
/// a fingerprint over the relative path and the original extension.
///
/// # Errors
///
/// Returns `CoreError::PathError` if `output` does not live under
/// `output_root` or has no file name.
pub fn derive_object_key(output: &Path, output_root: &Path) -> CoreResult<String> {
    let relative = output.strip_prefix(output_root).map_err(|_| {
        CoreError::PathError(format!(
            "output '{}' is not under the output root '{}'",
            output.display(),
            output_root.display()
        ))
    })?;

    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            CoreError::PathError(format!("output '{}' has no usable file name", output.display()))
        })?;

    let dir_segments: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .take(KEY_DIR_SEGMENTS)
                .map(|c| slugify(&c.as_os_str().to_string_lossy()))
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    // Fingerprint over the normalized relative path keeps keys stable across
    // platforms and re-encodes of the same logical output.
    let normalized: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let digest = blake3::hash(normalized.join("/").as_bytes()).to_hex();
    let fingerprint = &digest[..FINGERPRINT_LEN];

    let extension = relative
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    let basename = format!("{stem}-{fingerprint}{extension}");
    if dir_segments.is_empty() {
        Ok(basename)
    } else {
        Ok(format!("{}/{}", dir_segments.join("/"), basename))
    }
}

/// Outcome of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The output was pushed under the given key.
    Published(String),
    /// The source input no longer exists; nothing was pushed.
    SourceGone,
}

/// A destination store for converted outputs.
pub trait PublishTarget: Send + Sync {
    /// Pushes one local file under the derived key.
    fn push(&self, local: &Path, key: &str) -> CoreResult<()>;

    /// Human-readable destination description for logging.
    fn describe(&self) -> String;
}

/// Publishes one output through the selected backend.
///
/// Skips when the source input file no longer exists (guards against
/// publishing stale artifacts for deleted inputs). `previously_converted`
/// only affects logging; keys are stable, so re-publishing is always safe.
pub fn publish_output(
    target: &dyn PublishTarget,
    input: &Path,
    output: &Path,
    output_root: &Path,
    previously_converted: bool,
) -> CoreResult<PublishOutcome> {
    if !input.exists() {
        log::warn!(
            "Source {} no longer exists, not publishing {}",
            input.display(),
            output.display()
        );
        return Ok(PublishOutcome::SourceGone);
    }

    let key = derive_object_key(output, output_root)?;
    if previously_converted {
        log::debug!("Re-publishing previously converted output as {key}");
    }
    target.push(output, &key)?;
    log::info!("Published {} -> {} ({})", output.display(), key, target.describe());
    Ok(PublishOutcome::Published(key))
}

/// Directory-preserving copy into a local mirror tree.
pub struct LocalMirror {
    root: PathBuf,
    bucket: String,
}

impl LocalMirror {
    #[must_use]
    pub fn new(root: PathBuf, bucket: String) -> Self {
        Self { root, bucket }
    }

    /// Destination path a key maps to inside the mirror.
    #[must_use]
    pub fn destination(&self, key: &str) -> PathBuf {
        self.root.join(&self.bucket).join(key)
    }
}

impl PublishTarget for LocalMirror {
    fn push(&self, local: &Path, key: &str) -> CoreResult<()> {
        let dest = self.destination(key);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local, &dest).map_err(|e| CoreError::PublishFailed {
            key: key.to_string(),
            message: format!("copy to {} failed: {}", dest.display(), e),
        })?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("mirror at {}", self.root.display())
    }
}

/// HTTP push into a remote object store.
pub struct RemoteStore {
    client: reqwest::blocking::Client,
    endpoint: String,
    bucket: String,
    token: Option<String>,
}

impl RemoteStore {
    /// Builds a client for the given endpoint and bucket.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Http` if the underlying client cannot be built.
    pub fn new(endpoint: String, bucket: String, token: Option<String>) -> CoreResult<Self> {
        // Pushes can be large; disable the default 30s request timeout.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            token,
        })
    }
}

impl PublishTarget for RemoteStore {
    fn push(&self, local: &Path, key: &str) -> CoreResult<()> {
        let len = fs::metadata(local)?.len();
        let file = fs::File::open(local)?;
        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        log::debug!("PUT {url} ({len} bytes)");
        let mut request = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_LENGTH, len)
            .body(reqwest::blocking::Body::sized(file, len));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::PublishFailed {
                key: key.to_string(),
                message: format!("store returned {status} for {url}"),
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{}/{}", self.endpoint, self.bucket)
    }
}
