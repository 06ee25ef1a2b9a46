//! Per-file task state and output path derivation.
//!
//! A `FileTask` is created once per discovered input, consumed by exactly one
//! worker, and never persisted across runs. Idempotency is re-derived from
//! filesystem state on each run, not from stored task metadata.

use crate::error::{CoreError, CoreResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Lifecycle state of a task within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Discovered,
    Skipped,
    Converted,
    Errored,
}

/// One discovered input file and its derived output locations.
#[derive(Debug)]
pub struct FileTask {
    /// Absolute path of the discovered input.
    pub input_path: PathBuf,
    /// Output location mirroring the input tree under the output root,
    /// with the input extension stripped.
    pub output_base: PathBuf,
    pub state: TaskState,
}

impl FileTask {
    /// Derives a task from an input path by mirroring its position relative
    /// to the input root under the output root.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::PathError` if the input does not live under the
    /// input root.
    pub fn new(input: &Path, input_root: &Path, output_root: &Path) -> CoreResult<Self> {
        let relative = input.strip_prefix(input_root).map_err(|_| {
            CoreError::PathError(format!(
                "input '{}' is not under the input root '{}'",
                input.display(),
                input_root.display()
            ))
        })?;

        let stem = relative
            .file_stem()
            .ok_or_else(|| {
                CoreError::PathError(format!("input '{}' has no file name", input.display()))
            })?
            .to_os_string();

        let mut output_base = output_root.to_path_buf();
        if let Some(parent) = relative.parent() {
            output_base.push(parent);
        }
        output_base.push(stem);

        Ok(Self {
            input_path: input.to_path_buf(),
            output_base,
            state: TaskState::Discovered,
        })
    }

    /// Returns the output path for the given extension, appended to the base
    /// name without disturbing dots already in the stem.
    #[must_use]
    pub fn output_path(&self, extension: &str) -> PathBuf {
        let mut name = OsString::from(self.output_base.as_os_str());
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }

    /// Path of the animated preview written next to the MP4 output.
    #[must_use]
    pub fn preview_path(&self) -> PathBuf {
        self.output_path("gif")
    }

    /// Path of the metadata sibling written by the export pass.
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.output_path("json")
    }

    /// Directory the task's outputs land in.
    #[must_use]
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_base.parent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_base_mirrors_input_tree() {
        let task = FileTask::new(
            Path::new("/in/shows/s01/ep1.mov"),
            Path::new("/in"),
            Path::new("/out"),
        )
        .unwrap();
        assert_eq!(task.output_base, PathBuf::from("/out/shows/s01/ep1"));
        assert_eq!(task.output_path("webm"), PathBuf::from("/out/shows/s01/ep1.webm"));
        assert_eq!(task.preview_path(), PathBuf::from("/out/shows/s01/ep1.gif"));
        assert_eq!(task.state, TaskState::Discovered);
    }

    #[test]
    fn test_output_path_keeps_dots_in_stem() {
        let task = FileTask::new(
            Path::new("/in/a.b.2024.mov"),
            Path::new("/in"),
            Path::new("/out"),
        )
        .unwrap();
        assert_eq!(task.output_path("mp4"), PathBuf::from("/out/a.b.2024.mp4"));
    }

    #[test]
    fn test_input_outside_root_is_rejected() {
        let result = FileTask::new(Path::new("/elsewhere/x.mov"), Path::new("/in"), Path::new("/out"));
        assert!(matches!(result, Err(CoreError::PathError(_))));
    }
}
