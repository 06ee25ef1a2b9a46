#![cfg(unix)]

mod common;

use common::{fake_encoder, fake_prober, garbage_frame_encoder, write_frame_source, write_input};
use recast_core::error::CoreError;
use recast_core::thumbnail::generate_preview;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Returns any leftover scratch directories beside `path`.
fn scratch_dirs(path: &Path) -> Vec<std::path::PathBuf> {
    fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(".recast_frames_"))
        })
        .collect()
}

#[test]
fn test_preview_success_and_scratch_cleanup() {
    let dir = tempdir().unwrap();
    let frame_src = write_frame_source(dir.path());
    let encoder = fake_encoder(dir.path(), &frame_src, 5);
    let prober = fake_prober(dir.path());

    let source = write_input(dir.path(), "out/clip.mp4", "0:00:10.00");
    let dest = dir.path().join("out/clip.gif");

    generate_preview(&encoder, &prober, &source, &dest).unwrap();

    let bytes = fs::read(&dest).unwrap();
    assert!(bytes.starts_with(b"GIF8"));
    assert!(scratch_dirs(&source).is_empty());
}

#[test]
fn test_preview_failure_still_cleans_scratch() {
    let dir = tempdir().unwrap();
    let encoder = garbage_frame_encoder(dir.path());
    let prober = fake_prober(dir.path());

    let source = write_input(dir.path(), "out/clip.mp4", "0:00:10.00");
    let dest = dir.path().join("out/clip.gif");

    // Every extracted artifact fails the still-image sniff, so the stage
    // fails after extraction; the scratch directory must still be gone.
    let result = generate_preview(&encoder, &prober, &source, &dest);
    assert!(matches!(result, Err(CoreError::ThumbnailFailed(_))));
    assert!(!dest.exists());
    assert!(scratch_dirs(&source).is_empty());
}
