use recast_core::discovery::find_processable_files;
use recast_core::error::CoreError;
use std::fs::{self, File};
use std::path::PathBuf;
use tempfile::tempdir;

fn allow(exts: &[&str]) -> Vec<String> {
    exts.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_discovery_filters_hidden_and_disallowed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let root = dir.path();

    File::create(root.join("clip.mov"))?;
    File::create(root.join("upper.MOV"))?;
    File::create(root.join("notes.txt"))?;
    File::create(root.join(".hidden.mov"))?;

    fs::create_dir_all(root.join("nested/deeper"))?;
    File::create(root.join("nested/deeper/episode.mp4"))?;
    File::create(root.join("nested/deeper/cover.jpg"))?;

    // Everything under a hidden directory is skipped too.
    fs::create_dir(root.join(".cache"))?;
    File::create(root.join(".cache/stale.mov"))?;

    let mut files = find_processable_files(root, &allow(&["mov", "mp4"]))?;
    files.sort();

    let names: Vec<_> = files
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("clip.mov"),
            PathBuf::from("nested/deeper/episode.mp4"),
            PathBuf::from("upper.MOV"),
        ]
    );
    Ok(())
}

#[test]
fn test_discovery_empty_tree_yields_empty_set() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let files = find_processable_files(dir.path(), &allow(&["mov"]))?;
    assert!(files.is_empty());
    Ok(())
}

#[test]
fn test_discovery_unreadable_root_is_fatal() {
    let missing = PathBuf::from("surely_this_does_not_exist_recast_discovery");
    let result = find_processable_files(&missing, &allow(&["mov"]));
    match result {
        Err(CoreError::Walkdir(_)) => {}
        other => panic!("Unexpected result: {other:?}"),
    }
}
