#![allow(dead_code)] // not every test binary uses every helper

//! Shared helpers for integration tests.
//!
//! The external encoder and prober are faked with small executable scripts
//! whose paths are injected through the configuration, exercising the real
//! process-spawning and stream-capture paths.

use recast_core::CoreConfig;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Writes an executable shell script into `dir` and returns its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Fake prober: echoes a `Duration:` annotation read from the probed file's
/// own first line; switches to JSON on stdout when invoked in metadata mode.
pub fn fake_prober(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-prober",
        r#"json=0
for a in "$@"; do target="$a"; [ "$a" = "json" ] && json=1; done
[ -f "$target" ] || exit 1
if [ "$json" = 1 ]; then
  printf '{"streams":[],"format":{"filename":"%s"}}\n' "$target"
else
  printf '  Duration: %s, start: 0.000000, bitrate: 128 kb/s\n' "$(head -n 1 "$target")" >&2
fi
exit 0"#,
    )
}

/// Fake prober that always exits non-zero.
pub fn failing_prober(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "failing-prober",
        r#"echo "probe exploded" >&2
exit 2"#,
    )
}

/// Shell fragment locating the input (after `-i`) and output (last argument)
/// in an encoder invocation.
const PARSE_ARGS: &str = r#"out=""; input=""; prev=""
for a in "$@"; do
  [ "$prev" = "-i" ] && input="$a"
  prev="$a"; out="$a"
done"#;

/// Fake encoder: copies the input to the output (so both probe to the same
/// duration); in frame-sampling mode it materializes `frames` copies of the
/// PNG at `frame_src` instead.
pub fn fake_encoder(dir: &Path, frame_src: &Path, frames: usize) -> PathBuf {
    let body = format!(
        r#"{PARSE_ARGS}
case "$out" in
  *frame_%04d.png)
    fdir=$(dirname "$out")
    i=1
    while [ $i -le {frames} ]; do
      cp "{src}" "$fdir/$(printf 'frame_%04d.png' $i)"
      i=$((i+1))
    done
    ;;
  *)
    cp "$input" "$out"
    ;;
esac
exit 0"#,
        src = frame_src.display()
    );
    write_script(dir, "fake-encoder", &body)
}

/// Fake encoder that fails (non-zero exit, stderr diagnostic) for inputs
/// whose path contains `fail`, and behaves like `fake_encoder` otherwise.
pub fn selectively_failing_encoder(dir: &Path, frame_src: &Path) -> PathBuf {
    let body = format!(
        r#"{PARSE_ARGS}
case "$input" in
  *fail*)
    echo "simulated encoder failure" >&2
    exit 1
    ;;
esac
case "$out" in
  *frame_%04d.png)
    fdir=$(dirname "$out")
    for i in 1 2 3; do
      cp "{src}" "$fdir/$(printf 'frame_%04d.png' $i)"
    done
    ;;
  *)
    cp "$input" "$out"
    ;;
esac
exit 0"#,
        src = frame_src.display()
    );
    write_script(dir, "failing-encoder", &body)
}

/// Fake encoder that sleeps before producing its output, for wall-clock
/// concurrency measurements.
pub fn sleeping_encoder(dir: &Path, seconds: f64) -> PathBuf {
    let body = format!(
        r#"[ "$1" = "-version" ] && exit 0
{PARSE_ARGS}
sleep {seconds}
cp "$input" "$out"
exit 0"#
    );
    write_script(dir, "sleeping-encoder", &body)
}

/// Fake encoder whose frame-sampling mode produces corrupt artifacts that
/// the thumbnail filter must discard.
pub fn garbage_frame_encoder(dir: &Path) -> PathBuf {
    let body = format!(
        r#"{PARSE_ARGS}
case "$out" in
  *frame_%04d.png)
    fdir=$(dirname "$out")
    for i in 1 2 3; do
      echo "not a png" > "$fdir/$(printf 'frame_%04d.png' $i)"
    done
    ;;
  *)
    cp "$input" "$out"
    ;;
esac
exit 0"#
    );
    write_script(dir, "garbage-encoder", &body)
}

/// Writes a tiny valid PNG for the frame-sampling fakes to copy.
pub fn write_frame_source(dir: &Path) -> PathBuf {
    let path = dir.join("frame-src.png");
    let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([120, 40, 200, 255]));
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    path
}

/// Baseline test configuration with publishing and metadata off.
pub fn test_config(root: &Path, encoder: PathBuf, prober: PathBuf) -> CoreConfig {
    let mut config = CoreConfig::new(root.join("in"), root.join("out"));
    config.encoder_bin = encoder;
    config.prober_bin = prober;
    config.concurrency = 1;
    config.generate_thumbnails = false;
    config
}

/// Creates an input file whose first line doubles as its probed duration.
pub fn write_input(input_root: &Path, relative: &str, duration: &str) -> PathBuf {
    let path = input_root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, format!("{duration}\n")).unwrap();
    path
}
