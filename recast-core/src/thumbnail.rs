//! Animated preview generation for converted outputs.
//!
//! Frames are sampled via the external encoder into a scratch directory,
//! filtered by content sniffing, resized with a deterministic cubic kernel,
//! and composited into one animated GIF next to the output file. The scratch
//! directory is removed on every exit path via `tempfile`'s Drop.

use crate::error::{CoreError, CoreResult};
use crate::external::encoder::extract_frames;
use crate::external::prober::probe_duration;
use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, Frame, ImageFormat, RgbaImage};
use once_cell::sync::Lazy;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::Builder as TempFileBuilder;

/// Number of evenly sampled frames per preview.
const PREVIEW_FRAME_COUNT: usize = 50;
/// Fixed thumbnail resolution.
const PREVIEW_WIDTH: u32 = 320;
const PREVIEW_HEIGHT: u32 = 180;
/// Per-frame delay in the composited animation.
const FRAME_DELAY_MS: u32 = 100;
/// Palette quantization speed for the GIF encoder (1 = best, 30 = fastest).
const GIF_ENCODER_SPEED: i32 = 10;

/// Frame decode/encode is the most memory-intensive step of the pipeline, so
/// resizing runs at effective concurrency 1 regardless of the worker pool
/// size.
static RESIZE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Produces one animated preview for `source`, written to `dest`.
///
/// # Errors
///
/// Any sub-step failure (probe, extraction, no usable frames, resize,
/// composite) surfaces as an error for the caller to record; the scratch
/// directory is cleaned up regardless.
pub fn generate_preview(
    encoder_bin: &Path,
    prober_bin: &Path,
    source: &Path,
    dest: &Path,
) -> CoreResult<()> {
    let parent = source.parent().ok_or_else(|| {
        CoreError::PathError(format!("no parent directory for {}", source.display()))
    })?;

    // Unique name beside the source; deleted when dropped, covering both the
    // success path and every failure path below.
    let scratch = TempFileBuilder::new()
        .prefix(".recast_frames_")
        .tempdir_in(parent)?;

    let duration_secs = probe_duration(prober_bin, source)?.map(|d| d.total_seconds());
    extract_frames(
        encoder_bin,
        source,
        scratch.path(),
        PREVIEW_FRAME_COUNT,
        duration_secs,
    )?;

    let frames = collect_still_frames(scratch.path())?;
    if frames.is_empty() {
        return Err(CoreError::ThumbnailFailed(format!(
            "no usable frames extracted from {}",
            source.display()
        )));
    }

    let resized = resize_frames(&frames)?;
    write_animated_gif(dest, resized)?;

    log::info!("Wrote preview {} ({} frames)", dest.display(), frames.len());
    Ok(())
}

/// Returns true when the file's leading bytes identify the expected still
/// format. Guards against partial or corrupt extraction artifacts.
fn is_png(path: &Path) -> bool {
    let mut head = [0u8; 8];
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    if file.read_exact(&mut head).is_err() {
        return false;
    }
    matches!(image::guess_format(&head), Ok(ImageFormat::Png))
}

/// Collects extracted frames in sampling order, discarding entries whose
/// detected type is not the expected still-image format.
fn collect_still_frames(scratch_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(scratch_dir)? {
        let path = entry?.path();
        if path.is_file() && is_png(&path) {
            frames.push(path);
        } else {
            log::debug!("Discarding extraction artifact {}", path.display());
        }
    }
    frames.sort();
    Ok(frames)
}

/// Resizes frames to the fixed preview resolution with a deterministic cubic
/// kernel, serialized by the process-global lock.
fn resize_frames(frames: &[PathBuf]) -> CoreResult<Vec<RgbaImage>> {
    let _guard = RESIZE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    frames
        .iter()
        .map(|path| {
            let img = image::open(path)?;
            Ok(img
                .resize_exact(PREVIEW_WIDTH, PREVIEW_HEIGHT, FilterType::CatmullRom)
                .to_rgba8())
        })
        .collect()
}

/// Composites resized frames into a looping animated GIF with a fixed
/// per-frame delay and reduced palette.
fn write_animated_gif(dest: &Path, frames: Vec<RgbaImage>) -> CoreResult<()> {
    let file = File::create(dest)?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_ENCODER_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;
    for image in frames {
        let frame = Frame::from_parts(image, 0, 0, Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1));
        encoder.encode_frame(frame)?;
    }
    Ok(())
}
