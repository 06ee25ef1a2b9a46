//! Invocation of the external encoder binary.
//!
//! Two target profiles share one invocation contract; only the argument
//! template differs. Both output streams are captured fully, and a non-zero
//! exit code surfaces the captured stderr as the failure diagnostic.

use super::run_captured;
use crate::error::CoreResult;
use std::ffi::OsString;
use std::path::Path;

/// Fixed scale filter applied by both profiles.
const SCALE_FILTER: &str = "scale=-2:720";

/// Target format profiles supported by the transcode stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeProfile {
    /// H.264 baseline video with configurable audio, faststart layout.
    Mp4,
    /// VP9 video with Vorbis audio.
    Webm,
}

impl EncodeProfile {
    /// File extension of outputs produced by this profile.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
        }
    }

    /// Builds the full argument vector for one encode invocation.
    ///
    /// Arguments are passed to the process directly, so paths need no
    /// escaping regardless of whitespace or shell metacharacters.
    #[must_use]
    pub fn args(&self, input: &Path, output: &Path, audio_codec: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
        match self {
            Self::Mp4 => {
                args.extend([
                    "-c:v".into(),
                    "libx264".into(),
                    "-profile:v".into(),
                    "baseline".into(),
                    "-level".into(),
                    "3.0".into(),
                    "-vf".into(),
                    SCALE_FILTER.into(),
                    "-pix_fmt".into(),
                    "yuv420p".into(),
                    "-c:a".into(),
                    audio_codec.into(),
                    "-movflags".into(),
                    "+faststart".into(),
                ]);
            }
            Self::Webm => {
                args.extend([
                    "-c:v".into(),
                    "libvpx-vp9".into(),
                    "-b:v".into(),
                    "1M".into(),
                    "-vf".into(),
                    SCALE_FILTER.into(),
                    "-c:a".into(),
                    "libvorbis".into(),
                ]);
            }
        }
        args.push(output.into());
        args
    }
}

/// Runs one encode to completion.
///
/// # Errors
///
/// * `CoreError::CommandStart` - the encoder could not be spawned
/// * `CoreError::CommandFailed` - non-zero exit, with captured stderr
pub fn run_encode(
    encoder_bin: &Path,
    profile: EncodeProfile,
    input: &Path,
    output: &Path,
    audio_codec: &str,
) -> CoreResult<()> {
    log::info!(
        "Encoding {} -> {} ({})",
        input.display(),
        output.display(),
        profile.extension()
    );
    run_captured(encoder_bin, profile.args(input, output, audio_codec))?;
    Ok(())
}

/// Extracts evenly sampled still frames into `scratch_dir` using the
/// encoder's image sequence output.
///
/// The sampling rate spreads `frame_count` frames across `duration_secs`;
/// when the source duration is unknown the rate falls back to one frame per
/// second.
pub fn extract_frames(
    encoder_bin: &Path,
    input: &Path,
    scratch_dir: &Path,
    frame_count: usize,
    duration_secs: Option<u64>,
) -> CoreResult<()> {
    let rate = match duration_secs {
        Some(secs) if secs > 0 => format!("{frame_count}/{secs}"),
        _ => "1".to_string(),
    };
    let pattern = scratch_dir.join("frame_%04d.png");

    let args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-vf".into(),
        format!("fps={rate}").into(),
        "-frames:v".into(),
        frame_count.to_string().into(),
        "-f".into(),
        "image2".into(),
        pattern.into(),
    ];
    run_captured(encoder_bin, args)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn test_mp4_args_carry_profile_and_audio_codec() {
        let args = strings(&EncodeProfile::Mp4.args(
            Path::new("/in/a video.mov"),
            Path::new("/out/a video.mp4"),
            "aac",
        ));
        assert_eq!(args[0], "-y");
        assert_eq!(args[1], "-i");
        assert_eq!(args[2], "/in/a video.mov");
        assert!(has_pair(&args, "-profile:v", "baseline"));
        assert!(has_pair(&args, "-c:a", "aac"));
        assert!(has_pair(&args, "-vf", SCALE_FILTER));
        assert_eq!(args.last().unwrap(), "/out/a video.mp4");
    }

    #[test]
    fn test_webm_args_use_vp9_and_vorbis() {
        let args = strings(&EncodeProfile::Webm.args(
            Path::new("/in/b.mov"),
            Path::new("/out/b.webm"),
            "aac",
        ));
        assert!(has_pair(&args, "-c:v", "libvpx-vp9"));
        assert!(has_pair(&args, "-c:a", "libvorbis"));
        assert_eq!(args.last().unwrap(), "/out/b.webm");
    }

    #[test]
    fn test_extensions() {
        assert_eq!(EncodeProfile::Mp4.extension(), "mp4");
        assert_eq!(EncodeProfile::Webm.extension(), "webm");
    }

    #[test]
    fn test_frame_pattern_lands_in_scratch_dir() {
        let pattern = PathBuf::from("/tmp/scratch").join("frame_%04d.png");
        assert_eq!(pattern, PathBuf::from("/tmp/scratch/frame_%04d.png"));
    }
}
