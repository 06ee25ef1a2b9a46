//! Duration probing and metadata export via the external prober.
//!
//! The prober's diagnostic stream is scanned for the first line containing a
//! `Duration: H:MM:SS.ff` annotation. Fractional seconds are truncated; a
//! stream without such a line yields no duration at all.

use super::run_captured;
use crate::error::CoreResult;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// A media duration as an (hours, minutes, seconds) triple of whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HmsDuration {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

/// Per-component tolerance for duration comparison.
#[derive(Debug, Clone, Copy)]
pub struct DurationTolerance {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Default for DurationTolerance {
    /// Exact hours and minutes, seconds within ±1.
    fn default() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 1,
        }
    }
}

impl HmsDuration {
    /// Compares hours, minutes, and seconds independently against the
    /// tolerance; all three components must be within bounds.
    #[must_use]
    pub fn within_tolerance(&self, other: &Self, tolerance: &DurationTolerance) -> bool {
        self.hours.abs_diff(other.hours) <= tolerance.hours
            && self.minutes.abs_diff(other.minutes) <= tolerance.minutes
            && self.seconds.abs_diff(other.seconds) <= tolerance.seconds
    }

    /// Total length in whole seconds.
    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

/// Parses a `H:MM:SS[.ff]` token, truncating fractional seconds.
fn parse_hms(token: &str) -> Option<HmsDuration> {
    let mut parts = token.split(':');
    let hours = parts.next()?.trim().parse().ok()?;
    let minutes = parts.next()?.parse().ok()?;
    let seconds_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let seconds = seconds_part.split('.').next()?.parse().ok()?;
    Some(HmsDuration {
        hours,
        minutes,
        seconds,
    })
}

/// Scans diagnostic output for the first duration annotation line.
///
/// The first line containing `Duration:` decides the result; a malformed
/// annotation on that line yields `None` rather than falling through to
/// later lines.
pub(crate) fn parse_duration_line(diagnostics: &str) -> Option<HmsDuration> {
    for line in diagnostics.lines() {
        if let Some(idx) = line.find("Duration:") {
            let rest = line[idx + "Duration:".len()..].trim_start();
            let token = rest.split([',', ' ']).next()?;
            return parse_hms(token);
        }
    }
    None
}

/// Probes a media file for its duration.
///
/// Returns `Ok(None)` when the prober ran successfully but emitted no
/// parseable duration annotation.
///
/// # Errors
///
/// A non-zero prober exit code or spawn failure is a hard failure for this
/// probe call. Callers deciding idempotency must treat it as "cannot
/// compare" rather than letting it abort the run.
pub fn probe_duration(prober_bin: &Path, media: &Path) -> CoreResult<Option<HmsDuration>> {
    let output = run_captured(prober_bin, [media.as_os_str()])?;
    Ok(parse_duration_line(&output.stderr))
}

/// Probes a media file for structured stream/format metadata and writes the
/// prober's JSON output verbatim to `dest`.
pub fn export_metadata(prober_bin: &Path, media: &Path, dest: &Path) -> CoreResult<()> {
    let output = run_captured(
        prober_bin,
        [
            OsStr::new("-v"),
            OsStr::new("quiet"),
            OsStr::new("-print_format"),
            OsStr::new("json"),
            OsStr::new("-show_format"),
            OsStr::new("-show_streams"),
            media.as_os_str(),
        ],
    )?;
    fs::write(dest, output.stdout)?;
    log::debug!("Wrote metadata for {} to {}", media.display(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mov':\n  \
        Duration: 1:02:03.45, start: 0.000000, bitrate: 1482 kb/s\n    \
        Stream #0:0: Video: h264";

    #[test]
    fn test_parse_duration_line_truncates_fractional_seconds() {
        let d = parse_duration_line(SAMPLE).unwrap();
        assert_eq!(
            d,
            HmsDuration {
                hours: 1,
                minutes: 2,
                seconds: 3
            }
        );
    }

    #[test]
    fn test_parse_duration_line_missing_annotation() {
        assert_eq!(parse_duration_line("no annotation here\nat all"), None);
        assert_eq!(parse_duration_line(""), None);
    }

    #[test]
    fn test_parse_duration_line_non_numeric_is_unparseable() {
        assert_eq!(parse_duration_line("  Duration: N/A, start: 0.000000"), None);
        assert_eq!(parse_duration_line("  Duration: aa:bb:cc, bitrate"), None);
    }

    #[test]
    fn test_first_duration_line_wins() {
        let text = "  Duration: N/A\n  Duration: 0:01:00.00, bitrate: 1 kb/s";
        // The first annotation is malformed; it decides the result.
        assert_eq!(parse_duration_line(text), None);
    }

    #[test]
    fn test_within_tolerance_defaults() {
        let tolerance = DurationTolerance::default();
        let base = HmsDuration {
            hours: 1,
            minutes: 0,
            seconds: 0,
        };
        let close = HmsDuration {
            hours: 1,
            minutes: 0,
            seconds: 1,
        };
        let far = HmsDuration {
            hours: 1,
            minutes: 0,
            seconds: 3,
        };
        let other_minute = HmsDuration {
            hours: 1,
            minutes: 1,
            seconds: 0,
        };
        assert!(base.within_tolerance(&close, &tolerance));
        assert!(close.within_tolerance(&base, &tolerance));
        assert!(!base.within_tolerance(&far, &tolerance));
        assert!(!base.within_tolerance(&other_minute, &tolerance));
    }

    #[test]
    fn test_total_seconds() {
        let d = HmsDuration {
            hours: 1,
            minutes: 2,
            seconds: 3,
        };
        assert_eq!(d.total_seconds(), 3723);
    }
}
