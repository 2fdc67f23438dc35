use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, warn};

use crate::constants::{MP3_BITRATE, MP3_SAMPLE_RATE};
use crate::structs::{DownloadError, TrimRange};

/// Thin wrapper around an `ffmpeg` executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `true` when `ffmpeg -version` runs successfully
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Mux the first video track of `video` with the first audio track of `audio`, without re-encoding
    pub fn merge(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), DownloadError> {
        self.run(merge_args(video, audio, output))
    }

    pub fn convert_mp3(&self, input: &Path, output: &Path) -> Result<(), DownloadError> {
        self.run(mp3_args(input, output))
    }

    /// Cut `input` to `range`. Stream copy is tried first, re-encoding is the fallback.
    pub fn trim(&self, input: &Path, range: &TrimRange, output: &Path) -> Result<(), DownloadError> {
        match self.run(trim_args(input, range, output, false)) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("Trimming with stream copy failed, re-encoding instead: {err}");
                self.run(trim_args(input, range, output, true))
            }
        }
    }

    fn run(&self, args: Vec<OsString>) -> Result<(), DownloadError> {
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| {
                DownloadError::Ffmpeg(format!("cannot run {}: {err}", self.program.display()))
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);

        Err(DownloadError::Ffmpeg(format!(
            "{} exited with {}: {}",
            self.program.display(),
            output.status,
            stderr.trim()
        )))
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_FFMPEG)
    }
}

fn base_args(input: &Path) -> Vec<OsString> {
    vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-i".into(),
        input.into(),
    ]
}

pub fn merge_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base_args(video);

    args.extend([
        "-i".into(),
        audio.into(),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c".into(),
        "copy".into(),
        output.into(),
    ]);

    args
}

pub fn mp3_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base_args(input);

    args.extend([
        "-vn".into(),
        "-ab".into(),
        MP3_BITRATE.into(),
        "-ar".into(),
        MP3_SAMPLE_RATE.into(),
        output.into(),
    ]);

    args
}

pub fn trim_args(input: &Path, range: &TrimRange, output: &Path, reencode: bool) -> Vec<OsString> {
    let mut args = base_args(input);

    if let Some(start) = &range.start {
        args.extend(["-ss".into(), start.into()]);
    }
    if let Some(end) = &range.end {
        args.extend(["-to".into(), end.into()]);
    }

    if reencode {
        args.extend([
            "-c:v".into(),
            "libx264".into(),
            "-c:a".into(),
            "aac".into(),
        ]);
    } else {
        args.extend(["-c".into(), "copy".into()]);
    }

    args.push(output.into());

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|x| x.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn mp3_command() {
        let args = strings(mp3_args(Path::new("in.webm"), Path::new("out.mp3")));

        assert_eq!(
            args,
            [
                "-hide_banner", "-loglevel", "error", "-y", "-i", "in.webm", "-vn", "-ab", "192k",
                "-ar", "44100", "out.mp3"
            ]
        );
    }

    #[test]
    fn merge_command_maps_both_inputs() {
        let args = strings(merge_args(
            Path::new("v.part"),
            Path::new("a.part"),
            Path::new("out.mp4"),
        ));

        assert_eq!(&args[4..], ["-i", "v.part", "-i", "a.part", "-map", "0:v:0", "-map", "1:a:0", "-c", "copy", "out.mp4"]);
    }

    #[test]
    fn trim_command() {
        let range = TrimRange {
            start: Some("00:00:10".to_string()),
            end: None,
        };

        let copy = strings(trim_args(Path::new("in.mp4"), &range, Path::new("out.mp4"), false));
        assert_eq!(&copy[6..], ["-ss", "00:00:10", "-c", "copy", "out.mp4"]);

        let reencode = strings(trim_args(Path::new("in.mp4"), &range, Path::new("out.mp4"), true));
        assert_eq!(
            &reencode[6..],
            ["-ss", "00:00:10", "-c:v", "libx264", "-c:a", "aac", "out.mp4"]
        );
    }

    #[test]
    fn missing_program_is_unavailable() {
        let ffmpeg = Ffmpeg::new("definitely-not-an-ffmpeg-binary");

        assert!(!ffmpeg.is_available());
        assert!(matches!(
            ffmpeg.convert_mp3(Path::new("a"), Path::new("b")),
            Err(DownloadError::Ffmpeg(_))
        ));
    }
}
