use mime::Mime;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as fmtResult},
    path::PathBuf,
    str::FromStr,
};

use crate::constants::{BASE_URL, DEFAULT_FFMPEG, PARSE_INT_REGEX, RESOLUTION_REGEX};
use crate::utils::{get_video_id, normalize_timestamp};

/// A validated reference to a single remote video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    input: String,
    id: String,
}

impl VideoReference {
    /// Parse a watch/short/embed URL or a bare video id.
    ///
    /// Nothing is sent over the network here; a reference that fails to parse is
    /// rejected with [`DownloadError::InvalidUrl`].
    pub fn parse(input: impl Into<String>) -> Result<Self, DownloadError> {
        let input = input.into();

        let id = get_video_id(&input).ok_or_else(|| DownloadError::InvalidUrl(input.clone()))?;

        Ok(Self {
            input: input.trim().to_string(),
            id,
        })
    }

    /// The 11 character video id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// What the user typed, trimmed
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Canonical `watch?v=` URL of the video
    pub fn watch_url(&self) -> String {
        format!("{BASE_URL}{}", self.id)
    }
}

impl FromStr for VideoReference {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for VideoReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.watch_url())
    }
}

/// Metadata of one selectable encoding of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub itag: u64,
    /// Essence of the mime type, e.g. `video/mp4`
    pub mime_type: String,
    pub container: String,
    pub codecs: Vec<String>,
    pub has_video: bool,
    pub has_audio: bool,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub quality_label: Option<String>,
    pub fps: Option<u64>,
    /// Bits per second
    pub bitrate: u64,
    /// Kilobits per second, only known for some audio formats
    pub audio_bitrate: Option<u64>,
    pub audio_sample_rate: Option<String>,
    pub audio_channels: Option<u8>,
    /// Exact size in bytes when the source reports it
    pub content_length: Option<u64>,
    pub approx_duration_ms: Option<u64>,
    pub is_live: bool,
    pub is_hls: bool,
    pub is_dash_mpd: bool,
}

impl StreamDescriptor {
    pub fn is_muxed(&self) -> bool {
        self.has_video && self.has_audio
    }

    pub fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }

    pub fn is_video_only(&self) -> bool {
        self.has_video && !self.has_audio
    }

    /// Live, HLS and DASH manifest formats cannot be written as a single file
    pub fn is_selectable(&self) -> bool {
        !self.is_live && !self.is_hls && !self.is_dash_mpd
    }

    /// Resolution as YouTube lists it, from the quality label (`"720p60"` -> 720) or else the height.
    ///
    /// The label names the short side, so a 720x1280 short is `720p` while its height is 1280.
    pub fn resolution(&self) -> Option<u64> {
        if !self.has_video {
            return None;
        }

        self.quality_label
            .as_deref()
            .and_then(|label| PARSE_INT_REGEX.captures(label))
            .and_then(|x| x.get(1))
            .and_then(|x| x.as_str().parse::<u64>().ok())
            .or(self.height)
    }

    /// Size in bytes, exact when known, otherwise derived from bitrate and duration
    pub fn estimated_size(&self) -> Option<u64> {
        if let Some(content_length) = self.content_length.filter(|x| *x > 0) {
            return Some(content_length);
        }

        let duration_ms = self.approx_duration_ms.filter(|x| *x > 0)?;
        if self.bitrate == 0 {
            return None;
        }

        Some(self.bitrate / 8 * duration_ms / 1000)
    }

    pub fn mime(&self) -> Option<Mime> {
        self.mime_type.parse::<Mime>().ok()
    }

    /// File extension for this stream written as-is
    pub fn file_extension(&self) -> String {
        match self.mime() {
            Some(mime) if mime.type_() == mime::AUDIO && mime.subtype() == "mp4" => {
                "m4a".to_string()
            }
            Some(mime) => mime.subtype().as_str().to_string(),
            None if self.container.is_empty() => "bin".to_string(),
            None => self.container.clone(),
        }
    }
}

impl Display for StreamDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        let kind = if self.is_muxed() {
            "video+audio"
        } else if self.has_video {
            "video"
        } else {
            "audio"
        };

        write!(f, "itag {} [{kind}, {}", self.itag, self.mime_type)?;

        if let Some(label) = &self.quality_label {
            write!(f, ", {label}")?;
        }
        if let Some(audio_bitrate) = self.audio_bitrate {
            write!(f, ", {audio_bitrate}kbps")?;
        }

        write!(f, "]")
    }
}

/// Everything one query against the source returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub length_seconds: u64,
    pub streams: Vec<StreamDescriptor>,
}

/// What to download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display, Serialize, Deserialize)]
pub enum Selection {
    /// Tallest video stream available
    #[default]
    #[display("best")]
    Best,
    /// Exact vertical resolution, e.g. `720`
    #[display("{_0}p")]
    Resolution(u64),
    /// Highest bitrate audio-only stream
    #[display("audio-only")]
    AudioOnly,
}

impl FromStr for Selection {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" | "" => Ok(Self::Best),
            "audio" | "audio-only" | "audio_only" => Ok(Self::AudioOnly),
            other => RESOLUTION_REGEX
                .captures(other)
                .and_then(|x| x.get(1))
                .and_then(|x| x.as_str().parse::<u64>().ok())
                .filter(|x| *x > 0)
                .map(Self::Resolution)
                .ok_or_else(|| DownloadError::InvalidSelection(s.to_string())),
        }
    }
}

/// Optional clip boundaries, normalized to `HH:MM:SS` (or kept verbatim when already colon separated)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrimRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl TrimRange {
    /// Build a range from user input given as seconds or `HH:MM:SS`. Blank values are dropped.
    ///
    /// Returns `Ok(None)` when neither boundary is set.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Option<Self>, DownloadError> {
        let start = start.map(normalize_timestamp).transpose()?.flatten();
        let end = end.map(normalize_timestamp).transpose()?.flatten();

        if start.is_none() && end.is_none() {
            return Ok(None);
        }

        Ok(Some(Self { start, end }))
    }
}

/// Download options
#[derive(Clone, Debug, PartialEq, derive_more::Display)]
#[display("DownloadOptions(selection: {selection}, output_dir: {})", output_dir.display())]
pub struct DownloadOptions {
    pub selection: Selection,
    /// Folder the file is written to
    pub output_dir: PathBuf,
    /// Overrides the name derived from the video title
    pub filename: Option<PathBuf>,
    /// Replace an existing file instead of failing with [`DownloadError::FileExists`]
    pub overwrite: bool,
    /// Mux the best audio track into video-only selections (needs ffmpeg)
    pub merge_audio: bool,
    /// Convert audio-only downloads to MP3 (needs ffmpeg)
    pub convert_mp3: bool,
    pub trim: Option<TrimRange>,
    /// ffmpeg executable
    pub ffmpeg: PathBuf,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        DownloadOptions {
            selection: Selection::default(),
            output_dir: PathBuf::from("."),
            filename: None,
            overwrite: false,
            merge_audio: true,
            convert_mp3: false,
            trim: None,
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DownloadError {
    /// Input is neither a YouTube link nor a video id
    #[error("Invalid video URL: {0:?}")]
    InvalidUrl(String),
    /// No stream matches the selection
    #[error("No stream matches the requested selection ({0})")]
    NotFound(Selection),
    /// The video does not exist or is private
    #[error("The video is unavailable: {0}")]
    Unavailable(String),
    /// Querying or fetching failed
    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The output file is already there
    #[error("{} already exists, pass overwrite to replace it", .0.display())]
    FileExists(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// FFmpeg command error
    #[error("FFmpeg command error: {0}")]
    Ffmpeg(String),
    /// History file cannot be parsed
    #[error("History file cannot be parsed: {0}")]
    History(#[from] serde_json::Error),
    #[error("Invalid selection {0:?}, expected `best`, `audio-only` or a resolution like `720p`")]
    InvalidSelection(String),
    #[error("Invalid timestamp {0:?}, expected seconds or HH:MM:SS")]
    InvalidTimestamp(String),
}

impl DownloadError {
    pub fn network(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Network(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> StreamDescriptor {
        StreamDescriptor {
            itag: 140,
            mime_type: "audio/mp4".to_string(),
            container: "mp4".to_string(),
            codecs: vec!["mp4a.40.2".to_string()],
            has_video: false,
            has_audio: true,
            width: None,
            height: None,
            quality_label: None,
            fps: None,
            bitrate: 128_000,
            audio_bitrate: Some(128),
            audio_sample_rate: Some("44100".to_string()),
            audio_channels: Some(2),
            content_length: None,
            approx_duration_ms: Some(10_000),
            is_live: false,
            is_hls: false,
            is_dash_mpd: false,
        }
    }

    #[test]
    fn selection_from_str() {
        assert_eq!(Selection::from_str("720p").unwrap(), Selection::Resolution(720));
        assert_eq!(Selection::from_str("1080").unwrap(), Selection::Resolution(1080));
        assert_eq!(Selection::from_str(" 360P ").unwrap(), Selection::Resolution(360));
        assert_eq!(Selection::from_str("audio-only").unwrap(), Selection::AudioOnly);
        assert_eq!(Selection::from_str("best").unwrap(), Selection::Best);

        assert!(matches!(
            Selection::from_str("hd"),
            Err(DownloadError::InvalidSelection(_))
        ));
        assert!(matches!(
            Selection::from_str("0p"),
            Err(DownloadError::InvalidSelection(_))
        ));
    }

    #[test]
    fn selection_display() {
        assert_eq!(Selection::Resolution(720).to_string(), "720p");
        assert_eq!(Selection::AudioOnly.to_string(), "audio-only");
        assert_eq!(Selection::Best.to_string(), "best");
    }

    #[test]
    fn audio_mp4_is_written_as_m4a() {
        assert_eq!(descriptor().file_extension(), "m4a");

        let webm = StreamDescriptor {
            mime_type: "audio/webm".to_string(),
            container: "webm".to_string(),
            ..descriptor()
        };
        assert_eq!(webm.file_extension(), "webm");
    }

    #[test]
    fn size_falls_back_to_bitrate_and_duration() {
        assert_eq!(descriptor().estimated_size(), Some(160_000));

        let exact = StreamDescriptor {
            content_length: Some(42),
            ..descriptor()
        };
        assert_eq!(exact.estimated_size(), Some(42));

        let unknown = StreamDescriptor {
            approx_duration_ms: None,
            ..descriptor()
        };
        assert_eq!(unknown.estimated_size(), None);
    }

    #[test]
    fn resolution_from_quality_label() {
        let video = StreamDescriptor {
            mime_type: "video/webm".to_string(),
            has_video: true,
            has_audio: false,
            quality_label: Some("720p60".to_string()),
            ..descriptor()
        };

        assert_eq!(video.resolution(), Some(720));
        assert_eq!(descriptor().resolution(), None);

        let vertical = StreamDescriptor {
            width: Some(720),
            height: Some(1280),
            ..video.clone()
        };
        assert_eq!(vertical.resolution(), Some(720));

        let unlabelled = StreamDescriptor {
            height: Some(480),
            quality_label: None,
            ..video
        };
        assert_eq!(unlabelled.resolution(), Some(480));
    }

    #[test]
    fn trim_range_parse() {
        assert_eq!(TrimRange::parse(None, Some("  ")).unwrap(), None);

        let range = TrimRange::parse(Some("75"), Some("00:02:00")).unwrap().unwrap();
        assert_eq!(range.start.as_deref(), Some("00:01:15"));
        assert_eq!(range.end.as_deref(), Some("00:02:00"));

        assert!(TrimRange::parse(Some("soon"), None).is_err());
    }
}
