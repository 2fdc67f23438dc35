use once_cell::sync::Lazy;
use regex::Regex;

pub const BASE_URL: &str = "https://www.youtube.com/watch?v=";

/// Hosts accepted for `watch?v=` style links
pub const VALID_QUERY_DOMAINS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
];

/// Hosts accepted for path style links (`/shorts/<id>`, `/embed/<id>`)
pub const VALID_PATH_DOMAINS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "gaming.youtube.com",
    "youtube-nocookie.com",
    "www.youtube-nocookie.com",
];

pub(crate) static VIDEO_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-_]{11}$").unwrap());

pub(crate) static PATH_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(?:shorts|embed|e|v|live)/([\w-]{11})(?:[/?#]|$)").unwrap());

pub(crate) static SHORT_LINK_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([\w-]{11})(?:[/?#]|$)").unwrap());

pub(crate) static RESOLUTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d{2,4})\s*p?\s*$").unwrap());

pub(crate) static PARSE_INT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*((\-|\+)?[0-9]+)\s*").unwrap());

/// Characters stripped from titles before they become file names
pub const FORBIDDEN_FILENAME_CHARS: &[char] =
    &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r', '\t'];

pub const MAX_FILENAME_CHARS: usize = 120;

pub const PART_EXTENSION: &str = "part";

pub const DEFAULT_FFMPEG: &str = "ffmpeg";

pub const HISTORY_FILE_NAME: &str = ".yt_downloader_history.json";

/// Small, stable resources used to measure bandwidth
pub const SPEED_PROBE_URLS: &[&str] = &[
    "https://www.google.com/images/branding/googlelogo/1x/googlelogo_color_272x92dp.png",
    "https://www.cloudflare.com/img/cf-horizontal-bw.svg",
];

// A probe stops reading after ~200 KB
pub(crate) const SPEED_PROBE_MAX_BYTES: u64 = 200_000;

pub(crate) const SPEED_PROBE_TIMEOUT_SECS: u64 = 6;

pub(crate) const MP3_BITRATE: &str = "192k";

pub(crate) const MP3_SAMPLE_RATE: &str = "44100";
