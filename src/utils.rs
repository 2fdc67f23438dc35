use std::time::Duration;

use crate::constants::{
    FORBIDDEN_FILENAME_CHARS, MAX_FILENAME_CHARS, PATH_ID_REGEX, SHORT_LINK_ID_REGEX,
    VALID_PATH_DOMAINS, VALID_QUERY_DOMAINS, VIDEO_ID_REGEX,
};
use crate::structs::DownloadError;

/// Excavate video id from URLs or id
pub fn get_video_id(url: &str) -> Option<String> {
    let url = url.trim();

    if validate_id(url) {
        Some(url.to_string())
    } else if url.starts_with("http://") || url.starts_with("https://") {
        get_url_video_id(url)
    } else {
        None
    }
}

pub fn validate_id(id: &str) -> bool {
    VIDEO_ID_REGEX.is_match(id.trim())
}

fn get_url_video_id(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    let id = if VALID_QUERY_DOMAINS.contains(&host.as_str()) {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.chars().take(11).collect::<String>())
    } else {
        None
    };

    let id = match id {
        Some(id) => id,
        None if host == "youtu.be" => SHORT_LINK_ID_REGEX
            .captures(parsed.path())?
            .get(1)?
            .as_str()
            .to_string(),
        None if VALID_PATH_DOMAINS.contains(&host.as_str()) => PATH_ID_REGEX
            .captures(parsed.path())?
            .get(1)?
            .as_str()
            .to_string(),
        None => return None,
    };

    validate_id(&id).then_some(id)
}

/// Make a title safe to use as a file name on every platform
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c))
        .take(MAX_FILENAME_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

/// `1536` -> `"1.50 KB"`, `None`/`0` -> `"Unknown"`
pub fn human_size(bytes: Option<u64>) -> String {
    let bytes = match bytes {
        Some(bytes) if bytes > 0 => bytes,
        _ => return "Unknown".to_string(),
    };

    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }

    format!("{size:.2} PB")
}

/// `125s` -> `"2m5s"`
pub fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    format!("{}m{}s", secs / 60, secs % 60)
}

/// Seconds (`"75"`, `"75.9"`) become `HH:MM:SS`, colon separated input is kept as is.
/// Blank input is `None`.
pub fn normalize_timestamp(ts: &str) -> Result<Option<String>, DownloadError> {
    let ts = ts.trim();

    if ts.is_empty() {
        return Ok(None);
    }

    if ts.contains(':') {
        let valid = ts
            .split(':')
            .all(|part| !part.is_empty() && part.parse::<f64>().is_ok());

        return if valid {
            Ok(Some(ts.to_string()))
        } else {
            Err(DownloadError::InvalidTimestamp(ts.to_string()))
        };
    }

    let seconds = ts
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite() && *x >= 0.0)
        .ok_or_else(|| DownloadError::InvalidTimestamp(ts.to_string()))?
        .trunc() as u64;

    Ok(Some(format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )))
}
