use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::HISTORY_FILE_NAME;
use crate::structs::DownloadError;

/// One finished download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unix timestamp in seconds
    pub time: u64,
    pub url: String,
    pub file: PathBuf,
}

/// JSON file listing past downloads, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.yt_downloader_history.json`, `None` when there is no home folder
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every entry, newest first. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<HistoryEntry>, DownloadError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// The `limit` newest entries
    pub fn entries(&self, limit: usize) -> Result<Vec<HistoryEntry>, DownloadError> {
        let mut entries = self.load()?;
        entries.truncate(limit);

        Ok(entries)
    }

    /// Put a new entry on top and rewrite the file
    pub fn record(
        &self,
        url: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Result<HistoryEntry, DownloadError> {
        let entry = HistoryEntry {
            time: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|x| x.as_secs())
                .unwrap_or_default(),
            url: url.into(),
            file: file.into(),
        };

        let mut entries = self.load()?;
        entries.insert(0, entry.clone());

        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;

        debug!("History now holds {} entries", entries.len());

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::new(dir.path().join("history.json"));

        assert!(history.load().unwrap().is_empty());
    }

    #[test]
    fn newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::new(dir.path().join("history.json"));

        history.record("https://youtu.be/FZ8BxMU3BYc", "first.mp4").unwrap();
        history.record("https://youtu.be/dQw4w9WgXcQ", "second.mp3").unwrap();

        let entries = history.load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file, PathBuf::from("second.mp3"));
        assert_eq!(entries[1].url, "https://youtu.be/FZ8BxMU3BYc");

        assert_eq!(history.entries(1).unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            History::new(path).load(),
            Err(DownloadError::History(_))
        ));
    }
}
