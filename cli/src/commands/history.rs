use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use colored::Colorize;

use yt_downloader::{History, HistoryEntry};

#[derive(Parser)]
pub struct HistoryArgs {
    /// How many downloads to show, newest first
    #[clap(short = 'n', long, default_value_t = 100)]
    pub limit: usize,

    /// History file [default: ~/.yt_downloader_history.json]
    #[clap(long)]
    pub history_file: Option<PathBuf>,
}

impl HistoryArgs {
    pub fn run(&self) -> Result<()> {
        let path = self
            .history_file
            .clone()
            .or_else(History::default_path)
            .context("No home folder to look for the history file in")?;

        let entries = History::new(path).entries(self.limit)?;

        if entries.is_empty() {
            println!("{}", "No downloads yet".white().bold());
        }

        for entry in entries {
            println!("{}", format_entry(&entry));
        }

        Ok(())
    }
}

/// `2024-05-01 13:37  title.mp4`
fn format_entry(entry: &HistoryEntry) -> String {
    let time = DateTime::from_timestamp(entry.time as i64, 0)
        .map(|x| x.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "????-??-?? ??:??".to_string());

    let file = entry
        .file
        .file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.file.display().to_string());

    format!("{}  {}", time.dimmed(), file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_shows_file_name_only() {
        let entry = HistoryEntry {
            time: 0,
            url: "https://youtu.be/FZ8BxMU3BYc".to_string(),
            file: PathBuf::from("downloads").join("Song.webm"),
        };

        colored::control::set_override(false);
        let line = format_entry(&entry);

        assert!(line.ends_with("  Song.webm"), "{line}");
        assert!(!line.contains("downloads"));
    }
}
