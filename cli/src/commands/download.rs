use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;
use log::warn;
use std::path::PathBuf;

use yt_downloader::{DownloadOptions, Downloader, History, NoProgress, TrimRange};

use crate::args::{log::LogArgs, selection::SelectionArgs};

#[derive(Parser)]
pub struct DownloadArgs {
    #[clap(
        short = 'i',
        long = "id",
        help = "Video ID or URL",
        num_args = 1,
        required = true
    )]
    pub id: String,

    #[clap(flatten)]
    pub selection: SelectionArgs,

    #[clap(flatten)]
    pub log: LogArgs,

    /// Where to download the video to [default: **./**]
    #[clap(
        short = 'p',
        long = "path",
        help = "Location folder to download [default: ./]",
        num_args = 1,
        required = false
    )]
    pub path: Option<PathBuf>,

    /// The filename of the video file [default: <VIDEO_TITLE>.<EXTENSION>]
    ///
    /// The extension is added when missing.
    #[clap(
        short,
        long = "filename",
        help = "The filename of the video file [default: <VIDEO_TITLE>.<EXTENSION>]",
        num_args = 1,
        required = false
    )]
    pub filename: Option<PathBuf>,

    /// Replace the output file if it already exists
    #[clap(long)]
    pub force: bool,

    /// Convert the audio to MP3 (needs ffmpeg)
    #[clap(long, requires = "audio_only")]
    pub mp3: bool,

    /// Keep video-only streams silent instead of muxing in the best audio track
    #[clap(long)]
    pub no_merge: bool,

    /// Start of the clip to keep, in seconds or HH:MM:SS (needs ffmpeg)
    #[clap(long)]
    pub start: Option<String>,

    /// End of the clip to keep, in seconds or HH:MM:SS (needs ffmpeg)
    #[clap(long)]
    pub end: Option<String>,

    /// The ffmpeg executable used for merging, MP3 conversion and trimming
    #[clap(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Do not add the download to the history file
    #[clap(long)]
    pub no_history: bool,

    /// History file [default: ~/.yt_downloader_history.json]
    #[clap(long)]
    pub history_file: Option<PathBuf>,
}

impl DownloadArgs {
    pub fn run(&self) -> Result<()> {
        self.log.init_logger();

        let output_dir = self.path.clone().unwrap_or_else(|| PathBuf::from("."));

        if !output_dir.exists() {
            bail!("Folder path not found!");
        } else if !output_dir.is_dir() {
            bail!("Output path must be folder!");
        }

        let options = DownloadOptions {
            selection: self.selection.selection(),
            output_dir,
            filename: self.filename.clone(),
            overwrite: self.force,
            merge_audio: !self.no_merge,
            convert_mp3: self.mp3,
            trim: TrimRange::parse(self.start.as_deref(), self.end.as_deref())?,
            ffmpeg: self.ffmpeg.clone(),
        };

        let downloader = Downloader::new(options);

        let downloaded = if self.log.progress {
            downloader.download(&self.id, &self.log.init_progress_bar())?
        } else {
            downloader.download(&self.id, &NoProgress)?
        };

        if !self.no_history {
            let history = self
                .history_file
                .clone()
                .or_else(History::default_path)
                .map(History::new);

            match history {
                Some(history) => {
                    if let Err(err) = history.record(&self.id, &downloaded.path) {
                        warn!("Cannot update {}: {err}", history.path().display());
                    }
                }
                None => warn!("No home folder, the download is not recorded in the history"),
            }
        }

        // Display the written path
        println!(
            "\n{} {}\n",
            "Video successfully downloaded to".white().bold(),
            downloaded.path.display().to_string().green().underline()
        );

        Ok(())
    }
}
