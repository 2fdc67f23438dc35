use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use yt_downloader::{DownloadOptions, Downloader};

use crate::args::{log::LogArgs, selection::SelectionArgs};

#[derive(Parser)]
pub struct EstimateArgs {
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

    /// Estimate the video-only stream alone instead of adding the audio track it would be muxed with
    #[clap(long)]
    pub no_merge: bool,

    #[clap(flatten)]
    pub log: LogArgs,
}

impl EstimateArgs {
    pub fn run(&self) -> Result<()> {
        self.log.init_logger();

        let downloader = Downloader::new(DownloadOptions {
            selection: self.selection.selection(),
            merge_audio: !self.no_merge,
            ..Default::default()
        });

        let estimate = downloader.estimate(&self.id)?;

        println!(
            "{} {}",
            format!("{}:", self.selection.selection()).white().bold(),
            estimate.to_string().cyan()
        );

        Ok(())
    }
}
