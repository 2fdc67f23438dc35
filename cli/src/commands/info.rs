use anyhow::Result;
use clap::Parser;

use yt_downloader::{DownloadOptions, Downloader};

use crate::args::{log::LogArgs, output::OutputArgs};
use crate::utils::result_serializer::ResultSerializer;

#[derive(Parser)]
pub struct InfoArgs {
    #[clap(
        short = 'i',
        long = "id",
        help = "Video ID or URL",
        num_args = 1,
        required = true
    )]
    pub id: String,

    #[clap(flatten)]
    pub log: LogArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

impl InfoArgs {
    pub fn run(&self) -> Result<()> {
        self.log.init_logger();

        let downloader = Downloader::new(DownloadOptions::default());
        let (_, metadata) = downloader.query(&self.id)?;

        let result = ResultSerializer::new(metadata, self.output.output_level);

        let rendered = match self.output.output_format.serialize(&result)? {
            Some(rendered) => rendered,
            None => result.table(),
        };

        println!("{rendered}");

        Ok(())
    }
}
