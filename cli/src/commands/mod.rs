pub mod download;
pub mod estimate;
pub mod history;
pub mod info;

use clap::Parser;

use self::download::DownloadArgs;
use self::estimate::EstimateArgs;
use self::history::HistoryArgs;
use self::info::InfoArgs;

#[derive(Parser)]
#[clap(
    version,
    about = "\n\
    Download YouTube videos, or just their audio, at a chosen resolution.
    ",
    arg_required_else_help = true,
    subcommand_required = true
)]
pub enum Commands {
    #[clap(about = "\
    Download the video to a specific folder
    ")]
    Download(DownloadArgs),
    #[clap(about = "\
    List the streams a video offers
    ")]
    Info(InfoArgs),
    #[clap(about = "\
    Estimate download size and time for a selection
    ")]
    Estimate(EstimateArgs),
    #[clap(about = "\
    Show past downloads
    ")]
    History(HistoryArgs),
}

impl Commands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Commands::Download(args) => args.run(),
            Commands::Info(args) => args.run(),
            Commands::Estimate(args) => args.run(),
            Commands::History(args) => args.run(),
        }
    }
}
