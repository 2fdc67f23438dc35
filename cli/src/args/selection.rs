use clap::Parser;
use yt_downloader::Selection;

#[derive(Parser)]
pub struct SelectionArgs {
    /// Pick the video stream with exactly this resolution, e.g. `720p` [default: the best one]
    #[clap(
        long,
        short = 'r',
        value_parser = parse_from_str,
        conflicts_with_all(& ["audio_only"])
    )]
    pub resolution: Option<Selection>,

    /// Pick the audio-only stream with the highest bitrate
    #[clap(
        long,
        short = 'a',
        conflicts_with_all(& ["resolution"])
    )]
    pub audio_only: bool,
}

impl SelectionArgs {
    pub fn selection(&self) -> Selection {
        if self.audio_only {
            Selection::AudioOnly
        } else {
            self.resolution.unwrap_or_default()
        }
    }
}

fn parse_from_str(s: &str) -> anyhow::Result<Selection> {
    Ok(s.parse::<Selection>()?)
}
