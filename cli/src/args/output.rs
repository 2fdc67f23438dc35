use anyhow::{Error, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How `info` prints the streams of a video
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One line per stream, sizes in human units
    #[default]
    Table,
    Debug,
    PrettyDebug,
    Json,
    PrettyJson,
    Yaml,
}

impl OutputFormat {
    /// Serialize `output` for every format but [`OutputFormat::Table`], which has no generic form
    pub fn serialize<T>(&self, output: &T) -> Result<Option<String>>
    where
        T: Serialize + std::fmt::Debug,
    {
        use OutputFormat::*;

        let rendered = match self {
            Table => return Ok(None),
            Debug => format!("{output:?}"),
            PrettyDebug => format!("{output:#?}"),
            Json => serde_json::to_string(output)?,
            PrettyJson => serde_json::to_string_pretty(output)?,
            Yaml => serde_yaml::to_string(output)?,
        };

        Ok(Some(rendered))
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OutputLevel: u16 {
        const GENERAL       = 0b000000100;
        const VIDEO_TRACK   = 0b000001000;
        const AUDIO_TRACK   = 0b000010000;
        const SIZE          = 0b000100000;
        const VERBOSE       = 0b100000000;

        const VIDEO         = 0b010000000;
    }
}

impl FromStr for OutputLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut level = Self::empty();

        for name in s
            .trim()
            .split(|c: char| c.is_whitespace() || c == ',' || c == '|')
            .filter(|x| !x.is_empty())
        {
            level |= match name {
                "general" => Self::GENERAL,
                "video-track" => Self::VIDEO_TRACK,
                "audio-track" => Self::AUDIO_TRACK,
                "size" => Self::SIZE,
                "verbose" => Self::VERBOSE,
                "video-info" => Self::VIDEO,
                "all" => Self::all(),

                _ => anyhow::bail!("Could not parse {:?} to an OutputLevel", name),
            };
        }

        Ok(level)
    }
}

#[derive(Parser)]
pub struct OutputArgs {
    /// The format in which the streams should be printed
    ///
    /// [possible_values: table, debug, pretty-debug, json, pretty-json, yaml]
    #[clap(
    short, long = "output",
    default_value = "table",
    value_parser = parse_from_str,
    )]
    pub output_format: OutputFormat,

    /// The amount of information printed to the terminal
    ///
    /// To get more information, different levels can be combined, by separating them with a `|`.
    ///
    /// [possible_values: general, video-track, audio-track, size, video-info, verbose, all]
    #[clap(
        short = 'l',
        long = "level",
        default_value = "general | video-track | audio-track | size | video-info"
    )]
    pub output_level: OutputLevel,
}

fn parse_from_str(s: &str) -> anyhow::Result<OutputFormat> {
    Ok(serde_json::from_str(&format!("\"{s}\""))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_combine() {
        let level = OutputLevel::from_str("general | audio-track").unwrap();

        assert!(level.contains(OutputLevel::GENERAL));
        assert!(level.contains(OutputLevel::AUDIO_TRACK));
        assert!(!level.contains(OutputLevel::VIDEO_TRACK));

        assert!(OutputLevel::from_str("everything").is_err());
        assert!(OutputLevel::from_str("all").unwrap().contains(OutputLevel::VERBOSE));
    }

    #[test]
    fn format_names() {
        assert_eq!(parse_from_str("table").unwrap(), OutputFormat::Table);
        assert_eq!(parse_from_str("pretty-json").unwrap(), OutputFormat::PrettyJson);
        assert!(parse_from_str("xml").is_err());
    }

    #[test]
    fn table_has_no_generic_form() {
        assert_eq!(OutputFormat::Table.serialize(&1).unwrap(), None);
        assert_eq!(OutputFormat::Json.serialize(&[1, 2]).unwrap().as_deref(), Some("[1,2]"));
    }
}
