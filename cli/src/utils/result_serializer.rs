use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use yt_downloader::{human_size, StreamDescriptor, VideoMetadata};

use crate::args::output::OutputLevel;

/// Serializes a [`VideoMetadata`], keeping only the fields `output_level` asks for
#[derive(Debug)]
pub struct ResultSerializer {
    output_level: OutputLevel,
    metadata: VideoMetadata,
    streams: Vec<StreamSerializer>,
}

impl ResultSerializer {
    pub fn new(metadata: VideoMetadata, output_level: OutputLevel) -> Self {
        let streams = metadata
            .streams
            .iter()
            .filter(|x| x.is_selectable() || output_level.contains(OutputLevel::VERBOSE))
            .map(|stream| StreamSerializer {
                stream: stream.clone(),
                output_level,
            })
            .collect::<Vec<_>>();

        Self {
            output_level,
            metadata,
            streams,
        }
    }

    /// One line per stream, for the `table` output format
    pub fn table(&self) -> String {
        let mut lines = Vec::with_capacity(self.streams.len() + 1);

        if self.output_level.contains(OutputLevel::VIDEO) {
            lines.push(format!(
                "{} ({}, {}s)",
                self.metadata.title, self.metadata.video_id, self.metadata.length_seconds
            ));
        }

        lines.extend(self.streams.iter().map(|x| x.line()));

        lines.join("\n")
    }
}

impl Serialize for ResultSerializer {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        if self.output_level.contains(OutputLevel::VIDEO) {
            map.serialize_entry("video_id", &self.metadata.video_id)?;
            map.serialize_entry("title", &self.metadata.title)?;
            map.serialize_entry("length_seconds", &self.metadata.length_seconds)?;
        }

        map.serialize_entry("streams", &self.streams)?;

        map.end()
    }
}

#[derive(Debug)]
struct StreamSerializer {
    pub output_level: OutputLevel,
    pub stream: StreamDescriptor,
}

impl StreamSerializer {
    fn line(&self) -> String {
        let stream = &self.stream;
        let mut columns = vec![format!("{:>4}", stream.itag), format!("{:<11}", stream.mime_type)];

        if self.output_level.contains(OutputLevel::GENERAL) {
            let kind = if stream.is_muxed() {
                "video+audio"
            } else if stream.has_video {
                "video only"
            } else {
                "audio only"
            };
            columns.push(format!("{kind:<11}"));
        }
        if self.output_level.contains(OutputLevel::VIDEO_TRACK) {
            columns.push(format!(
                "{:<8}",
                stream.quality_label.clone().unwrap_or_default()
            ));
        }
        if self.output_level.contains(OutputLevel::AUDIO_TRACK) {
            columns.push(format!(
                "{:>9}",
                stream
                    .audio_bitrate
                    .map(|x| format!("{x}kbps"))
                    .unwrap_or_default()
            ));
        }
        if self.output_level.contains(OutputLevel::SIZE) {
            columns.push(human_size(stream.estimated_size()));
        }
        if self.output_level.contains(OutputLevel::VERBOSE) {
            columns.push(stream.codecs.join(", "));
        }

        columns.join("  ")
    }
}

impl Serialize for StreamSerializer {
    fn serialize<S>(&self, serializer: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        macro_rules! partly_serialize {
            ($self:ident, $map:ident; $($level:expr => { $($field:ident $(with $func:ident)?),* $(,)? })*) => {
                $(
                    if self.output_level.contains($level) {
                        $(
                            $map.serialize_entry(
                                stringify!($field),
                                &partly_serialize!{ @__ser($self.stream.$field $(=> $func)?) }
                            )?;
                        )*
                    }
                )*
            };
            (@__ser($field:expr)) => { $field };
            (@__ser($field:expr => $func:ident)) => { $func(&$field) };
        }

        let mut map = serializer.serialize_map(None)?;

        partly_serialize!(self, map;
            OutputLevel::GENERAL => {
                itag, mime_type, container, has_video, has_audio, approx_duration_ms
            }

            OutputLevel::VIDEO_TRACK => {
                height, width, quality_label, fps
            }
            OutputLevel::VIDEO_TRACK | OutputLevel::VERBOSE => {
                codecs,
            }

            OutputLevel::AUDIO_TRACK => {
                audio_bitrate, bitrate, audio_sample_rate, audio_channels
            }

            OutputLevel::SIZE => {
                content_length
            }

            OutputLevel::all() => {
                is_live, is_hls, is_dash_mpd
            }
        );

        if self.output_level.contains(OutputLevel::SIZE) {
            map.serialize_entry("estimated_size", &human_size(self.stream.estimated_size()))?;
        }

        map.end()
    }
}
