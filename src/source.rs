use std::io::Write;
use std::sync::Arc;

use log::{debug, trace};
use rusty_ytdl::blocking::Video;
use rusty_ytdl::{VideoError, VideoFormat, VideoOptions, VideoQuality, VideoSearchOptions};

use crate::progress::Progress;
use crate::structs::{DownloadError, StreamDescriptor, VideoMetadata, VideoReference};

/// Where stream lists and stream bytes come from.
///
/// [`YoutubeSource`] is the real thing; anything else implementing this can stand in for it.
pub trait StreamSource {
    /// Query the video's details and every stream it offers
    fn probe(&self, reference: &VideoReference) -> Result<VideoMetadata, DownloadError>;

    /// Write all bytes of `stream` into `sink`, reporting each chunk to `progress`.
    ///
    /// Returns the number of bytes written.
    fn fetch(
        &self,
        reference: &VideoReference,
        stream: &StreamDescriptor,
        sink: &mut dyn Write,
        progress: &dyn Progress,
    ) -> Result<u64, DownloadError>;
}

/// [`StreamSource`] backed by the blocking API of `rusty_ytdl`
#[derive(Debug, Clone, Default)]
pub struct YoutubeSource;

impl YoutubeSource {
    pub fn new() -> Self {
        Self
    }

    /// Options that make `rusty_ytdl` pick exactly the format with `itag`
    fn options_for_itag(itag: u64) -> VideoOptions {
        let filter = VideoSearchOptions::Custom(Arc::new(move |format: &VideoFormat| {
            format.itag == itag
        }));

        VideoOptions {
            quality: VideoQuality::Custom(
                filter.clone(),
                Arc::new(|a: &VideoFormat, b: &VideoFormat| b.bitrate.cmp(&a.bitrate)),
            ),
            filter,
            ..Default::default()
        }
    }
}

impl StreamSource for YoutubeSource {
    fn probe(&self, reference: &VideoReference) -> Result<VideoMetadata, DownloadError> {
        debug!("Querying streams of {reference}");

        let video = Video::new(reference.watch_url())?;
        let info = video.get_info()?;

        let streams = info
            .formats
            .iter()
            .map(StreamDescriptor::from)
            .collect::<Vec<_>>();

        debug!("{} offers {} streams", reference.id(), streams.len());

        Ok(VideoMetadata {
            video_id: info.video_details.video_id.clone(),
            title: info.video_details.title.clone(),
            length_seconds: info.video_details.length_seconds.parse().unwrap_or(0),
            streams,
        })
    }

    fn fetch(
        &self,
        reference: &VideoReference,
        stream: &StreamDescriptor,
        sink: &mut dyn Write,
        progress: &dyn Progress,
    ) -> Result<u64, DownloadError> {
        debug!("Fetching {stream} of {reference}");

        let video = Video::new_with_options(reference.watch_url(), Self::options_for_itag(stream.itag))?;
        let byte_stream = video.stream()?;

        let mut written = 0_u64;

        while let Some(chunk) = byte_stream.chunk()? {
            sink.write_all(&chunk)?;

            written += chunk.len() as u64;
            progress.advance(chunk.len() as u64);
            trace!("{written} bytes of itag {} written", stream.itag);
        }

        sink.flush()?;

        Ok(written)
    }
}

impl From<VideoError> for DownloadError {
    fn from(value: VideoError) -> Self {
        match value {
            VideoError::VideoNotFound | VideoError::VideoIsPrivate => {
                DownloadError::Unavailable(value.to_string())
            }
            other => DownloadError::network(other),
        }
    }
}

impl From<&VideoFormat> for StreamDescriptor {
    fn from(value: &VideoFormat) -> Self {
        Self {
            itag: value.itag,
            mime_type: value.mime_type.mime.essence_str().to_string(),
            container: value.mime_type.container.clone(),
            codecs: value.mime_type.codecs.clone(),
            has_video: value.has_video,
            has_audio: value.has_audio,
            width: value.width,
            height: value.height,
            quality_label: value.quality_label.clone(),
            fps: value.fps,
            bitrate: value.bitrate,
            audio_bitrate: value.audio_bitrate,
            audio_sample_rate: value.audio_sample_rate.clone(),
            audio_channels: value.audio_channels,
            content_length: value
                .content_length
                .as_deref()
                .and_then(|x| x.parse::<u64>().ok()),
            approx_duration_ms: value
                .approx_duration_ms
                .as_deref()
                .and_then(|x| x.parse::<u64>().ok()),
            is_live: value.is_live,
            is_hls: value.is_hls,
            is_dash_mpd: value.is_dash_mpd,
        }
    }
}
