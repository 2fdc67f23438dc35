use std::cmp::Ordering;

use crate::structs::{DownloadError, Selection, StreamDescriptor};

/// Streams picked for one download
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub primary: StreamDescriptor,
    /// Audio track muxed into a video-only `primary`
    pub companion_audio: Option<StreamDescriptor>,
}

impl Choice {
    pub fn estimated_size(&self) -> Option<u64> {
        let primary = self.primary.estimated_size()?;

        match &self.companion_audio {
            Some(audio) => Some(primary + audio.estimated_size().unwrap_or(0)),
            None => Some(primary),
        }
    }
}

/// Compare by each key in turn, bigger keys first
pub fn sort_streams_by<F>(a: &StreamDescriptor, b: &StreamDescriptor, sort_by: &[F]) -> Ordering
where
    F: Fn(&StreamDescriptor) -> u64,
{
    for func in sort_by {
        let res = func(b).cmp(&func(a));

        if res != Ordering::Equal {
            return res;
        }
    }

    Ordering::Equal
}

pub fn sort_streams_by_resolution(a: &StreamDescriptor, b: &StreamDescriptor) -> Ordering {
    sort_streams_by(
        a,
        b,
        &[
            |form: &StreamDescriptor| form.resolution().unwrap_or(0),
            |form: &StreamDescriptor| form.is_muxed() as u64,
            |form: &StreamDescriptor| form.fps.unwrap_or(0),
            |form: &StreamDescriptor| form.bitrate,
        ],
    )
}

pub fn sort_streams_by_video(a: &StreamDescriptor, b: &StreamDescriptor) -> Ordering {
    sort_streams_by(
        a,
        b,
        &[
            // A file with sound beats a silent one of the same height
            |form: &StreamDescriptor| form.is_muxed() as u64,
            |form: &StreamDescriptor| form.fps.unwrap_or(0),
            |form: &StreamDescriptor| form.bitrate,
        ],
    )
}

pub fn sort_streams_by_audio(a: &StreamDescriptor, b: &StreamDescriptor) -> Ordering {
    sort_streams_by(
        a,
        b,
        &[
            |form: &StreamDescriptor| form.audio_bitrate.unwrap_or(0),
            |form: &StreamDescriptor| form.bitrate,
        ],
    )
}

/// Try to get the stream matching `selection`
///
/// - [`Selection::Resolution`]: exact match on the listed resolution, muxed streams first, then bitrate
/// - [`Selection::AudioOnly`]: highest bitrate audio-only stream
/// - [`Selection::Best`]: tallest video stream
pub fn choose_stream(
    streams: &[StreamDescriptor],
    selection: Selection,
) -> Result<StreamDescriptor, DownloadError> {
    let mut candidates = streams
        .iter()
        .filter(|x| x.is_selectable())
        .cloned()
        .collect::<Vec<_>>();

    match selection {
        Selection::Best => {
            candidates.retain(|x| x.has_video);
            candidates.sort_by(sort_streams_by_resolution);
        }
        Selection::Resolution(height) => {
            candidates.retain(|x| x.resolution() == Some(height));
            candidates.sort_by(sort_streams_by_video);
        }
        Selection::AudioOnly => {
            candidates.retain(|x| x.is_audio_only());
            candidates.sort_by(sort_streams_by_audio);
        }
    }

    candidates
        .into_iter()
        .next()
        .ok_or(DownloadError::NotFound(selection))
}

/// [`choose_stream`], plus the best audio-only stream when the pick is video-only and `merge_audio` is set
pub fn choose_streams(
    streams: &[StreamDescriptor],
    selection: Selection,
    merge_audio: bool,
) -> Result<Choice, DownloadError> {
    let primary = choose_stream(streams, selection)?;

    let companion_audio = if merge_audio && primary.is_video_only() {
        choose_stream(streams, Selection::AudioOnly).ok()
    } else {
        None
    };

    Ok(Choice {
        primary,
        companion_audio,
    })
}
