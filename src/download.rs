use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::constants::PART_EXTENSION;
use crate::estimate::{probe_bandwidth, Estimate};
use crate::ffmpeg::Ffmpeg;
use crate::part::{stage_path, with_suffix, PartFile};
use crate::progress::Progress;
use crate::selector::{choose_streams, Choice};
use crate::source::{StreamSource, YoutubeSource};
use crate::structs::{
    DownloadError, DownloadOptions, StreamDescriptor, VideoMetadata, VideoReference,
};
use crate::utils::sanitize_filename;

/// Result of a successful download
#[derive(Debug, Clone, PartialEq)]
pub struct Downloaded {
    /// The written file
    pub path: PathBuf,
    pub title: String,
    pub choice: Choice,
    /// Size of the written file in bytes
    pub size: u64,
}

/// Fetches one video per call and writes it to a single file
#[derive(Debug, Clone)]
pub struct Downloader<S = YoutubeSource> {
    source: S,
    options: DownloadOptions,
}

impl Downloader<YoutubeSource> {
    /// Create a [`Downloader`] backed by YouTube
    pub fn new(options: DownloadOptions) -> Self {
        Self::with_source(YoutubeSource::new(), options)
    }
}

impl<S: StreamSource> Downloader<S> {
    /// Create a [`Downloader`] reading from a custom [`StreamSource`]
    pub fn with_source(source: S, options: DownloadOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Validate `url` and query every stream the video offers
    pub fn query(&self, url: &str) -> Result<(VideoReference, VideoMetadata), DownloadError> {
        let reference = VideoReference::parse(url)?;
        let metadata = self.source.probe(&reference)?;

        Ok((reference, metadata))
    }

    /// Streams the configured selection resolves to for `metadata`.
    ///
    /// The companion audio track is dropped when ffmpeg is not available to merge it.
    pub fn choose(&self, metadata: &VideoMetadata) -> Result<Choice, DownloadError> {
        let mut choice = choose_streams(
            &metadata.streams,
            self.options.selection,
            self.options.merge_audio,
        )?;

        if choice.companion_audio.is_some() {
            let ffmpeg = Ffmpeg::new(&self.options.ffmpeg);

            if !ffmpeg.is_available() {
                warn!(
                    "{} not found, keeping the video without an audio track",
                    ffmpeg.program().display()
                );
                choice.companion_audio = None;
            }
        }

        Ok(choice)
    }

    /// Size and transfer time of what [`Downloader::download`] would fetch, measuring bandwidth on the way
    pub fn estimate(&self, url: &str) -> Result<Estimate, DownloadError> {
        let (_, metadata) = self.query(url)?;
        let choice = self.choose(&metadata)?;

        Ok(Estimate::new(choice.estimated_size(), probe_bandwidth()))
    }

    /// Download `url` according to the options and return where the file was written.
    ///
    /// At most one file is created. Nothing is written when the URL is invalid, no
    /// stream matches or the output file already exists (unless `overwrite` is set),
    /// and partial data is removed when the transfer or post-processing fails.
    pub fn download(&self, url: &str, progress: &dyn Progress) -> Result<Downloaded, DownloadError> {
        let (reference, metadata) = self.query(url)?;
        let choice = self.choose(&metadata)?;

        info!("Selected {} of {:?}", choice.primary, metadata.title);

        let ffmpeg = Ffmpeg::new(&self.options.ffmpeg);
        let convert_mp3 = self.options.convert_mp3 && choice.primary.is_audio_only();

        if self.options.convert_mp3 && !convert_mp3 {
            warn!("MP3 conversion only applies to audio-only downloads, skipping it");
        }

        if (convert_mp3 || self.options.trim.is_some()) && !ffmpeg.is_available() {
            return Err(DownloadError::Ffmpeg(format!(
                "{} not found, it is required for MP3 conversion and trimming",
                ffmpeg.program().display()
            )));
        }

        let output = self.output_path(&metadata, &choice, convert_mp3);

        if output.exists() && !self.options.overwrite {
            return Err(DownloadError::FileExists(output));
        }

        let needs_ffmpeg =
            choice.companion_audio.is_some() || convert_mp3 || self.options.trim.is_some();

        if needs_ffmpeg {
            let mut current = PartFile::new(with_suffix(
                &output,
                &format!("f{}.{PART_EXTENSION}", choice.primary.itag),
            ));
            self.fetch_into(&reference, &choice.primary, &current, progress)?;

            if let Some(audio) = &choice.companion_audio {
                let audio_part = PartFile::new(with_suffix(
                    &output,
                    &format!("f{}.{PART_EXTENSION}", audio.itag),
                ));
                self.fetch_into(&reference, audio, &audio_part, progress)?;

                let merged = PartFile::new(stage_path(&output, "merge"));
                ffmpeg.merge(current.path(), audio_part.path(), merged.path())?;
                current = merged;
            }

            if convert_mp3 {
                let converted = PartFile::new(stage_path(&output, "mp3"));
                ffmpeg.convert_mp3(current.path(), converted.path())?;
                current = converted;
            }

            if let Some(range) = &self.options.trim {
                let trimmed = PartFile::new(stage_path(&output, "trim"));
                ffmpeg.trim(current.path(), range, trimmed.path())?;
                current = trimmed;
            }

            current.commit(&output)?;
        } else {
            let part = PartFile::new(with_suffix(&output, PART_EXTENSION));
            self.fetch_into(&reference, &choice.primary, &part, progress)?;
            part.commit(&output)?;
        }

        let size = fs::metadata(&output)?.len();

        info!("Saved {} ({size} bytes)", output.display());

        Ok(Downloaded {
            path: output,
            title: metadata.title,
            choice,
            size,
        })
    }

    fn fetch_into(
        &self,
        reference: &VideoReference,
        stream: &StreamDescriptor,
        part: &PartFile,
        progress: &dyn Progress,
    ) -> Result<u64, DownloadError> {
        let mut writer = BufWriter::new(part.create()?);

        progress.start(&stream.to_string(), stream.estimated_size());
        let fetched = self.source.fetch(reference, stream, &mut writer, progress);
        progress.finish();

        let written = fetched?;
        writer.flush()?;

        if written == 0 {
            return Err(DownloadError::network(format!(
                "received no data for itag {}",
                stream.itag
            )));
        }

        debug!("{written} bytes written to {}", part.path().display());

        Ok(written)
    }

    /// Output folder joined with the user's file name, or with the sanitized title.
    ///
    /// A user name keeps its extension only when it is the one the download produces,
    /// otherwise the right one is appended (`Talk v1.2` -> `Talk v1.2.mp4`).
    fn output_path(&self, metadata: &VideoMetadata, choice: &Choice, convert_mp3: bool) -> PathBuf {
        let extension = output_extension(choice, convert_mp3);
        let dir = &self.options.output_dir;

        match &self.options.filename {
            Some(name)
                if name
                    .extension()
                    .is_some_and(|x| x.eq_ignore_ascii_case(&extension)) =>
            {
                dir.join(name)
            }
            Some(name) => with_suffix(&dir.join(name), &extension),
            None => {
                let mut stem = sanitize_filename(&metadata.title);
                if stem.is_empty() {
                    stem = sanitize_filename(&metadata.video_id);
                }

                dir.join(format!("{stem}.{extension}"))
            }
        }
    }
}

/// Extension of the final file
pub fn output_extension(choice: &Choice, convert_mp3: bool) -> String {
    if convert_mp3 {
        return "mp3".to_string();
    }

    match &choice.companion_audio {
        Some(audio) if audio.container == choice.primary.container => choice.primary.container.clone(),
        Some(_) => "mkv".to_string(),
        None => choice.primary.file_extension(),
    }
}
