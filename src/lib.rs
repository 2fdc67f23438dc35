//! Download YouTube videos, or just their audio, at a chosen resolution.
//!
//! Stream lists and bytes come from [`rusty_ytdl`]; this crate validates the
//! link, picks the stream, writes exactly one file and optionally hands it to
//! ffmpeg for merging, MP3 conversion or trimming.
//!
//! ```ignore
//! use yt_downloader::{Downloader, DownloadOptions, NoProgress, Selection};
//!
//! let downloader = Downloader::new(DownloadOptions {
//!     selection: Selection::Resolution(720),
//!     ..Default::default()
//! });
//!
//! let downloaded = downloader.download("https://www.youtube.com/watch?v=FZ8BxMU3BYc", &NoProgress)?;
//! println!("{}", downloaded.path.display());
//! ```
pub mod constants;
pub mod download;
pub mod estimate;
pub mod ffmpeg;
pub mod history;
pub mod part;
pub mod progress;
pub mod selector;
pub mod source;
pub mod structs;
pub mod utils;

pub use download::{output_extension, Downloaded, Downloader};
pub use estimate::{probe_bandwidth, Estimate};
pub use ffmpeg::Ffmpeg;
pub use history::{History, HistoryEntry};
pub use progress::{NoProgress, Progress};
pub use selector::{choose_stream, choose_streams, Choice};
pub use source::{StreamSource, YoutubeSource};
pub use structs::{
    DownloadError, DownloadOptions, Selection, StreamDescriptor, TrimRange, VideoMetadata,
    VideoReference,
};
pub use utils::{get_video_id, human_size, sanitize_filename};
