use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::constants::PART_EXTENSION;

/// A file that only exists until it is committed.
///
/// Dropping an uncommitted `PartFile` removes it from disk, so a failed or
/// interrupted download never leaves partial data behind.
#[derive(Debug)]
pub struct PartFile {
    path: PathBuf,
    committed: bool,
}

impl PartFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            committed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (or truncate) the file for writing
    pub fn create(&self) -> io::Result<File> {
        File::create(&self.path)
    }

    /// Move the file onto `destination`, replacing whatever is there
    pub fn commit(mut self, destination: &Path) -> io::Result<()> {
        fs::rename(&self.path, destination)?;
        self.committed = true;

        debug!("{} -> {}", self.path.display(), destination.display());

        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }

        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("Cannot remove {}: {err}", self.path.display()),
        }
    }
}

/// `dir/name.mp4` + `part` -> `dir/name.mp4.part`
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);

    PathBuf::from(name)
}

/// `dir/name.mp4` + `merge` -> `dir/name.merge.part.mp4`.
///
/// The extension is kept last so ffmpeg can infer the output format from it.
pub fn stage_path(output: &Path, stage: &str) -> PathBuf {
    let mut name: OsString = output.file_stem().unwrap_or_default().to_owned();
    name.push(".");
    name.push(stage);
    name.push(".");
    name.push(PART_EXTENSION);

    if let Some(extension) = output.extension() {
        name.push(".");
        name.push(extension);
    }

    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn uncommitted_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.mp4.part");

        {
            let part = PartFile::new(&path);
            part.create().unwrap().write_all(b"partial").unwrap();
            assert!(path.exists());
        }

        assert!(!path.exists());
    }

    #[test]
    fn committed_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.mp4.part");
        let destination = dir.path().join("video.mp4");

        let part = PartFile::new(&path);
        part.create().unwrap().write_all(b"complete").unwrap();
        part.commit(&destination).unwrap();

        assert!(!path.exists());
        assert_eq!(fs::read(&destination).unwrap(), b"complete");
    }

    #[test]
    fn dropping_a_never_created_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        drop(PartFile::new(dir.path().join("nothing.part")));
    }

    #[test]
    fn paths() {
        assert_eq!(
            with_suffix(Path::new("out/a b.mp4"), "part"),
            PathBuf::from("out/a b.mp4.part")
        );
        assert_eq!(
            stage_path(Path::new("out/a b.mp4"), "merge"),
            PathBuf::from("out/a b.merge.part.mp4")
        );
        assert_eq!(
            stage_path(Path::new("noext"), "trim"),
            PathBuf::from("noext.trim.part")
        );
    }
}
