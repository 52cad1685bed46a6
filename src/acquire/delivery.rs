use chrono::Utc;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::error::AcquireError;

/// How many neighbouring timestamps to try before giving up on a name
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Filename for a saved video: `douyin_video_<epoch-millis>.mp4`
pub fn artifact_filename(epoch_millis: i64) -> String {
    format!("douyin_video_{}.mp4", epoch_millis)
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Saves downloaded bytes into the download directory.
///
/// Bytes are first staged in a hidden temp file next to the destination and
/// then atomically renamed into place. The staging file is released on every
/// path: renamed on success, deleted on any error.
pub struct ArtifactSaver {
    dir: PathBuf,
    clock: fn() -> i64,
}

impl ArtifactSaver {
    /// Create a saver writing into `dir`
    pub fn new(dir: PathBuf) -> Self {
        ArtifactSaver {
            dir,
            clock: now_millis,
        }
    }

    /// Replace the millisecond clock used for filenames
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    #[cfg(test)]
    fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` to a fresh `douyin_video_<millis>.mp4` and return its path
    pub fn deliver(&self, bytes: &[u8]) -> Result<PathBuf, AcquireError> {
        fs::create_dir_all(&self.dir)?;

        let mut staged = tempfile::Builder::new()
            .prefix(".dylink-")
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;

        let base = (self.clock)();
        for offset in 0..MAX_NAME_ATTEMPTS {
            let target = self.dir.join(artifact_filename(base + offset));
            match staged.persist_noclobber(&target) {
                Ok(_) => {
                    log::debug!("Saved {} bytes to {:?}", bytes.len(), target);
                    return Ok(target);
                }
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    staged = e.file;
                }
                // e.file is dropped here, which deletes the staging file
                Err(e) => return Err(e.error.into()),
            }
        }

        Err(AcquireError::DeliveryFailure(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free filename near {}", artifact_filename(base)),
        )))
    }
}
