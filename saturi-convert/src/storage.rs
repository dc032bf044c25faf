//! Local storage for file-delivered audio.
//!
//! Files are written once under the output directory and served back at
//! `/audio/<file name>`. When a retention window is configured, expired files
//! are pruned after every write.

use saturi_common::config::Config;
use saturi_common::error::Error;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// URL path prefix that stored files are served under.
pub const AUDIO_ROUTE_PREFIX: &str = "/audio";

/// Extension of stored audio files.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Message returned when a requested file name is not a stored audio name.
pub const INVALID_AUDIO_NAME_MESSAGE: &str = "잘못된 오디오 파일 이름입니다.";

/// A file written by [`AudioStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    /// Bare file name
    pub file_name: String,
    /// Full path on disk
    pub path: PathBuf,
    /// Relative URL the file is served at
    pub url: String,
}

/// Directory-backed audio store.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    retention: Option<Duration>,
}

impl AudioStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, retention: Option<Duration>) -> Self {
        Self {
            dir: dir.into(),
            retention,
        }
    }

    /// Create a store from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.audio_output_dir.clone(), config.audio_retention)
    }

    /// Generate a fresh file name: `speech-<unix millis>-<8 hex>.mp3`.
    ///
    /// The random suffix keeps names distinct within the same millisecond.
    pub fn unique_file_name() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let suffix = Uuid::new_v4().simple().to_string();
        format!("speech-{}-{}.{}", millis, &suffix[..8], AUDIO_EXTENSION)
    }

    /// Whether `name` is a bare stored-audio file name (no directories, no traversal).
    pub fn is_valid_file_name(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !name.contains("..")
            && Path::new(name).extension().and_then(|e| e.to_str()) == Some(AUDIO_EXTENSION)
    }

    /// Public URL for a stored file name.
    pub fn url_for(file_name: &str) -> String {
        format!("{}/{}", AUDIO_ROUTE_PREFIX, file_name)
    }

    /// Write `bytes` to a new uniquely named file, creating the directory if needed.
    ///
    /// # Errors
    /// Returns `Error::Io` if the directory or file cannot be written.
    pub async fn save(&self, bytes: &[u8]) -> Result<StoredAudio, Error> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = Self::unique_file_name();
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;

        info!(path = %path.display(), bytes = bytes.len(), "Saved audio to local file");

        if let Some(retention) = self.retention {
            match self.prune_older_than(retention, Some(&file_name)).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Pruned expired audio files"),
                Err(e) => warn!(error = %e, "Failed to prune expired audio files"),
            }
        }

        Ok(StoredAudio {
            url: Self::url_for(&file_name),
            file_name,
            path,
        })
    }

    /// Read a stored file by name.
    ///
    /// Returns `Ok(None)` if no such file exists.
    ///
    /// # Errors
    /// Returns `Error::Validation` for names that are not bare audio file names,
    /// and `Error::Io` for other read failures.
    pub async fn read(&self, file_name: &str) -> Result<Option<Vec<u8>>, Error> {
        if !Self::is_valid_file_name(file_name) {
            return Err(Error::validation(INVALID_AUDIO_NAME_MESSAGE));
        }

        match tokio::fs::read(self.dir.join(file_name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove stored audio files whose age is at least `retention`.
    ///
    /// `keep` is never removed. Per-file failures are logged and skipped.
    /// Returns the number of files removed.
    pub async fn prune_older_than(
        &self,
        retention: Duration,
        keep: Option<&str>,
    ) -> Result<usize, Error> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if Some(name) == keep || !Self::is_valid_file_name(name) {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                Ok(_) => continue,
                Err(e) => {
                    warn!(file = %name, error = %e, "Failed to stat audio file");
                    continue;
                }
            };

            let expired = metadata
                .modified()
                .ok()
                .and_then(|modified| modified.elapsed().ok())
                .is_some_and(|age| age >= retention);
            if !expired {
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => {
                    debug!(file = %name, "Removed expired audio file");
                    removed += 1;
                }
                Err(e) => warn!(file = %name, error = %e, "Failed to remove audio file"),
            }
        }

        Ok(removed)
    }
}
