//! Rotating file appender with size-based rollover
//!
//! The active file is rolled over as soon as a write would push it past the
//! size limit. The old file is renamed to `<stem>-<timestamp><ext>`, using
//! UTC or local time for the timestamp. Backups beyond the configured count
//! or older than the configured age are removed; the survivors are
//! optionally gzip-compressed to `<backup>.gz`.

use super::file::create_parent_dir;
use super::target_path;
use crate::config::AppenderConfig;
use crate::core::{Appender, LoggerError, Result};
use chrono::{Local, NaiveDateTime, TimeDelta, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Prefix of a rotating file output target.
pub const ROTATE_PREFIX: &str = "rotate:/";

const MEGABYTE: u64 = 1024 * 1024;

/// Size limit used when the configuration leaves `maxSize` at zero
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// Rollover and retention settings
///
/// # Examples
///
/// ```
/// use logvin::appenders::RotationPolicy;
///
/// // 50 MB files, keep a week of at most 7 compressed backups
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(50)
///     .with_max_age_days(7)
///     .with_max_backups(7)
///     .with_compression(true);
///
/// assert_eq!(policy.max_bytes, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Roll over before the active file would exceed this many bytes
    pub max_bytes: u64,
    /// Remove backups older than this many days; 0 keeps them regardless of age
    pub max_age_days: u64,
    /// Keep at most this many backups; 0 keeps all
    pub max_backups: usize,
    /// Name backups after local time instead of UTC
    pub local_time: bool,
    /// Gzip backups after rollover
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_age_days: 0,
            max_backups: 0,
            local_time: false,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Size limit in megabytes; 0 selects [`DEFAULT_MAX_SIZE_MB`]
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        let megabytes = if megabytes == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            megabytes
        };
        self.max_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    /// Exact size limit in bytes
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

impl From<&AppenderConfig> for RotationPolicy {
    fn from(config: &AppenderConfig) -> Self {
        RotationPolicy::new()
            .with_max_size_mb(config.max_size)
            .with_max_age_days(config.max_age)
            .with_max_backups(config.max_backups)
            .with_local_time(config.local_time)
            .with_compression(config.compress)
    }
}

#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    time: NaiveDateTime,
    compressed: bool,
}

/// Size-rotated file appender
///
/// # Examples
///
/// ```no_run
/// use logvin::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size_mb(10).with_max_backups(3);
/// let appender = RotatingFileAppender::with_policy("App", "/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    name: String,
    base_path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
    /// Timestamp of the newest backup this appender produced
    last_backup: Option<NaiveDateTime>,
}

impl RotatingFileAppender {
    /// Build from a `rotate:/<path>` appender entry.
    pub fn from_config(config: &AppenderConfig) -> Result<Self> {
        let path = target_path(&config.output, ROTATE_PREFIX)?;
        Self::with_policy(config.name.clone(), path, RotationPolicy::from(config))
    }

    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn with_policy(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        policy: RotationPolicy,
    ) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        create_parent_dir(&base_path)?;

        let (file, current_size) = Self::open_active(&base_path)?;

        Ok(Self {
            name: name.into(),
            base_path,
            policy,
            file: Some(file),
            current_size,
            last_backup: None,
        })
    }

    fn open_active(path: &Path) -> Result<(File, u64)> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let file = options.open(path).map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
        })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Stem and extension (with its dot) of the active file name
    fn name_parts(&self) -> (String, String) {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("logvin")
            .to_string();
        let ext = self
            .base_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (stem, ext)
    }

    fn backup_path(&self, time: NaiveDateTime) -> PathBuf {
        let (stem, ext) = self.name_parts();
        self.base_path.with_file_name(format!(
            "{}-{}{}",
            stem,
            time.format(BACKUP_TIME_FORMAT),
            ext
        ))
    }

    /// Backup timestamp for now, strictly after the previous backup and not
    /// colliding with an existing file, so name order stays creation order
    fn next_backup_time(&self) -> NaiveDateTime {
        let step = TimeDelta::milliseconds(1);
        let mut time = self.policy.now();
        if let Some(last) = self.last_backup {
            if time <= last {
                time = last + step;
            }
        }
        loop {
            let candidate = self.backup_path(time);
            if !candidate.exists() && !compressed_path(&candidate).exists() {
                return time;
            }
            time += step;
        }
    }

    fn rotate(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.base_path.exists() {
            let time = self.next_backup_time();
            let backup = self.backup_path(time);
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rename to '{}': {}", backup.display(), e),
                )
            })?;
            self.last_backup = Some(time);
        }

        let (file, size) = Self::open_active(&self.base_path)?;
        self.file = Some(file);
        self.current_size = size;

        self.mill()
    }

    /// Existing backups, newest first
    fn backups(&self) -> Result<Vec<Backup>> {
        let dir = match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let (stem, ext) = self.name_parts();
        let prefix = format!("{}-", stem);

        let mut backups = Vec::new();
        for dir_entry in fs::read_dir(&dir)? {
            let dir_entry = dir_entry?;
            let file_name = dir_entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(rest) = file_name.strip_prefix(&prefix) else {
                continue;
            };
            let (rest, compressed) = match rest.strip_suffix(COMPRESS_SUFFIX) {
                Some(rest) => (rest, true),
                None => (rest, false),
            };
            let Some(stamp) = rest.strip_suffix(ext.as_str()) else {
                continue;
            };
            if let Ok(time) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) {
                backups.push(Backup {
                    path: dir_entry.path(),
                    time,
                    compressed,
                });
            }
        }

        backups.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(backups)
    }

    /// Apply retention and compression to the backups on disk
    fn mill(&self) -> Result<()> {
        let mut backups = self.backups()?;
        let mut expired = Vec::new();

        if self.policy.max_backups > 0 && backups.len() > self.policy.max_backups {
            expired.extend(backups.split_off(self.policy.max_backups));
        }

        if self.policy.max_age_days > 0 {
            let cutoff = i64::try_from(self.policy.max_age_days)
                .ok()
                .and_then(TimeDelta::try_days)
                .and_then(|age| self.policy.now().checked_sub_signed(age));
            if let Some(cutoff) = cutoff {
                let (old, keep): (Vec<Backup>, Vec<Backup>) =
                    backups.into_iter().partition(|b| b.time < cutoff);
                expired.extend(old);
                backups = keep;
            }
        }

        for backup in &expired {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[logvin] Failed to remove expired backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in backups.iter().filter(|b| !b.compressed) {
                compress_file(&backup.path)?;
            }
        }

        Ok(())
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let len = bytes.len() as u64;
        if len > self.policy.max_bytes {
            return Err(LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!(
                    "write length {} exceeds maximum file size {}",
                    len, self.policy.max_bytes
                ),
            ));
        }

        if self.current_size + len > self.policy.max_bytes || self.file.is_none() {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[logvin] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                if self.file.is_none() {
                    let (file, size) = Self::open_active(&self.base_path)?;
                    self.file = Some(file);
                    self.current_size = size;
                }
            }
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    "Writer not initialized",
                )
            })?;
        file.write_all(bytes).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += len;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

/// Gzip `path` into `<path>.gz`, removing the original only once the
/// compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    let gz_path = compressed_path(path);
    let mut temp_name = gz_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(temp_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!(
                "Failed to create temporary compressed file: {}",
                temp_gz_path.display()
            ),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let mut buffer = vec![0u8; 64 * 1024];
    let streamed: std::io::Result<()> = (|| {
        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            encoder.write_all(&buffer[..bytes_read])?;
        }
        encoder.finish()?.flush()
    })();

    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[logvin] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}
