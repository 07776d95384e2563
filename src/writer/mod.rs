mod config;
mod scan;
mod size;
mod time;

pub use config::{ArchiveKind, RollInterval, RollingKind};
pub use scan::list_regular;
pub use size::SizeRolling;
pub use time::{Clock, SystemClock, TimeRolling};

use crate::error::{Result, WriterError};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Delimiter between the original filename and a history tail.
const TAIL_DELIMITER: char = '.';

const FILE_MODE: u32 = 0o666;
const DIRECTORY_MODE: u32 = 0o767;

/// The writer state a policy may consult when deciding whether to roll.
pub struct ActiveState<'a> {
    /// Caller-supplied base filename, without directory
    pub original_name: &'a str,
    /// Filename currently open for append
    pub current_name: &'a str,
    /// Bytes written to the current file since it was opened
    pub current_size: u64,
}

/// Capability set implemented by each rolling strategy.
///
/// The writer skeleton dispatches through this surface and never branches
/// on the concrete policy kind.
pub trait RollPolicy {
    /// Rolling mode tag, for diagnostics.
    fn kind(&self) -> RollingKind;

    /// Whether the writer should switch to a fresh file before the next
    /// append. Pure query; no side effects.
    fn needs_roll(&self, active: &ActiveState<'_>) -> Result<bool>;

    /// Whether `tail` (the part after `original_name` and the delimiter)
    /// conforms to this policy's tail grammar.
    fn is_valid_tail(&self, tail: &str) -> bool;

    /// Orders valid tails ascending by recorded creation order.
    fn sort_tails(&self, tails: &mut [String]);

    /// The tail to attach when renaming the current file into history.
    /// `None` means the current name already carries its tail and no rename
    /// happens. `last_tail` is `""` when history is empty.
    fn next_tail(&self, last_tail: &str) -> Option<String>;

    /// The filename to open as the new current file.
    fn active_name(&self, original_name: &str) -> String;
}

/// Splits `name` into the history tail following `original` and the
/// delimiter, if it has one.
pub(crate) fn split_tail<'a>(name: &'a str, original: &str) -> Option<&'a str> {
    name.strip_prefix(original)?.strip_prefix(TAIL_DELIMITER)
}

/// Writes received bytes to a file until the rolling policy fires. The
/// current log file is then rotated out and writing continues into a fresh
/// one, keeping at most `max_rolls` historical files on disk.
///
/// One instance owns one logical log path within a process; nothing guards
/// against concurrent writers across processes.
#[derive(Debug)]
pub struct RollingWriter<P> {
    original_name: String,
    current_name: String,
    dir_path: PathBuf,
    current_file: Option<File>,
    current_size: u64,
    archive: ArchiveKind,
    archive_path: PathBuf,
    max_rolls: usize,
    policy: P,
}

impl RollingWriter<SizeRolling> {
    /// Writer that rolls when the live file reaches `max_file_size` bytes.
    pub fn size(path: impl AsRef<Path>, max_file_size: u64, max_rolls: usize) -> Result<Self> {
        Self::new(path, SizeRolling::new(max_file_size), max_rolls)
    }
}

impl RollingWriter<TimeRolling> {
    /// Writer that rolls when the formatted timestamp tail changes, subject
    /// to `interval`.
    pub fn time(
        path: impl AsRef<Path>,
        pattern: impl Into<String>,
        interval: RollInterval,
        max_rolls: usize,
    ) -> Result<Self> {
        Self::new(path, TimeRolling::new(pattern, interval), max_rolls)
    }
}

impl<C: Clock> RollingWriter<TimeRolling<C>> {
    /// Like [`RollingWriter::time`], reading "now" from a caller-supplied
    /// clock.
    pub fn time_with_clock(
        path: impl AsRef<Path>,
        pattern: impl Into<String>,
        interval: RollInterval,
        max_rolls: usize,
        clock: C,
    ) -> Result<Self> {
        Self::new(path, TimeRolling::with_clock(pattern, interval, clock), max_rolls)
    }
}

impl<P: RollPolicy> RollingWriter<P> {
    /// Creates a writer for the logical log at `path`, rolled by `policy`.
    ///
    /// The directory part of `path` holds the live file and its history;
    /// a bare filename means the current directory. Nothing is opened until
    /// the first append. `max_rolls == 0` disables history pruning.
    pub fn new(path: impl AsRef<Path>, policy: P, max_rolls: usize) -> Result<Self> {
        let path = path.as_ref();
        let original_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| WriterError::InvalidPath(path.display().to_string()))?
            .to_string();
        let dir_path = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self {
            current_name: original_name.clone(),
            original_name,
            dir_path,
            current_file: None,
            current_size: 0,
            archive: ArchiveKind::None,
            archive_path: PathBuf::new(),
            max_rolls,
            policy,
        })
    }

    /// Sets the reserved archive hook. Retention currently deletes rotated
    /// files regardless of the configured kind.
    pub fn with_archive(mut self, kind: ArchiveKind, path: impl Into<PathBuf>) -> Self {
        self.archive = kind;
        self.archive_path = path.into();
        self
    }

    /// Bytes written to the current file since it was opened or created.
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// The filename currently receiving appends.
    pub fn current_name(&self) -> &str {
        &self.current_name
    }

    /// Appends `bytes` to the logical log, rolling the underlying file
    /// first if the policy requires it. Returns the count reported by the
    /// underlying write.
    pub fn append(&mut self, bytes: &[u8]) -> Result<usize> {
        if self.current_file.is_none() {
            self.open_active()?;
        }

        if self.policy.needs_roll(&self.active_state())? {
            self.roll()?;
        }

        // open_active ran on this call or roll just reopened the file
        let file = self.current_file.as_mut().unwrap();
        let written = file.write(bytes)?;
        self.current_size += written as u64;
        Ok(written)
    }

    /// Closes the current file, if any. Closing an already-closed writer is
    /// a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(file) = self.current_file.take() {
            file.sync_all()?;
        }
        Ok(())
    }

    fn active_state(&self) -> ActiveState<'_> {
        ActiveState {
            original_name: &self.original_name,
            current_name: &self.current_name,
            current_size: self.current_size,
        }
    }

    /// Rotates the current file out: close, snapshot history, optionally
    /// rename, prune, reopen.
    fn roll(&mut self) -> Result<()> {
        // The handle must not outlive the name it was opened under.
        if let Some(file) = self.current_file.take() {
            file.sync_all()?;
        }

        let mut history = self.sorted_history()?;
        let last_tail = history
            .last()
            .and_then(|name| split_tail(name, &self.original_name))
            .unwrap_or_default()
            .to_string();

        match self.policy.next_tail(&last_tail) {
            Some(tail) => {
                let history_name = format!("{}{}{}", self.current_name, TAIL_DELIMITER, tail);
                fs::rename(
                    self.dir_path.join(&self.current_name),
                    self.dir_path.join(&history_name),
                )?;
                debug!(
                    from = %self.current_name,
                    to = %history_name,
                    "rotated current file into history"
                );
                history.push(history_name);
            }
            // The tail already lives in the current name; it joins history
            // under the name it has, so pruning counts it.
            None => history.push(self.current_name.clone()),
        }

        self.prune(&history)?;
        self.open_active()
    }

    /// The rotated files for this log, sorted ascending by tail, current
    /// file excluded.
    fn sorted_history(&self) -> Result<Vec<String>> {
        let prefix = format!("{}{}", self.original_name, TAIL_DELIMITER);
        let keep = |name: &str| name != self.current_name && name.starts_with(&prefix);
        let names = list_regular(&self.dir_path, Some(&keep), true)?;

        let mut tails: Vec<String> = names
            .iter()
            .filter_map(|name| split_tail(name, &self.original_name))
            .filter(|tail| self.policy.is_valid_tail(tail))
            .map(str::to_string)
            .collect();
        self.policy.sort_tails(&mut tails);

        Ok(tails
            .into_iter()
            .map(|tail| format!("{prefix}{tail}"))
            .collect())
    }

    /// Deletes the oldest history entries past the retention bound.
    /// `max_rolls == 0` keeps everything.
    fn prune(&self, history: &[String]) -> Result<()> {
        if self.max_rolls == 0 {
            return Ok(());
        }

        let excess = history.len().saturating_sub(self.max_rolls);
        for name in &history[..excess] {
            let path = self.dir_path.join(name);
            info!("deleting {}", path.display());
            match fs::remove_file(&path) {
                Ok(()) => {}
                // Another actor may have removed it already.
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Creates the directory if needed and opens the policy's live file for
    /// append, creating it if absent. `current_size` starts at the on-disk
    /// size of the opened file.
    fn open_active(&mut self) -> Result<()> {
        fs::DirBuilder::new()
            .recursive(true)
            .mode(DIRECTORY_MODE)
            .create(&self.dir_path)
            .map_err(|source| WriterError::CannotOpen {
                path: self.dir_path.clone(),
                source,
            })?;

        self.current_name = self.policy.active_name(&self.original_name);
        let path = self.dir_path.join(&self.current_name);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .mode(FILE_MODE)
            .open(&path)
            .map_err(|source| WriterError::CannotOpen {
                path: path.clone(),
                source,
            })?;

        self.current_size = file.metadata()?.len();
        self.current_file = Some(file);
        Ok(())
    }
}

impl<P: RollPolicy> Write for RollingWriter<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.current_file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<P: RollPolicy + fmt::Display> fmt::Display for RollingWriter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rolling file writer (by {}): file: {}, archive: {}, archive file: {}, max rolls: {}, {}",
            self.policy.kind(),
            self.current_name,
            self.archive,
            self.archive_path.display(),
            self.max_rolls,
            self.policy,
        )
    }
}
