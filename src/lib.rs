//! Rolling file writer with size- and time-based rotation
//!
//! This crate provides a synchronous byte sink addressed to a single logical
//! log file. Writes transparently migrate across a succession of on-disk
//! files driven by a rolling policy, while a bounded retention window of
//! historical files is kept alongside the live one.
//!
//! ## Usage
//!
//! ```no_run
//! use rolling_log_writer::{RollInterval, RollingWriter};
//! use std::io::Write;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Roll at 10 MB, keep the 5 most recent history files
//! // (a.log, a.log.1, a.log.2, ...).
//! let mut log = RollingWriter::size("/var/log/myapp/a.log", 10 * 1024 * 1024, 5)?;
//! log.append(b"hello\n")?;
//!
//! // Or roll daily into timestamp-named files (a.log.02Aug26, ...);
//! // any byte stream can be wired through the io::Write impl.
//! let mut daily = RollingWriter::time("/var/log/myapp/a.log", "%d%b%y", RollInterval::Daily, 7)?;
//! writeln!(daily, "hello")?;
//! # Ok(())
//! # }
//! ```

mod error;
mod writer;

pub use error::{Result, WriterError};
pub use writer::{
    list_regular, ActiveState, ArchiveKind, Clock, RollInterval, RollPolicy, RollingKind,
    RollingWriter, SizeRolling, SystemClock, TimeRolling,
};
