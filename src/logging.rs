//! Access log infrastructure.
//!
//! Provides `RotatingFileWriter`, a size-rotated file sink with numbered
//! backups, and `init` which installs the tracing subscriber: a console
//! layer for diagnostics plus a file layer that only receives events
//! carrying the `access` target.
//!
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{
    EnvFilter, Layer, filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::Config;

/// Appends to a log file and rotates it through numbered backups once a
/// write would push it past `max_bytes`.
///
/// Rotation drops the oldest backup (`<path>.<backups>`), shifts each
/// `<path>.<n>` to `<path>.<n + 1>`, renames the live file to `<path>.1`
/// and reopens a fresh live file. With `backups == 0` the live file is
/// truncated instead.
pub struct RotatingFileWriter {
    path: PathBuf,
    max_bytes: u64,
    backups: u32,
    file: File,
    written: u64,
}

impl RotatingFileWriter {
    /// Open (or create) the log file in append mode, creating the parent
    /// directory if needed. Picks up the size of an existing file so the
    /// rotation threshold holds across restarts.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backups: u32) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(RotatingFileWriter {
            path,
            max_bytes,
            backups,
            file,
            written,
        })
    }

    fn backup_path(&self, n: u32) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(format!(".{n}"));
        PathBuf::from(os)
    }

    /// Shift the backup chain up by one and reopen an empty live file.
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backups == 0 {
            self.file = File::create(&self.path)?;
        } else {
            let oldest = self.backup_path(self.backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for n in (1..self.backups).rev() {
                let from = self.backup_path(n);
                if from.exists() {
                    fs::rename(&from, self.backup_path(n + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
            self.file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        }
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A record larger than the threshold still lands whole in the
        // freshly rotated (empty) file, so only rotate a non-empty one.
        if self.max_bytes > 0
            && self.written > 0
            && self.written + buf.len() as u64 > self.max_bytes
        {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Initialize the logging system.
///
/// Installs two layers: a console layer honoring `RUST_LOG` (defaulting to
/// `info`), and the access log file layer writing
/// `<timestamp> <LEVEL> <message>` lines through a `RotatingFileWriter`.
/// Only events with target `access` reach the file.
pub fn init(config: &Config) -> anyhow::Result<()> {
    let writer =
        RotatingFileWriter::open(&config.log_path, config.log_max_bytes, config.log_backups)?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let access_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(writer))
        .with_filter(filter_fn(|meta| meta.target() == "access"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(access_layer)
        .init();

    Ok(())
}
