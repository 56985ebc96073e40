//! File writer for the logger

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// Shared log file handle.
///
/// Writes that fail (disk full, file removed) fall back to stderr so that
/// log lines are never silently dropped.
#[derive(Clone)]
pub struct LogFileWriter {
    file: Arc<Mutex<File>>,
}

impl LogFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(config.append)
            .truncate(!config.append)
            .open(&config.path)?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }
}

/// Per-event writer handed out to tracing-subscriber
pub struct LogFileGuard {
    file: Arc<Mutex<File>>,
}

impl Write for LogFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = match self.file.lock() {
            Ok(mut file) => file.write_all(buf),
            Err(_) => Err(io::Error::other("log file lock poisoned")),
        };
        if result.is_err() {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}
