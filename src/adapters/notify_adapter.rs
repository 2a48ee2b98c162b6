//! Notifier adapters: console and append-only file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::error::SignalError;
use crate::ports::notify_port::Notifier;

/// Prints each message to stdout, separated by a blank line.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn send(&self, message: &str) -> Result<(), SignalError> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}\n", message).map_err(|e| SignalError::Notify {
            reason: format!("stdout: {}", e),
        })
    }
}

/// Appends each message to a file, creating it and its parent directories
/// on first use.
#[derive(Debug)]
pub struct FileNotifier {
    path: PathBuf,
}

impl FileNotifier {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}\n", message)
    }
}

impl Notifier for FileNotifier {
    fn send(&self, message: &str) -> Result<(), SignalError> {
        self.append(message).map_err(|e| SignalError::Notify {
            reason: format!("{}: {}", self.path.display(), e),
        })
    }
}
