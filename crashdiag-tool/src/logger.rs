use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

/// Severity of a single run-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Verbose,
}

impl Severity {
    fn tag(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Verbose => "VERBOSE",
        }
    }

    /// Pure severity-to-style mapping for console output; no terminal state
    /// is mutated between calls.
    fn style(self) -> &'static str {
        match self {
            Severity::Info => "\x1b[0m",
            Severity::Warn => "\x1b[33m",
            Severity::Error => "\x1b[31m",
            Severity::Verbose => "\x1b[90m",
        }
    }
}

/// Writes timestamped, severity-tagged lines to the console and appends them
/// to a dated on-disk log file, opening and closing the file on every call.
///
/// Failures inside the logger are surfaced on stderr and otherwise ignored:
/// logging must never abort the run it is observing.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: PathBuf) -> Self {
        RunLog { path }
    }

    /// On-disk location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, msg: &str) {
        self.write_line(Severity::Info, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.write_line(Severity::Warn, msg);
    }

    pub fn error(&self, msg: &str) {
        self.write_line(Severity::Error, msg);
    }

    /// Debug builds only; release builds drop verbose lines entirely.
    pub fn verbose(&self, msg: &str) {
        if cfg!(debug_assertions) {
            self.write_line(Severity::Verbose, msg);
        }
    }

    fn write_line(&self, severity: Severity, msg: &str) {
        let line = format!(
            "{} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            severity.tag(),
            msg
        );
        println!("{}{}\x1b[0m", severity.style(), line);
        if let Err(err) = self.append(&line) {
            eprintln!("run log append failed: {err}");
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        file.flush()
    }
}
