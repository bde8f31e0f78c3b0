//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr, with a minimum level
//! applied to diagnostic messages. Access log lines are never filtered.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Severity of a diagnostic message, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_log_file(p)?))),
            None => Ok(fallback),
        }
    }

    fn write_line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

pub struct LogWriter {
    level: Level,
    access: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(level: Level, access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            level,
            access: LogTarget::open(access_log_file, LogTarget::Stdout)?,
            error: LogTarget::open(error_log_file, LogTarget::Stderr)?,
        })
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn write_access(&self, message: &str) {
        self.access.write_line(message);
    }

    /// Info and debug go to the access target, warnings and errors to the error target
    pub fn write(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::Error | Level::Warn => self.error.write_line(message),
            Level::Info | Level::Debug => self.access.write_line(message),
        }
    }
}

/// Open or create a log file for appending, creating parent directories
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Returns an error if a log file cannot be opened or the writer was already set.
pub fn init(level: Level, access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(level, access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// The global writer, if `init` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!("INFO".parse::<Level>(), Ok(Level::Info));
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("trace".parse::<Level>(), Ok(Level::Debug));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_filtering() {
        let writer = LogWriter::new(Level::Warn, None, None).unwrap();
        assert!(writer.enabled(Level::Error));
        assert!(writer.enabled(Level::Warn));
        assert!(!writer.enabled(Level::Info));
        assert!(!writer.enabled(Level::Debug));
    }

    #[test]
    fn test_file_targets_append() {
        let dir = tempfile::TempDir::new().unwrap();
        let access = dir.path().join("logs/access.log");
        let error = dir.path().join("logs/error.log");

        let writer = LogWriter::new(
            Level::Info,
            access.to_str(),
            error.to_str(),
        )
        .unwrap();
        writer.write_access("GET / 200");
        writer.write(Level::Info, "started");
        writer.write(Level::Debug, "hidden");
        writer.write(Level::Error, "failed");

        let access_log = std::fs::read_to_string(&access).unwrap();
        assert_eq!(access_log, "GET / 200\nstarted\n");
        let error_log = std::fs::read_to_string(&error).unwrap();
        assert_eq!(error_log, "failed\n");
    }
}
