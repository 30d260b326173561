use chrono::Local;
use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::error::{Error, Result};

/// Appends formatted records to a file.
pub struct Logger {
    file: Mutex<std::fs::File>,
    level: LevelFilter,
}

impl Logger {
    pub fn new(log_file: &str, level: LevelFilter) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

pub fn format_record(record: &Record) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("{} [{}] {}", timestamp, record.level(), record.args())
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = self.file.lock() {
                let _ = writeln!(file, "{}", format_record(record));
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level)
        .map_err(|_| Error::ConfigError(format!("unknown log level '{}'", level)))
}

/// Logs to `log_file` when given, otherwise to stderr through env_logger.
/// `RUST_LOG` still overrides the level for the stderr logger.
pub fn init(level: LevelFilter, log_file: Option<&str>) -> Result<()> {
    match log_file {
        Some(path) => {
            let logger = Logger::new(path, level)?;
            log::set_boxed_logger(Box::new(logger))
                .map_err(|e| Error::InternalError(e.to_string()))?;
            log::set_max_level(level);
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .try_init()
                .map_err(|e| Error::InternalError(e.to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::Warn);
        assert!(parse_level("chatty").is_err());
    }

    #[test]
    fn test_file_logger_respects_level() {
        let path = std::env::temp_dir().join(format!("pulse-feed-log-{}.log", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let logger = Logger::new(&path_str, LevelFilter::Info).unwrap();

        logger.log(
            &Record::builder()
                .args(format_args!("fetched 30 tokens"))
                .level(log::Level::Info)
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("noisy detail"))
                .level(log::Level::Debug)
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(contents.contains("[INFO] fetched 30 tokens"));
        assert!(!contents.contains("noisy detail"));
    }
}
