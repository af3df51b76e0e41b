//! logging setup for the session layer and the binary
//!
//! The numerical core never logs; only the session reports what it did.
use crate::Utils::task_parser::LoggingConfig;
use chrono::Local;
use simplelog::*;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// set once a logger from this module is installed
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Maps a level name to a filter. "off" and "none" disable logging; unknown names give `None`.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level {
        "off" | "none" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        _ => None,
    }
}

/// Installs a terminal logger and, if asked, a file logger named after the current date and time.
///
/// Returns the path of the log file when one was created. A log file that cannot be created is
/// an error and nothing is installed. A logger can only be installed once per process: later
/// calls leave the first one in place and return `Ok(None)` without creating a file.
pub fn init_logger(config: &LoggingConfig) -> io::Result<Option<String>> {
    let level = parse_level(&config.level).unwrap_or(LevelFilter::Info);
    if level == LevelFilter::Off || INSTALLED.load(Ordering::SeqCst) {
        return Ok(None);
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    let mut log_path = None;
    if config.log_to_file {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let name = format!("log_{}.txt", date_and_time);
        let path = match &config.directory {
            Some(dir) => Path::new(dir).join(name),
            None => PathBuf::from(name),
        };
        let file = File::create(&path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
        log_path = Some(path);
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            INSTALLED.store(true, Ordering::SeqCst);
            Ok(log_path.map(|path| path.display().to_string()))
        }
        Err(_) => {
            if let Some(path) = log_path {
                fs::remove_file(path)?;
            }
            Ok(None)
        }
    }
}
