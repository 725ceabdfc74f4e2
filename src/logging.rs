//! log4rs setup.

use crate::config::LOG4RS_FILE;
use crate::error::SyncError;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:5})} {t} - {m}{n}";

/// Map `-v` occurrences to a level: none = info, `-v` = debug, `-vv` = trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Use `log4rs.yml` when present, otherwise log to stderr.
pub fn init(verbosity: u8) -> Result<(), SyncError> {
    if Path::new(LOG4RS_FILE).exists() {
        return log4rs::init_file(LOG4RS_FILE, Default::default())
            .map_err(|e| SyncError::Config(format!("Error initializing log4rs: {e}")));
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level_for(verbosity)))
        .map_err(|e| SyncError::Config(format!("Error building log config: {e}")))?;
    log4rs::init_config(config)
        .map_err(|e| SyncError::Config(format!("Error initializing log4rs: {e}")))?;
    Ok(())
}
