//! Logger initialization for the popup.
//!
//! The terminal is in raw mode while the popup runs, so log output goes to a
//! file rather than stdout.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

pub fn initialize(log_path: &Path, level: LevelFilter) {
    let file = match File::create(log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            return;
        }
    };
    let _ = WriteLogger::init(level, build_config(), file);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
