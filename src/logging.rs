use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Logger that writes to a rolling file and mirrors important records to stderr
struct DylinkLogger<W: Write + Send> {
    file_writer: Arc<Mutex<RollingFileAppender>>,
    console: Mutex<W>,
    file_level: LevelFilter,
    console_level: LevelFilter,
}

impl<W: Write + Send> Log for DylinkLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.file_level || metadata.level() <= self.console_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = format!("{}", record.args());
        let level = record.level();

        if level <= self.file_level {
            if let Ok(mut writer) = self.file_writer.lock() {
                let _ = writeln!(
                    writer,
                    "{} [{}] {}: {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    level,
                    record.target(),
                    message
                );
            }
        }

        if level <= self.console_level {
            if let Ok(mut console) = self.console.lock() {
                let _ = writeln!(console, "{}: {}", level.as_str().to_lowercase(), message);
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut console) = self.console.lock() {
            let _ = console.flush();
        }
    }
}

/// Parse log level string to LevelFilter
pub fn parse_level(level_str: &str) -> LevelFilter {
    match level_str.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info, // Default to info
    }
}

fn rolling_appender(log_file_path: &Path) -> Result<RollingFileAppender> {
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }

    // Daily rotation, keep 3 files
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(
            log_file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("dylink"),
        )
        .filename_suffix(
            log_file_path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("log"),
        )
        .build(
            log_file_path
                .parent()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path"))?,
        )
        .context("Failed to create rotating file appender")
}

/// Initialize the global logger: file at `file_level`, stderr at `console_level`
pub fn init_logger(log_file_path: &Path, file_level: &str, console_level: &str) -> Result<()> {
    let file_level = parse_level(file_level);
    let console_level = parse_level(console_level);

    let logger = DylinkLogger {
        file_writer: Arc::new(Mutex::new(rolling_appender(log_file_path)?)),
        console: Mutex::new(io::stderr()),
        file_level,
        console_level,
    };

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(file_level.max(console_level));

    Ok(())
}
