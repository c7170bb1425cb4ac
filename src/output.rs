use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::app::{BatchReport, ProgressSink};
use crate::error::ExtractError;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &BatchReport) -> io::Result<()> {
        Self::print_json(report)
    }

    pub fn write_report(path: &Path, report: &BatchReport) -> Result<(), ExtractError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
            }
        }
        let json = serde_json::to_string_pretty(report)
            .map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        fs::write(path, json).map_err(|err| ExtractError::Filesystem(err.to_string()))?;
        Ok(())
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct LogSink;

impl ProgressSink for LogSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
