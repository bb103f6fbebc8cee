use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// CSV log with one row per executed command line.
#[derive(Debug)]
pub struct AuditLog {
    file: File,
    path: PathBuf,
}

impl AuditLog {
    const HEADER: [&'static str; 4] = ["timestamp", "user", "command", "status"];

    /// Creates the log, truncating whatever was there before.
    #[instrument]
    pub fn create(path: &Path) -> Result<Self> {
        info!("creating audit log");

        let file =
            File::create(path).with_context(|| format!("couldn't create: {}", path.display()))?;

        let mut this = Self {
            file,
            path: path.to_owned(),
        };

        this.write_row(&Self::HEADER)?;

        Ok(this)
    }

    pub fn record(&mut self, user: &str, command: &str, ok: bool) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let status = if ok { "SUCCESS" } else { "ERROR" };

        self.write_row(&[timestamp.as_str(), user, command, status])
    }

    fn write_row(&mut self, fields: &[&str]) -> Result<()> {
        let row = fields
            .iter()
            .map(|field| escape(field))
            .collect::<Vec<_>>()
            .join(",");

        writeln!(self.file, "{}", row)
            .and_then(|_| self.file.flush())
            .with_context(|| format!("couldn't write to: {}", self.path.display()))?;

        Ok(())
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
