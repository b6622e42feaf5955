use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("failed to create log directory {path}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write log file {path}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to remove log file {path}")]
    Remove {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct EventJournal {
    path: PathBuf,
    last_write: Option<DateTime<Local>>,
}

pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("[{}] {}", at.format(LINE_TIMESTAMP_FORMAT), message)
}

impl EventJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_write: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_write(&self) -> Option<DateTime<Local>> {
        self.last_write
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn log(&mut self, message: &str) -> Result<(), JournalError> {
        self.record(message, Local::now())
    }

    pub fn record(&mut self, message: &str, at: DateTime<Local>) -> Result<(), JournalError> {
        let line = format_line(at, message);
        println!("{line}");

        self.ensure_parent_dir()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.write_error(source))?;
        write_line(&mut file, &line).map_err(|source| self.write_error(source))?;

        self.last_write = Some(at);
        Ok(())
    }

    // Not counted as activity.
    pub fn reset(&mut self, marker: &str) -> Result<(), JournalError> {
        self.ensure_parent_dir()?;
        let mut file = File::create(&self.path).map_err(|source| self.write_error(source))?;
        write_line(&mut file, marker).map_err(|source| self.write_error(source))
    }

    pub fn remove(&mut self) -> Result<(), JournalError> {
        fs::remove_file(&self.path).map_err(|source| JournalError::Remove {
            path: self.path.display().to_string(),
            source,
        })
    }

    #[cfg(test)]
    pub(crate) fn set_last_write(&mut self, at: Option<DateTime<Local>>) {
        self.last_write = at;
    }

    fn ensure_parent_dir(&self) -> Result<(), JournalError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                fs::create_dir_all(dir).map_err(|source| JournalError::CreateDir {
                    path: dir.display().to_string(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }

    fn write_error(&self, source: std::io::Error) -> JournalError {
        JournalError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

fn write_line(file: &mut File, line: &str) -> std::io::Result<()> {
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()
}
