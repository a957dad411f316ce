// src/data.rs - Session export of fired commands
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Local};
use csv::Writer;
use serde::Serialize;

use crate::classifier::Mode;

/// What caused a command to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Gesture,
    Voice,
    Auto,
}

impl Trigger {
    fn as_str(self) -> &'static str {
        match self {
            Trigger::Gesture => "gesture",
            Trigger::Voice => "voice",
            Trigger::Auto => "auto",
        }
    }
}

#[derive(Debug, Serialize)]
struct CommandRecord {
    timestamp: String,
    mode: &'static str,
    trigger: &'static str,
    command: String,
}

/// Collects every command the controller fires during a session and
/// writes them out as CSV when the run ends. Shared across the frame
/// loop and the auto-advance worker, so records live behind a mutex.
pub struct CommandLog {
    output_dir: PathBuf,
    session_name: String,
    records: Mutex<Vec<CommandRecord>>,
}

impl CommandLog {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, mode: Mode, trigger: Trigger, command: &str) {
        self.record_at(Local::now(), mode, trigger, command);
    }

    fn record_at(&self, at: DateTime<Local>, mode: Mode, trigger: Trigger, command: &str) {
        let record = CommandRecord {
            timestamp: at.to_rfc3339(),
            mode: mode.as_str(),
            trigger: trigger.as_str(),
            command: command.to_string(),
        };
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self
            .output_dir
            .join(&self.session_name)
            .join("commands.csv");

        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);

        let records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("command log poisoned"))?;
        for record in records.iter() {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(csv_path)
    }
}
