//! Decode report and JSON export

use crate::keyboard::{DecodeOutput, KeyEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete decode report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Summary statistics
    pub summary: DecodeSummary,
    /// Decoded keystrokes in order
    pub events: Vec<EventEntry>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
}

/// Decode statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeSummary {
    /// Capture records consumed
    pub records: usize,
    /// Keystrokes decoded
    pub events: usize,
    /// Scan codes that were not in the table, as `0x..` strings
    pub unknown_scan_codes: Vec<String>,
    /// Maximum simultaneous keys in one report
    pub max_rollover: usize,
}

/// Single keystroke entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub record: usize,
    pub scan_code: u8,
    pub modifiers: Vec<String>,
    pub key: String,
}

impl From<&KeyEvent> for EventEntry {
    fn from(event: &KeyEvent) -> Self {
        Self {
            record: event.record,
            scan_code: event.scan_code.as_u8(),
            modifiers: event
                .modifiers
                .modifiers()
                .map(|m| m.name().to_string())
                .collect(),
            key: event.key.display_name(),
        }
    }
}

impl DecodeReport {
    /// Create a report from a finished decode run
    pub fn new(output: &DecodeOutput) -> Self {
        let now: DateTime<Utc> = Utc::now();

        let mut unknown: Vec<u8> = output
            .diagnostics
            .iter()
            .map(|d| d.scan_code.as_u8())
            .collect();
        unknown.sort_unstable();
        unknown.dedup();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            summary: DecodeSummary {
                records: output.records,
                events: output.events.len(),
                unknown_scan_codes: unknown.iter().map(|c| format!("{:#04x}", c)).collect(),
                max_rollover: output.max_rollover,
            },
            events: output.events.iter().map(EventEntry::from).collect(),
        }
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
