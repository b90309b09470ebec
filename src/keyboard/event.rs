//! Key events and the scan code stream decoder

use super::keymap::get_key_descriptor;
use super::{CaptureRecord, KeyDescriptor, ModifierSet, ScanCode};

/// One rising edge: a scan code that was absent in the previous report and
/// present in the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Modifiers asserted in the report that carried the press
    pub modifiers: ModifierSet,
    /// What the key means
    pub key: KeyDescriptor,
    /// The raw usage ID
    pub scan_code: ScanCode,
    /// Index of the source record in the capture
    pub record: usize,
}

impl KeyEvent {
    pub fn new(modifiers: ModifierSet, key: KeyDescriptor, scan_code: ScanCode, record: usize) -> Self {
        Self {
            modifiers,
            key,
            scan_code,
            record,
        }
    }
}

/// A rising edge that was dropped because the scan code is not in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostic {
    pub record: usize,
    pub scan_code: ScanCode,
}

/// Everything a decode run produces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOutput {
    pub events: Vec<KeyEvent>,
    pub diagnostics: Vec<Diagnostic>,
    /// Records consumed
    pub records: usize,
    /// Largest pressed-key set observed in a single report
    pub max_rollover: usize,
}

/// What a single report contributed to the decode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutput {
    pub events: Vec<KeyEvent>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns consecutive boot reports into press events
#[derive(Debug, Default)]
pub struct ScanCodeStreamDecoder {
    last_keys: Vec<ScanCode>,
    records: usize,
    max_simultaneous: usize,
}

impl ScanCodeStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one report into the presses it starts
    pub fn push(&mut self, record: &CaptureRecord) -> RecordOutput {
        let index = self.records;
        self.records += 1;
        let mut output = RecordOutput::default();

        if record.is_phantom() {
            log::debug!("record {}: phantom report, holding previous key state", index);
            return output;
        }

        let current_keys = record.pressed();
        self.max_simultaneous = self.max_simultaneous.max(current_keys.len());

        let mut new_keys: Vec<ScanCode> = current_keys
            .iter()
            .filter(|code| !self.last_keys.contains(code))
            .copied()
            .collect();
        // Simultaneous presses are reported highest usage ID first
        new_keys.sort_unstable_by(|a, b| b.cmp(a));

        let modifiers = record.modifiers();
        for code in new_keys {
            match get_key_descriptor(code) {
                Some(key) => output.events.push(KeyEvent::new(modifiers, key, code, index)),
                None => {
                    log::warn!(
                        "record {}: unrecognized scan code {}, skipping",
                        index,
                        code
                    );
                    output.diagnostics.push(Diagnostic {
                        record: index,
                        scan_code: code,
                    });
                }
            }
        }

        self.last_keys = current_keys;
        output
    }

    /// Decode a complete capture
    pub fn decode(records: &[CaptureRecord]) -> DecodeOutput {
        let mut decoder = Self::new();
        let mut output = DecodeOutput::default();
        for record in records {
            let RecordOutput {
                events,
                diagnostics,
            } = decoder.push(record);
            output.events.extend(events);
            output.diagnostics.extend(diagnostics);
        }
        output.records = decoder.records;
        output.max_rollover = decoder.max_simultaneous;
        output
    }

    /// Keys held as of the last non-phantom report
    pub fn pressed_keys(&self) -> &[ScanCode] {
        &self.last_keys
    }
}
