//! Boot keyboard report records and their textual capture format

use super::{ModifierSet, ScanCode};
use thiserror::Error;

/// Size of a boot protocol keyboard report in bytes
pub const REPORT_LEN: usize = 8;

/// Maximum number of simultaneously reported keys
pub const MAX_ROLLOVER: usize = 6;

/// Errors that stop a decode run
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A capture line could not be read as an 8-byte report
    #[error("malformed capture record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

/// One sampled boot keyboard report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRecord {
    /// Raw modifier bitmask (byte 0)
    pub modifier_byte: u8,
    /// Scan code slots (bytes 2..8), 0 = empty
    pub slots: [ScanCode; MAX_ROLLOVER],
}

impl CaptureRecord {
    /// Build a record from the 8 raw report bytes. Byte 1 is reserved.
    pub fn from_bytes(bytes: [u8; REPORT_LEN]) -> Self {
        let mut slots = [ScanCode::EMPTY; MAX_ROLLOVER];
        for (slot, byte) in slots.iter_mut().zip(&bytes[2..]) {
            *slot = ScanCode(*byte);
        }
        Self {
            modifier_byte: bytes[0],
            slots,
        }
    }

    /// Parse one textual record such as `02:00:04:00:00:00:00:00`.
    ///
    /// Bytes are separated by `:` or whitespace, each exactly two hex digits.
    /// The only unseparated form is 16 contiguous digits. `line` is the
    /// 1-based line number used in the error.
    pub fn parse(text: &str, line: usize) -> Result<Self, DecodeError> {
        let malformed = |reason: String| DecodeError::MalformedRecord { line, reason };
        let is_separator = |c: char| c == ':' || c.is_whitespace();

        let text = text.trim();
        if let Some(bad) = text
            .chars()
            .find(|c| !is_separator(*c) && !c.is_ascii_hexdigit())
        {
            return Err(malformed(format!("non-hexadecimal character {:?}", bad)));
        }

        let groups: Vec<&str> = if text.contains(is_separator) {
            text.split_whitespace()
                .flat_map(|word| word.split(':'))
                .collect()
        } else {
            if text.len() != REPORT_LEN * 2 {
                return Err(malformed(format!(
                    "expected {} bytes, found {} hex digits",
                    REPORT_LEN,
                    text.len()
                )));
            }
            (0..REPORT_LEN).map(|i| &text[i * 2..i * 2 + 2]).collect()
        };

        if groups.len() != REPORT_LEN {
            return Err(malformed(format!(
                "expected {} bytes, found {} groups",
                REPORT_LEN,
                groups.len()
            )));
        }

        let mut bytes = [0u8; REPORT_LEN];
        for (i, (byte, group)) in bytes.iter_mut().zip(&groups).enumerate() {
            if group.len() != 2 {
                return Err(malformed(format!(
                    "byte {} is {:?}, expected two hex digits",
                    i, group
                )));
            }
            *byte = u8::from_str_radix(group, 16).map_err(|e| malformed(e.to_string()))?;
        }
        Ok(Self::from_bytes(bytes))
    }

    /// Modifier classes asserted in this report
    pub fn modifiers(&self) -> ModifierSet {
        ModifierSet::from_report_byte(self.modifier_byte)
    }

    /// Non-empty slots, duplicates removed, in report order
    pub fn pressed(&self) -> Vec<ScanCode> {
        let mut pressed: Vec<ScanCode> = Vec::with_capacity(MAX_ROLLOVER);
        for code in self.slots.iter().filter(|c| !c.is_empty()) {
            if !pressed.contains(code) {
                pressed.push(*code);
            }
        }
        pressed
    }

    /// Whether any slot carries an HID error usage instead of a key
    pub fn is_phantom(&self) -> bool {
        self.slots.iter().any(|c| c.is_error_indication())
    }
}

/// Parse a whole capture, one record per non-blank line.
///
/// Stops at the first malformed line.
pub fn parse_capture(text: &str) -> Result<Vec<CaptureRecord>, DecodeError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| CaptureRecord::parse(line, index + 1))
        .collect()
}
