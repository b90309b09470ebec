//! Shared test utilities for decoder and consumer modules
//!
//! Provides common helper functions for creating records and events.

use super::keymap::get_key_descriptor;
use super::{CaptureRecord, KeyDescriptor, KeyEvent, ModifierSet, ScanCode};

/// Usage ID shorthand
pub fn scan(code: u8) -> ScanCode {
    ScanCode(code)
}

/// Creates a boot report with the given modifier byte and held keys.
pub fn record(modifier_byte: u8, keys: &[u8]) -> CaptureRecord {
    let mut bytes = [0u8; 8];
    bytes[0] = modifier_byte;
    for (slot, key) in bytes[2..].iter_mut().zip(keys) {
        *slot = *key;
    }
    CaptureRecord::from_bytes(bytes)
}

/// Creates a press event for a scan code in the table.
///
/// Panics when the code is unknown.
pub fn event(modifiers: ModifierSet, code: u8) -> KeyEvent {
    let key: KeyDescriptor = get_key_descriptor(ScanCode(code)).expect("scan code in table");
    KeyEvent::new(modifiers, key, ScanCode(code), 0)
}

/// Creates an unmodified press event.
pub fn plain(code: u8) -> KeyEvent {
    event(ModifierSet::empty(), code)
}

/// Unmodified press events for a run of lowercase ASCII text, spaces and
/// digits.
pub fn typed(text: &str) -> Vec<KeyEvent> {
    text.chars()
        .map(|c| match c {
            'a'..='z' => plain(0x04 + (c as u8 - b'a')),
            '1'..='9' => plain(0x1E + (c as u8 - b'1')),
            '0' => plain(0x27),
            ' ' => plain(0x2C),
            _ => panic!("typed() does not cover {:?}", c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_fills_slots_in_order() {
        let r = record(0x02, &[0x04, 0x05]);
        assert_eq!(r.modifier_byte, 0x02);
        assert_eq!(r.pressed(), vec![scan(0x04), scan(0x05)]);
    }

    #[test]
    fn typed_maps_letters_and_digits() {
        let events = typed("a1 ");
        let codes: Vec<u8> = events.iter().map(|e| e.scan_code.as_u8()).collect();
        assert_eq!(codes, vec![0x04, 0x1E, 0x2C]);
    }
}
