//! Boot keyboard report decoding

mod event;
mod modifiers;
mod record;
pub mod keymap;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use event::{DecodeOutput, Diagnostic, KeyEvent, RecordOutput, ScanCodeStreamDecoder};
pub use keymap::{get_key_descriptor, KeyDescriptor, NamedKey, ScanCode, KEYMAP};
pub use modifiers::{Modifier, ModifierSet};
pub use record::{parse_capture, CaptureRecord, DecodeError, MAX_ROLLOVER, REPORT_LEN};

/// Parse and decode a textual capture in one step
pub fn decode_capture(text: &str) -> Result<DecodeOutput, DecodeError> {
    let records = parse_capture(text)?;
    Ok(ScanCodeStreamDecoder::decode(&records))
}
