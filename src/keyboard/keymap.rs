//! Scan code definitions and the US boot-keyboard usage table

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A USB HID keyboard usage ID as it appears in a boot report slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanCode(pub u8);

impl ScanCode {
    /// Slot value meaning "no key"
    pub const EMPTY: ScanCode = ScanCode(0x00);

    pub fn new(code: u8) -> Self {
        Self(code)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// ErrorRollOver, POSTFail and ErrorUndefined. A report carrying one of
    /// these in any slot does not describe real key state.
    pub fn is_error_indication(&self) -> bool {
        matches!(self.0, 0x01..=0x03)
    }
}

impl From<u8> for ScanCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Keys that have a name rather than a glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    CapsLock,
    Insert,
    Home,
    PageUp,
    Delete,
    End,
    PageDown,
    Right,
    Left,
    Down,
    Up,
    F(u8),
}

impl NamedKey {
    /// Upper-case display name used inside `<...>` markers
    pub fn name(&self) -> String {
        let name = match self {
            NamedKey::Enter => "ENTER",
            NamedKey::Escape => "ESC",
            NamedKey::Backspace => "BACKSPACE",
            NamedKey::Tab => "TAB",
            NamedKey::Space => "SPACE",
            NamedKey::CapsLock => "CAPS LOCK",
            NamedKey::Insert => "INSERT",
            NamedKey::Home => "HOME",
            NamedKey::PageUp => "PAGE UP",
            NamedKey::Delete => "DELETE",
            NamedKey::End => "END",
            NamedKey::PageDown => "PAGE DOWN",
            NamedKey::Right => "RIGHT",
            NamedKey::Left => "LEFT",
            NamedKey::Down => "DOWN",
            NamedKey::Up => "UP",
            NamedKey::F(n) => return format!("F{}", n),
        };
        name.to_string()
    }

    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            NamedKey::Right | NamedKey::Left | NamedKey::Down | NamedKey::Up
        )
    }
}

/// Semantic identity of a scan code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDescriptor {
    /// A printable key with its unshifted and shifted glyphs
    Glyph { unshifted: char, shifted: char },
    /// A control or navigation key
    Named(NamedKey),
}

impl KeyDescriptor {
    const fn glyph(unshifted: char, shifted: char) -> Self {
        KeyDescriptor::Glyph { unshifted, shifted }
    }

    /// Whether capslock affects this key
    pub fn is_alphabetic(&self) -> bool {
        matches!(self, KeyDescriptor::Glyph { unshifted, .. } if unshifted.is_ascii_alphabetic())
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self, KeyDescriptor::Named(key) if key.is_arrow())
    }

    /// Name shown when the key is part of a combination
    pub fn display_name(&self) -> String {
        match self {
            KeyDescriptor::Glyph { unshifted, .. } => unshifted.to_ascii_uppercase().to_string(),
            KeyDescriptor::Named(key) => key.name(),
        }
    }
}

/// Static usage table for the standard US layout
pub static KEYMAP: LazyLock<HashMap<ScanCode, KeyDescriptor>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Letters a-z occupy 0x04..=0x1D in alphabetical order
    for (offset, letter) in ('a'..='z').enumerate() {
        map.insert(
            ScanCode(0x04 + offset as u8),
            KeyDescriptor::glyph(letter, letter.to_ascii_uppercase()),
        );
    }

    // Number row
    let digits = [
        ('1', '!'),
        ('2', '@'),
        ('3', '#'),
        ('4', '$'),
        ('5', '%'),
        ('6', '^'),
        ('7', '&'),
        ('8', '*'),
        ('9', '('),
        ('0', ')'),
    ];
    for (offset, (unshifted, shifted)) in digits.into_iter().enumerate() {
        map.insert(ScanCode(0x1E + offset as u8), KeyDescriptor::glyph(unshifted, shifted));
    }

    map.insert(ScanCode(0x28), KeyDescriptor::Named(NamedKey::Enter));
    map.insert(ScanCode(0x29), KeyDescriptor::Named(NamedKey::Escape));
    map.insert(ScanCode(0x2A), KeyDescriptor::Named(NamedKey::Backspace));
    map.insert(ScanCode(0x2B), KeyDescriptor::Named(NamedKey::Tab));
    map.insert(ScanCode(0x2C), KeyDescriptor::Named(NamedKey::Space));

    // Punctuation
    map.insert(ScanCode(0x2D), KeyDescriptor::glyph('-', '_'));
    map.insert(ScanCode(0x2E), KeyDescriptor::glyph('=', '+'));
    map.insert(ScanCode(0x2F), KeyDescriptor::glyph('[', '{'));
    map.insert(ScanCode(0x30), KeyDescriptor::glyph(']', '}'));
    map.insert(ScanCode(0x31), KeyDescriptor::glyph('\\', '|'));
    map.insert(ScanCode(0x32), KeyDescriptor::glyph('#', '~')); // Non-US # and ~
    map.insert(ScanCode(0x33), KeyDescriptor::glyph(';', ':'));
    map.insert(ScanCode(0x34), KeyDescriptor::glyph('\'', '"'));
    map.insert(ScanCode(0x35), KeyDescriptor::glyph('`', '~'));
    map.insert(ScanCode(0x36), KeyDescriptor::glyph(',', '<'));
    map.insert(ScanCode(0x37), KeyDescriptor::glyph('.', '>'));
    map.insert(ScanCode(0x38), KeyDescriptor::glyph('/', '?'));

    map.insert(ScanCode(0x39), KeyDescriptor::Named(NamedKey::CapsLock));

    // Function row F1-F12
    for n in 1..=12u8 {
        map.insert(ScanCode(0x39 + n), KeyDescriptor::Named(NamedKey::F(n)));
    }

    // Navigation cluster
    map.insert(ScanCode(0x49), KeyDescriptor::Named(NamedKey::Insert));
    map.insert(ScanCode(0x4A), KeyDescriptor::Named(NamedKey::Home));
    map.insert(ScanCode(0x4B), KeyDescriptor::Named(NamedKey::PageUp));
    map.insert(ScanCode(0x4C), KeyDescriptor::Named(NamedKey::Delete));
    map.insert(ScanCode(0x4D), KeyDescriptor::Named(NamedKey::End));
    map.insert(ScanCode(0x4E), KeyDescriptor::Named(NamedKey::PageDown));

    // Arrow keys
    map.insert(ScanCode(0x4F), KeyDescriptor::Named(NamedKey::Right));
    map.insert(ScanCode(0x50), KeyDescriptor::Named(NamedKey::Left));
    map.insert(ScanCode(0x51), KeyDescriptor::Named(NamedKey::Down));
    map.insert(ScanCode(0x52), KeyDescriptor::Named(NamedKey::Up));

    map
});

/// Look up a scan code, `None` when it is not in the table
pub fn get_key_descriptor(code: ScanCode) -> Option<KeyDescriptor> {
    KEYMAP.get(&code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_span_a_to_z() {
        assert_eq!(
            get_key_descriptor(ScanCode(0x04)),
            Some(KeyDescriptor::Glyph { unshifted: 'a', shifted: 'A' })
        );
        assert_eq!(
            get_key_descriptor(ScanCode(0x1D)),
            Some(KeyDescriptor::Glyph { unshifted: 'z', shifted: 'Z' })
        );
    }

    #[test]
    fn digits_carry_us_symbols() {
        assert_eq!(
            get_key_descriptor(ScanCode(0x1E)),
            Some(KeyDescriptor::Glyph { unshifted: '1', shifted: '!' })
        );
        assert_eq!(
            get_key_descriptor(ScanCode(0x27)),
            Some(KeyDescriptor::Glyph { unshifted: '0', shifted: ')' })
        );
    }

    #[test]
    fn function_keys_are_contiguous() {
        assert_eq!(get_key_descriptor(ScanCode(0x3A)), Some(KeyDescriptor::Named(NamedKey::F(1))));
        assert_eq!(get_key_descriptor(ScanCode(0x45)), Some(KeyDescriptor::Named(NamedKey::F(12))));
    }

    #[test]
    fn unknown_and_empty_codes_are_absent() {
        assert_eq!(get_key_descriptor(ScanCode::EMPTY), None);
        assert_eq!(get_key_descriptor(ScanCode(0x68)), None);
        assert_eq!(get_key_descriptor(ScanCode(0xE0)), None);
    }

    #[test]
    fn error_indications() {
        assert!(ScanCode(0x01).is_error_indication());
        assert!(ScanCode(0x03).is_error_indication());
        assert!(!ScanCode(0x04).is_error_indication());
        assert!(!ScanCode::EMPTY.is_error_indication());
    }

    #[test]
    fn display_names() {
        assert_eq!(KeyDescriptor::glyph('b', 'B').display_name(), "B");
        assert_eq!(KeyDescriptor::glyph('/', '?').display_name(), "/");
        assert_eq!(KeyDescriptor::Named(NamedKey::CapsLock).display_name(), "CAPS LOCK");
        assert_eq!(KeyDescriptor::Named(NamedKey::F(11)).display_name(), "F11");
    }

    #[test]
    fn alphabetic_classification() {
        assert!(KeyDescriptor::glyph('q', 'Q').is_alphabetic());
        assert!(!KeyDescriptor::glyph('1', '!').is_alphabetic());
        assert!(!KeyDescriptor::Named(NamedKey::Space).is_alphabetic());
    }

    #[test]
    fn scan_code_display_is_hex() {
        assert_eq!(ScanCode(0x4f).to_string(), "0x4f");
    }
}
