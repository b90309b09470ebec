//! Raw per-keystroke rendering

use crate::keyboard::{KeyDescriptor, KeyEvent, ModifierSet};

/// Marker for a key with modifiers, e.g. `<Ctrl+Shift+C>` or `<ENTER>`
pub fn marker(modifiers: ModifierSet, key: &KeyDescriptor) -> String {
    if modifiers.is_empty() {
        format!("<{}>", key.display_name())
    } else {
        format!("<{}+{}>", modifiers.prefix(), key.display_name())
    }
}

/// Render a single event. Bare glyphs stay bare; anything with a modifier
/// or a named key is delimited.
pub fn format_event(event: &KeyEvent) -> String {
    match event.key {
        KeyDescriptor::Glyph { unshifted, .. } if event.modifiers.is_empty() => {
            unshifted.to_string()
        }
        _ => marker(event.modifiers, &event.key),
    }
}

/// One line per event
pub fn format_events(events: &[KeyEvent]) -> String {
    events
        .iter()
        .map(format_event)
        .collect::<Vec<_>>()
        .join("\n")
}
