//! Text buffer reconstruction
//!
//! Replays decoded keystrokes against a single-cursor buffer to approximate
//! what an editor or a shell prompt would show afterwards. Shortcuts and
//! selection gestures are not simulated; they land in the buffer as literal
//! `<...>` markers.

use super::format::marker;
use crate::keyboard::{KeyDescriptor, KeyEvent, Modifier, ModifierSet, NamedKey};
use serde::{Deserialize, Serialize};

/// Which application the keystrokes were typed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Multi-line editor: ENTER splits, TAB is a tab, UP/DOWN move
    #[default]
    Text,
    /// Command line: ENTER starts a fresh line, TAB/UP/DOWN are markers
    Command,
}

/// Lines of characters plus a cursor and the capslock flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<Vec<char>>,
    line: usize,
    column: usize,
    capslock: bool,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// One empty line, cursor at the origin, capslock off
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            line: 0,
            column: 0,
            capslock: false,
        }
    }

    /// (line, column)
    pub fn cursor(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub fn capslock(&self) -> bool {
        self.capslock
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.iter().collect()).collect()
    }

    /// Lines joined with `\n`
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }

    fn current_len(&self) -> usize {
        self.lines[self.line].len()
    }

    fn insert_char(&mut self, c: char) {
        self.lines[self.line].insert(self.column, c);
        self.column += 1;
    }

    fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    fn split_line(&mut self) {
        let rest = self.lines[self.line].split_off(self.column);
        self.lines.insert(self.line + 1, rest);
        self.line += 1;
        self.column = 0;
    }

    fn open_line_below(&mut self) {
        self.lines.insert(self.line + 1, Vec::new());
        self.line += 1;
        self.column = 0;
    }

    fn backspace(&mut self) {
        if self.column > 0 {
            self.column -= 1;
            self.lines[self.line].remove(self.column);
        } else if self.line > 0 {
            let current = self.lines.remove(self.line);
            self.line -= 1;
            self.column = self.current_len();
            self.lines[self.line].extend(current);
        }
    }

    fn delete(&mut self) {
        if self.column < self.current_len() {
            self.lines[self.line].remove(self.column);
        } else if self.line + 1 < self.lines.len() {
            let next = self.lines.remove(self.line + 1);
            self.lines[self.line].extend(next);
        }
    }

    fn left(&mut self) {
        if self.column > 0 {
            self.column -= 1;
        } else if self.line > 0 {
            self.line -= 1;
            self.column = self.current_len();
        }
    }

    fn right(&mut self) {
        if self.column < self.current_len() {
            self.column += 1;
        } else if self.line + 1 < self.lines.len() {
            self.line += 1;
            self.column = 0;
        }
    }

    fn up(&mut self) {
        self.line = self.line.saturating_sub(1);
        self.column = self.column.min(self.current_len());
    }

    fn down(&mut self) {
        self.line = (self.line + 1).min(self.lines.len() - 1);
        self.column = self.column.min(self.current_len());
    }
}

/// Drives a [`TextBuffer`] from key events
#[derive(Debug, Clone, Default)]
pub struct TextBufferSimulator {
    buffer: TextBuffer,
    environment: Environment,
}

impl TextBufferSimulator {
    pub fn new(environment: Environment) -> Self {
        Self {
            buffer: TextBuffer::new(),
            environment,
        }
    }

    /// Simulate a whole event sequence and return the buffer text
    pub fn run(environment: Environment, events: &[KeyEvent]) -> String {
        let mut simulator = Self::new(environment);
        for event in events {
            simulator.apply(event);
        }
        simulator.buffer.to_text()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Apply one keystroke
    pub fn apply(&mut self, event: &KeyEvent) {
        let modifiers = event.modifiers;

        // Ctrl, Alt or GUI make it a shortcut the buffer cannot model
        if !modifiers.is_glyph_selecting() {
            self.buffer.insert_str(&marker(modifiers, &event.key));
            return;
        }

        match event.key {
            KeyDescriptor::Glyph { unshifted, shifted } => {
                self.type_glyph(&event.key, unshifted, shifted, modifiers)
            }
            KeyDescriptor::Named(key) if key.is_arrow() && modifiers.has(Modifier::Shift) => {
                // Selection gesture
                self.buffer.insert_str(&marker(modifiers, &event.key));
            }
            KeyDescriptor::Named(key) => self.press_named(key, modifiers),
        }
    }

    fn type_glyph(&mut self, key: &KeyDescriptor, unshifted: char, shifted: char, modifiers: ModifierSet) {
        let mut shift = modifiers.has(Modifier::Shift) || modifiers.has(Modifier::AltGr);
        if key.is_alphabetic() {
            shift ^= self.buffer.capslock;
        }
        self.buffer.insert_char(if shift { shifted } else { unshifted });
    }

    fn press_named(&mut self, key: NamedKey, modifiers: ModifierSet) {
        let buffer = &mut self.buffer;
        match (key, self.environment) {
            (NamedKey::Space, _) => buffer.insert_char(' '),
            (NamedKey::Enter, Environment::Text) => buffer.split_line(),
            (NamedKey::Enter, Environment::Command) => buffer.open_line_below(),
            (NamedKey::Backspace, _) => buffer.backspace(),
            (NamedKey::Delete, _) => buffer.delete(),
            (NamedKey::Tab, Environment::Text) => buffer.insert_char('\t'),
            (NamedKey::CapsLock, _) => buffer.capslock = !buffer.capslock,
            (NamedKey::Home, _) => buffer.column = 0,
            (NamedKey::End, _) => buffer.column = buffer.current_len(),
            (NamedKey::Left, _) => buffer.left(),
            (NamedKey::Right, _) => buffer.right(),
            (NamedKey::Up, Environment::Text) => buffer.up(),
            (NamedKey::Down, Environment::Text) => buffer.down(),
            // TAB/UP/DOWN in a shell, plus ESC, INSERT, PAGE UP/DOWN and F-keys
            _ => buffer.insert_str(&marker(modifiers, &KeyDescriptor::Named(key))),
        }
    }
}
