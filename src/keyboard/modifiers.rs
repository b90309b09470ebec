//! Modifier classes and the boot-report modifier byte

use std::fmt;

/// A single modifier class. Left and right Ctrl/Shift/GUI are one class;
/// left Alt and right Alt (AltGr) are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    AltGr,
    Gui,
}

impl Modifier {
    /// All classes in display priority order
    pub const ALL: [Modifier; 5] = [
        Modifier::Ctrl,
        Modifier::Shift,
        Modifier::Alt,
        Modifier::AltGr,
        Modifier::Gui,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
            Modifier::AltGr => "AltGr",
            Modifier::Gui => "GUI",
        }
    }

    fn flag(&self) -> ModifierSet {
        match self {
            Modifier::Ctrl => ModifierSet::CTRL,
            Modifier::Shift => ModifierSet::SHIFT,
            Modifier::Alt => ModifierSet::ALT,
            Modifier::AltGr => ModifierSet::ALTGR,
            Modifier::Gui => ModifierSet::GUI,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Set of asserted modifier classes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierSet: u8 {
        const CTRL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const ALTGR = 1 << 3;
        const GUI = 1 << 4;
    }
}

/// Boot report modifier byte bit -> class
const MODIFIER_BITS: [(u8, Modifier); 8] = [
    (0x01, Modifier::Ctrl),  // Left Ctrl
    (0x02, Modifier::Shift), // Left Shift
    (0x04, Modifier::Alt),   // Left Alt
    (0x08, Modifier::Gui),   // Left GUI
    (0x10, Modifier::Ctrl),  // Right Ctrl
    (0x20, Modifier::Shift), // Right Shift
    (0x40, Modifier::AltGr), // Right Alt
    (0x80, Modifier::Gui),   // Right GUI
];

impl ModifierSet {
    /// Classify a boot report modifier byte
    pub fn from_report_byte(byte: u8) -> Self {
        MODIFIER_BITS
            .iter()
            .filter(|(bit, _)| byte & bit != 0)
            .fold(ModifierSet::empty(), |set, (_, modifier)| set | modifier.flag())
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.contains(modifier.flag())
    }

    /// Asserted classes in display priority order
    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(move |m| self.has(*m))
    }

    /// True when only Shift and/or AltGr are held. These select glyphs; every
    /// other class turns a keystroke into a shortcut.
    pub fn is_glyph_selecting(&self) -> bool {
        (ModifierSet::SHIFT | ModifierSet::ALTGR).contains(*self)
    }

    /// Rewrite AltGr as Ctrl+Alt for targets without a native AltGr
    pub fn without_altgr(&self) -> Self {
        if self.contains(ModifierSet::ALTGR) {
            (*self - ModifierSet::ALTGR) | ModifierSet::CTRL | ModifierSet::ALT
        } else {
            *self
        }
    }

    /// Names joined with `+`, e.g. `Ctrl+Shift`
    pub fn prefix(&self) -> String {
        self.modifiers()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl From<Modifier> for ModifierSet {
    fn from(modifier: Modifier) -> Self {
        modifier.flag()
    }
}

impl FromIterator<Modifier> for ModifierSet {
    fn from_iter<T: IntoIterator<Item = Modifier>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ModifierSet::empty(), |set, modifier| set | modifier.flag())
    }
}
