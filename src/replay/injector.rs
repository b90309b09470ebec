//! Key injection targets

use super::ReplayError;
use crate::keyboard::{KeyDescriptor, Modifier};

/// Something that can press and release keys on the host
pub trait KeyInjector {
    /// Hold a modifier down
    fn press(&mut self, modifier: Modifier) -> Result<(), ReplayError>;

    /// Let a held modifier go
    fn release(&mut self, modifier: Modifier) -> Result<(), ReplayError>;

    /// Press and release a key. Glyph keys are sent as their unshifted
    /// glyph; the held modifiers select the rest.
    fn tap(&mut self, key: &KeyDescriptor) -> Result<(), ReplayError>;

    /// Whether AltGr can be held directly. When false the engine sends
    /// Ctrl+Alt instead.
    fn supports_altgr(&self) -> bool {
        false
    }
}

/// OS-level injection through enigo
#[cfg(feature = "virtual-send")]
pub struct EnigoInjector {
    enigo: enigo::Enigo,
}

#[cfg(feature = "virtual-send")]
impl EnigoInjector {
    pub fn new() -> Result<Self, ReplayError> {
        use enigo::{Enigo, Settings};

        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| ReplayError::Init(e.to_string()))?;
        Ok(Self { enigo })
    }

    fn modifier_key(modifier: Modifier) -> Result<enigo::Key, ReplayError> {
        use enigo::Key;

        match modifier {
            Modifier::Ctrl => Ok(Key::Control),
            Modifier::Shift => Ok(Key::Shift),
            Modifier::Alt => Ok(Key::Alt),
            Modifier::Gui => Ok(Key::Meta),
            Modifier::AltGr => Err(ReplayError::UnsupportedKey(modifier.to_string())),
        }
    }

    fn key(descriptor: &KeyDescriptor) -> Result<enigo::Key, ReplayError> {
        use crate::keyboard::NamedKey;
        use enigo::Key;

        let named = match descriptor {
            KeyDescriptor::Glyph { unshifted, .. } => return Ok(Key::Unicode(*unshifted)),
            KeyDescriptor::Named(named) => *named,
        };
        let key = match named {
            NamedKey::Enter => Key::Return,
            NamedKey::Escape => Key::Escape,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Tab => Key::Tab,
            NamedKey::Space => Key::Space,
            NamedKey::CapsLock => Key::CapsLock,
            #[cfg(not(target_os = "macos"))]
            NamedKey::Insert => Key::Insert,
            NamedKey::Home => Key::Home,
            NamedKey::PageUp => Key::PageUp,
            NamedKey::Delete => Key::Delete,
            NamedKey::End => Key::End,
            NamedKey::PageDown => Key::PageDown,
            NamedKey::Right => Key::RightArrow,
            NamedKey::Left => Key::LeftArrow,
            NamedKey::Down => Key::DownArrow,
            NamedKey::Up => Key::UpArrow,
            NamedKey::F(1) => Key::F1,
            NamedKey::F(2) => Key::F2,
            NamedKey::F(3) => Key::F3,
            NamedKey::F(4) => Key::F4,
            NamedKey::F(5) => Key::F5,
            NamedKey::F(6) => Key::F6,
            NamedKey::F(7) => Key::F7,
            NamedKey::F(8) => Key::F8,
            NamedKey::F(9) => Key::F9,
            NamedKey::F(10) => Key::F10,
            NamedKey::F(11) => Key::F11,
            NamedKey::F(12) => Key::F12,
            #[allow(unreachable_patterns)]
            other => return Err(ReplayError::UnsupportedKey(other.name())),
        };
        Ok(key)
    }

    fn send(&mut self, key: enigo::Key, direction: enigo::Direction, action: String) -> Result<(), ReplayError> {
        use enigo::Keyboard;

        self.enigo
            .key(key, direction)
            .map_err(|e| ReplayError::Inject {
                action,
                reason: e.to_string(),
            })
    }
}

#[cfg(feature = "virtual-send")]
impl KeyInjector for EnigoInjector {
    fn press(&mut self, modifier: Modifier) -> Result<(), ReplayError> {
        let key = Self::modifier_key(modifier)?;
        self.send(key, enigo::Direction::Press, format!("press {}", modifier))
    }

    fn release(&mut self, modifier: Modifier) -> Result<(), ReplayError> {
        let key = Self::modifier_key(modifier)?;
        self.send(key, enigo::Direction::Release, format!("release {}", modifier))
    }

    fn tap(&mut self, key: &KeyDescriptor) -> Result<(), ReplayError> {
        let target = Self::key(key)?;
        self.send(target, enigo::Direction::Click, format!("tap {}", key.display_name()))
    }
}
