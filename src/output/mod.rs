//! Textual consumers of the decoded event stream

mod format;
mod simulate;

pub use format::{format_event, format_events, marker};
pub use simulate::{Environment, TextBuffer, TextBufferSimulator};

use serde::{Deserialize, Serialize};

/// How decoded keystrokes are consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One line per keystroke
    #[default]
    Raw,
    /// Reconstructed text buffer
    Simulate,
    /// Live injection into the OS, no textual output
    Replay,
    /// Decode report as JSON
    Json,
}
