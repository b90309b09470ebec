//! USB Keyboard Decode - decode captured HID boot-keyboard reports
//!
//! Turns a capture of 8-byte boot keyboard reports into key press events,
//! then renders them one per line, reconstructs the text they produced, or
//! replays them live into the operating system.

pub mod keyboard;
pub mod output;
pub mod replay;
pub mod report;
pub mod config;

pub use config::Config;
