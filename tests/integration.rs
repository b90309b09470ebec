//! Integration tests for USB Keyboard Decode
//!
//! These tests exercise the full pipeline: textual capture parsing, stream
//! decoding, and each consumer (raw formatting, text simulation, replay and
//! the JSON report).

use usb_keyboard_decode::keyboard::{
    decode_capture, DecodeError, KeyDescriptor, KeyEvent, Modifier, ModifierSet,
};
use usb_keyboard_decode::output::{format_events, Environment, TextBufferSimulator};
use usb_keyboard_decode::replay::{
    AutoStart, CancelToken, HoldOrder, KeyInjector, ReplayEngine, ReplayError, ReplaySettings,
    ReplayStatus,
};
use usb_keyboard_decode::report::DecodeReport;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a capture line from a modifier byte and held keys
fn line(modifiers: u8, keys: &[u8]) -> String {
    let mut bytes = vec![modifiers, 0x00];
    bytes.extend_from_slice(keys);
    bytes.resize(8, 0x00);
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Press and release each key in turn
fn tap_all(modifiers: u8, keys: &[u8]) -> Vec<String> {
    keys.iter()
        .flat_map(|&k| [line(modifiers, &[k]), line(0x00, &[])])
        .collect()
}

fn capture(lines: &[String]) -> String {
    lines.join("\n") + "\n"
}

fn decode(lines: &[String]) -> Vec<KeyEvent> {
    decode_capture(&capture(lines)).expect("capture decodes").events
}

// h e l l o
const HELLO: [u8; 5] = [0x0B, 0x08, 0x0F, 0x0F, 0x12];

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn decode_is_deterministic() {
    let mut lines = tap_all(0x00, &HELLO);
    lines.push(line(0x02, &[0x04, 0x05]));
    lines.push(line(0x00, &[]));
    let text = capture(&lines);
    assert_eq!(decode_capture(&text).unwrap(), decode_capture(&text).unwrap());
}

#[test]
fn only_rising_edges_become_events() {
    // A held key repeated across samples is one press
    let lines = vec![
        line(0x00, &[0x04]),
        line(0x00, &[0x04]),
        line(0x00, &[0x04]),
        line(0x00, &[]),
    ];
    assert_eq!(decode(&lines).len(), 1);
}

#[test]
fn rollover_typing_keeps_order() {
    // Fast typist: next key pressed before the previous is released
    let lines = vec![
        line(0x00, &[0x0B]),
        line(0x00, &[0x0B, 0x08]),
        line(0x00, &[0x08]),
        line(0x00, &[0x08, 0x0F]),
        line(0x00, &[]),
    ];
    let events = decode(&lines);
    assert_eq!(format_events(&events), "h\ne\nl");
}

#[test]
fn malformed_record_is_fatal() {
    let text = format!("{}\n00:00:04\n{}\n", line(0x00, &[0x04]), line(0x00, &[]));
    match decode_capture(&text) {
        Err(DecodeError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected malformed record, got {:?}", other),
    }
}

#[test]
fn unknown_scan_code_does_not_stop_decoding() {
    let lines = vec![
        line(0x00, &[0x04]),
        line(0x00, &[0x74]),
        line(0x00, &[]),
        line(0x00, &[0x05]),
        line(0x00, &[]),
    ];
    let output = decode_capture(&capture(&lines)).unwrap();
    assert_eq!(format_events(&output.events), "a\nb");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].scan_code.as_u8(), 0x74);
}

// ---------------------------------------------------------------------------
// Raw and simulated output
// ---------------------------------------------------------------------------

#[test]
fn lowercase_then_shifted_letter() {
    let lines = vec![
        line(0x00, &[0x04]),
        line(0x00, &[]),
        line(0x02, &[0x05]),
        line(0x00, &[]),
    ];
    let events = decode(&lines);
    assert_eq!(format_events(&events), "a\n<Shift+B>");
    assert_eq!(TextBufferSimulator::run(Environment::Text, &events), "aB");
}

#[test]
fn plain_text_round_trip() {
    let mut lines = tap_all(0x00, &HELLO);
    lines.extend(tap_all(0x00, &[0x2C, 0x1E, 0x2D, 0x37, 0x28]));
    lines.extend(tap_all(0x00, &[0x1A, 0x12]));
    let events = decode(&lines);
    assert_eq!(
        TextBufferSimulator::run(Environment::Text, &events),
        "hello 1-.\nwo"
    );
}

#[test]
fn right_shift_and_capslock() {
    let mut lines = tap_all(0x20, &[0x0B]); // right shift + h
    lines.extend(tap_all(0x00, &[0x39, 0x08, 0x1E])); // caps, e, 1
    lines.extend(tap_all(0x02, &[0x08, 0x1E])); // shift e, shift 1
    let events = decode(&lines);
    assert_eq!(TextBufferSimulator::run(Environment::Text, &events), "HE1e!");
}

#[test]
fn enter_policy_differs_between_environments() {
    let mut lines = tap_all(0x00, &[0x04, 0x05, 0x06, 0x07]);
    lines.extend(tap_all(0x00, &[0x50, 0x50, 0x28]));
    let events = decode(&lines);
    assert_eq!(
        TextBufferSimulator::run(Environment::Text, &events),
        "ab\ncd"
    );
    assert_eq!(
        TextBufferSimulator::run(Environment::Command, &events),
        "abcd\n"
    );
}

#[test]
fn shortcuts_survive_as_markers() {
    let mut lines = tap_all(0x00, &HELLO);
    lines.extend(tap_all(0x01, &[0x04])); // ctrl+a
    lines.extend(tap_all(0x12, &[0x19])); // right ctrl + left shift + v
    let events = decode(&lines);
    assert_eq!(
        TextBufferSimulator::run(Environment::Text, &events),
        "hello<Ctrl+A><Ctrl+Shift+V>"
    );
}

#[test]
fn command_line_editing() {
    // "lx", backspace, "s", tab, up
    let mut lines = tap_all(0x00, &[0x0F, 0x1B, 0x2A, 0x16, 0x2B, 0x52]);
    lines.extend(tap_all(0x00, &[0x28]));
    let events = decode(&lines);
    assert_eq!(
        TextBufferSimulator::run(Environment::Command, &events),
        "ls<TAB><UP>\n"
    );
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[test]
fn json_report_from_capture() {
    let mut lines = tap_all(0x00, &HELLO);
    lines.push(line(0x00, &[0x04, 0x05, 0x06]));
    lines.push(line(0x00, &[]));
    let output = decode_capture(&capture(&lines)).unwrap();
    let report = DecodeReport::new(&output);
    assert_eq!(report.summary.events, 8);
    assert_eq!(report.summary.max_rollover, 3);
    // Simultaneous presses come out highest usage ID first
    let tail: Vec<&str> = report.events[5..].iter().map(|e| e.key.as_str()).collect();
    assert_eq!(tail, vec!["C", "B", "A"]);
    assert!(report.to_json().unwrap().contains("\"events\""));
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Down(Modifier),
    Up(Modifier),
    Key(String),
}

/// Injector that logs actions and cancels the run after `cancel_at` keys
struct Log {
    sent: Vec<Sent>,
    cancel_at: usize,
    cancel: CancelToken,
}

impl KeyInjector for Log {
    fn press(&mut self, modifier: Modifier) -> Result<(), ReplayError> {
        self.sent.push(Sent::Down(modifier));
        Ok(())
    }

    fn release(&mut self, modifier: Modifier) -> Result<(), ReplayError> {
        self.sent.push(Sent::Up(modifier));
        Ok(())
    }

    fn tap(&mut self, key: &KeyDescriptor) -> Result<(), ReplayError> {
        self.sent.push(Sent::Key(key.display_name()));
        let keys = self.sent.iter().filter(|s| matches!(s, Sent::Key(_))).count();
        if keys == self.cancel_at {
            self.cancel.cancel();
        }
        Ok(())
    }
}

fn settings() -> ReplaySettings {
    ReplaySettings {
        delay: Duration::from_millis(1),
        selection_pause: Duration::from_millis(1),
        hold_order: HoldOrder::ReleaseFirst,
    }
}

#[test]
fn replay_full_capture() {
    let mut lines = tap_all(0x00, &HELLO);
    lines.extend(tap_all(0x02, &[0x1E]));
    let events = decode(&lines);

    let cancel = CancelToken::new();
    let log = Log {
        sent: Vec::new(),
        cancel_at: usize::MAX,
        cancel: cancel.clone(),
    };
    let mut engine = ReplayEngine::new(log, AutoStart::default(), settings(), cancel);
    let outcome = engine.run(&events).unwrap();

    assert_eq!(outcome.status, ReplayStatus::Completed);
    assert_eq!(outcome.injected, 6);
    let sent = &engine.injector().sent;
    assert_eq!(sent[sent.len() - 3..], [
        Sent::Down(Modifier::Shift),
        Sent::Key("1".into()),
        Sent::Up(Modifier::Shift),
    ]);
    assert!(engine.held().is_empty());
}

#[test]
fn replay_cancel_releases_both_modifiers() {
    // ctrl+shift held through several keys
    let lines = tap_all(0x03, &[0x04, 0x05, 0x06, 0x07]);
    let events = decode(&lines);
    assert!(events
        .iter()
        .all(|e| e.modifiers == ModifierSet::CTRL | ModifierSet::SHIFT));

    let cancel = CancelToken::new();
    let log = Log {
        sent: Vec::new(),
        cancel_at: 2,
        cancel: cancel.clone(),
    };
    let mut engine = ReplayEngine::new(log, AutoStart::default(), settings(), cancel);
    let outcome = engine.run(&events).unwrap();

    assert_eq!(outcome.status, ReplayStatus::Cancelled);
    assert_eq!(outcome.injected, 2);
    assert_eq!(
        engine.injector().sent,
        vec![
            Sent::Down(Modifier::Ctrl),
            Sent::Down(Modifier::Shift),
            Sent::Key("A".into()),
            Sent::Key("B".into()),
            Sent::Up(Modifier::Shift),
            Sent::Up(Modifier::Ctrl),
        ]
    );
    assert!(engine.held().is_empty());
}
