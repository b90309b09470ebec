//! Operator interaction during replay
//!
//! Start and stop keys are read from the global keyboard state, so they
//! work regardless of which window has focus.

use super::CancelToken;
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Polling interval for the start and stop keys
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Where the engine waits for the operator and asks for manual steps
pub trait OperatorConsole {
    /// Block until the operator signals the start. Returns `false` when the
    /// run was cancelled first.
    fn await_start(&mut self, cancel: &CancelToken) -> bool;

    /// Ask the operator to perform `combo` by hand within `pause`
    fn prompt_manual(&mut self, combo: &str, pause: Duration);
}

/// Starts immediately and only logs prompts
#[derive(Debug, Default)]
pub struct AutoStart {
    /// Combinations the operator was asked to perform
    pub prompts: Vec<String>,
}

impl OperatorConsole for AutoStart {
    fn await_start(&mut self, cancel: &CancelToken) -> bool {
        !cancel.is_cancelled()
    }

    fn prompt_manual(&mut self, combo: &str, pause: Duration) {
        log::warn!("perform {} manually within {:?}", combo, pause);
        self.prompts.push(combo.to_string());
    }
}

/// Waits for a global start key and prints prompts to stderr
pub struct DeviceConsole {
    device_state: DeviceState,
    start_key: Keycode,
    stop_key: Keycode,
}

impl DeviceConsole {
    pub fn new(start_key: Keycode, stop_key: Keycode) -> Self {
        Self {
            device_state: DeviceState::new(),
            start_key,
            stop_key,
        }
    }

    fn is_down(&self, key: Keycode) -> bool {
        self.device_state.get_keys().contains(&key)
    }
}

impl OperatorConsole for DeviceConsole {
    fn await_start(&mut self, cancel: &CancelToken) -> bool {
        eprintln!(
            "Focus the target window, then press {:?} to start. Press {:?} or Ctrl-C to stop.",
            self.start_key, self.stop_key
        );

        while !self.is_down(self.start_key) {
            if !cancel.sleep(POLL_INTERVAL) {
                return false;
            }
        }
        // Let the start key go before injecting anything
        while self.is_down(self.start_key) {
            if !cancel.sleep(POLL_INTERVAL) {
                return false;
            }
        }

        log::info!("replay started");
        true
    }

    fn prompt_manual(&mut self, combo: &str, pause: Duration) {
        eprintln!(
            "Selection gestures are not replayed reliably: press {} yourself now ({}s).",
            combo,
            pause.as_secs()
        );
    }
}

/// Watch for the stop key on a background thread and cancel `cancel` when
/// it is pressed. The thread exits once either token is set.
pub fn spawn_stop_watcher(stop_key: Keycode, cancel: CancelToken, finished: CancelToken) -> JoinHandle<()> {
    thread::spawn(move || {
        let device_state = DeviceState::new();
        while !cancel.is_cancelled() && !finished.is_cancelled() {
            if device_state.get_keys().contains(&stop_key) {
                log::info!("stop key {:?} pressed", stop_key);
                cancel.cancel();
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
    })
}

/// Map a configured key name to a device_query key
pub fn parse_signal_key(name: &str) -> Option<Keycode> {
    let key = match name.trim().to_ascii_uppercase().as_str() {
        "F1" => Keycode::F1,
        "F2" => Keycode::F2,
        "F3" => Keycode::F3,
        "F4" => Keycode::F4,
        "F5" => Keycode::F5,
        "F6" => Keycode::F6,
        "F7" => Keycode::F7,
        "F8" => Keycode::F8,
        "F9" => Keycode::F9,
        "F10" => Keycode::F10,
        "F11" => Keycode::F11,
        "F12" => Keycode::F12,
        "ESC" | "ESCAPE" => Keycode::Escape,
        "INSERT" => Keycode::Insert,
        "HOME" => Keycode::Home,
        "END" => Keycode::End,
        "PAGEUP" | "PAGE UP" => Keycode::PageUp,
        "PAGEDOWN" | "PAGE DOWN" => Keycode::PageDown,
        _ => return None,
    };
    Some(key)
}
