//! The replay loop and modifier-hold bookkeeping

use super::console::OperatorConsole;
use super::injector::KeyInjector;
use super::{CancelToken, ReplayError};
use crate::keyboard::{KeyEvent, Modifier, ModifierSet};
use crate::output::marker;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Order in which modifier changes are sent before a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldOrder {
    /// Drop stale modifiers, then assert new ones
    ReleaseFirst,
    /// Assert new modifiers, then drop stale ones
    PressFirst,
}

impl Default for HoldOrder {
    fn default() -> Self {
        if cfg!(target_os = "windows") {
            HoldOrder::PressFirst
        } else {
            HoldOrder::ReleaseFirst
        }
    }
}

/// Timing and ordering knobs for a replay run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySettings {
    /// Pause between injected keystrokes
    pub delay: Duration,
    /// How long the operator gets to perform a selection by hand
    pub selection_pause: Duration,
    pub hold_order: HoldOrder,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(50),
            selection_pause: Duration::from_secs(5),
            hold_order: HoldOrder::default(),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub status: ReplayStatus,
    /// Keys actually tapped on the target
    pub injected: usize,
}

impl ReplayOutcome {
    fn completed(injected: usize) -> Self {
        Self {
            status: ReplayStatus::Completed,
            injected,
        }
    }

    fn cancelled(injected: usize) -> Self {
        Self {
            status: ReplayStatus::Cancelled,
            injected,
        }
    }
}

/// Drives a [`KeyInjector`] from decoded events
pub struct ReplayEngine<I: KeyInjector, C: OperatorConsole> {
    injector: I,
    console: C,
    settings: ReplaySettings,
    cancel: CancelToken,
    /// Modifiers currently asserted on the target
    held: ModifierSet,
}

impl<I: KeyInjector, C: OperatorConsole> ReplayEngine<I, C> {
    pub fn new(injector: I, console: C, settings: ReplaySettings, cancel: CancelToken) -> Self {
        Self {
            injector,
            console,
            settings,
            cancel,
            held: ModifierSet::empty(),
        }
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn held(&self) -> ModifierSet {
        self.held
    }

    /// Replay `events`. Every held modifier is released before this returns,
    /// including on cancellation and on injector errors.
    pub fn run(&mut self, events: &[KeyEvent]) -> Result<ReplayOutcome, ReplayError> {
        let result = self.drive(events);
        let cleanup = self.release_all();
        let outcome = result?;
        cleanup?;

        match outcome.status {
            ReplayStatus::Completed => {
                log::info!("replay complete: {} keys injected", outcome.injected)
            }
            ReplayStatus::Cancelled => log::info!(
                "replay cancelled after {} of {} keys",
                outcome.injected,
                events.len()
            ),
        }
        Ok(outcome)
    }

    fn drive(&mut self, events: &[KeyEvent]) -> Result<ReplayOutcome, ReplayError> {
        let mut injected = 0;

        if !self.console.await_start(&self.cancel) {
            return Ok(ReplayOutcome::cancelled(injected));
        }

        for (index, event) in events.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Ok(ReplayOutcome::cancelled(injected));
            }

            if event.key.is_arrow() && event.modifiers.has(Modifier::Shift) {
                // Keyboard selection is unreliable when injected; hand it to the operator
                self.release_all()?;
                let combo = marker(event.modifiers, &event.key);
                self.console.prompt_manual(&combo, self.settings.selection_pause);
                if !self.cancel.sleep(self.settings.selection_pause) {
                    return Ok(ReplayOutcome::cancelled(injected));
                }
                continue;
            }

            self.sync_modifiers(event.modifiers)?;
            match self.injector.tap(&event.key) {
                Ok(()) => injected += 1,
                Err(ReplayError::UnsupportedKey(key)) => {
                    log::warn!("event {}: cannot inject {}, skipping", index, key)
                }
                Err(e) => return Err(e),
            }

            let is_last = index + 1 == events.len();
            if !is_last && !self.cancel.sleep(self.settings.delay) {
                return Ok(ReplayOutcome::cancelled(injected));
            }
        }

        Ok(ReplayOutcome::completed(injected))
    }

    /// Bring the held set in line with an event's modifiers
    fn sync_modifiers(&mut self, wanted: ModifierSet) -> Result<(), ReplayError> {
        let target = if self.injector.supports_altgr() {
            wanted
        } else {
            wanted.without_altgr()
        };
        let to_press = target - self.held;
        let to_release = self.held - target;

        match self.settings.hold_order {
            HoldOrder::ReleaseFirst => {
                self.release_set(to_release)?;
                self.press_set(to_press)
            }
            HoldOrder::PressFirst => {
                self.press_set(to_press)?;
                self.release_set(to_release)
            }
        }
    }

    fn press_set(&mut self, set: ModifierSet) -> Result<(), ReplayError> {
        for modifier in set.modifiers() {
            self.injector.press(modifier)?;
            self.held |= ModifierSet::from(modifier);
            log::debug!("holding {}", modifier);
        }
        Ok(())
    }

    fn release_set(&mut self, set: ModifierSet) -> Result<(), ReplayError> {
        for modifier in set.modifiers() {
            self.injector.release(modifier)?;
            self.held -= ModifierSet::from(modifier);
            log::debug!("released {}", modifier);
        }
        Ok(())
    }

    /// Release every held modifier. Each release is attempted even if an
    /// earlier one fails; the first error is returned.
    pub fn release_all(&mut self) -> Result<(), ReplayError> {
        let mut first_error = None;
        let held: Vec<Modifier> = self.held.modifiers().collect();
        for modifier in held.into_iter().rev() {
            if let Err(e) = self.injector.release(modifier) {
                log::error!("could not release {}: {}", modifier, e);
                first_error.get_or_insert(e);
            }
            self.held -= ModifierSet::from(modifier);
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<I: KeyInjector, C: OperatorConsole> Drop for ReplayEngine<I, C> {
    fn drop(&mut self) {
        if !self.held.is_empty() {
            log::warn!("replay engine dropped with modifiers held, releasing");
            let _ = self.release_all();
        }
    }
}
