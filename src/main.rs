//! USB Keyboard Decode - turn captured HID boot-keyboard reports into keystrokes
//!
//! Reads one report per line from stdin and writes the result in the mode
//! selected by the config file.

use anyhow::{Context, Result};
use std::io::{self, Read};

use usb_keyboard_decode::{
    config::Config,
    keyboard::{decode_capture, KeyEvent},
    output::{format_events, OutputMode, TextBufferSimulator},
    report::DecodeReport,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load().context("failed to load configuration")?;

    let mut capture = String::new();
    io::stdin()
        .read_to_string(&mut capture)
        .context("failed to read capture from stdin")?;

    let decoded = decode_capture(&capture)?;
    if !decoded.diagnostics.is_empty() {
        log::warn!(
            "{} key presses skipped, please look up the USB HID usage tables for the reported scan codes",
            decoded.diagnostics.len()
        );
    }

    match config.output.mode {
        OutputMode::Raw => println!("{}", format_events(&decoded.events)),
        OutputMode::Simulate => println!(
            "{}",
            TextBufferSimulator::run(config.output.environment, &decoded.events)
        ),
        OutputMode::Json => {
            let report = DecodeReport::new(&decoded);
            match &config.output.report_path {
                Some(path) => report
                    .export_json(path)
                    .with_context(|| format!("failed to write report to {}", path.display()))?,
                None => println!("{}", report.to_json()?),
            }
        }
        OutputMode::Replay => replay(&config, &decoded.events)?,
    }

    Ok(())
}

#[cfg(feature = "virtual-send")]
fn replay(config: &Config, events: &[KeyEvent]) -> Result<()> {
    use usb_keyboard_decode::replay::{
        parse_signal_key, spawn_stop_watcher, CancelToken, DeviceConsole, EnigoInjector,
        ReplayEngine, ReplayStatus,
    };

    let start_key = parse_signal_key(&config.replay.start_key)
        .with_context(|| format!("unknown start key {:?}", config.replay.start_key))?;
    let stop_key = parse_signal_key(&config.replay.stop_key)
        .with_context(|| format!("unknown stop key {:?}", config.replay.stop_key))?;

    // Ctrl-C and SIGTERM only flip the token; the engine releases modifiers before we exit
    let cancel = CancelToken::new();
    let interrupt = cancel.clone();
    ctrlc::set_handler(move || interrupt.cancel()).context("failed to install interrupt handler")?;

    let finished = CancelToken::new();
    let watcher = spawn_stop_watcher(stop_key, cancel.clone(), finished.clone());

    let injector = EnigoInjector::new()?;
    let console = DeviceConsole::new(start_key, stop_key);
    let mut engine = ReplayEngine::new(injector, console, config.replay.settings(), cancel);

    let result = engine.run(events);
    finished.cancel();
    let _ = watcher.join();

    let outcome = result?;
    match outcome.status {
        ReplayStatus::Completed => eprintln!("Replay complete: {} keys sent.", outcome.injected),
        ReplayStatus::Cancelled => eprintln!(
            "Replay stopped after {} of {} keys; all modifiers released.",
            outcome.injected,
            events.len()
        ),
    }
    Ok(())
}

#[cfg(not(feature = "virtual-send"))]
fn replay(_config: &Config, _events: &[KeyEvent]) -> Result<()> {
    anyhow::bail!("replay mode needs a build with the `virtual-send` feature")
}
