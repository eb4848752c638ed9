//! Panel simulator — thin presentation layer over the sequencer core.
//!
//! Reads edge commands from stdin and drives the reference panel with the
//! simulated output port:
//!
//! ```text
//!   hs-01 press      deliver a press edge
//!   hs-01 release    deliver a release edge
//!   quit             exit
//! ```
//!
//! The stdin reader is the event-delivery context; it pushes transitions
//! into the lock-free queue. The owner loop below drains the queue, ticks
//! the timers, and lets the status publisher sample at its own period.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::{info, warn};

use iopanel::adapters::clock::MonotonicClock;
use iopanel::adapters::log_sink::{JsonStatusSink, LogEventSink};
use iopanel::adapters::sim::SimOutput;
use iopanel::config::{self, ChannelId};
use iopanel::panel::Panel;
use iopanel::queue;

/// Owner-loop pass interval. Much finer than any configured duration.
const LOOP_INTERVAL_MS: u64 = 10;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::default_panel();
    let mut panel = Panel::new(&config).map_err(|e| anyhow!("invalid panel config: {e}"))?;

    info!("iopanel v{} — panel simulator", env!("CARGO_PKG_VERSION"));
    info!("channels: {:?}", config.channels.iter().map(|c| c.name).collect::<Vec<_>>());
    info!("commands: '<channel> press', '<channel> release', 'quit'");

    // Name table for the reader thread; ids were assigned by validation.
    let channels: Vec<(&'static str, ChannelId)> = config
        .channels
        .iter()
        .filter_map(|c| panel.channel_id(c.name).map(|id| (c.name, id)))
        .collect();

    let running = Arc::new(AtomicBool::new(true));
    let reader_running = Arc::clone(&running);

    // Event-delivery context: parse stdin edges into the inbound queue.
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" {
                break;
            }
            match parse_edge(line, &channels) {
                Some((id, active)) => {
                    if !queue::push_input(id, active) {
                        warn!("input queue full — '{line}' dropped");
                    }
                }
                None => warn!("unrecognised command '{line}'"),
            }
        }
        reader_running.store(false, Ordering::Release);
    });

    // Owner loop: the single context that mutates engine state.
    let clock = MonotonicClock::new();
    let mut out = SimOutput::new();
    let mut sink = LogEventSink::new();
    let mut status = JsonStatusSink::new();

    while running.load(Ordering::Acquire) {
        let now_ms = clock.now_ms();
        queue::drain_inputs(|channel, active| {
            if let Err(e) = panel.on_input_edge(channel, active, now_ms, &mut out, &mut sink) {
                warn!("input edge rejected: {e}");
            }
        });
        if let Err(e) = panel.tick(now_ms, &mut out, &mut sink, &mut status) {
            warn!("tick: {e}");
        }
        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }

    info!("panel simulator stopped");
    Ok(())
}

fn parse_edge(line: &str, channels: &[(&'static str, ChannelId)]) -> Option<(ChannelId, bool)> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let active = match parts.next()? {
        "press" | "down" => true,
        "release" | "up" => false,
        _ => return None,
    };
    channels
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, id)| (*id, active))
}
