//! End-to-end tests for the input -> rule -> timed output pipeline.
//!
//! These drive the reference panel through the public [`Panel`] API with
//! mock adapters and an explicit clock, covering the guarded pulse, the
//! blink cycle, the latch guard, and the cancellation races.

use crate::mock_out::{RecordingOutput, RecordingSink, RecordingStatus};

use iopanel::actuator::Level;
use iopanel::config::default_panel;
use iopanel::engine::sequence::CyclePhase;
use iopanel::events::PanelEvent;
use iopanel::panel::Panel;

struct Rig {
    panel: Panel,
    out: RecordingOutput,
    sink: RecordingSink,
    status: RecordingStatus,
}

impl Rig {
    fn new() -> Self {
        Self {
            panel: Panel::new(&default_panel()).expect("reference config must validate"),
            out: RecordingOutput::new(),
            sink: RecordingSink::new(),
            status: RecordingStatus::new(),
        }
    }

    fn press(&mut self, channel: &str, now_ms: u64) {
        self.panel
            .on_input_transition(channel, true, now_ms, &mut self.out, &mut self.sink)
            .expect("press must be accepted");
    }

    fn release(&mut self, channel: &str, now_ms: u64) {
        self.panel
            .on_input_transition(channel, false, now_ms, &mut self.out, &mut self.sink)
            .expect("release must be accepted");
    }

    fn tick(&mut self, now_ms: u64) {
        self.panel
            .tick(now_ms, &mut self.out, &mut self.sink, &mut self.status)
            .expect("tick must succeed");
    }

    /// Advance in 10 ms owner-loop steps, like the real binary does.
    fn run_until(&mut self, from_ms: u64, to_ms: u64) {
        let mut now = from_ms;
        while now <= to_ms {
            self.tick(now);
            now += 10;
        }
    }
}

// ── Guarded pulse ─────────────────────────────────────────────

#[test]
fn unguarded_press_drives_long_pulse() {
    let mut rig = Rig::new();

    rig.press("hs-01", 0);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(0.5)));

    rig.run_until(0, 9_990);
    assert_eq!(
        rig.panel.read_actuator("pl-01"),
        Some(Level::Scalar(0.5)),
        "reversal must not fire before the 10 s deadline"
    );

    rig.tick(10_000);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(-1.0)));

    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            PanelEvent::PulseStarted {
                duration_ms: 10_000,
                ..
            }
        )),
        1
    );
    assert_eq!(rig.sink.count(|e| matches!(e, PanelEvent::PulseEnded { .. })), 1);
}

#[test]
fn engaged_latch_selects_short_pulse_branch() {
    let mut rig = Rig::new();

    // Engage the latch, then release it. The guard flag persists.
    rig.press("hs-03", 0);
    rig.release("hs-03", 50);

    rig.press("hs-01", 100);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(1.0)));

    rig.run_until(100, 5_090);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(1.0)));
    rig.tick(5_100);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(-1.0)));
}

#[test]
fn disengaging_latch_restores_long_branch() {
    let mut rig = Rig::new();

    rig.press("hs-03", 0); // engage
    rig.release("hs-03", 50);
    rig.press("hs-03", 100); // second press disengages
    rig.release("hs-03", 150);

    rig.press("hs-01", 200);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(0.5)));
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            PanelEvent::PulseStarted {
                duration_ms: 10_000,
                ..
            }
        )),
        1
    );
}

#[test]
fn retrigger_during_pulse_replaces_reversal() {
    let mut rig = Rig::new();
    let servo = rig.panel.actuator_id("pl-01").expect("pl-01 exists");

    rig.press("hs-01", 0); // unguarded: reverses at 10 000
    rig.release("hs-01", 500);

    rig.press("hs-03", 4_000); // engage the latch mid-pulse
    rig.press("hs-01", 6_000); // re-trigger: guarded branch, reverses at 11 000

    assert_eq!(rig.panel.engine().armed_timers(servo), 1);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(1.0)));

    // The original deadline passes without effect.
    rig.tick(10_000);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(1.0)));

    rig.tick(11_000);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(-1.0)));
}

#[test]
fn release_never_cuts_pulse_short() {
    let mut rig = Rig::new();

    rig.press("hs-01", 0);
    rig.release("hs-01", 20);

    rig.run_until(0, 9_990);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(0.5)));
}

// ── Blink cycle ───────────────────────────────────────────────

#[test]
fn cycle_runs_three_on_one_off_indefinitely() {
    let mut rig = Rig::new();

    rig.press("hs-02", 0);
    rig.release("hs-02", 50);
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::ON));

    // Two full periods: on [0,3000), off [3000,4000), on [4000,7000), ...
    rig.tick(2_990);
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::ON));
    rig.tick(3_000);
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::OFF));
    rig.tick(4_000);
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::ON));
    rig.tick(7_000);
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::OFF));
    rig.tick(8_000);
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::ON));
}

#[test]
fn second_toggle_stops_cycle_immediately() {
    let mut rig = Rig::new();
    let lamp = rig.panel.actuator_id("pl-02").expect("pl-02 exists");

    rig.press("hs-02", 0);
    rig.release("hs-02", 50);
    rig.tick(3_000); // now in the off phase
    rig.tick(4_000); // back on

    // Stop mid-on-phase.
    rig.press("hs-02", 5_500);
    assert_eq!(rig.panel.cycle_phase("pl-02"), Some(CyclePhase::Stopped));
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::OFF));
    assert_eq!(rig.panel.engine().armed_timers(lamp), 0);

    // The cycle stays down; the stale flip deadline (7 000) does nothing.
    let writes = rig.out.write_count(lamp);
    rig.run_until(5_510, 20_000);
    assert_eq!(rig.out.write_count(lamp), writes);
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::OFF));
}

#[test]
fn stop_request_at_flip_deadline_wins_the_race() {
    let mut rig = Rig::new();

    rig.press("hs-02", 0);
    rig.release("hs-02", 50);

    // The edge arrives at the flip's exact deadline. Edges drain before
    // timers in the owner loop, so the stop must win and the due flip
    // must be discarded, not dispatched.
    rig.press("hs-02", 3_000);
    rig.tick(3_000);

    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::OFF));
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, PanelEvent::CyclePhaseChanged { .. })),
        0
    );
}

#[test]
fn pulse_and_cycle_run_independently() {
    let mut rig = Rig::new();

    rig.press("hs-02", 0); // cycle on
    rig.press("hs-01", 1_000); // pulse starts mid-cycle

    rig.tick(3_000); // cycle flips off; pulse untouched
    assert_eq!(rig.panel.read_actuator("pl-02"), Some(Level::OFF));
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(0.5)));

    rig.tick(11_000); // pulse reverses; cycle keeps going
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(-1.0)));
    assert_ne!(rig.panel.cycle_phase("pl-02"), Some(CyclePhase::Stopped));
}

// ── Faults and edge cases ─────────────────────────────────────

#[test]
fn unknown_channel_is_rejected_without_side_effects() {
    let mut rig = Rig::new();

    let result = rig
        .panel
        .on_input_transition("hs-42", true, 0, &mut rig.out, &mut rig.sink);
    assert!(result.is_err());
    assert!(rig.out.writes.is_empty());
    assert!(rig.sink.events.is_empty());
}

#[test]
fn failed_reversal_write_abandons_pulse_and_reports_fault() {
    let mut rig = Rig::new();
    let servo = rig.panel.actuator_id("pl-01").expect("pl-01 exists");

    rig.press("hs-01", 0);

    rig.out.fail_next = true;
    let result = rig
        .panel
        .tick(10_000, &mut rig.out, &mut rig.sink, &mut rig.status);
    assert!(result.is_err());
    assert_eq!(rig.sink.count(|e| matches!(e, PanelEvent::OutputFault { .. })), 1);
    assert_eq!(rig.panel.engine().armed_timers(servo), 0);

    // The panel keeps running: a fresh press starts a new pulse.
    rig.press("hs-01", 11_000);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(0.5)));
}

#[test]
fn duplicate_press_does_not_restart_pulse() {
    let mut rig = Rig::new();
    let servo = rig.panel.actuator_id("pl-01").expect("pl-01 exists");

    rig.press("hs-01", 0);
    rig.press("hs-01", 1_000); // no release in between: dropped

    assert_eq!(rig.out.write_count(servo), 1);
    assert_eq!(
        rig.sink.count(|e| matches!(e, PanelEvent::PulseStarted { .. })),
        1
    );
    // Reversal still fires on the original deadline.
    rig.tick(10_000);
    assert_eq!(rig.panel.read_actuator("pl-01"), Some(Level::Scalar(-1.0)));
}
