//! Integration tests for the periodic status publisher.
//!
//! The publisher samples actuator levels on the configured period (100 ms
//! in the reference panel) from the same owner context as the timers, so
//! snapshots are always internally consistent.

use crate::mock_out::{RecordingOutput, RecordingSink, RecordingStatus};

use iopanel::actuator::Level;
use iopanel::config::default_panel;
use iopanel::panel::Panel;

fn make_panel() -> Panel {
    Panel::new(&default_panel()).expect("reference config must validate")
}

#[test]
fn publishes_every_period_not_more() {
    let mut panel = make_panel();
    let mut out = RecordingOutput::new();
    let mut sink = RecordingSink::new();
    let mut status = RecordingStatus::new();

    // Owner loop at 10 ms, publisher period 100 ms.
    let mut now = 0;
    while now <= 1_000 {
        panel.tick(now, &mut out, &mut sink, &mut status).unwrap();
        now += 10;
    }

    // One report at t=0 plus one per full 100 ms period.
    assert_eq!(status.reports.len(), 11);
    assert_eq!(status.reports[0].at_ms, 0);
    assert_eq!(status.reports[1].at_ms, 100);
    assert_eq!(status.reports.last().unwrap().at_ms, 1_000);
}

#[test]
fn snapshot_tracks_actuator_levels() {
    let mut panel = make_panel();
    let mut out = RecordingOutput::new();
    let mut sink = RecordingSink::new();
    let mut status = RecordingStatus::new();

    panel.tick(0, &mut out, &mut sink, &mut status).unwrap();
    panel
        .on_input_transition("hs-02", true, 50, &mut out, &mut sink)
        .unwrap();
    panel.tick(100, &mut out, &mut sink, &mut status).unwrap();

    let before = &status.reports[0];
    let after = &status.reports[1];
    let lamp = |r: &iopanel::publisher::StatusReport| {
        r.actuators
            .iter()
            .find(|a| a.name == "pl-02")
            .map(|a| a.level)
    };
    assert_eq!(lamp(before), Some(Level::OFF));
    assert_eq!(lamp(after), Some(Level::ON));
}

#[test]
fn snapshot_covers_every_actuator() {
    let mut panel = make_panel();
    let mut out = RecordingOutput::new();
    let mut sink = RecordingSink::new();
    let mut status = RecordingStatus::new();

    panel.tick(0, &mut out, &mut sink, &mut status).unwrap();

    let names: Vec<&str> = status.reports[0]
        .actuators
        .iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"pl-01"));
    assert!(names.contains(&"pl-02"));
}

#[test]
fn status_keeps_flowing_after_output_fault() {
    let mut panel = make_panel();
    let mut out = RecordingOutput::new();
    let mut sink = RecordingSink::new();
    let mut status = RecordingStatus::new();

    panel
        .on_input_transition("hs-01", true, 0, &mut out, &mut sink)
        .unwrap();

    out.fail_next = true;
    let result = panel.tick(10_000, &mut out, &mut sink, &mut status);
    assert!(result.is_err());

    // The failing tick still produced a snapshot, and later ticks keep
    // publishing on schedule.
    assert_eq!(status.reports.len(), 1);
    panel.tick(10_100, &mut out, &mut sink, &mut status).unwrap();
    assert_eq!(status.reports.len(), 2);
}
