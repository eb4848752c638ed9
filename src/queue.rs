//! Lock-free inbound input-event queue.
//!
//! Input transitions are produced by the event-delivery context (hardware
//! edge callbacks, a GUI thread, a stdin reader) and consumed by the single
//! owner loop that drives the rule engine. A fixed-capacity SPSC ring of
//! packed bytes decouples the two contexts without locks:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ edge callback│────▶│  Input Queue │────▶│  Owner loop  │
//! │ GUI / stdin  │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::{ChannelId, MAX_CHANNELS};

/// Maximum number of pending transitions. Power of 2 for cheap modulo.
const INPUT_QUEUE_CAP: usize = 32;

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// Producer (push_input): edge-delivery context — one writer.
// Consumer (drain_inputs): owner-loop context — one reader.
// Entries are packed as (channel_index << 1) | active_bit.

static INPUT_HEAD: AtomicU8 = AtomicU8::new(0);
static INPUT_TAIL: AtomicU8 = AtomicU8::new(0);
// SAFETY: INPUT_BUFFER is accessed exclusively through the SPSC discipline
// below: the producer writes a cell before publishing it via the Release
// store to INPUT_HEAD, and the consumer reads it only after the Acquire
// load observes that store. No cell is ever touched by both sides at once.
static mut INPUT_BUFFER: [u8; INPUT_QUEUE_CAP] = [0; INPUT_QUEUE_CAP];

/// Push one transition into the queue.
/// Safe to call from an edge-callback context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_input(channel: ChannelId, active: bool) -> bool {
    debug_assert!(channel.index() < MAX_CHANNELS);
    let head = INPUT_HEAD.load(Ordering::Relaxed);
    let tail = INPUT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % INPUT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    let packed = ((channel.index() as u8) << 1) | u8::from(active);
    // SAFETY: single producer; the cell at `head` is not visible to the
    // consumer until the Release store below.
    unsafe {
        INPUT_BUFFER[head as usize] = packed;
    }

    INPUT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next transition. Called from the owner loop (single consumer).
pub fn pop_input() -> Option<(ChannelId, bool)> {
    let tail = INPUT_TAIL.load(Ordering::Relaxed);
    let head = INPUT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    // SAFETY: single consumer; the Acquire load above guarantees the cell
    // at `tail` was fully written before it became visible.
    let packed = unsafe { INPUT_BUFFER[tail as usize] };
    INPUT_TAIL.store((tail + 1) % INPUT_QUEUE_CAP as u8, Ordering::Release);

    let channel = ChannelId((packed >> 1) as usize);
    Some((channel, packed & 1 == 1))
}

/// Drain all pending transitions into a handler, in FIFO order.
pub fn drain_inputs(mut handler: impl FnMut(ChannelId, bool)) {
    while let Some((channel, active)) = pop_input() {
        handler(channel, active);
    }
}

/// Number of pending transitions.
pub fn queue_len() -> usize {
    let head = INPUT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = INPUT_TAIL.load(Ordering::Relaxed) as usize;
    (head + INPUT_QUEUE_CAP - tail) % INPUT_QUEUE_CAP
}
