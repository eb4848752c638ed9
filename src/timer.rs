//! Software timer table with generation-counted handles.
//!
//! Keys of type `K` (the engine uses actuator ids) are armed against a
//! monotonic millisecond deadline. The owner loop calls [`TimerService::poll`]
//! each pass; due keys are removed and returned in deadline order, and the
//! caller dispatches them one at a time. Because arming, cancelling, and
//! polling all happen in that single owner context, no two fires for the
//! same actuator can ever run concurrently.
//!
//! ## Cancellation
//!
//! [`TimerService::cancel`] is idempotent and safe on already-fired or
//! already-cancelled handles. Each arm gets a fresh generation number, so a
//! stale handle can never cancel a slot that has since been re-armed, and a
//! cancelled timer can never dispatch even if its deadline already passed.
//!
//! ## Repetition
//!
//! There is no fixed-period repeat mode: a repeating timer is expressed by
//! re-arming from the fire handler, which lets each phase choose its own
//! delay (the cycle rules need unequal on/off durations).

/// Opaque reference to one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    slot: u8,
    generation: u32,
}

#[derive(Debug, Clone, Copy)]
struct Slot<K> {
    key: K,
    deadline_ms: u64,
    generation: u32,
}

/// Fixed-capacity one-shot timer table.
pub struct TimerService<K: Copy + PartialEq, const N: usize> {
    slots: [Option<Slot<K>>; N],
    next_generation: u32,
}

impl<K: Copy + PartialEq, const N: usize> TimerService<K, N> {
    pub fn new() -> Self {
        Self {
            slots: [None; N],
            next_generation: 1,
        }
    }

    /// Arm a one-shot timer for `key` to fire `delay_ms` after `now_ms`.
    /// Returns `None` if every slot is occupied.
    pub fn schedule_once(&mut self, key: K, delay_ms: u64, now_ms: u64) -> Option<TimerHandle> {
        let free = self.slots.iter().position(Option::is_none)?;
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        self.slots[free] = Some(Slot {
            key,
            deadline_ms: now_ms.saturating_add(delay_ms),
            generation,
        });
        Some(TimerHandle {
            slot: free as u8,
            generation,
        })
    }

    /// Disarm the timer behind `handle`. No-op if it already fired, was
    /// already cancelled, or the slot has been re-armed since.
    pub fn cancel(&mut self, handle: TimerHandle) {
        let idx = handle.slot as usize;
        if idx >= N {
            return;
        }
        if let Some(slot) = &self.slots[idx] {
            if slot.generation == handle.generation {
                self.slots[idx] = None;
            }
        }
    }

    /// Whether `handle` still refers to an armed timer.
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        let idx = handle.slot as usize;
        idx < N
            && self.slots[idx]
                .as_ref()
                .is_some_and(|s| s.generation == handle.generation)
    }

    /// Number of armed timers for `key`. The engine's single-timer-per-
    /// actuator invariant keeps this at most 1; tests assert on it.
    pub fn armed_count(&self, key: K) -> usize {
        self.slots
            .iter()
            .filter(|s| s.as_ref().is_some_and(|s| s.key == key))
            .count()
    }

    /// Earliest pending deadline, if any. Lets the owner loop sleep until
    /// something is actually due.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.slots
            .iter()
            .flatten()
            .map(|s| s.deadline_ms)
            .min()
    }

    /// Remove and return every key whose deadline is at or before `now_ms`,
    /// ordered by deadline. The caller dispatches them serially.
    pub fn poll(&mut self, now_ms: u64) -> heapless::Vec<K, N> {
        let mut fired = heapless::Vec::new();
        loop {
            let mut best: Option<(usize, u64)> = None;
            for (i, s) in self.slots.iter().enumerate() {
                if let Some(slot) = s {
                    if slot.deadline_ms <= now_ms
                        && best.is_none_or(|(_, d)| slot.deadline_ms < d)
                    {
                        best = Some((i, slot.deadline_ms));
                    }
                }
            }
            let Some((idx, _)) = best else { break };
            if let Some(slot) = self.slots[idx].take() {
                let _ = fired.push(slot.key);
            }
        }
        fired
    }
}

impl<K: Copy + PartialEq, const N: usize> Default for TimerService<K, N> {
    fn default() -> Self {
        Self::new()
    }
}
