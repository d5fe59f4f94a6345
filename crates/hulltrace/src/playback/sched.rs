//! In-process scheduler: timers queue up until the host drains them.

use std::collections::VecDeque;
use std::time::Duration;

use super::types::{Scheduler, TimerId};

/// FIFO timer queue. The host pops a due timer, waits its delay (or not, in
/// tests) and hands the id back to the controller.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<(TimerId, Duration)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (not cancelled) timers.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn peek(&self) -> Option<(TimerId, Duration)> {
        self.queue.front().copied()
    }

    /// Remove and return the oldest live timer.
    pub fn pop_due(&mut self) -> Option<(TimerId, Duration)> {
        self.queue.pop_front()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push_back((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|(t, _)| *t != id);
    }
}
