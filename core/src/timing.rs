use serde::{Deserialize, Serialize};

use crate::*;

/// Turns tick deltas into flow and placement decisions on simulated time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowClock {
    elapsed: Millis,
    start_delay: Millis,
    segment_delay: Millis,
    pipe_placement_delay: Millis,
    flow_started: bool,
    last_segment_at: Millis,
    last_placement_at: Millis,
}

impl FlowClock {
    pub const fn new(flow: &FlowConfig) -> Self {
        Self {
            elapsed: 0,
            start_delay: flow.start_delay,
            segment_delay: flow.segment_delay,
            pipe_placement_delay: flow.pipe_placement_delay,
            flow_started: false,
            last_segment_at: 0,
            last_placement_at: 0,
        }
    }

    pub fn advance(&mut self, delta: Millis) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    pub const fn elapsed_ms(&self) -> Millis {
        self.elapsed
    }

    pub const fn flow_started(&self) -> bool {
        self.flow_started
    }

    /// Time left before the water starts, zero once it has.
    pub const fn until_flow_start(&self) -> Millis {
        if self.flow_started {
            0
        } else {
            self.start_delay.saturating_sub(self.elapsed)
        }
    }

    /// True exactly once, on the first call after the start delay passed.
    pub fn poll_flow_start(&mut self) -> bool {
        if self.flow_started || self.elapsed <= self.start_delay {
            return false;
        }
        self.flow_started = true;
        self.last_segment_at = self.elapsed;
        true
    }

    /// True when a segment is due, and then not again until the next delay passed.
    pub fn poll_segment(&mut self, is_flowing: bool) -> bool {
        if !is_flowing || self.elapsed - self.last_segment_at < self.segment_delay {
            return false;
        }
        self.last_segment_at = self.elapsed;
        true
    }

    pub const fn can_place_pipe(&self) -> bool {
        self.elapsed - self.last_placement_at > self.pipe_placement_delay
    }

    pub fn record_placement(&mut self) {
        self.last_placement_at = self.elapsed;
    }
}
