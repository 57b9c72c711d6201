#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use ride_core::runner::{ride_schedule, run_next_event, run_until, run_until_empty};

/// Helper that owns a reusable `Schedule` so tests can step or drain the event queue.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: ride_schedule(),
        }
    }

    /// Run a single event (returns `true` if an event was processed).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_event(world, &mut self.schedule)
    }

    /// Process every event due at or before `until_ms`.
    pub fn run_until(&mut self, world: &mut World, until_ms: u64) -> usize {
        run_until(world, &mut self.schedule, until_ms)
    }

    /// Drive the world until the event queue is empty (or an upper limit is hit).
    pub fn run_full(&mut self, world: &mut World) -> usize {
        run_until_empty(world, &mut self.schedule, 10_000)
    }
}
