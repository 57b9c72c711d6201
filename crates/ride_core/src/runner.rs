//! Session runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each step
//! pops the next event from [SimulationClock], inserts it as [CurrentEvent],
//! then runs the schedule.

use bevy_ecs::prelude::Res;
use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::systems::{
    countdown_tick::countdown_tick_system, driver_match::driver_match_system,
    session_started::session_started_system,
};
use crate::telemetry::SessionTelemetry;

fn is_session_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::SessionStarted)
        .unwrap_or(false)
}

fn is_driver_match(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DriverMatch)
        .unwrap_or(false)
}

fn is_countdown_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::CountdownTick)
        .unwrap_or(false)
}

/// Runs one step: pops the next event, inserts it as [CurrentEvent], then runs the schedule.
/// Returns `false` if the clock was empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    run_next_event_with_hook(world, schedule, |_, _| {})
}

/// Runs one step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));

    if let Some(mut telemetry) = world.get_resource_mut::<SessionTelemetry>() {
        telemetry.record_event(event.kind);
    }

    schedule.run(world);
    hook(world, &event);
    true
}

/// Processes every event due at or before `until_ms`, then moves the clock to `until_ms`.
/// Returns the number of events processed.
pub fn run_until(world: &mut World, schedule: &mut Schedule, until_ms: u64) -> usize {
    run_until_with_hook(world, schedule, until_ms, |_, _| {})
}

/// [run_until], invoking `hook` after each processed event.
pub fn run_until_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    until_ms: u64,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    loop {
        let due = world
            .resource::<SimulationClock>()
            .next_event_time()
            .is_some_and(|ts| ts <= until_ms);
        if !due || !run_next_event_with_hook(world, schedule, &mut hook) {
            break;
        }
        steps += 1;
    }
    world.resource_mut::<SimulationClock>().advance_to(until_ms);
    steps
}

/// Runs steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Builds the session schedule: one system per event kind plus [apply_deferred] so that
/// inserted components (e.g. [crate::ecs::AssignedDriver]) are visible after the step.
pub fn ride_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            session_started_system.run_if(is_session_started),
            driver_match_system.run_if(is_driver_match),
            countdown_tick_system.run_if(is_countdown_tick),
            apply_deferred,
        )
            .chain(),
    );
    schedule
}
