//! Rider cancellation: terminal for the session; disarms both timers before returning.
//!
//! Cancellation is user-driven rather than timer-driven, so it runs directly against the
//! world instead of going through the event queue.

use bevy_ecs::prelude::{Entity, World};
use tracing::info;

use crate::clock::{EventSubject, SimulationClock};
use crate::ecs::{Cancelled, RideState, RideStatus, SessionTimers};
use crate::error::{Result, RideError};
use crate::telemetry::SessionTelemetry;

/// What the session looked like at the moment it was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelReceipt {
    pub status_at_cancel: RideStatus,
    pub cancelled_at_ms: u64,
    /// Pending timer events removed from the queue.
    pub timers_disarmed: usize,
}

/// Drop every pending event of `session` and clear its timer handles.
pub fn disarm_session_timers(world: &mut World, session: Entity) -> usize {
    let removed = world
        .get_resource_mut::<SimulationClock>()
        .map(|mut clock| clock.cancel_subject(EventSubject::Session(session)))
        .unwrap_or(0);
    if let Some(mut timers) = world.get_mut::<SessionTimers>(session) {
        *timers = SessionTimers::default();
    }
    removed
}

pub fn cancel_session(world: &mut World, session: Entity) -> Result<CancelReceipt> {
    let status = match world.get_entity(session) {
        Some(entity) if entity.contains::<Cancelled>() => return Err(RideError::SessionExpired),
        Some(entity) => entity
            .get::<RideState>()
            .map(|state| state.status)
            .ok_or(RideError::SessionExpired)?,
        None => return Err(RideError::SessionExpired),
    };

    let now = world.resource::<SimulationClock>().now();
    let timers_disarmed = disarm_session_timers(world, session);
    world.entity_mut(session).insert(Cancelled { at: now });
    if let Some(mut telemetry) = world.get_resource_mut::<SessionTelemetry>() {
        telemetry.sessions_cancelled = telemetry.sessions_cancelled.saturating_add(1);
    }

    info!(?session, now, %status, timers_disarmed, "ride cancelled");
    Ok(CancelReceipt {
        status_at_cancel: status,
        cancelled_at_ms: now,
        timers_disarmed,
    })
}
