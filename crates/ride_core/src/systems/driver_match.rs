//! DriverMatch: the simulated dispatch assigns a driver to a searching session.
//!
//! Fires once per session. If the roster is empty the session records [MatchFailed] and its
//! countdown is disarmed, since no driver is on the way.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};
use tracing::{info, warn};

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::DriverRoster;
use crate::ecs::{AssignedDriver, Cancelled, MatchFailed, RideState, RideStatus, SessionTimers};
use crate::telemetry::SessionTelemetry;

pub fn driver_match_system(
    event: Res<CurrentEvent>,
    roster: Res<DriverRoster>,
    mut commands: Commands,
    mut clock: ResMut<SimulationClock>,
    mut telemetry: ResMut<SessionTelemetry>,
    mut sessions: Query<(&mut RideState, &mut SessionTimers, Option<&Cancelled>)>,
) {
    if event.0.kind != EventKind::DriverMatch {
        return;
    }

    let Some(EventSubject::Session(session)) = event.0.subject else {
        return;
    };
    let Ok((mut state, mut timers, cancelled)) = sessions.get_mut(session) else {
        return;
    };
    if timers.driver_match != Some(event.0.timer) {
        return;
    }
    timers.driver_match = None;
    if cancelled.is_some() || state.status != RideStatus::Searching {
        return;
    }

    let now = clock.now();
    match roster.first_available() {
        Some(driver) => {
            let from = state.status;
            state.status = RideStatus::Confirmed;
            commands
                .entity(session)
                .insert(AssignedDriver(driver.clone()));
            telemetry.record_transition(session, from, RideStatus::Confirmed, now);
            info!(
                ?session,
                now,
                driver = %driver.name,
                plate = %driver.vehicle.plate,
                "driver matched"
            );
        }
        None => {
            if let Some(countdown) = timers.countdown.take() {
                clock.cancel(countdown);
            }
            commands.entity(session).insert(MatchFailed { at: now });
            telemetry.match_failures = telemetry.match_failures.saturating_add(1);
            warn!(?session, now, "driver match failed: roster is empty");
        }
    }
}
