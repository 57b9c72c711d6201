//! SessionStarted: arm the one-shot driver match and the repeating pickup countdown.

use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::SessionConfig;
use crate::ecs::{Cancelled, PickupEta, RideState, RideStatus, SessionTimers};
use crate::telemetry::SessionTelemetry;

pub fn session_started_system(
    event: Res<CurrentEvent>,
    config: Res<SessionConfig>,
    mut clock: ResMut<SimulationClock>,
    mut telemetry: ResMut<SessionTelemetry>,
    mut sessions: Query<(&RideState, &PickupEta, &mut SessionTimers, Option<&Cancelled>)>,
) {
    if event.0.kind != EventKind::SessionStarted {
        return;
    }

    let Some(EventSubject::Session(session)) = event.0.subject else {
        return;
    };
    let Ok((state, eta, mut timers, cancelled)) = sessions.get_mut(session) else {
        return;
    };
    if cancelled.is_some() || state.status != RideStatus::Searching || timers.is_armed() {
        return;
    }

    let subject = Some(EventSubject::Session(session));
    timers.driver_match = Some(clock.schedule_in(
        config.driver_match_delay_ms,
        EventKind::DriverMatch,
        subject,
    ));
    // Nothing to count down from a zero estimate.
    if eta.minutes > 0 {
        timers.countdown = Some(clock.schedule_in(
            config.countdown_period_ms,
            EventKind::CountdownTick,
            subject,
        ));
    }
    telemetry.sessions_started = telemetry.sessions_started.saturating_add(1);

    debug!(
        ?session,
        now = clock.now(),
        match_delay_ms = config.driver_match_delay_ms,
        countdown_period_ms = config.countdown_period_ms,
        eta_minutes = eta.minutes,
        "session timers armed"
    );
}
