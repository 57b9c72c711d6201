//! CountdownTick: decrement the pickup estimate by one minute and re-arm until it hits zero.

use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject, SimulationClock};
use crate::config::SessionConfig;
use crate::ecs::{Cancelled, PickupEta, SessionTimers};
use crate::telemetry::SessionTelemetry;

pub fn countdown_tick_system(
    event: Res<CurrentEvent>,
    config: Res<SessionConfig>,
    mut clock: ResMut<SimulationClock>,
    mut telemetry: ResMut<SessionTelemetry>,
    mut sessions: Query<(&mut PickupEta, &mut SessionTimers, Option<&Cancelled>)>,
) {
    if event.0.kind != EventKind::CountdownTick {
        return;
    }

    let Some(EventSubject::Session(session)) = event.0.subject else {
        return;
    };
    let Ok((mut eta, mut timers, cancelled)) = sessions.get_mut(session) else {
        return;
    };
    if timers.countdown != Some(event.0.timer) {
        return;
    }
    timers.countdown = None;
    if cancelled.is_some() {
        return;
    }

    eta.minutes = eta.minutes.saturating_sub(1);
    telemetry.countdown_ticks = telemetry.countdown_ticks.saturating_add(1);

    if eta.minutes > 0 {
        timers.countdown = Some(clock.schedule_in(
            config.countdown_period_ms,
            EventKind::CountdownTick,
            Some(EventSubject::Session(session)),
        ));
    }

    debug!(
        ?session,
        now = clock.now(),
        eta_minutes = eta.minutes,
        rearmed = timers.countdown.is_some(),
        "countdown tick"
    );
}
