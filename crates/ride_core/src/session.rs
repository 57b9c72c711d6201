//! Ride sessions: booking a ride spawns a session entity; [RideSession] owns one session
//! together with its world and schedule, and exposes read-only snapshots plus `cancel()`.
//!
//! Both timers live on the session's clock. They are disarmed on cancel and again when the
//! [RideSession] is dropped, so no callback can act on a disposed session.

use std::fmt;

use bevy_ecs::prelude::{Entity, Schedule, World};
use serde::Serialize;
use tracing::{debug, info};

use crate::booking::BookingRequest;
use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::config::{RideConfig, SessionConfig};
use crate::ecs::{
    AssignedDriver, Cancelled, DriverProfile, MatchFailed, PickupEta, RideState, RideStatus,
    SessionTimers,
};
use crate::error::{Result, RideError};
use crate::runner::{ride_schedule, run_next_event, run_until, run_until_empty};
use crate::systems::session_cancel::{cancel_session, disarm_session_timers, CancelReceipt};
use crate::telemetry::SessionTelemetry;

/// Inserts the resources a session world needs. Existing resources are left untouched.
pub fn init_session_world(world: &mut World, config: &RideConfig) {
    if !world.contains_resource::<SimulationClock>() {
        world.insert_resource(SimulationClock::default());
    }
    if !world.contains_resource::<SessionTelemetry>() {
        world.insert_resource(SessionTelemetry::default());
    }
    world.insert_resource(config.session);
    world.insert_resource(config.fare);
    world.insert_resource(config.drivers.clone());
}

/// Spawns a searching session and queues its SessionStarted event at the current time.
pub fn spawn_session(world: &mut World, booking: BookingRequest) -> Entity {
    let now = world.resource::<SimulationClock>().now();
    let initial_eta = world
        .get_resource::<SessionConfig>()
        .map(|config| config.initial_eta_minutes)
        .unwrap_or_else(|| SessionConfig::default().initial_eta_minutes);

    info!(
        pickup = %booking.pickup,
        dropoff = %booking.dropoff,
        ride_type = %booking.ride_type,
        "booking ride"
    );
    let session = world
        .spawn((
            RideState {
                status: RideStatus::Searching,
                booking,
                booked_at: now,
            },
            PickupEta {
                minutes: initial_eta,
            },
            SessionTimers::default(),
        ))
        .id();

    world.resource_mut::<SimulationClock>().schedule_at(
        now,
        EventKind::SessionStarted,
        Some(EventSubject::Session(session)),
    );
    session
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub status: RideStatus,
    pub estimated_time_minutes: u32,
    pub driver: Option<DriverProfile>,
    pub cancelled: bool,
    pub match_failed: bool,
    pub now_ms: u64,
}

impl SessionSnapshot {
    /// What a session reads as once its entity no longer exists: ended, nothing pending.
    pub fn torn_down(now_ms: u64) -> Self {
        Self {
            status: RideStatus::Searching,
            estimated_time_minutes: 0,
            driver: None,
            cancelled: true,
            match_failed: false,
            now_ms,
        }
    }

    /// Status text shown to the rider.
    pub fn status_line(&self) -> String {
        if self.cancelled {
            return "Ride cancelled".to_string();
        }
        if self.match_failed {
            return "No drivers available".to_string();
        }
        match self.status {
            RideStatus::Searching => "Searching for a driver...".to_string(),
            RideStatus::Confirmed => {
                let unit = if self.estimated_time_minutes == 1 {
                    "minute"
                } else {
                    "minutes"
                };
                format!("Driver arrives in {} {}", self.estimated_time_minutes, unit)
            }
            reserved => format!("Ride {}", reserved),
        }
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_line())
    }
}

/// Snapshot of `session` in `world`, or `None` if the entity is gone.
pub fn snapshot_session(world: &World, session: Entity) -> Option<SessionSnapshot> {
    let entity = world.get_entity(session)?;
    let state = entity.get::<RideState>()?;
    Some(SessionSnapshot {
        status: state.status,
        estimated_time_minutes: entity.get::<PickupEta>().map_or(0, |eta| eta.minutes),
        driver: entity.get::<AssignedDriver>().map(|d| d.0.clone()),
        cancelled: entity.contains::<Cancelled>(),
        match_failed: entity.contains::<MatchFailed>(),
        now_ms: world.resource::<SimulationClock>().now(),
    })
}

/// One ride session with its own clock and schedule.
pub struct RideSession {
    world: World,
    schedule: Schedule,
    session: Entity,
}

impl RideSession {
    /// Books a ride with the default config.
    pub fn book(booking: BookingRequest) -> Self {
        let mut world = World::new();
        init_session_world(&mut world, &RideConfig::default());
        Self::start(world, booking)
    }

    pub fn book_with_config(config: &RideConfig, booking: BookingRequest) -> Result<Self> {
        config.validate()?;
        let mut world = World::new();
        init_session_world(&mut world, config);
        Ok(Self::start(world, booking))
    }

    fn start(mut world: World, booking: BookingRequest) -> Self {
        let session = spawn_session(&mut world, booking);
        let mut schedule = ride_schedule();
        // Arms the timers at t = now.
        run_next_event(&mut world, &mut schedule);
        Self {
            world,
            schedule,
            session,
        }
    }

    pub fn id(&self) -> Entity {
        self.session
    }

    pub fn now_ms(&self) -> u64 {
        self.world.resource::<SimulationClock>().now()
    }

    /// Current snapshot. A session whose entity is gone reads as [SessionSnapshot::torn_down].
    pub fn snapshot(&self) -> SessionSnapshot {
        snapshot_session(&self.world, self.session)
            .unwrap_or_else(|| SessionSnapshot::torn_down(self.now_ms()))
    }

    pub fn status(&self) -> RideStatus {
        self.snapshot().status
    }

    pub fn booking(&self) -> Option<&BookingRequest> {
        self.state().map(|state| &state.booking)
    }

    pub fn estimated_time_minutes(&self) -> u32 {
        self.snapshot().estimated_time_minutes
    }

    /// The assigned driver, or why there is none.
    pub fn driver(&self) -> Result<&DriverProfile> {
        if self.is_cancelled() {
            return Err(RideError::SessionExpired);
        }
        if let Some(driver) = self.world.get::<AssignedDriver>(self.session) {
            return Ok(&driver.0);
        }
        if self.world.get::<MatchFailed>(self.session).is_some() {
            return Err(RideError::DriverMatchFailed);
        }
        Err(RideError::DriverMatchPending)
    }

    pub fn is_cancelled(&self) -> bool {
        self.snapshot().cancelled
    }

    /// `true` while the session has not been cancelled.
    pub fn is_active(&self) -> bool {
        !self.is_cancelled()
    }

    /// Number of timer events still queued for this session.
    pub fn pending_timers(&self) -> usize {
        self.world
            .resource::<SimulationClock>()
            .pending_for(EventSubject::Session(self.session))
    }

    /// Advances simulated time by `delta_ms`, firing every timer that comes due.
    /// Returns the number of events processed.
    pub fn advance_by(&mut self, delta_ms: u64) -> usize {
        let until = self.now_ms().saturating_add(delta_ms);
        self.advance_to(until)
    }

    pub fn advance_to(&mut self, until_ms: u64) -> usize {
        run_until(&mut self.world, &mut self.schedule, until_ms)
    }

    /// Fires timers until none remain (or `max_steps` events have run).
    pub fn run_until_idle(&mut self, max_steps: usize) -> usize {
        run_until_empty(&mut self.world, &mut self.schedule, max_steps)
    }

    pub fn cancel(&mut self) -> Result<CancelReceipt> {
        cancel_session(&mut self.world, self.session)
    }

    pub fn telemetry(&self) -> &SessionTelemetry {
        self.world.resource::<SessionTelemetry>()
    }

    /// Tears the session down and hands back its world. Both timers are disarmed first,
    /// the same way dropping the session does.
    pub fn into_world(mut self) -> World {
        self.release_timers();
        std::mem::replace(&mut self.world, World::new())
    }

    fn release_timers(&mut self) -> usize {
        let disarmed = disarm_session_timers(&mut self.world, self.session);
        debug!(session = ?self.session, disarmed, "ride session torn down");
        disarmed
    }

    fn state(&self) -> Option<&RideState> {
        self.world.get::<RideState>(self.session)
    }
}

impl fmt::Debug for RideSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RideSession")
            .field("session", &self.session)
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl Drop for RideSession {
    fn drop(&mut self) {
        self.release_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ONE_MIN_MS;

    fn booking() -> BookingRequest {
        BookingRequest::to("456 Market St").with_pickup("123 Main St")
    }

    #[test]
    fn new_session_is_searching_without_driver() {
        let session = RideSession::book(booking());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.status, RideStatus::Searching);
        assert!(snapshot.driver.is_none());
        assert_eq!(snapshot.estimated_time_minutes, 5);
        assert_eq!(snapshot.status_line(), "Searching for a driver...");
        assert_eq!(session.pending_timers(), 2);
        assert!(matches!(session.driver(), Err(RideError::DriverMatchPending)));
    }

    #[test]
    fn status_line_pluralizes_minutes() {
        let mut session = RideSession::book(booking());
        session.advance_by(3_000);
        assert_eq!(session.snapshot().status_line(), "Driver arrives in 5 minutes");

        session.advance_by(4 * ONE_MIN_MS);
        assert_eq!(session.snapshot().status_line(), "Driver arrives in 1 minute");
    }

    #[test]
    fn reserved_status_renders_its_name() {
        let snapshot = SessionSnapshot {
            status: RideStatus::Arrived,
            estimated_time_minutes: 0,
            driver: None,
            cancelled: false,
            match_failed: false,
            now_ms: 0,
        };
        assert_eq!(snapshot.status_line(), "Ride arrived");
    }

    #[test]
    fn booking_is_kept_on_the_session() {
        let session = RideSession::book(booking());
        let kept = session.booking().expect("booking");
        assert_eq!(kept.pickup, "123 Main St");
        assert_eq!(kept.dropoff, "456 Market St");
    }

    #[test]
    fn accessors_agree_with_snapshot() {
        let mut session = RideSession::book(booking());
        for _ in 0..8 {
            let snapshot = session.snapshot();
            assert_eq!(session.status(), snapshot.status);
            assert_eq!(session.estimated_time_minutes(), snapshot.estimated_time_minutes);
            assert_eq!(session.is_cancelled(), snapshot.cancelled);
            session.advance_by(ONE_MIN_MS);
        }
        session.cancel().expect("cancel");
        assert!(session.is_cancelled());
        assert_eq!(session.status(), session.snapshot().status);
    }

    #[test]
    fn missing_session_entity_reads_as_torn_down() {
        let mut world = World::new();
        init_session_world(&mut world, &RideConfig::default());
        let session = spawn_session(&mut world, booking());
        world.despawn(session);

        assert!(snapshot_session(&world, session).is_none());
        let torn_down = SessionSnapshot::torn_down(0);
        assert!(torn_down.cancelled);
        assert!(torn_down.driver.is_none());
        assert_eq!(torn_down.status_line(), "Ride cancelled");
    }

    #[test]
    fn invalid_config_is_rejected_at_booking() {
        let config = RideConfig::default()
            .with_session(SessionConfig::default().with_countdown_period_ms(0));
        let err = RideSession::book_with_config(&config, booking()).expect_err("invalid");
        assert!(matches!(err, RideError::InvalidConfig(_)));
    }
}
