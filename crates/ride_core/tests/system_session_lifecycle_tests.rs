mod support;

use ride_core::clock::{EventSubject, SimulationClock, ONE_MIN_MS};
use ride_core::config::DriverRoster;
use ride_core::ecs::{AssignedDriver, PickupEta, RideState, RideStatus, SessionTimers};
use ride_core::error::RideError;
use ride_core::session::{snapshot_session, spawn_session};
use ride_core::telemetry::SessionTelemetry;
use ride_core::test_helpers::{test_booking, test_driver};
use ride_core::{BookingRequest, RideSession};

use support::schedule::ScheduleRunner;
use support::world::TestWorldBuilder;

#[test]
fn session_starts_searching_without_driver() {
    let mut world = TestWorldBuilder::new().build();
    let session = spawn_session(&mut world, test_booking());
    let mut runner = ScheduleRunner::new();
    assert!(runner.run_one(&mut world));

    let snapshot = snapshot_session(&world, session).expect("snapshot");
    assert_eq!(snapshot.status, RideStatus::Searching);
    assert!(snapshot.driver.is_none());
    assert!(world.get::<AssignedDriver>(session).is_none());
    assert_eq!(
        world
            .resource::<SimulationClock>()
            .pending_for(EventSubject::Session(session)),
        2
    );
}

#[test]
fn driver_match_confirms_exactly_once_with_full_driver_record() {
    let mut session = RideSession::book(BookingRequest::to("Downtown Hotel"));

    session.advance_by(2_999);
    assert_eq!(session.status(), RideStatus::Searching);
    assert!(session.snapshot().driver.is_none());

    session.advance_by(1);
    assert_eq!(session.status(), RideStatus::Confirmed);
    let driver = session.driver().expect("driver").clone();
    assert_eq!(driver, test_driver());
    assert!(!driver.name.is_empty());
    assert!(driver.rating > 0.0);
    assert!(driver.ride_count > 0);
    assert!(!driver.phone.is_empty());
    assert!(!driver.photo.is_empty());
    assert!(!driver.vehicle.model.is_empty());
    assert!(!driver.vehicle.color.is_empty());
    assert!(!driver.vehicle.plate.is_empty());

    session.run_until_idle(1_000);
    let transitions: Vec<_> = session
        .telemetry()
        .transitions_for(session.id())
        .map(|record| (record.from, record.to, record.at))
        .collect();
    assert_eq!(
        transitions,
        vec![(RideStatus::Searching, RideStatus::Confirmed, 3_000)]
    );
    assert_eq!(session.status(), RideStatus::Confirmed);
}

#[test]
fn reserved_statuses_are_never_entered() {
    let mut session = RideSession::book(BookingRequest::to("Airport Terminal 2"));
    session.run_until_idle(1_000);

    assert_eq!(session.status(), RideStatus::Confirmed);
    assert!(session
        .telemetry()
        .transitions
        .iter()
        .all(|record| !record.to.is_reserved()));
}

#[test]
fn countdown_after_n_ticks_is_floored_at_zero() {
    for ticks in 0..=8u64 {
        let mut session = RideSession::book(BookingRequest::to("456 Market St"));
        session.advance_to(ticks * ONE_MIN_MS);
        let expected = 5u64.saturating_sub(ticks) as u32;
        assert_eq!(
            session.estimated_time_minutes(),
            expected,
            "after {ticks} ticks"
        );
    }
}

#[test]
fn countdown_timer_stops_firing_at_zero() {
    let mut session = RideSession::book(BookingRequest::to("456 Market St"));
    session.advance_to(5 * ONE_MIN_MS);
    assert_eq!(session.estimated_time_minutes(), 0);
    assert_eq!(session.pending_timers(), 0);

    let processed = session.advance_by(60 * ONE_MIN_MS);
    assert_eq!(processed, 0);
    assert_eq!(session.telemetry().countdown_ticks, 5);
}

#[test]
fn countdown_runs_independently_of_driver_match() {
    let mut world = TestWorldBuilder::new()
        .with_session_config(
            ride_core::config::SessionConfig::default()
                .with_driver_match_delay_ms(10 * ONE_MIN_MS),
        )
        .build();
    let session = spawn_session(&mut world, test_booking());
    let mut runner = ScheduleRunner::new();

    runner.run_until(&mut world, 3 * ONE_MIN_MS);
    assert_eq!(world.get::<PickupEta>(session).expect("eta").minutes, 2);
    assert_eq!(
        world.get::<RideState>(session).expect("state").status,
        RideStatus::Searching
    );

    runner.run_full(&mut world);
    assert_eq!(world.get::<PickupEta>(session).expect("eta").minutes, 0);
    assert_eq!(
        world.get::<RideState>(session).expect("state").status,
        RideStatus::Confirmed
    );
}

#[test]
fn empty_roster_surfaces_driver_match_failed() {
    let config = TestWorldBuilder::new()
        .with_roster(DriverRoster::empty())
        .config()
        .clone();
    let mut session =
        RideSession::book_with_config(&config, BookingRequest::to("456 Market St"))
            .expect("session");

    session.advance_by(3_000);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, RideStatus::Searching);
    assert!(snapshot.match_failed);
    assert_eq!(snapshot.status_line(), "No drivers available");
    assert!(matches!(session.driver(), Err(RideError::DriverMatchFailed)));
    assert_eq!(session.pending_timers(), 0);
}

#[test]
fn zero_initial_estimate_never_arms_countdown() {
    let mut world = TestWorldBuilder::new().with_initial_eta_minutes(0).build();
    let session = spawn_session(&mut world, test_booking());
    let mut runner = ScheduleRunner::new();
    runner.run_one(&mut world);

    let timers = world.get::<SessionTimers>(session).expect("timers");
    assert!(timers.countdown.is_none());
    runner.run_full(&mut world);
    assert_eq!(world.resource::<SessionTelemetry>().countdown_ticks, 0);
}
