//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::{Entity, World};

use crate::booking::BookingRequest;
use crate::config::{default_driver, RideConfig};
use crate::ecs::DriverProfile;
use crate::session::{init_session_world, spawn_session};

/// Dropoff used by test bookings.
pub const TEST_DROPOFF: &str = "456 Market St";

/// The driver the default roster assigns.
pub fn test_driver() -> DriverProfile {
    default_driver()
}

pub fn test_booking() -> BookingRequest {
    BookingRequest::to(TEST_DROPOFF)
}

/// Create a world with the default config's resources (clock, telemetry, session config,
/// rate card, one-driver roster).
pub fn create_test_world() -> World {
    let mut world = World::new();
    init_session_world(&mut world, &RideConfig::default());
    world
}

/// Spawn a session with [test_booking]; its SessionStarted event is queued but not run.
pub fn spawn_test_session(world: &mut World) -> Entity {
    spawn_session(world, test_booking())
}
