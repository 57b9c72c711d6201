#![allow(dead_code)]

use bevy_ecs::prelude::World;
use ride_core::config::{DriverRoster, RideConfig, SessionConfig};
use ride_core::session::init_session_world;

/// Helper that populates the ECS world with all shared resources used in integration tests.
#[derive(Debug, Default)]
pub struct TestWorldBuilder {
    config: RideConfig,
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_config(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    pub fn with_initial_eta_minutes(mut self, minutes: u32) -> Self {
        self.config.session = self.config.session.with_initial_eta_minutes(minutes);
        self
    }

    pub fn with_roster(mut self, roster: DriverRoster) -> Self {
        self.config.drivers = roster;
        self
    }

    pub fn config(&self) -> &RideConfig {
        &self.config
    }

    pub fn build(self) -> World {
        let mut world = World::new();
        init_session_world(&mut world, &self.config);
        world
    }
}
