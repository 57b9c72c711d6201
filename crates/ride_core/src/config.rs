//! Session configuration: timer delays, initial pickup estimate, driver roster, rate card.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::fs;
use std::path::Path;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::{ONE_MIN_MS, ONE_SEC_MS};
use crate::ecs::{DriverProfile, Vehicle};
use crate::error::{Result, RideError};
use crate::pricing::FareRates;

/// Delay from session start until the driver match fires (3 s).
pub const DEFAULT_DRIVER_MATCH_DELAY_MS: u64 = 3 * ONE_SEC_MS;
/// Period of the pickup countdown (1 min).
pub const DEFAULT_COUNTDOWN_PERIOD_MS: u64 = ONE_MIN_MS;
/// Pickup estimate shown when the session starts.
pub const DEFAULT_INITIAL_ETA_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct SessionConfig {
    pub driver_match_delay_ms: u64,
    pub countdown_period_ms: u64,
    pub initial_eta_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            driver_match_delay_ms: DEFAULT_DRIVER_MATCH_DELAY_MS,
            countdown_period_ms: DEFAULT_COUNTDOWN_PERIOD_MS,
            initial_eta_minutes: DEFAULT_INITIAL_ETA_MINUTES,
        }
    }
}

impl SessionConfig {
    pub fn with_driver_match_delay_ms(mut self, delay_ms: u64) -> Self {
        self.driver_match_delay_ms = delay_ms;
        self
    }

    pub fn with_countdown_period_ms(mut self, period_ms: u64) -> Self {
        self.countdown_period_ms = period_ms;
        self
    }

    pub fn with_initial_eta_minutes(mut self, minutes: u32) -> Self {
        self.initial_eta_minutes = minutes;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.countdown_period_ms == 0 {
            return Err(RideError::InvalidConfig(
                "countdown_period_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Drivers the simulated match can assign. The match always takes the first entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(transparent)]
pub struct DriverRoster(pub Vec<DriverProfile>);

impl Default for DriverRoster {
    fn default() -> Self {
        Self(vec![default_driver()])
    }
}

impl DriverRoster {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn first_available(&self) -> Option<&DriverProfile> {
        self.0.first()
    }
}

/// The fixed driver assigned by the demo dispatch.
pub fn default_driver() -> DriverProfile {
    DriverProfile {
        id: "d123".to_string(),
        name: "Michael Rodriguez".to_string(),
        rating: 4.9,
        ride_count: 328,
        phone: "+1 (555) 123-4567".to_string(),
        photo: "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg".to_string(),
        vehicle: Vehicle {
            model: "Honda CBR 600".to_string(),
            color: "Red".to_string(),
            plate: "MTC-1234".to_string(),
        },
    }
}

/// Everything a ride session and its fare quotes need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideConfig {
    pub session: SessionConfig,
    pub fare: FareRates,
    pub drivers: DriverRoster,
}

impl RideConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RideConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RideError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.session.validate()
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    pub fn with_drivers(mut self, drivers: DriverRoster) -> Self {
        self.drivers = drivers;
        self
    }
}
