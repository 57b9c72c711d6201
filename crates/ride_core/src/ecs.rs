use std::fmt;

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::booking::BookingRequest;
use crate::clock::TimerId;

/// Dispatch status of a ride session.
///
/// Only `Searching -> Confirmed` is driven by the simulator. `Arrived`, `Started` and
/// `Completed` are reserved: they are part of the status vocabulary but nothing enters them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    Searching,
    Confirmed,
    Arrived,
    Started,
    Completed,
}

impl RideStatus {
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            RideStatus::Arrived | RideStatus::Started | RideStatus::Completed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Searching => "searching",
            RideStatus::Confirmed => "confirmed",
            RideStatus::Arrived => "arrived",
            RideStatus::Started => "started",
            RideStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub model: String,
    pub color: String,
    pub plate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub ride_count: u32,
    pub phone: String,
    /// Reference to the driver's photo (URL or asset key).
    pub photo: String,
    pub vehicle: Vehicle,
}

/// One ride session, from booking until cancellation or teardown.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct RideState {
    pub status: RideStatus,
    pub booking: BookingRequest,
    /// Simulation time the session was booked at.
    pub booked_at: u64,
}

/// Driver assigned at the driver match. Present iff status is not `Searching`.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct AssignedDriver(pub DriverProfile);

/// Minutes until the driver reaches the pickup point. Never below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct PickupEta {
    pub minutes: u32,
}

/// Handles of the session's two timers; `None` once fired or disarmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Component)]
pub struct SessionTimers {
    pub driver_match: Option<TimerId>,
    pub countdown: Option<TimerId>,
}

impl SessionTimers {
    pub fn is_armed(&self) -> bool {
        self.driver_match.is_some() || self.countdown.is_some()
    }
}

/// Marker: the rider cancelled. Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Cancelled {
    pub at: u64,
}

/// Marker: the driver match fired with nobody to assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct MatchFailed {
    pub at: u64,
}
