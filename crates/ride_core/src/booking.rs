//! Booking request: where the rider is going and which ride option they picked.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pickup label used when the rider does not pick one.
pub const CURRENT_LOCATION: &str = "Current Location";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideType {
    #[default]
    Standard,
    Premium,
    Express,
}

impl RideType {
    pub const ALL: [RideType; 3] = [RideType::Standard, RideType::Premium, RideType::Express];

    pub fn display_name(self) -> &'static str {
        match self {
            RideType::Standard => "Standard",
            RideType::Premium => "Premium",
            RideType::Express => "Express",
        }
    }
}

impl fmt::Display for RideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub pickup: String,
    pub dropoff: String,
    #[serde(default)]
    pub ride_type: RideType,
}

impl BookingRequest {
    /// Booking from the rider's current location.
    pub fn to(dropoff: impl Into<String>) -> Self {
        Self {
            pickup: CURRENT_LOCATION.to_string(),
            dropoff: dropoff.into(),
            ride_type: RideType::default(),
        }
    }

    pub fn with_pickup(mut self, pickup: impl Into<String>) -> Self {
        self.pickup = pickup.into();
        self
    }

    pub fn with_ride_type(mut self, ride_type: RideType) -> Self {
        self.ride_type = ride_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_defaults_to_current_location_and_standard() {
        let booking = BookingRequest::to("456 Market St");
        assert_eq!(booking.pickup, CURRENT_LOCATION);
        assert_eq!(booking.ride_type, RideType::Standard);
    }

    #[test]
    fn ride_type_parses_lowercase() {
        let booking: BookingRequest = serde_json::from_str(
            r#"{"pickup": "123 Main St", "dropoff": "Airport", "ride_type": "express"}"#,
        )
        .expect("booking");
        assert_eq!(booking.ride_type, RideType::Express);
        assert_eq!(booking.ride_type.to_string(), "Express");
    }
}
