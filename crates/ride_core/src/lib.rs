pub mod booking;
pub mod clock;
pub mod config;
pub mod ecs;
pub mod error;
pub mod pricing;
pub mod runner;
pub mod session;
pub mod systems;
pub mod telemetry;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use booking::{BookingRequest, RideType};
pub use config::RideConfig;
pub use ecs::{DriverProfile, RideStatus, Vehicle};
pub use error::RideError;
pub use pricing::{calculate_fare, FareBreakdown, FareInputs, FareRates};
pub use session::{RideSession, SessionSnapshot};
pub use systems::session_cancel::CancelReceipt;
