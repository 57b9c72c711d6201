//! Book one ride, quote its fare, and print the status line every time it changes.
//!
//! Run with: cargo run -p ride_core --example session_run

use ride_core::clock::{ONE_MIN_MS, ONE_SEC_MS};
use ride_core::pricing::FareRates;
use ride_core::{BookingRequest, RideSession, RideType};

fn main() {
    const TRIP_KM: f64 = 10.0;
    const TRIP_MINUTES: f64 = 20.0;

    let booking = BookingRequest::to("456 Market St")
        .with_pickup("123 Main St")
        .with_ride_type(RideType::Standard);
    println!(
        "--- Booking {} ride: {} -> {} ---",
        booking.ride_type, booking.pickup, booking.dropoff
    );
    println!("{}\n", FareRates::default().quote(TRIP_KM, TRIP_MINUTES));

    let mut session = RideSession::book(booking);
    let mut last_line = String::new();
    while session.now_ms() <= 6 * ONE_MIN_MS {
        let line = session.snapshot().status_line();
        if line != last_line {
            println!("[{:>4} s] {}", session.now_ms() / ONE_SEC_MS, line);
            last_line = line;
        }
        session.advance_by(ONE_SEC_MS);
    }

    if let Ok(driver) = session.driver() {
        println!(
            "\nDriver: {} ({} * {} rides) - {} {} {}",
            driver.name,
            driver.rating,
            driver.ride_count,
            driver.vehicle.color,
            driver.vehicle.model,
            driver.vehicle.plate
        );
    }
    println!("Ticks: {}", session.telemetry().countdown_ticks);
}
