use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ride_core::clock::ONE_SEC_MS;
use ride_core::pricing::{FareInputs, FareRates};
use ride_core::{calculate_fare, BookingRequest, RideConfig, RideSession, RideType};
use tracing::Level;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "ride",
    about = "Fare quotes and simulated ride sessions",
    long_about = "Quote an itemized fare, or book a simulated ride and watch it move\n\
                  through driver search, driver match and the pickup countdown."
)]
struct Cli {
    /// JSON config (session timers, rate card, driver roster); defaults apply when omitted
    #[arg(long, global = true, env = "RIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Log timer activity (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fare breakdown for a trip
    Fare {
        /// Trip distance in kilometers
        #[arg(long, default_value_t = 0.0)]
        distance_km: f64,
        /// Trip time in minutes
        #[arg(long, default_value_t = 0.0)]
        time_min: f64,
        /// Override the base fare
        #[arg(long)]
        base_fare: Option<f64>,
        /// Override the per-kilometer rate
        #[arg(long)]
        distance_rate: Option<f64>,
        /// Override the per-minute rate
        #[arg(long)]
        time_rate: Option<f64>,
        /// Emit the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Book a simulated ride and print its status as simulated time passes
    Ride {
        /// Destination
        #[arg(long, default_value = "456 Market St")]
        dropoff: String,
        /// Pickup point
        #[arg(long, default_value = ride_core::booking::CURRENT_LOCATION)]
        pickup: String,
        /// Ride option
        #[arg(value_enum, long, default_value_t = RideOption::Standard)]
        ride_type: RideOption,
        /// Simulated time to run for, in seconds
        #[arg(long, default_value_t = 360)]
        duration_secs: u64,
        /// Simulated time step, in seconds
        #[arg(long, default_value_t = 1)]
        step_secs: u64,
        /// Cancel the ride after this much simulated time
        #[arg(long)]
        cancel_after_ms: Option<u64>,
        /// Emit the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RideOption {
    Standard,
    Premium,
    Express,
}

impl From<RideOption> for RideType {
    fn from(option: RideOption) -> Self {
        match option {
            RideOption::Standard => RideType::Standard,
            RideOption::Premium => RideType::Premium,
            RideOption::Express => RideType::Express,
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<RideConfig> {
    match path {
        Some(path) => RideConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(RideConfig::default()),
    }
}

fn print_fare(rates: FareRates, distance_km: f64, time_min: f64, json: bool) -> Result<()> {
    let fare = calculate_fare(
        &FareInputs::default()
            .with_rates(rates)
            .with_distance_km(distance_km)
            .with_time_minutes(time_min),
    );
    if json {
        println!("{}", serde_json::to_string_pretty(&fare)?);
    } else {
        println!("Fare Breakdown\n{fare}");
    }
    Ok(())
}

struct RideArgs {
    booking: BookingRequest,
    duration_ms: u64,
    step_ms: u64,
    cancel_after_ms: Option<u64>,
    json: bool,
}

/// Next simulated time to stop at: one step ahead, capped by the run length and by a
/// pending cancel.
fn next_stop(now: u64, step_ms: u64, duration_ms: u64, cancel_after_ms: Option<u64>) -> u64 {
    let next = now.saturating_add(step_ms).min(duration_ms);
    match cancel_after_ms {
        Some(cancel_at) if cancel_at > now => next.min(cancel_at),
        _ => next,
    }
}

fn run_ride(config: &RideConfig, args: RideArgs) -> Result<()> {
    let mut session = RideSession::book_with_config(config, args.booking)?;
    let mut last_line = String::new();

    loop {
        let now = session.now_ms();
        if let Some(cancel_at) = args.cancel_after_ms {
            if now >= cancel_at && session.is_active() {
                let receipt = session.cancel()?;
                println!(
                    "[{:>5} s] cancelled while {}",
                    receipt.cancelled_at_ms / ONE_SEC_MS,
                    receipt.status_at_cancel
                );
            }
        }

        let line = session.snapshot().status_line();
        if line != last_line {
            println!("[{:>5} s] {}", now / ONE_SEC_MS, line);
            last_line = line;
        }

        if now >= args.duration_ms || !session.is_active() {
            break;
        }
        session.advance_to(next_stop(
            now,
            args.step_ms,
            args.duration_ms,
            args.cancel_after_ms,
        ));
    }

    if let Ok(driver) = session.driver() {
        println!(
            "driver: {} ({} stars, {} rides) {} {} {}",
            driver.name,
            driver.rating,
            driver.ride_count,
            driver.vehicle.color,
            driver.vehicle.model,
            driver.vehicle.plate
        );
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    }
    Ok(())
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Fare {
            distance_km,
            time_min,
            base_fare,
            distance_rate,
            time_rate,
            json,
        } => {
            let mut rates = config.fare;
            if let Some(base_fare) = base_fare {
                rates = rates.with_base_fare(base_fare);
            }
            if let Some(distance_rate) = distance_rate {
                rates = rates.with_distance_rate(distance_rate);
            }
            if let Some(time_rate) = time_rate {
                rates = rates.with_time_rate(time_rate);
            }
            print_fare(rates, distance_km, time_min, json)
        }
        Commands::Ride {
            dropoff,
            pickup,
            ride_type,
            duration_secs,
            step_secs,
            cancel_after_ms,
            json,
        } => {
            anyhow::ensure!(step_secs > 0, "--step-secs must be greater than zero");
            let booking = BookingRequest::to(dropoff)
                .with_pickup(pickup)
                .with_ride_type(ride_type.into());
            run_ride(
                &config,
                RideArgs {
                    booking,
                    duration_ms: duration_secs.saturating_mul(ONE_SEC_MS),
                    step_ms: step_secs.saturating_mul(ONE_SEC_MS),
                    cancel_after_ms,
                    json,
                },
            )
        }
    }
}
