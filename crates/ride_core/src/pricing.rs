//! Fare calculation: base fare plus distance and time components, plus a service fee.
//!
//! All amounts are carried at full `f64` precision. Rounding to cents happens only when a
//! breakdown is rendered ([FareLineItem::formatted_amount], [std::fmt::Display]).

use std::fmt;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Base fare in currency units (e.g., dollars).
pub const BASE_FARE: f64 = 2.50;

/// Per-kilometer rate in currency units.
pub const PER_KM_RATE: f64 = 0.75;

/// Per-minute rate in currency units.
pub const PER_MINUTE_RATE: f64 = 0.15;

/// Service fee as a fraction of the subtotal.
pub const SERVICE_FEE_RATE: f64 = 0.10;

/// Rate card applied to a trip. Loaded from config; defaults match the standard rate card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct FareRates {
    pub base_fare: f64,
    pub distance_rate: f64,
    pub time_rate: f64,
}

impl Default for FareRates {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            distance_rate: PER_KM_RATE,
            time_rate: PER_MINUTE_RATE,
        }
    }
}

impl FareRates {
    pub fn with_base_fare(mut self, base_fare: f64) -> Self {
        self.base_fare = base_fare;
        self
    }

    pub fn with_distance_rate(mut self, distance_rate: f64) -> Self {
        self.distance_rate = distance_rate;
        self
    }

    pub fn with_time_rate(mut self, time_rate: f64) -> Self {
        self.time_rate = time_rate;
        self
    }

    /// Breakdown for a trip of `distance_km` and `time_minutes` under this rate card.
    pub fn quote(&self, distance_km: f64, time_minutes: f64) -> FareBreakdown {
        calculate_fare(&FareInputs {
            base_fare: self.base_fare,
            distance_km,
            time_minutes,
            distance_rate: self.distance_rate,
            time_rate: self.time_rate,
        })
    }
}

/// The five numeric inputs of a fare. Omitted fields default to a zero-length trip on the
/// standard rate card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareInputs {
    pub base_fare: f64,
    pub distance_km: f64,
    pub time_minutes: f64,
    pub distance_rate: f64,
    pub time_rate: f64,
}

impl Default for FareInputs {
    fn default() -> Self {
        let rates = FareRates::default();
        Self {
            base_fare: rates.base_fare,
            distance_km: 0.0,
            time_minutes: 0.0,
            distance_rate: rates.distance_rate,
            time_rate: rates.time_rate,
        }
    }
}

impl FareInputs {
    pub fn with_distance_km(mut self, distance_km: f64) -> Self {
        self.distance_km = distance_km;
        self
    }

    pub fn with_time_minutes(mut self, time_minutes: f64) -> Self {
        self.time_minutes = time_minutes;
        self
    }

    pub fn with_rates(mut self, rates: FareRates) -> Self {
        self.base_fare = rates.base_fare;
        self.distance_rate = rates.distance_rate;
        self.time_rate = rates.time_rate;
        self
    }
}

/// Itemized fare, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub base_fare: f64,
    pub distance_km: f64,
    pub time_minutes: f64,
    pub distance_cost: f64,
    pub time_cost: f64,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
}

/// Calculate the itemized fare for a trip.
///
/// Formula: `subtotal = base + distance_km * distance_rate + time_minutes * time_rate`,
/// `service_fee = subtotal * SERVICE_FEE_RATE`, `total = subtotal + service_fee`.
///
/// Inputs are not validated; negative values propagate arithmetically.
pub fn calculate_fare(inputs: &FareInputs) -> FareBreakdown {
    let distance_cost = inputs.distance_km * inputs.distance_rate;
    let time_cost = inputs.time_minutes * inputs.time_rate;
    let subtotal = inputs.base_fare + distance_cost + time_cost;
    let service_fee = subtotal * SERVICE_FEE_RATE;
    FareBreakdown {
        base_fare: inputs.base_fare,
        distance_km: inputs.distance_km,
        time_minutes: inputs.time_minutes,
        distance_cost,
        time_cost,
        subtotal,
        service_fee,
        total: subtotal + service_fee,
    }
}

/// One labelled row of a rendered breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct FareLineItem {
    pub label: String,
    pub amount: f64,
}

impl FareLineItem {
    fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }

    pub fn formatted_amount(&self) -> String {
        format_currency(self.amount)
    }
}

/// Render an amount as `$x.xx`, rounding the exact binary value once.
///
/// An exact half cent (only possible for odd multiples of 1/8) rounds away from zero.
/// Negative amounts keep the sign after the currency symbol, e.g. `$-0.55`.
pub fn format_currency(amount: f64) -> String {
    // -0.0 renders as zero.
    let amount = if amount == 0.0 { 0.0 } else { amount };
    let eighths = amount * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        let cents = (amount.abs() * 100.0).ceil().copysign(amount);
        return format!("${:.2}", cents / 100.0);
    }
    format!("${:.2}", amount)
}

impl FareBreakdown {
    /// Receipt rows: base, distance, time, subtotal, service fee, total.
    pub fn line_items(&self) -> [FareLineItem; 6] {
        [
            FareLineItem::new("Base Fare", self.base_fare),
            FareLineItem::new(
                format!("Distance ({:.1} km)", self.distance_km),
                self.distance_cost,
            ),
            FareLineItem::new(format!("Time ({} min)", self.time_minutes), self.time_cost),
            FareLineItem::new("Subtotal", self.subtotal),
            FareLineItem::new("Service Fee", self.service_fee),
            FareLineItem::new("Total", self.total),
        ]
    }
}

impl fmt::Display for FareBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.line_items().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<24}{:>10}", item.label, item.formatted_amount())?;
        }
        Ok(())
    }
}
