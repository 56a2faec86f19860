//! Constants used to derive missing phase rates and convert fuel quantities.

/// Climb burn relative to cruise when a profile omits climb.
pub const CLIMB_CRUISE_MULTIPLIER: f64 = 1.8;

/// Descent burn relative to cruise when a profile omits descent.
pub const DESCENT_CRUISE_MULTIPLIER: f64 = 0.5;

/// Taxi burn relative to cruise when a profile omits taxi, before the
/// category cap is applied.
pub const TAXI_CRUISE_MULTIPLIER: f64 = 0.25;

/// Jet-A density, kg per liter.
pub const JET_A_KG_PER_LITER: f64 = 0.8;

/// US gallons per liter.
pub const GALLONS_PER_LITER: f64 = 0.264172;

/// Kilograms of CO2 emitted per kilogram of kerosene burned.
pub const CO2_KG_PER_KG_FUEL: f64 = 3.16;
