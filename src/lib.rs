#![cfg_attr(not(test), no_std)]

//! flight_health - Propeller and battery self-test runner
//!
//! Glue between the platform-agnostic self-test engine in
//! `flight_health_core` and the flight controller: parameter handling each
//! tick, log output for test results and the 1 kHz Embassy loop.

// Logging macros (log_info!, log_warn!, ...); must precede the modules using them
#[macro_use]
pub mod logging;

// Self-test runner and event reporting
pub mod health;

pub use flight_health_core::health::{HealthConfig, HealthEvent, HealthTelemetry, MotorTestProfile};
pub use flight_health_core::parameters::{HealthParams, ParameterError, ParameterStore};
pub use flight_health_core::traits::HealthPlatform;
