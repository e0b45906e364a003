//! flight_health_core - Pure no_std self-test logic for the flight controller
//!
//! This crate contains the platform-agnostic propeller and battery
//! self-test engine. It can be tested on host without any feature flags
//! or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Motors, accelerometer and power monitor injected via traits
//! - **No logging**: Each step returns events; the caller decides how to report them
//!
//! # Modules
//!
//! - [`health`]: Self-test state machine, variance and threshold evaluation
//! - [`parameters`]: Parameter store and health parameter definitions
//! - [`traits`]: Platform trait abstractions and host mocks

#![no_std]

pub mod health;
pub mod parameters;
pub mod traits;
