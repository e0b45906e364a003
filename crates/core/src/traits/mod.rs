//! Collaborator traits for the self-test engine.
//!
//! The sequencer drives motors, switches the accelerometer mode and reads
//! the battery voltage only through these traits, so it runs unchanged on
//! target and on host.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Board implementations are supplied by the integrating firmware

pub mod mock;
pub mod platform;

pub use mock::{ActuatorCall, MockDelay, MockHealthPlatform};
pub use platform::{AccelMode, Accelerometer, HealthPlatform, MotorActuator, MotorTestProfiles, PowerMonitor};
