//! Hardware collaborator traits consumed by the self-test sequencer.
//!
//! All calls are synchronous and assumed reliable; the sequencer never
//! retries or checks for failure.

use crate::health::MotorTestProfile;

/// Accelerometer sampling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccelMode {
    /// Normal filtered flight configuration
    #[default]
    Flight,
    /// Unfiltered configuration used while measuring propeller vibration
    PropTest,
}

/// Motor actuation
pub trait MotorActuator {
    /// Set the PWM ratio of one motor (0 = off, `u16::MAX` = full)
    fn set_ratio(&mut self, motor: usize, ratio: u16);

    /// Stop all motors
    fn stop_all(&mut self);

    /// Drive one motor as a buzzer
    ///
    /// # Arguments
    ///
    /// * `motor` - Zero-based motor index
    /// * `enable` - Start (`true`) or stop (`false`) the tone
    /// * `frequency_hz` - Tone frequency
    /// * `ratio` - PWM ratio of the tone (loudness)
    fn beep(&mut self, motor: usize, enable: bool, frequency_hz: u16, ratio: u16);
}

/// Accelerometer mode switching
///
/// Samples are handed to the sequencer on every tick by the caller; this
/// trait only covers the configuration side.
pub trait Accelerometer {
    fn set_mode(&mut self, mode: AccelMode);
}

/// Battery voltage readout
pub trait PowerMonitor {
    /// Current battery voltage (V)
    fn battery_voltage(&self) -> f32;
}

/// Per-motor test profile lookup
pub trait MotorTestProfiles {
    fn health_test_profile(&self, motor: usize) -> MotorTestProfile;
}

/// Everything the sequencer needs from the platform
///
/// Implemented automatically for any type providing all four collaborators.
pub trait HealthPlatform: MotorActuator + Accelerometer + PowerMonitor + MotorTestProfiles {}

impl<T> HealthPlatform for T where T: MotorActuator + Accelerometer + PowerMonitor + MotorTestProfiles {}
