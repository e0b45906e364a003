//! Mock platform for host testing.
//!
//! Records every actuator call and models the battery as an idle voltage
//! that drops to a loaded voltage while any motor is running.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use super::platform::{AccelMode, Accelerometer, MotorActuator, MotorTestProfiles, PowerMonitor};
use crate::health::{MotorTestProfile, NBR_OF_MOTORS};

/// Maximum number of recorded actuator calls
pub const MOCK_CALL_CAPACITY: usize = 128;

/// Actuator call recorded by [`MockHealthPlatform`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    SetRatio { motor: usize, ratio: u16 },
    StopAll,
    Beep { motor: usize, enable: bool, frequency_hz: u16, ratio: u16 },
}

/// Mock implementation of every health collaborator
#[derive(Debug, Clone)]
pub struct MockHealthPlatform {
    /// Voltage reported while all motors are stopped
    pub idle_voltage: f32,
    /// Voltage reported while any motor is running
    pub loaded_voltage: f32,
    /// Profile returned for every motor
    pub profile: MotorTestProfile,
    ratios: [u16; NBR_OF_MOTORS],
    accel_mode: AccelMode,
    mode_changes: u32,
    calls: Vec<ActuatorCall, MOCK_CALL_CAPACITY>,
}

impl MockHealthPlatform {
    /// Create a mock with a constant voltage and the brushed profile
    pub fn new(voltage: f32) -> Self {
        Self::with_load_voltage(voltage, voltage)
    }

    /// Create a mock whose voltage drops to `loaded` while motors run
    pub fn with_load_voltage(idle: f32, loaded: f32) -> Self {
        Self {
            idle_voltage: idle,
            loaded_voltage: loaded,
            profile: MotorTestProfile::BRUSHED,
            ratios: [0; NBR_OF_MOTORS],
            accel_mode: AccelMode::Flight,
            mode_changes: 0,
            calls: Vec::new(),
        }
    }

    /// Replace the profile returned for every motor
    pub fn with_profile(mut self, profile: MotorTestProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Current ratio of each motor
    pub fn ratios(&self) -> &[u16; NBR_OF_MOTORS] {
        &self.ratios
    }

    /// Whether any motor has a nonzero ratio
    pub fn any_motor_running(&self) -> bool {
        self.ratios.iter().any(|&r| r > 0)
    }

    /// Current accelerometer mode
    pub fn accel_mode(&self) -> AccelMode {
        self.accel_mode
    }

    /// Number of `set_mode` calls received
    pub fn mode_changes(&self) -> u32 {
        self.mode_changes
    }

    /// Recorded actuator calls, oldest first
    pub fn calls(&self) -> &[ActuatorCall] {
        &self.calls
    }

    /// Number of beep-start calls recorded for `motor`
    pub fn beeps_started(&self, motor: usize) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Beep { motor: m, enable: true, .. } if *m == motor))
            .count()
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: ActuatorCall) {
        // Drop calls once full; tests only inspect short sequences
        let _ = self.calls.push(call);
    }
}

impl MotorActuator for MockHealthPlatform {
    fn set_ratio(&mut self, motor: usize, ratio: u16) {
        if let Some(r) = self.ratios.get_mut(motor) {
            *r = ratio;
        }
        self.record(ActuatorCall::SetRatio { motor, ratio });
    }

    fn stop_all(&mut self) {
        self.ratios = [0; NBR_OF_MOTORS];
        self.record(ActuatorCall::StopAll);
    }

    fn beep(&mut self, motor: usize, enable: bool, frequency_hz: u16, ratio: u16) {
        self.record(ActuatorCall::Beep {
            motor,
            enable,
            frequency_hz,
            ratio,
        });
    }
}

impl Accelerometer for MockHealthPlatform {
    fn set_mode(&mut self, mode: AccelMode) {
        self.accel_mode = mode;
        self.mode_changes += 1;
    }
}

impl PowerMonitor for MockHealthPlatform {
    fn battery_voltage(&self) -> f32 {
        if self.any_motor_running() {
            self.loaded_voltage
        } else {
            self.idle_voltage
        }
    }
}

impl MotorTestProfiles for MockHealthPlatform {
    fn health_test_profile(&self, _motor: usize) -> MotorTestProfile {
        self.profile
    }
}

/// Blocking delay that only accumulates the requested time
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDelay {
    elapsed_ns: u64,
}

impl MockDelay {
    pub const fn new() -> Self {
        Self { elapsed_ns: 0 }
    }

    /// Total requested delay in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += ns as u64;
    }
}
