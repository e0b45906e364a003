//! Read-only telemetry snapshot of the latest self-test results
//!
//! An external transport samples these values; nothing here is persisted.

use super::evaluation::{MotorMask, NBR_OF_MOTORS};
use super::variance::AxisVariance;

/// Number of named entries exported by [`HealthTelemetry::entries`]
pub const TELEMETRY_ENTRIES: usize = 12;

/// Typed telemetry value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryValue {
    Float(f32),
    Uint8(u8),
    Uint16(u16),
}

/// Snapshot of all self-test results
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HealthTelemetry {
    /// Variance triple of each motor from the last propeller test
    pub motor_variance: [AxisVariance; NBR_OF_MOTORS],
    /// Voltage sag seen while each motor ran alone (V)
    pub motor_voltage_sag: [f32; NBR_OF_MOTORS],
    /// Noise floor variance from the last propeller test (diagnostic)
    pub noise_floor: AxisVariance,
    /// Propeller test result, bit set = motor passed
    pub motor_pass: MotorMask,
    /// Battery sag from the last battery test (V)
    pub battery_sag: f32,
    /// Battery test result
    pub battery_pass: bool,
    /// Completed propeller test runs
    pub motor_test_count: u16,
    /// Failed motor checks since boot
    pub failed_tests: u8,
}

impl HealthTelemetry {
    /// Named values in transport order
    pub fn entries(&self) -> [(&'static str, TelemetryValue); TELEMETRY_ENTRIES] {
        let v = &self.motor_variance;
        [
            ("motorVarXM1", TelemetryValue::Float(v[0].x)),
            ("motorVarYM1", TelemetryValue::Float(v[0].y)),
            ("motorVarXM2", TelemetryValue::Float(v[1].x)),
            ("motorVarYM2", TelemetryValue::Float(v[1].y)),
            ("motorVarXM3", TelemetryValue::Float(v[2].x)),
            ("motorVarYM3", TelemetryValue::Float(v[2].y)),
            ("motorVarXM4", TelemetryValue::Float(v[3].x)),
            ("motorVarYM4", TelemetryValue::Float(v[3].y)),
            ("motorPass", TelemetryValue::Uint8(self.motor_pass.bits())),
            ("batterySag", TelemetryValue::Float(self.battery_sag)),
            ("batteryPass", TelemetryValue::Uint8(self.battery_pass as u8)),
            ("motorTestCount", TelemetryValue::Uint16(self.motor_test_count)),
        ]
    }

    /// Look up one entry by name
    pub fn get(&self, name: &str) -> Option<TelemetryValue> {
        self.entries()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| *value)
    }
}
