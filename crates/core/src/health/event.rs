//! Events emitted by the self-test sequencer
//!
//! The core never logs. Each step returns the events it produced and the
//! firmware layer turns them into log lines or telemetry notifications.

use super::evaluation::{MotorMask, PropTestVerdict};
use super::variance::AxisVariance;

/// Maximum events emitted per step
pub const MAX_HEALTH_EVENTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HealthEvent {
    /// Propeller test armed; accelerometer in test mode, motors stopped
    PropTestStarted { idle_voltage: f32 },
    /// Noise floor window complete (all motors stopped)
    NoiseFloorMeasured(AxisVariance),
    /// One motor's sample window complete
    MotorMeasured {
        motor: usize,
        variance: AxisVariance,
        /// Idle voltage minus the lowest voltage seen in the window (V)
        voltage_sag: f32,
    },
    /// One motor classified against the threshold
    PropTestEvaluated {
        motor: usize,
        verdict: PropTestVerdict,
        /// X + Y variance
        value: f32,
        threshold: f32,
    },
    /// Propeller test finished
    PropTestComplete {
        motor_pass: MotorMask,
        /// Motors that failed in this run
        failed: u8,
    },
    /// Battery load test classified
    BatteryTestEvaluated {
        idle_voltage: f32,
        sag: f32,
        threshold: f32,
        pass: bool,
    },
    /// Soak phase report before running the battery test
    BatterySoakReport { idle_voltage: f32, sag: f32 },
}
