//! Propeller and battery self-test
//!
//! The propeller test spins each motor in turn while sampling the
//! accelerometer; the X+Y vibration variance of each motor is compared
//! against a threshold to find unbalanced or damaged propellers.
//!
//! The battery test runs all motors at once for a short burst and measures
//! the voltage sag, exposing a weak battery or a bad power path. The sag is
//! fairly constant over the battery voltage range but depends on what is
//! mounted on the airframe, so its threshold needs re-tuning after hardware
//! changes.
//!
//! # Modules
//!
//! - [`state`]: Sequencer state enum
//! - [`variance`]: Sample window and unnormalized variance
//! - [`evaluation`]: Threshold classification and the motor pass bit field
//! - [`profile`]: Per-motor timing profiles
//! - [`feedback`]: Blocking beep sequences
//! - [`telemetry`]: Read-only result snapshot
//! - [`event`]: Events returned from each step
//! - [`sequencer`]: The state machine

pub mod evaluation;
pub mod event;
pub mod feedback;
pub mod profile;
pub mod sequencer;
pub mod state;
pub mod telemetry;
pub mod variance;

pub use evaluation::{
    evaluate_battery, evaluate_prop_test, BatteryVerdict, MotorMask, PropTestVerdict,
    DEFAULT_BAT_LOADING_SAG_THRESHOLD, DEFAULT_PROP_TEST_THRESHOLD, NBR_OF_MOTORS,
};
pub use event::{HealthEvent, MAX_HEALTH_EVENTS};
pub use profile::MotorTestProfile;
pub use sequencer::{HealthConfig, HealthSequencer, BAT_SOAK_IDLE_TICKS, BAT_TEST_LOAD_TICKS};
pub use state::TestState;
pub use telemetry::{HealthTelemetry, TelemetryValue, TELEMETRY_ENTRIES};
pub use variance::{variance, AccelSample, AxisVariance, SampleWindow, PROPTEST_NBR_OF_VARIANCE_VALUES};
