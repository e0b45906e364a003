//! Self-test state types
//!
//! The single piece of persistent control state owned by the
//! [`HealthSequencer`](super::HealthSequencer).

/// Self-test sequencer state
///
/// Exactly one state is active at a time. The propeller test runs
/// `ConfigureAccel -> MeasureNoiseFloor -> MeasureProp -> EvaluatePropResult`,
/// the battery test runs `TestBattery -> EvaluateBatResult`. Both evaluation
/// states end in `Done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TestState {
    /// No test pending
    #[default]
    Done,
    /// Propeller test entry: accelerometer into test mode, snapshot idle voltage
    ConfigureAccel,
    /// Capture one sample window with all motors stopped
    MeasureNoiseFloor,
    /// Spin each motor in turn and capture its vibration window
    MeasureProp,
    /// All motors at once, track the minimum loaded voltage
    TestBattery,
    /// Soak phase: idle, report the last sag, then run the battery test once
    RestartBatTest,
    /// Classify each motor's variance against the threshold
    EvaluatePropResult,
    /// Classify the battery sag against the threshold
    EvaluateBatResult,
}

impl TestState {
    /// Whether this state belongs to the propeller test
    pub fn is_prop_test(self) -> bool {
        matches!(
            self,
            TestState::ConfigureAccel
                | TestState::MeasureNoiseFloor
                | TestState::MeasureProp
                | TestState::EvaluatePropResult
        )
    }

    /// Whether this state belongs to the battery test (including the soak phase)
    pub fn is_battery_test(self) -> bool {
        matches!(
            self,
            TestState::TestBattery | TestState::RestartBatTest | TestState::EvaluateBatResult
        )
    }

    /// Short name for log output
    pub fn as_str(self) -> &'static str {
        match self {
            TestState::Done => "done",
            TestState::ConfigureAccel => "configure_acc",
            TestState::MeasureNoiseFloor => "measure_noise_floor",
            TestState::MeasureProp => "measure_prop",
            TestState::TestBattery => "test_battery",
            TestState::RestartBatTest => "restart_bat_test",
            TestState::EvaluatePropResult => "evaluate_prop_result",
            TestState::EvaluateBatResult => "evaluate_bat_result",
        }
    }
}
