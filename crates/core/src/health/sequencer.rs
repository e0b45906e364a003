//! Self-Test Sequencer
//!
//! Tick-driven state machine running the propeller vibration test and the
//! battery load test. It has no timers of its own: every duration is a
//! count of calls to [`HealthSequencer::run_tests`], which the scheduler
//! invokes once per control tick (1 kHz).
//!
//! The sequencer does not know about parameters, telemetry transport or
//! logging. Hardware is reached through [`HealthPlatform`] and diagnostic
//! output is returned as [`HealthEvent`]s.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use super::evaluation::{
    evaluate_battery, evaluate_prop_test, MotorMask, DEFAULT_BAT_LOADING_SAG_THRESHOLD,
    DEFAULT_PROP_TEST_THRESHOLD, NBR_OF_MOTORS,
};
use super::event::{HealthEvent, MAX_HEALTH_EVENTS};
use super::feedback;
use super::state::TestState;
use super::telemetry::HealthTelemetry;
use super::variance::{AccelSample, AxisVariance, SampleWindow, PROPTEST_NBR_OF_VARIANCE_VALUES};
use crate::traits::{AccelMode, HealthPlatform};

/// Tick at which the battery load is removed
pub const BAT_TEST_LOAD_TICKS: u32 = 50;

/// Ticks the soak phase idles before running the battery test
pub const BAT_SOAK_IDLE_TICKS: u32 = 2000;

/// Sequencer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthConfig {
    /// Threshold on the X+Y variance (0 disables the check)
    pub prop_test_threshold: f32,
    /// Propeller test PWM override (0 = profile default)
    pub prop_test_pwm_ratio: u16,
    /// Battery test PWM override (0 = profile default)
    pub bat_test_pwm_ratio: u16,
    /// Maximum allowed battery sag under load (V)
    pub battery_sag_threshold: f32,
    /// Start the propeller test on the first tick after boot
    pub run_prop_test_at_startup: bool,
    /// Beep each motor in turn when every motor passed
    pub play_melody_on_pass: bool,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            prop_test_threshold: DEFAULT_PROP_TEST_THRESHOLD,
            prop_test_pwm_ratio: 0,
            bat_test_pwm_ratio: 0,
            battery_sag_threshold: DEFAULT_BAT_LOADING_SAG_THRESHOLD,
            run_prop_test_at_startup: false,
            play_melody_on_pass: false,
        }
    }
}

/// Self-test sequencer
///
/// Owns every buffer and counter of the self-test. The scheduler holds one
/// instance, polls [`shall_we_run`](Self::shall_we_run) each tick and calls
/// [`run_tests`](Self::run_tests) while it returns `true`.
pub struct HealthSequencer {
    state: TestState,
    config: HealthConfig,
    /// Ticks since the current phase started
    tick: u32,
    window: SampleWindow,
    motor_to_test: usize,
    idle_voltage: f32,
    min_single_loaded_voltage: [f32; NBR_OF_MOTORS],
    min_loaded_voltage: f32,
    start_prop_test: bool,
    start_bat_test: bool,
    telemetry: HealthTelemetry,
}

impl HealthSequencer {
    /// Create a sequencer, idle unless configured to test at startup
    pub fn new(config: HealthConfig) -> Self {
        let state = if config.run_prop_test_at_startup {
            TestState::ConfigureAccel
        } else {
            TestState::Done
        };

        Self {
            state,
            config,
            tick: 0,
            window: SampleWindow::new(),
            motor_to_test: 0,
            idle_voltage: 0.0,
            min_single_loaded_voltage: [0.0; NBR_OF_MOTORS],
            min_loaded_voltage: 0.0,
            start_prop_test: false,
            start_bat_test: false,
            telemetry: HealthTelemetry::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> TestState {
        self.state
    }

    /// Ticks since the current phase started
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Index of the motor under test
    pub fn motor_to_test(&self) -> usize {
        self.motor_to_test
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Replace the configuration; takes effect on the next step
    pub fn set_config(&mut self, config: HealthConfig) {
        self.config = config;
    }

    /// Latest results
    pub fn telemetry(&self) -> &HealthTelemetry {
        &self.telemetry
    }

    /// Noise floor of the last propeller test
    pub fn noise_floor(&self) -> AxisVariance {
        self.telemetry.noise_floor
    }

    /// Idle voltage snapshot of the last test (V)
    pub fn idle_voltage(&self) -> f32 {
        self.idle_voltage
    }

    /// Lowest loaded voltage of the last battery test (V)
    pub fn min_loaded_voltage(&self) -> f32 {
        self.min_loaded_voltage
    }

    /// Request a propeller test (edge trigger, consumed by `shall_we_run`)
    pub fn request_prop_test(&mut self) {
        self.start_prop_test = true;
    }

    /// Request a battery test (edge trigger, consumed by `shall_we_run`)
    pub fn request_bat_test(&mut self) {
        self.start_bat_test = true;
    }

    /// Enter the battery soak phase: idle, report the last sag, re-test
    ///
    /// Runs one battery test per call and then ends in `Done`; repeated
    /// soaking means calling this again. The normal flow never enters it.
    pub fn start_battery_soak(&mut self) {
        self.state = TestState::RestartBatTest;
        self.tick = 0;
    }

    /// Consume pending triggers and report whether a step is needed
    ///
    /// A propeller request wins over a battery request set at the same time;
    /// the battery request then stays pending for a later call.
    pub fn shall_we_run(&mut self) -> bool {
        if self.start_prop_test {
            self.state = TestState::ConfigureAccel;
            self.start_prop_test = false;
        } else if self.start_bat_test {
            self.state = TestState::TestBattery;
            self.start_bat_test = false;
            self.tick = 0;
        }

        self.state != TestState::Done
    }

    /// Run one tick of the current state
    ///
    /// # Arguments
    ///
    /// * `sample` - Accelerometer reading of this tick
    /// * `platform` - Motors, accelerometer mode, battery and profiles
    /// * `delay` - Blocking delay for the feedback beeps of the evaluation
    pub fn run_tests<D: DelayNs>(
        &mut self,
        sample: &AccelSample,
        platform: &mut dyn HealthPlatform,
        delay: &mut D,
    ) -> Vec<HealthEvent, MAX_HEALTH_EVENTS> {
        let mut events = Vec::new();

        self.state = match self.state {
            TestState::Done => TestState::Done,
            TestState::ConfigureAccel => {
                self.configure_accel(platform, &mut events);
                // First noise floor sample is taken on the configuration tick
                self.measure_noise_floor(sample, &mut events)
            }
            TestState::MeasureNoiseFloor => self.measure_noise_floor(sample, &mut events),
            TestState::MeasureProp => self.measure_prop(sample, platform, &mut events),
            TestState::TestBattery => self.test_battery(platform),
            TestState::RestartBatTest => self.restart_bat_test(&mut events),
            TestState::EvaluateBatResult => self.evaluate_bat_result(&mut events),
            TestState::EvaluatePropResult => self.evaluate_prop_result(platform, delay, &mut events),
        };

        events
    }

    // ========================================================================
    // State handlers
    // ========================================================================

    fn configure_accel(
        &mut self,
        platform: &mut dyn HealthPlatform,
        events: &mut Vec<HealthEvent, MAX_HEALTH_EVENTS>,
    ) {
        self.telemetry.motor_pass = MotorMask::empty();
        self.tick = 0;
        self.motor_to_test = 0;
        platform.set_mode(AccelMode::PropTest);

        let voltage = platform.battery_voltage();
        self.idle_voltage = voltage;
        self.min_loaded_voltage = voltage;
        self.min_single_loaded_voltage = [voltage; NBR_OF_MOTORS];

        platform.stop_all();
        let _ = events.push(HealthEvent::PropTestStarted {
            idle_voltage: voltage,
        });
    }

    fn measure_noise_floor(
        &mut self,
        sample: &AccelSample,
        events: &mut Vec<HealthEvent, MAX_HEALTH_EVENTS>,
    ) -> TestState {
        self.window.record(self.tick as usize, sample);
        self.tick += 1;

        if self.tick as usize >= PROPTEST_NBR_OF_VARIANCE_VALUES {
            self.tick = 0;
            let noise_floor = self.window.variance();
            self.telemetry.noise_floor = noise_floor;
            let _ = events.push(HealthEvent::NoiseFloorMeasured(noise_floor));
            TestState::MeasureProp
        } else {
            TestState::MeasureNoiseFloor
        }
    }

    fn measure_prop(
        &mut self,
        sample: &AccelSample,
        platform: &mut dyn HealthPlatform,
        events: &mut Vec<HealthEvent, MAX_HEALTH_EVENTS>,
    ) -> TestState {
        let motor = self.motor_to_test;
        let profile = platform.health_test_profile(motor);
        let window_len = PROPTEST_NBR_OF_VARIANCE_VALUES as i64;

        let sample_index = self.tick as i64 - profile.variance_measurement_start_msec as i64;
        if (0..window_len).contains(&sample_index) {
            self.window.record(sample_index as usize, sample);
            let voltage = platform.battery_voltage();
            if voltage < self.min_single_loaded_voltage[motor] {
                self.min_single_loaded_voltage[motor] = voltage;
            }
        }
        self.tick += 1;

        if sample_index == window_len {
            let variance = self.window.variance();
            let voltage_sag = self.idle_voltage - self.min_single_loaded_voltage[motor];
            self.telemetry.motor_variance[motor] = variance;
            self.telemetry.motor_voltage_sag[motor] = voltage_sag;
            let _ = events.push(HealthEvent::MotorMeasured {
                motor,
                variance,
                voltage_sag,
            });
        }

        // PWM timing follows the raw tick, not the sample index
        if self.tick == 1 && profile.on_period_msec > 0 {
            platform.set_ratio(motor, profile.prop_ratio(self.config.prop_test_pwm_ratio));
        } else if self.tick == profile.on_period_msec {
            platform.set_ratio(motor, 0);
        } else if self.tick >= profile.cycle_ticks() {
            self.tick = 0;
            self.motor_to_test += 1;
            if self.motor_to_test >= NBR_OF_MOTORS {
                self.motor_to_test = 0;
                platform.set_mode(AccelMode::Flight);
                return TestState::EvaluatePropResult;
            }
        }

        TestState::MeasureProp
    }

    fn test_battery(&mut self, platform: &mut dyn HealthPlatform) -> TestState {
        let mut next = TestState::TestBattery;

        match self.tick {
            0 => {
                self.telemetry.battery_pass = false;
                let voltage = platform.battery_voltage();
                self.idle_voltage = voltage;
                self.min_loaded_voltage = voltage;
            }
            1 => {
                let ratio = platform
                    .health_test_profile(0)
                    .bat_ratio(self.config.bat_test_pwm_ratio);
                for motor in 0..NBR_OF_MOTORS {
                    platform.set_ratio(motor, ratio);
                }
            }
            t if t < BAT_TEST_LOAD_TICKS => {
                let voltage = platform.battery_voltage();
                if voltage < self.min_loaded_voltage {
                    self.min_loaded_voltage = voltage;
                }
            }
            t if t == BAT_TEST_LOAD_TICKS => {
                platform.stop_all();
                next = TestState::EvaluateBatResult;
            }
            _ => {}
        }
        self.tick += 1;

        next
    }

    fn restart_bat_test(&mut self, events: &mut Vec<HealthEvent, MAX_HEALTH_EVENTS>) -> TestState {
        let waited = self.tick;
        self.tick += 1;

        if waited > BAT_SOAK_IDLE_TICKS {
            let _ = events.push(HealthEvent::BatterySoakReport {
                idle_voltage: self.idle_voltage,
                sag: self.idle_voltage - self.min_loaded_voltage,
            });
            self.tick = 0;
            TestState::TestBattery
        } else {
            TestState::RestartBatTest
        }
    }

    fn evaluate_bat_result(&mut self, events: &mut Vec<HealthEvent, MAX_HEALTH_EVENTS>) -> TestState {
        let threshold = self.config.battery_sag_threshold;
        let verdict = evaluate_battery(self.idle_voltage, self.min_loaded_voltage, threshold);

        self.telemetry.battery_sag = verdict.sag;
        self.telemetry.battery_pass = verdict.pass;
        let _ = events.push(HealthEvent::BatteryTestEvaluated {
            idle_voltage: self.idle_voltage,
            sag: verdict.sag,
            threshold,
            pass: verdict.pass,
        });

        TestState::Done
    }

    fn evaluate_prop_result<D: DelayNs>(
        &mut self,
        platform: &mut dyn HealthPlatform,
        delay: &mut D,
        events: &mut Vec<HealthEvent, MAX_HEALTH_EVENTS>,
    ) -> TestState {
        let threshold = self.config.prop_test_threshold;
        let mut failed: u8 = 0;

        for motor in 0..NBR_OF_MOTORS {
            let value = self.telemetry.motor_variance[motor].xy();
            let verdict = evaluate_prop_test(0.0, threshold, value);

            if verdict.is_pass() {
                self.telemetry.motor_pass |= MotorMask::motor(motor);
            } else {
                failed += 1;
                self.telemetry.failed_tests = self.telemetry.failed_tests.saturating_add(1);
                feedback::play_failure(&mut *platform, delay, motor);
            }

            let _ = events.push(HealthEvent::PropTestEvaluated {
                motor,
                verdict,
                value,
                threshold,
            });
        }

        if failed == 0 && self.config.play_melody_on_pass {
            feedback::play_pass_melody(&mut *platform, delay);
        }

        self.telemetry.motor_test_count = self.telemetry.motor_test_count.wrapping_add(1);
        let _ = events.push(HealthEvent::PropTestComplete {
            motor_pass: self.telemetry.motor_pass,
            failed,
        });

        TestState::Done
    }
}

impl Default for HealthSequencer {
    fn default() -> Self {
        Self::new(HealthConfig::default())
    }
}
