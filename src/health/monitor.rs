//! Per-tick self-test driver
//!
//! Ties the parameter store to the sequencer: each tick the edge-trigger
//! parameters are consumed, threshold and PWM overrides are refreshed, and
//! one sequencer step runs when a test is active. Events from the step are
//! logged through [`report`](super::report).

use embedded_hal::delay::DelayNs;
use flight_health_core::health::{
    AccelSample, HealthConfig, HealthEvent, HealthSequencer, HealthTelemetry, TestState,
    MAX_HEALTH_EVENTS,
};
use flight_health_core::parameters::{HealthParams, ParameterError, ParameterStore};
use flight_health_core::traits::HealthPlatform;
use heapless::Vec;

use super::report;

/// Self-test runner owned by the control loop
pub struct HealthMonitor {
    sequencer: HealthSequencer,
}

impl HealthMonitor {
    /// Register the health parameters and build the sequencer
    ///
    /// Values already in the store (e.g. loaded from flash) override the
    /// matching fields of `config`.
    pub fn new(store: &mut ParameterStore, mut config: HealthConfig) -> Result<Self, ParameterError> {
        HealthParams::register_defaults(store)?;
        HealthParams::from_store(store).apply_to(&mut config);

        if config.run_prop_test_at_startup {
            crate::log_info!("Health: propeller test scheduled at startup");
        }

        Ok(Self {
            sequencer: HealthSequencer::new(config),
        })
    }

    /// Run one control tick
    ///
    /// # Arguments
    ///
    /// * `store` - Parameter store holding the health parameters
    /// * `sample` - Accelerometer reading of this tick
    /// * `platform` - Motors, accelerometer mode, battery and profiles
    /// * `delay` - Blocking delay for feedback beeps
    ///
    /// # Returns
    ///
    /// Events produced by this tick (empty when idle)
    pub fn tick<D: DelayNs>(
        &mut self,
        store: &mut ParameterStore,
        sample: &AccelSample,
        platform: &mut dyn HealthPlatform,
        delay: &mut D,
    ) -> Result<Vec<HealthEvent, MAX_HEALTH_EVENTS>, ParameterError> {
        let triggers = HealthParams::take_triggers(store)?;
        if triggers.prop_test {
            self.sequencer.request_prop_test();
        }
        if triggers.bat_test {
            self.sequencer.request_bat_test();
        }

        let mut config = *self.sequencer.config();
        HealthParams::from_store(store).apply_to(&mut config);
        self.sequencer.set_config(config);

        if !self.sequencer.shall_we_run() {
            return Ok(Vec::new());
        }

        let events = self.sequencer.run_tests(sample, platform, delay);
        report::report_events(&events);
        Ok(events)
    }

    /// Enter the battery soak phase (one idle period, then one battery test)
    pub fn start_battery_soak(&mut self) {
        crate::log_info!("Health: battery soak started");
        self.sequencer.start_battery_soak();
    }

    /// Whether a test is in progress
    pub fn is_running(&self) -> bool {
        self.sequencer.state() != TestState::Done
    }

    pub fn state(&self) -> TestState {
        self.sequencer.state()
    }

    /// Latest self-test results
    pub fn telemetry(&self) -> &HealthTelemetry {
        self.sequencer.telemetry()
    }

    pub fn sequencer(&self) -> &HealthSequencer {
        &self.sequencer
    }
}
