//! Health Self-Test Parameter Definitions
//!
//! # Parameters
//!
//! - `HLTH_PROP_START` - Set nonzero to start the propeller test (edge trigger)
//! - `HLTH_BAT_START` - Set nonzero to start the battery test (edge trigger)
//! - `HLTH_PROP_THR` - Variance threshold for the propeller test, 0 disables (persistent)
//! - `HLTH_PROP_PWM` - PWM ratio for the propeller test, 0 = profile default (persistent)
//! - `HLTH_BAT_PWM` - PWM ratio for the battery test, 0 = profile default (persistent)

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::health::{HealthConfig, DEFAULT_PROP_TEST_THRESHOLD};

pub const PARAM_PROP_START: &str = "HLTH_PROP_START";
pub const PARAM_BAT_START: &str = "HLTH_BAT_START";
pub const PARAM_PROP_THRESHOLD: &str = "HLTH_PROP_THR";
pub const PARAM_PROP_PWM: &str = "HLTH_PROP_PWM";
pub const PARAM_BAT_PWM: &str = "HLTH_BAT_PWM";

/// Triggers are u8 on the wire
const TRIGGER_MAX: f32 = u8::MAX as f32;
const RATIO_MAX: f32 = u16::MAX as f32;

/// Health parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthParams {
    /// Variance threshold (0 = check disabled)
    pub prop_test_threshold: f32,
    /// Propeller test PWM override
    pub prop_test_pwm_ratio: u16,
    /// Battery test PWM override
    pub bat_test_pwm_ratio: u16,
}

/// Test requests consumed from the trigger parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthTriggers {
    pub prop_test: bool,
    pub bat_test: bool,
}

impl HealthTriggers {
    pub fn any(&self) -> bool {
        self.prop_test || self.bat_test
    }
}

impl Default for HealthParams {
    fn default() -> Self {
        Self {
            prop_test_threshold: DEFAULT_PROP_TEST_THRESHOLD,
            prop_test_pwm_ratio: 0,
            bat_test_pwm_ratio: 0,
        }
    }
}

fn to_ratio(value: Option<&ParamValue>) -> Option<u16> {
    match value {
        Some(ParamValue::Int(v)) => u16::try_from(*v).ok(),
        Some(ParamValue::Float(v)) if *v >= 0.0 && *v <= u16::MAX as f32 => Some(*v as u16),
        _ => None,
    }
}

impl HealthParams {
    /// Register health parameters with default values
    ///
    /// Each parameter carries bounds, so an external `set` of a negative
    /// threshold or a PWM ratio above `u16::MAX` fails with `InvalidConfig`
    /// and keeps the previous value.
    ///
    /// # Arguments
    ///
    /// * `store` - Parameter store to register parameters in
    ///
    /// # Returns
    ///
    /// Ok if all parameters registered successfully
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        // Edge triggers are never saved
        for name in [PARAM_PROP_START, PARAM_BAT_START] {
            store.register_bounded(name, ParamValue::Int(0), ParamFlags::empty(), 0.0, TRIGGER_MAX)?;
        }

        store.register_bounded(
            PARAM_PROP_THRESHOLD,
            ParamValue::Float(DEFAULT_PROP_TEST_THRESHOLD),
            ParamFlags::PERSISTENT,
            0.0,
            f32::INFINITY,
        )?;
        for name in [PARAM_PROP_PWM, PARAM_BAT_PWM] {
            store.register_bounded(name, ParamValue::Int(0), ParamFlags::PERSISTENT, 0.0, RATIO_MAX)?;
        }

        Ok(())
    }

    /// Load health parameters from parameter store
    ///
    /// Out-of-range writes never reach the store (see `register_defaults`);
    /// a missing entry falls back to the default.
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = Self::default();

        let prop_test_threshold = match store.get(PARAM_PROP_THRESHOLD) {
            Some(ParamValue::Float(v)) if *v >= 0.0 => *v,
            Some(ParamValue::Int(v)) if *v >= 0 => *v as f32,
            _ => defaults.prop_test_threshold,
        };

        let prop_test_pwm_ratio =
            to_ratio(store.get(PARAM_PROP_PWM)).unwrap_or(defaults.prop_test_pwm_ratio);
        let bat_test_pwm_ratio =
            to_ratio(store.get(PARAM_BAT_PWM)).unwrap_or(defaults.bat_test_pwm_ratio);

        Self {
            prop_test_threshold,
            prop_test_pwm_ratio,
            bat_test_pwm_ratio,
        }
    }

    /// Consume the edge-trigger parameters
    ///
    /// Any nonzero trigger is reset to 0 and reported as a request.
    pub fn take_triggers(store: &mut ParameterStore) -> Result<HealthTriggers, ParameterError> {
        let mut triggers = HealthTriggers::default();

        if store.get(PARAM_PROP_START).is_some_and(|v| v.is_set()) {
            store.update_internal(PARAM_PROP_START, ParamValue::Int(0))?;
            triggers.prop_test = true;
        }
        if store.get(PARAM_BAT_START).is_some_and(|v| v.is_set()) {
            store.update_internal(PARAM_BAT_START, ParamValue::Int(0))?;
            triggers.bat_test = true;
        }

        Ok(triggers)
    }

    /// Apply these values on top of a sequencer configuration
    pub fn apply_to(&self, config: &mut HealthConfig) {
        config.prop_test_threshold = self.prop_test_threshold;
        config.prop_test_pwm_ratio = self.prop_test_pwm_ratio;
        config.bat_test_pwm_ratio = self.bat_test_pwm_ratio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_defaults() -> ParameterStore {
        let mut store = ParameterStore::new();
        HealthParams::register_defaults(&mut store).unwrap();
        store
    }

    #[test]
    fn test_register_defaults() {
        let store = store_with_defaults();

        assert_eq!(store.get(PARAM_PROP_START), Some(&ParamValue::Int(0)));
        assert_eq!(store.get(PARAM_BAT_START), Some(&ParamValue::Int(0)));
        assert!(store.get(PARAM_PROP_THRESHOLD).is_some());
        assert_eq!(store.iter_persistent().count(), 3);
    }

    #[test]
    fn test_from_store_defaults() {
        let store = store_with_defaults();
        assert_eq!(HealthParams::from_store(&store), HealthParams::default());
    }

    #[test]
    fn test_from_store_custom_values() {
        let mut store = store_with_defaults();
        store.set(PARAM_PROP_THRESHOLD, ParamValue::Float(4.0)).unwrap();
        store.set(PARAM_PROP_PWM, ParamValue::Int(30000)).unwrap();
        store.set(PARAM_BAT_PWM, ParamValue::Int(50000)).unwrap();

        let params = HealthParams::from_store(&store);
        assert!((params.prop_test_threshold - 4.0).abs() < f32::EPSILON);
        assert_eq!(params.prop_test_pwm_ratio, 30000);
        assert_eq!(params.bat_test_pwm_ratio, 50000);
        assert!(store.is_dirty());
    }

    #[test]
    fn test_from_store_empty_store_uses_defaults() {
        let store = ParameterStore::new();
        assert_eq!(HealthParams::from_store(&store), HealthParams::default());
    }

    #[test]
    fn test_out_of_range_set_keeps_previous_value() {
        let mut store = store_with_defaults();
        store.set(PARAM_PROP_THRESHOLD, ParamValue::Float(4.0)).unwrap();
        store.set(PARAM_PROP_PWM, ParamValue::Int(30000)).unwrap();

        assert_eq!(
            store.set(PARAM_PROP_THRESHOLD, ParamValue::Float(-1.0)),
            Err(ParameterError::InvalidConfig)
        );
        assert_eq!(
            store.set(PARAM_PROP_PWM, ParamValue::Int(70000)),
            Err(ParameterError::InvalidConfig)
        );
        assert_eq!(
            store.set(PARAM_BAT_PWM, ParamValue::Int(-5)),
            Err(ParameterError::InvalidConfig)
        );
        assert_eq!(
            store.set(PARAM_BAT_START, ParamValue::Int(-1)),
            Err(ParameterError::InvalidConfig)
        );

        let params = HealthParams::from_store(&store);
        assert_eq!(params.prop_test_threshold, 4.0);
        assert_eq!(params.prop_test_pwm_ratio, 30000);
        assert_eq!(params.bat_test_pwm_ratio, 0);

        store.set(PARAM_BAT_PWM, ParamValue::Int(65535)).unwrap();
        assert_eq!(HealthParams::from_store(&store).bat_test_pwm_ratio, 65535);
    }

    #[test]
    fn test_take_triggers_consumes() {
        let mut store = store_with_defaults();
        assert!(!HealthParams::take_triggers(&mut store).unwrap().any());

        store.set(PARAM_PROP_START, ParamValue::Int(1)).unwrap();
        store.set(PARAM_BAT_START, ParamValue::Int(1)).unwrap();

        let triggers = HealthParams::take_triggers(&mut store).unwrap();
        assert!(triggers.prop_test);
        assert!(triggers.bat_test);
        assert_eq!(store.get(PARAM_PROP_START), Some(&ParamValue::Int(0)));
        assert_eq!(store.get(PARAM_BAT_START), Some(&ParamValue::Int(0)));

        // Edge triggered: nothing pending afterwards
        assert!(!HealthParams::take_triggers(&mut store).unwrap().any());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_apply_to_config() {
        let params = HealthParams {
            prop_test_threshold: 0.0,
            prop_test_pwm_ratio: 100,
            bat_test_pwm_ratio: 200,
        };
        let mut config = HealthConfig {
            play_melody_on_pass: true,
            ..Default::default()
        };
        params.apply_to(&mut config);

        assert_eq!(config.prop_test_threshold, 0.0);
        assert_eq!(config.prop_test_pwm_ratio, 100);
        assert_eq!(config.bat_test_pwm_ratio, 200);
        assert!(config.play_melody_on_pass);
    }
}
