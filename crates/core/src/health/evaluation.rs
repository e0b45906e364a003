//! Pass/fail classification of test measurements

use bitflags::bitflags;

/// Number of motors on the airframe
pub const NBR_OF_MOTORS: usize = 4;

/// Default propeller test threshold on the X+Y variance
pub const DEFAULT_PROP_TEST_THRESHOLD: f32 = 2.5;

/// Default battery sag threshold (V)
pub const DEFAULT_BAT_LOADING_SAG_THRESHOLD: f32 = 0.95;

bitflags! {
    /// Propeller test result, one bit per motor (bit set = passed)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MotorMask: u8 {
        const M1 = 0b0001;
        const M2 = 0b0010;
        const M3 = 0b0100;
        const M4 = 0b1000;
    }
}

impl MotorMask {
    /// Mask bit for a zero-based motor index
    pub fn motor(index: usize) -> Self {
        if index < NBR_OF_MOTORS {
            Self::from_bits_truncate(1 << index)
        } else {
            Self::empty()
        }
    }
}

/// Outcome of a single propeller measurement check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropTestVerdict {
    /// Value strictly inside the limits
    Pass,
    /// Value on or outside a limit
    Fail,
    /// Threshold disabled (high limit 0), counted as a pass
    NoThreshold,
}

impl PropTestVerdict {
    #[inline]
    pub fn is_pass(self) -> bool {
        !matches!(self, PropTestVerdict::Fail)
    }
}

/// Classify a propeller test value against `(low, high)`
///
/// A high limit of 0 disables the check. Otherwise the value passes only
/// when `low < value < high`; values exactly on either limit fail, as do NaNs.
pub fn evaluate_prop_test(low: f32, high: f32, value: f32) -> PropTestVerdict {
    if high == 0.0 {
        return PropTestVerdict::NoThreshold;
    }

    if value > low && value < high {
        PropTestVerdict::Pass
    } else {
        PropTestVerdict::Fail
    }
}

/// Battery load test result
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatteryVerdict {
    /// Idle voltage minus minimum loaded voltage (V)
    pub sag: f32,
    /// Sag within threshold
    pub pass: bool,
}

/// Classify the battery sag: pass iff `idle - min_loaded <= threshold`
pub fn evaluate_battery(idle_voltage: f32, min_loaded_voltage: f32, threshold: f32) -> BatteryVerdict {
    let sag = idle_voltage - min_loaded_voltage;
    BatteryVerdict {
        sag,
        pass: sag <= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threshold_always_passes() {
        assert_eq!(evaluate_prop_test(0.0, 0.0, 0.0), PropTestVerdict::NoThreshold);
        assert_eq!(evaluate_prop_test(0.0, 0.0, 1.0e6), PropTestVerdict::NoThreshold);
        assert_eq!(evaluate_prop_test(0.0, 0.0, -3.0), PropTestVerdict::NoThreshold);
        assert!(evaluate_prop_test(0.0, 0.0, 42.0).is_pass());
    }

    #[test]
    fn test_upper_boundary_excluded() {
        assert_eq!(evaluate_prop_test(0.0, 10.0, 10.0), PropTestVerdict::Fail);
        assert_eq!(evaluate_prop_test(0.0, 10.0, 9.999), PropTestVerdict::Pass);
        assert_eq!(evaluate_prop_test(0.0, 10.0, 10.001), PropTestVerdict::Fail);
    }

    #[test]
    fn test_lower_boundary_excluded() {
        assert_eq!(evaluate_prop_test(0.0, 10.0, 0.0), PropTestVerdict::Fail);
        assert_eq!(evaluate_prop_test(0.0, 10.0, -0.5), PropTestVerdict::Fail);
        assert_eq!(evaluate_prop_test(0.0, 10.0, 0.001), PropTestVerdict::Pass);
    }

    #[test]
    fn test_nan_fails() {
        assert_eq!(evaluate_prop_test(0.0, 10.0, f32::NAN), PropTestVerdict::Fail);
    }

    #[test]
    fn test_motor_mask_bits() {
        assert_eq!(MotorMask::motor(0), MotorMask::M1);
        assert_eq!(MotorMask::motor(3), MotorMask::M4);
        assert_eq!(MotorMask::motor(4), MotorMask::empty());
        assert_eq!(MotorMask::all().bits(), 0x0F);
    }

    #[test]
    fn test_battery_within_threshold() {
        let verdict = evaluate_battery(4.2, 3.9, 0.5);
        assert!((verdict.sag - 0.3).abs() < 1e-5);
        assert!(verdict.pass);
    }

    #[test]
    fn test_battery_over_threshold() {
        let verdict = evaluate_battery(4.2, 3.5, 0.5);
        assert!((verdict.sag - 0.7).abs() < 1e-5);
        assert!(!verdict.pass);
    }
}
