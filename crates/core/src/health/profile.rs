//! Per-motor test timing profiles
//!
//! Motor and propeller combinations have different spin-up transients, so
//! the on/off timing and the start of the sample window are per-profile
//! values rather than constants. All times are in control ticks (1 kHz).

/// Timing and drive levels for one motor's health test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorTestProfile {
    /// Ticks the motor is energized
    pub on_period_msec: u32,
    /// Ticks the motor coasts before the next motor starts
    pub off_period_msec: u32,
    /// PWM ratio for the propeller test (0 = not usable without override)
    pub on_period_pwm_ratio_prop: u16,
    /// PWM ratio for the battery test (0 = not usable without override)
    pub on_period_pwm_ratio_bat: u16,
    /// Tick at which the sample window opens, skipping the spin-up transient
    pub variance_measurement_start_msec: i32,
}

impl MotorTestProfile {
    /// Brushed coreless motors: short burst, window starts immediately
    pub const BRUSHED: Self = Self {
        on_period_msec: 50,
        off_period_msec: 950,
        on_period_pwm_ratio_prop: 0xFFFF,
        on_period_pwm_ratio_bat: 40000,
        variance_measurement_start_msec: 0,
    };

    /// Brushless motors: longer run, window opens after one second of spin-up.
    /// ESC ranges differ too much for a default ratio, so the PWM overrides
    /// must be configured.
    pub const BRUSHLESS: Self = Self {
        on_period_msec: 2000,
        off_period_msec: 1000,
        on_period_pwm_ratio_prop: 0,
        on_period_pwm_ratio_bat: 0,
        variance_measurement_start_msec: 1000,
    };

    /// Ticks spent on one motor before advancing to the next
    #[inline]
    pub const fn cycle_ticks(&self) -> u32 {
        self.on_period_msec + self.off_period_msec
    }

    /// Propeller test ratio, preferring a nonzero override
    #[inline]
    pub fn prop_ratio(&self, override_ratio: u16) -> u16 {
        if override_ratio > 0 {
            override_ratio
        } else {
            self.on_period_pwm_ratio_prop
        }
    }

    /// Battery test ratio, preferring a nonzero override
    #[inline]
    pub fn bat_ratio(&self, override_ratio: u16) -> u16 {
        if override_ratio > 0 {
            override_ratio
        } else {
            self.on_period_pwm_ratio_bat
        }
    }
}

impl Default for MotorTestProfile {
    fn default() -> Self {
        Self::BRUSHED
    }
}
