//! Audible feedback played on the motors after a propeller test
//!
//! These sequences block the caller through [`DelayNs`]. They only run in
//! the evaluation phase, after all motors are stopped, so nothing in the
//! control loop depends on responsiveness while they play.

use embedded_hal::delay::DelayNs;

use super::evaluation::NBR_OF_MOTORS;
use crate::traits::MotorActuator;

/// Note A4 (Hz)
pub const A4: u16 = 440;
/// Note A5 (Hz)
pub const A5: u16 = 880;
/// Note F5 (Hz)
pub const F5: u16 = 698;
/// Note D5 (Hz)
pub const D5: u16 = 587;

/// Test tone of each motor
pub const TEST_SOUND: [u16; NBR_OF_MOTORS] = [A4, A5, F5, D5];

/// Clock of the timer generating beep tones
pub const BEEP_TIMER_CLOCK_HZ: u32 = 16_800_000;

/// PWM ratio used for feedback beeps (timer period at A4, 5% duty)
pub const BEEP_RATIO: u16 = ((BEEP_TIMER_CLOCK_HZ / A4 as u32) / 20) as u16;

/// Duration of one beep (ms)
pub const MOTORS_TEST_ON_TIME_MS: u32 = 50;

/// Pause between failure beeps (ms)
pub const FAILURE_BEEP_GAP_MS: u32 = 100;

/// Pause between motors in the pass melody (ms)
pub const MOTORS_TEST_DELAY_TIME_MS: u32 = 150;

/// Number of beeps signalling a failed motor
pub const FAILURE_BEEP_COUNT: usize = 3;

fn beep_once<A, D>(actuator: &mut A, delay: &mut D, motor: usize, gap_ms: u32)
where
    A: MotorActuator + ?Sized,
    D: DelayNs,
{
    let tone = TEST_SOUND.get(motor).copied().unwrap_or(A4);
    actuator.beep(motor, true, tone, BEEP_RATIO);
    delay.delay_ms(MOTORS_TEST_ON_TIME_MS);
    actuator.beep(motor, false, 0, 0);
    delay.delay_ms(gap_ms);
}

/// Three short beeps on a motor that failed the propeller test
pub fn play_failure<A, D>(actuator: &mut A, delay: &mut D, motor: usize)
where
    A: MotorActuator + ?Sized,
    D: DelayNs,
{
    for _ in 0..FAILURE_BEEP_COUNT {
        beep_once(actuator, delay, motor, FAILURE_BEEP_GAP_MS);
    }
}

/// One beep per motor, in order, after every motor passed
pub fn play_pass_melody<A, D>(actuator: &mut A, delay: &mut D)
where
    A: MotorActuator + ?Sized,
    D: DelayNs,
{
    for motor in 0..NBR_OF_MOTORS {
        beep_once(actuator, delay, motor, MOTORS_TEST_DELAY_TIME_MS);
    }
}
