//! Self-Test Loop Task
//!
//! Drives the [`HealthMonitor`](super::HealthMonitor) once per control tick.
//! Every duration in the self-test is a tick count, so the loop must run at
//! exactly 1 kHz for the 50 ms / 950 ms motor timing to hold.
//!
//! ## Integration
//!
//! The caller provides:
//! - The health monitor, created at boot
//! - The shared parameter store (also written by the parameter protocol)
//! - A platform implementing the health collaborator traits
//! - A closure returning the latest accelerometer sample

#[cfg(feature = "pico2_w")]
use super::HealthMonitor;
#[cfg(feature = "pico2_w")]
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
#[cfg(feature = "pico2_w")]
use embassy_sync::mutex::Mutex;
#[cfg(feature = "pico2_w")]
use embassy_time::{Delay, Duration, Ticker};
#[cfg(feature = "pico2_w")]
use flight_health_core::health::AccelSample;
#[cfg(feature = "pico2_w")]
use flight_health_core::parameters::ParameterStore;
#[cfg(feature = "pico2_w")]
use flight_health_core::traits::HealthPlatform;

/// Self-test tick period (1 kHz)
pub const HEALTH_TICK_PERIOD_MS: u64 = 1;

/// Self-test loop (1 kHz)
///
/// Never returns. Feedback beeps after a propeller test block this loop for
/// a few hundred milliseconds; the ticker then catches up without
/// affecting any running test, since evaluation is the last step.
///
/// # Example
///
/// ```rust,ignore
/// #[embassy_executor::task]
/// async fn health_task(
///     params: &'static Mutex<CriticalSectionRawMutex, ParameterStore>,
///     mut platform: BoardHealth,
///     imu: ImuHandle,
/// ) {
///     let monitor = {
///         let mut store = params.lock().await;
///         HealthMonitor::new(&mut store, HealthConfig::default()).unwrap()
///     };
///     health_loop(monitor, params, &mut platform, || imu.latest()).await
/// }
/// ```
#[cfg(feature = "pico2_w")]
pub async fn health_loop<P, S>(
    mut monitor: HealthMonitor,
    params: &Mutex<CriticalSectionRawMutex, ParameterStore>,
    platform: &mut P,
    mut read_sample: S,
) -> !
where
    P: HealthPlatform,
    S: FnMut() -> AccelSample,
{
    crate::log_info!("Health loop started");

    let mut ticker = Ticker::every(Duration::from_millis(HEALTH_TICK_PERIOD_MS));
    let mut delay = Delay;

    loop {
        let sample = read_sample();
        {
            let mut store = params.lock().await;
            if let Err(e) = monitor.tick(&mut store, &sample, platform, &mut delay) {
                crate::log_error!(
                    "Health tick failed in {}: {}",
                    monitor.state().as_str(),
                    e.as_str()
                );
            }
        }

        ticker.next().await;
    }
}
