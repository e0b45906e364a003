//! Self-test runner
//!
//! - [`monitor`]: Per-tick driver tying parameters to the sequencer
//! - [`report`]: Log output for sequencer events
//! - [`task`]: Embassy loop at the control rate (`pico2_w` only)

pub mod monitor;
pub mod report;
pub mod task;

pub use monitor::HealthMonitor;
pub use report::{report_event, report_events, severity, Severity};
pub use task::HEALTH_TICK_PERIOD_MS;
#[cfg(feature = "pico2_w")]
pub use task::health_loop;
