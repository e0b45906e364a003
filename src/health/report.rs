//! Log output for self-test events
//!
//! Failures are warnings, verdicts and milestones are info, raw
//! measurements are debug.

use flight_health_core::health::{HealthEvent, PropTestVerdict};

/// Log level chosen for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warn,
}

/// Level at which `event` is logged
pub fn severity(event: &HealthEvent) -> Severity {
    match event {
        HealthEvent::NoiseFloorMeasured(_) | HealthEvent::MotorMeasured { .. } => Severity::Debug,
        HealthEvent::PropTestEvaluated {
            verdict: PropTestVerdict::Fail,
            ..
        } => Severity::Warn,
        HealthEvent::PropTestComplete { failed, .. } if *failed > 0 => Severity::Warn,
        HealthEvent::BatteryTestEvaluated { pass: false, .. } => Severity::Warn,
        _ => Severity::Info,
    }
}

/// Log one event at the level given by [`severity`], returning that level
pub fn report_event(event: &HealthEvent) -> Severity {
    let level = severity(event);
    match level {
        Severity::Debug => report_measurement(event),
        Severity::Info => report_progress(event),
        Severity::Warn => report_failure(event),
    }
    level
}

fn report_measurement(event: &HealthEvent) {
    match *event {
        HealthEvent::NoiseFloorMeasured(v) => {
            crate::log_debug!("Health: noise floor var x={} y={} z={}", v.x, v.y, v.z);
        }
        HealthEvent::MotorMeasured {
            motor,
            variance,
            voltage_sag,
        } => {
            crate::log_debug!(
                "Health: M{} var x={} y={} z={}, sag {} V",
                motor + 1,
                variance.x,
                variance.y,
                variance.z,
                voltage_sag
            );
        }
        _ => {}
    }
}

fn report_progress(event: &HealthEvent) {
    match *event {
        HealthEvent::PropTestStarted { idle_voltage } => {
            crate::log_info!("Health: propeller test started, idle {} V", idle_voltage);
        }
        HealthEvent::PropTestEvaluated {
            motor,
            verdict: PropTestVerdict::NoThreshold,
            value,
            ..
        } => {
            crate::log_info!("Health: M{} not checked, var {}", motor + 1, value);
        }
        HealthEvent::PropTestEvaluated {
            motor,
            value,
            threshold,
            ..
        } => {
            crate::log_info!("Health: M{} OK, var {} < {}", motor + 1, value, threshold);
        }
        HealthEvent::PropTestComplete { .. } => {
            crate::log_info!("Health: propeller test done, all motors passed");
        }
        HealthEvent::BatteryTestEvaluated {
            idle_voltage, sag, ..
        } => {
            crate::log_info!("Health: battery OK, idle {} V, sag {} V", idle_voltage, sag);
        }
        HealthEvent::BatterySoakReport { idle_voltage, sag } => {
            crate::log_info!("Health: soak idle {} V, sag {} V", idle_voltage, sag);
        }
        _ => {}
    }
}

fn report_failure(event: &HealthEvent) {
    match *event {
        HealthEvent::PropTestEvaluated {
            motor,
            value,
            threshold,
            ..
        } => {
            crate::log_warn!(
                "Health: M{} FAILED, var {} outside (0, {})",
                motor + 1,
                value,
                threshold
            );
        }
        HealthEvent::PropTestComplete { motor_pass, failed } => {
            crate::log_warn!(
                "Health: propeller test done, {} motor(s) failed, pass mask {}",
                failed,
                motor_pass.bits()
            );
        }
        HealthEvent::BatteryTestEvaluated {
            idle_voltage,
            sag,
            threshold,
            ..
        } => {
            crate::log_warn!(
                "Health: battery sag {} V exceeds {} V (idle {} V)",
                sag,
                threshold,
                idle_voltage
            );
        }
        _ => {}
    }
}

/// Log every event of one step, in order
pub fn report_events(events: &[HealthEvent]) {
    for event in events {
        let _ = report_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_health_core::health::{AxisVariance, MotorMask};

    fn all_events() -> [HealthEvent; 7] {
        [
            HealthEvent::PropTestStarted { idle_voltage: 4.1 },
            HealthEvent::NoiseFloorMeasured(AxisVariance::default()),
            HealthEvent::MotorMeasured {
                motor: 0,
                variance: AxisVariance { x: 0.2, y: 0.3, z: 0.1 },
                voltage_sag: 0.2,
            },
            HealthEvent::PropTestEvaluated {
                motor: 0,
                verdict: PropTestVerdict::Pass,
                value: 0.5,
                threshold: 2.5,
            },
            HealthEvent::PropTestComplete {
                motor_pass: MotorMask::all(),
                failed: 0,
            },
            HealthEvent::BatteryTestEvaluated {
                idle_voltage: 4.2,
                sag: 0.3,
                threshold: 0.95,
                pass: true,
            },
            HealthEvent::BatterySoakReport {
                idle_voltage: 4.2,
                sag: 0.3,
            },
        ]
    }

    #[test]
    fn test_measurements_are_debug() {
        let events = all_events();
        assert_eq!(severity(&events[1]), Severity::Debug);
        assert_eq!(severity(&events[2]), Severity::Debug);
    }

    #[test]
    fn test_passes_are_info() {
        let events = all_events();
        for index in [0, 3, 4, 5, 6] {
            assert_eq!(severity(&events[index]), Severity::Info);
        }

        let unchecked = HealthEvent::PropTestEvaluated {
            motor: 2,
            verdict: PropTestVerdict::NoThreshold,
            value: 9.0,
            threshold: 0.0,
        };
        assert_eq!(severity(&unchecked), Severity::Info);
    }

    #[test]
    fn test_failures_are_warnings() {
        let motor_fail = HealthEvent::PropTestEvaluated {
            motor: 1,
            verdict: PropTestVerdict::Fail,
            value: 3.0,
            threshold: 2.5,
        };
        let run_fail = HealthEvent::PropTestComplete {
            motor_pass: MotorMask::M1,
            failed: 3,
        };
        let battery_fail = HealthEvent::BatteryTestEvaluated {
            idle_voltage: 4.2,
            sag: 1.1,
            threshold: 0.95,
            pass: false,
        };

        assert_eq!(severity(&motor_fail), Severity::Warn);
        assert_eq!(severity(&run_fail), Severity::Warn);
        assert_eq!(severity(&battery_fail), Severity::Warn);
    }

    #[test]
    fn test_report_logs_at_severity_level() {
        let weak_battery = HealthEvent::BatteryTestEvaluated {
            idle_voltage: 4.2,
            sag: 1.1,
            threshold: 0.95,
            pass: false,
        };
        assert_eq!(report_event(&weak_battery), Severity::Warn);

        let events = all_events();
        assert_eq!(report_event(&events[2]), Severity::Debug);
        for event in &events {
            assert_eq!(report_event(event), severity(event));
        }
        report_events(&events);
    }
}
