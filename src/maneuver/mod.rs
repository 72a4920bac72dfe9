//! Closed loop maneuvers.
//!
//! A maneuver owns its [`PID`](crate::PID) for the duration of one call and
//! borrows the [`HeadingFrame`](crate::HeadingFrame) it shares with the
//! maneuvers before and after it. Every maneuver follows the same shape:
//!
//! 1. Run a control loop, yielding to other tasks between iterations.
//! 2. Brake both wheels.
//! 3. Fire a fine correction [`Pulse`] if the heading error is still above its tolerance.
//! 4. Rebase the heading frame on the remaining error.
//!
//! The loop is bounded by a [`Budget`](crate::config::Budget) and every sensor
//! read is checked against [`Limits`]; either failure brakes the robot and
//! returns an [`Error`] without touching the heading frame.

use core::time::Duration;
use log::{debug, warn};
use tokio::time::{sleep, Instant};

use crate::angle::normalize;
use crate::config::{Budget, Limits, Pulse};
use crate::error::{Error, ManeuverKind, Result};
use crate::hal::Robot;
use crate::motor::mix;

mod straight;
pub use straight::{SpeedRamp, Straight};

mod turn;
pub use turn::Turn;

/// Outcome of a completed maneuver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Report {
    pub kind: ManeuverKind,

    /// Number of control iterations run.
    pub iterations: u32,

    /// Heading error (in degrees) when the control loop exited.
    pub loop_error: f32,

    /// Heading error (in degrees) after braking, before the fine correction pulse.
    pub settle_error: f32,

    /// True if the fine correction pulse fired.
    pub pulsed: bool,

    /// The residual the heading frame was rebased on, `normalize(heading - target)`.
    pub residual: f32,

    /// Time from the start of the control loop to the rebase.
    pub elapsed: Duration,
}

/// Tracks iterations and time against a [`Budget`].
pub(crate) struct Watchdog {
    kind: ManeuverKind,
    budget: Budget,
    start: Instant,
    iterations: u32,
}

impl Watchdog {
    pub(crate) fn start(kind: ManeuverKind, budget: Budget) -> Self {
        Self {
            kind,
            budget,
            start: Instant::now(),
            iterations: 0,
        }
    }

    /// Count one more iteration, failing if the budget is already spent.
    pub(crate) fn tick(&mut self) -> Result<()> {
        let elapsed = self.elapsed();
        let out_of_iterations = self
            .budget
            .max_iterations
            .map_or(false, |max| self.iterations >= max);
        let out_of_time = self
            .budget
            .max_duration
            .map_or(false, |max| elapsed >= max);

        if out_of_iterations || out_of_time {
            return Err(Error::Timeout {
                maneuver: self.kind,
                iterations: self.iterations,
                elapsed,
            });
        }

        self.iterations += 1;
        Ok(())
    }

    pub(crate) fn iterations(&self) -> u32 {
        self.iterations
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Rejects sensor readings that cannot come from a working sensor.
pub(crate) struct Guard {
    limits: Limits,
    last_heading: Option<f32>,
    last_rotation: Option<f32>,
}

impl Guard {
    pub(crate) fn new(limits: Limits) -> Self {
        Self {
            limits,
            last_heading: None,
            last_rotation: None,
        }
    }

    /// Validate a raw heading reading (in degrees).
    pub(crate) fn heading(&mut self, raw: f32) -> Result<f32> {
        if !raw.is_finite() {
            return Err(Error::ImplausibleHeading { reading: raw });
        }

        if let Some(last) = self.last_heading {
            let delta = normalize(raw - last);
            if delta.abs() > self.limits.max_heading_step {
                return Err(Error::HeadingJump {
                    delta,
                    limit: self.limits.max_heading_step,
                });
            }
        }

        self.last_heading = Some(raw);
        Ok(raw)
    }

    /// Validate a raw encoder reading (in degrees).
    pub(crate) fn rotation(&mut self, degrees: f32) -> Result<f32> {
        if !degrees.is_finite() {
            return Err(Error::ImplausibleEncoder { reading: degrees });
        }

        if let Some(last) = self.last_rotation {
            let delta = degrees - last;
            if delta.abs() > self.limits.max_encoder_step {
                return Err(Error::EncoderJump {
                    delta,
                    limit: self.limits.max_encoder_step,
                });
            }
        }

        self.last_rotation = Some(degrees);
        Ok(degrees)
    }
}

/// Reject a power setting that is not finite or lies below `floor`.
pub(crate) fn check_power(
    maneuver: ManeuverKind,
    field: &'static str,
    value: f32,
    floor: f32,
) -> Result<()> {
    if value.is_finite() && value >= floor {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            maneuver,
            field,
            value,
        })
    }
}

/// Wait for the next iteration of a control loop.
pub(crate) async fn pace(period: Option<Duration>) {
    match period {
        Some(period) => sleep(period).await,
        None => tokio::task::yield_now().await,
    }
}

/// Spin the wheels oppositely for a fixed time to close a heading `error` the control loop left.
///
/// The pulse turns the same way the control loop would for `error`, towards
/// the target. Tuning carried over from a robot that pulsed away from the
/// target needs its pulse power and duration revisited.
///
/// Returns true if the pulse fired.
pub(crate) async fn fine_correction<R>(robot: &mut R, error: f32, pulse: &Pulse, limits: &Limits) -> bool
where
    R: Robot + ?Sized,
{
    if error.abs() <= pulse.tolerance {
        return false;
    }

    debug!(
        "Correcting heading error of {:.2} degrees with a {:?} pulse",
        error, pulse.duration
    );

    robot.output(mix(0., pulse.power.copysign(error), limits.max_power));
    sleep(pulse.duration).await;
    robot.brake_all();

    true
}

/// Brake the robot if a maneuver failed.
pub(crate) fn stop_on_error<R, T>(robot: &mut R, result: Result<T>) -> Result<T>
where
    R: Robot + ?Sized,
{
    if let Err(error) = &result {
        robot.brake_all();
        warn!("Maneuver aborted: {}", error);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_accepts_wrap() {
        let mut guard = Guard::new(Limits::default());
        assert_eq!(guard.heading(359.5), Ok(359.5));
        assert_eq!(guard.heading(0.5), Ok(0.5));
    }

    #[test]
    fn guard_rejects_jumps() {
        let mut guard = Guard::new(Limits::default());
        guard.heading(10.).unwrap();
        assert_eq!(
            guard.heading(100.),
            Err(Error::HeadingJump {
                delta: 90.,
                limit: 45.
            })
        );

        guard.rotation(0.).unwrap();
        assert_eq!(
            guard.rotation(-1000.),
            Err(Error::EncoderJump {
                delta: -1000.,
                limit: 720.
            })
        );
    }

    #[test]
    fn guard_rejects_non_finite() {
        let mut guard = Guard::new(Limits::default());
        assert!(matches!(
            guard.heading(f32::NAN),
            Err(Error::ImplausibleHeading { .. })
        ));
        assert_eq!(
            guard.rotation(f32::INFINITY),
            Err(Error::ImplausibleEncoder {
                reading: f32::INFINITY
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_counts_iterations() {
        let mut watchdog = Watchdog::start(
            ManeuverKind::Turn,
            Budget::unlimited().with_max_iterations(3),
        );
        for _ in 0..3 {
            watchdog.tick().unwrap();
        }
        assert_eq!(
            watchdog.tick(),
            Err(Error::Timeout {
                maneuver: ManeuverKind::Turn,
                iterations: 3,
                elapsed: Duration::ZERO,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_measures_time() {
        let mut watchdog = Watchdog::start(
            ManeuverKind::Straight,
            Budget::unlimited().with_max_duration(Duration::from_millis(50)),
        );
        watchdog.tick().unwrap();
        sleep(Duration::from_millis(50)).await;
        assert!(matches!(
            watchdog.tick(),
            Err(Error::Timeout {
                maneuver: ManeuverKind::Straight,
                iterations: 1,
                ..
            })
        ));
    }
}
