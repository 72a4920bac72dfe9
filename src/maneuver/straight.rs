use log::{info, trace};

use super::{check_power, fine_correction, pace, stop_on_error, Guard, Report, Watchdog};
use crate::angle::angle_error;
use crate::config::StraightConfig;
use crate::error::{Error, ManeuverKind, Result};
use crate::hal::Robot;
use crate::heading::HeadingFrame;
use crate::motor::mix;
use crate::pid::PID;

/// Trapezoidal speed profile keyed off the fraction of the distance travelled.
///
/// The speed climbs by `increment` per iteration until `accel_fraction` of the
/// distance, holds, then falls by `increment` per iteration after
/// `decel_fraction`. It never exceeds the final speed and, once the robot stops
/// accelerating, never drops below the minimum cruise speed.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedRamp {
    velocity: f32,
    final_speed: f32,
    increment: f32,
    accel_until: f32,
    decel_from: f32,
    floor: f32,
}

impl SpeedRamp {
    /// Create a ramp for a move of `target` wheel rotations ending at `final_speed` percent.
    pub fn new(target: f32, final_speed: f32, config: &StraightConfig) -> Self {
        let target = target.abs();
        let final_speed = final_speed.abs();

        Self {
            velocity: config.start_speed.min(final_speed),
            final_speed,
            increment: config.increment,
            accel_until: config.accel_fraction * target,
            decel_from: config.decel_fraction * target,
            floor: config.min_cruise.min(final_speed),
        }
    }

    /// The current commanded speed.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advance the ramp given the rotations travelled so far and return the new speed.
    pub fn update(&mut self, progress: f32) -> f32 {
        if progress < self.accel_until {
            if self.velocity < self.final_speed {
                self.velocity = (self.velocity + self.increment).min(self.final_speed);
            }
        } else {
            if progress > self.decel_from {
                self.velocity -= self.increment;
            }
            self.velocity = self.velocity.max(self.floor);
        }

        self.velocity
    }
}

/// Drive a number of wheel rotations while holding heading zero in the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Straight {
    /// Distance in wheel rotations.
    pub rotations: f32,

    /// Final speed in percent.
    pub speed: f32,

    /// Drive backwards.
    pub reverse: bool,

    pub config: StraightConfig,
}

impl Straight {
    /// Drive forwards `rotations` wheel rotations, ramping up to `speed` percent.
    pub fn new(rotations: f32, speed: f32) -> Self {
        Self {
            rotations,
            speed,
            reverse: false,
            config: StraightConfig::default(),
        }
    }

    /// Builder method to set `reverse` and return `self`
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Builder method to set `config` and return `self`
    pub fn with_config(mut self, config: StraightConfig) -> Self {
        self.config = config;
        self
    }

    /// Drive the robot, then rebase `frame` on the remaining heading error.
    pub async fn run<R>(&self, robot: &mut R, frame: &mut HeadingFrame, mut pid: PID) -> Result<Report>
    where
        R: Robot + ?Sized,
    {
        for value in [self.rotations, self.speed] {
            if !value.is_finite() {
                return Err(Error::InvalidTarget {
                    maneuver: ManeuverKind::Straight,
                    value,
                });
            }
        }
        check_power(
            ManeuverKind::Straight,
            "limits.max_power",
            self.config.limits.max_power,
            0.,
        )?;

        let target = self.rotations.abs();
        info!(
            "Driving {} {:.2} rotations at {:.0}%",
            if self.reverse { "backwards" } else { "forwards" },
            target,
            self.speed.abs()
        );

        pid.reset();
        robot.reset_rotation();

        let mut ramp = SpeedRamp::new(target, self.speed, &self.config);
        let mut watchdog = Watchdog::start(ManeuverKind::Straight, self.config.budget);
        let mut guard = Guard::new(self.config.limits);

        robot.output(mix(
            self.direction() * ramp.velocity(),
            pid.correction,
            self.config.limits.max_power,
        ));

        let result = self
            .control(robot, frame, target, &mut pid, &mut ramp, &mut watchdog, &mut guard)
            .await;
        let loop_error = stop_on_error(robot, result)?;
        robot.brake_all();

        let raw = guard.heading(robot.heading());
        let raw = stop_on_error(robot, raw)?;
        let settle_error = angle_error(0., frame.heading(raw));
        let pulsed =
            fine_correction(robot, settle_error, &self.config.pulse, &self.config.limits).await;

        let raw = guard.heading(robot.heading());
        let raw = stop_on_error(robot, raw)?;
        let residual = frame.rebase(raw, 0.);

        let report = Report {
            kind: ManeuverKind::Straight,
            iterations: watchdog.iterations(),
            loop_error,
            settle_error,
            pulsed,
            residual,
            elapsed: watchdog.elapsed(),
        };
        info!(
            "Straight finished after {} iterations with {:.2} degrees residual",
            report.iterations, residual
        );
        Ok(report)
    }

    fn direction(&self) -> f32 {
        if self.reverse {
            -1.
        } else {
            1.
        }
    }

    /// Run the control loop until the wheel has turned `target` rotations,
    /// returning the last heading error.
    #[allow(clippy::too_many_arguments)]
    async fn control<R>(
        &self,
        robot: &mut R,
        frame: &HeadingFrame,
        target: f32,
        pid: &mut PID,
        ramp: &mut SpeedRamp,
        watchdog: &mut Watchdog,
        guard: &mut Guard,
    ) -> Result<f32>
    where
        R: Robot + ?Sized,
    {
        let config = &self.config;
        let mut error = 0.;

        loop {
            let progress = guard.rotation(robot.rotation())?.abs() / 360.;
            if progress >= target {
                return Ok(error);
            }

            watchdog.tick()?;

            let raw = guard.heading(robot.heading())?;
            error = angle_error(0., frame.heading(raw));
            let correction = pid.step(error, config.gains);
            let velocity = ramp.update(progress);

            robot.output(mix(
                self.direction() * velocity,
                correction,
                config.limits.max_power,
            ));

            trace!(
                "straight progress {:.3} error {:.3} correction {:.3} velocity {:.1}",
                progress,
                error,
                correction,
                velocity
            );
            pace(config.period).await;
        }
    }
}
