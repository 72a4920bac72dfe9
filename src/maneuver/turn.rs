use log::{info, trace};

use super::{check_power, fine_correction, pace, stop_on_error, Guard, Report, Watchdog};
use crate::angle::angle_error;
use crate::config::TurnConfig;
use crate::error::{Error, ManeuverKind, Result};
use crate::hal::Robot;
use crate::heading::HeadingFrame;
use crate::motor::mix;
use crate::pid::PID;

/// Turn in place to a heading relative to the current heading frame.
///
/// The wheels spin in opposite directions at the PID correction, clamped to the
/// configured power band, until the heading is within tolerance of the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    /// Target heading in degrees. Positive turns increase the heading.
    pub target: f32,
    pub config: TurnConfig,
}

impl Turn {
    pub fn new(target: f32) -> Self {
        Self {
            target,
            config: TurnConfig::default(),
        }
    }

    /// Builder method to set `config` and return `self`
    pub fn with_config(mut self, config: TurnConfig) -> Self {
        self.config = config;
        self
    }

    /// Turn the robot, then rebase `frame` on the remaining error.
    pub async fn run<R>(&self, robot: &mut R, frame: &mut HeadingFrame, mut pid: PID) -> Result<Report>
    where
        R: Robot + ?Sized,
    {
        if !self.target.is_finite() {
            return Err(Error::InvalidTarget {
                maneuver: ManeuverKind::Turn,
                value: self.target,
            });
        }

        let config = &self.config;
        check_power(ManeuverKind::Turn, "limits.max_power", config.limits.max_power, 0.)?;
        check_power(ManeuverKind::Turn, "min_power", config.min_power, 0.)?;
        check_power(ManeuverKind::Turn, "max_power", config.max_power, config.min_power)?;

        info!("Turning to {:.1} degrees", self.target);
        pid.reset();

        let mut watchdog = Watchdog::start(ManeuverKind::Turn, self.config.budget);
        let mut guard = Guard::new(self.config.limits);

        let result = self
            .control(robot, frame, &mut pid, &mut watchdog, &mut guard)
            .await;
        let loop_error = stop_on_error(robot, result)?;
        robot.brake_all();

        let raw = guard.heading(robot.heading());
        let raw = stop_on_error(robot, raw)?;
        let settle_error = angle_error(self.target, frame.heading(raw));
        let pulsed =
            fine_correction(robot, settle_error, &self.config.pulse, &self.config.limits).await;

        let raw = guard.heading(robot.heading());
        let raw = stop_on_error(robot, raw)?;
        let residual = frame.rebase(raw, self.target);

        let report = Report {
            kind: ManeuverKind::Turn,
            iterations: watchdog.iterations(),
            loop_error,
            settle_error,
            pulsed,
            residual,
            elapsed: watchdog.elapsed(),
        };
        info!(
            "Turn finished after {} iterations with {:.2} degrees residual",
            report.iterations, residual
        );
        Ok(report)
    }

    /// Run the control loop until the heading is within tolerance, returning the final error.
    async fn control<R>(
        &self,
        robot: &mut R,
        frame: &HeadingFrame,
        pid: &mut PID,
        watchdog: &mut Watchdog,
        guard: &mut Guard,
    ) -> Result<f32>
    where
        R: Robot + ?Sized,
    {
        let config = &self.config;

        loop {
            let raw = guard.heading(robot.heading())?;
            let error = angle_error(self.target, frame.heading(raw));
            if error.abs() <= config.tolerance {
                return Ok(error);
            }

            watchdog.tick()?;

            let correction = pid.step(error, config.gains);
            let power = correction.abs().clamp(config.min_power, config.max_power);
            robot.output(mix(0., power.copysign(error), config.limits.max_power));

            trace!(
                "turn error {:.3} correction {:.3} power {:.1}",
                error,
                correction,
                power
            );
            pace(config.period).await;
        }
    }
}
