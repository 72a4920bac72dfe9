//! Sequencing maneuvers into a run.
//!
//! A [`Mission`] executes its [`Step`]s once, in order, threading a single
//! [`HeadingFrame`] through every maneuver so each one starts from the error
//! the last one left. The first error stops the run.

use core::time::Duration;
use log::{debug, info};
use std::collections::VecDeque;
use tokio::time::sleep;

use crate::config::{StraightConfig, TurnConfig};
use crate::error::Result;
use crate::hal::{ColorSensor, Hsv, Robot};
use crate::heading::HeadingFrame;
use crate::maneuver::{Report, Straight, Turn};
use crate::pid::PID;

/// Maps a color reading to the steps a recognized marker calls for.
pub type Classifier = fn(Hsv) -> Option<Vec<Step>>;

#[derive(Clone, Debug)]
pub enum Step {
    /// Drive `rotations` wheel rotations at up to `speed` percent.
    Straight {
        rotations: f32,
        speed: f32,
        reverse: bool,
    },

    /// Turn to a heading (in degrees) relative to the current frame.
    Turn(f32),

    /// Stand still.
    Wait(Duration),

    /// Rebase the heading frame against a target without moving.
    ZeroResidual(f32),

    /// Read the color sensor and run the steps of the recognized marker next.
    ///
    /// An unrecognized reading zeroes the residual against heading 0.
    Inspect(Classifier),
}

impl Step {
    pub fn forward(rotations: f32, speed: f32) -> Self {
        Self::Straight {
            rotations,
            speed,
            reverse: false,
        }
    }

    pub fn backward(rotations: f32, speed: f32) -> Self {
        Self::Straight {
            rotations,
            speed,
            reverse: true,
        }
    }

    pub fn turn(degrees: f32) -> Self {
        Self::Turn(degrees)
    }
}

/// What a completed mission did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    /// Reports of every maneuver, in the order they ran.
    pub reports: Vec<Report>,

    /// Number of inspections that recognized a marker.
    pub markers: usize,

    /// Number of inspections that did not.
    pub misses: usize,
}

#[derive(Clone, Debug)]
pub struct Mission {
    pub steps: Vec<Step>,
    pub turn: TurnConfig,
    pub straight: StraightConfig,
}

impl Mission {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            turn: TurnConfig::default(),
            straight: StraightConfig::default(),
        }
    }

    /// Builder method to set `turn` and return `self`
    pub fn with_turn_config(mut self, config: TurnConfig) -> Self {
        self.turn = config;
        self
    }

    /// Builder method to set `straight` and return `self`
    pub fn with_straight_config(mut self, config: StraightConfig) -> Self {
        self.straight = config;
        self
    }

    /// Run every step once.
    pub async fn run<R>(&self, robot: &mut R, frame: &mut HeadingFrame) -> Result<Summary>
    where
        R: Robot + ColorSensor + ?Sized,
    {
        let mut queue: VecDeque<Step> = self.steps.iter().cloned().collect();
        let mut summary = Summary::default();

        info!("Starting mission with {} steps", queue.len());

        while let Some(step) = queue.pop_front() {
            match step {
                Step::Straight {
                    rotations,
                    speed,
                    reverse,
                } => {
                    let report = Straight::new(rotations, speed)
                        .with_reverse(reverse)
                        .with_config(self.straight.clone())
                        .run(robot, frame, PID::new())
                        .await?;
                    summary.reports.push(report);
                }
                Step::Turn(target) => {
                    let report = Turn::new(target)
                        .with_config(self.turn.clone())
                        .run(robot, frame, PID::new())
                        .await?;
                    summary.reports.push(report);
                }
                Step::Wait(duration) => sleep(duration).await,
                Step::ZeroResidual(target) => {
                    frame.zero_residual(robot, target)?;
                }
                Step::Inspect(classify) => {
                    let hsv = robot.hsv();
                    match classify(hsv) {
                        Some(steps) => {
                            debug!("Marker recognized at {:?}, {} steps follow", hsv, steps.len());
                            for step in steps.into_iter().rev() {
                                queue.push_front(step);
                            }
                            summary.markers += 1;
                        }
                        None => {
                            debug!("No marker recognized at {:?}", hsv);
                            frame.zero_residual(robot, 0.)?;
                            summary.misses += 1;
                        }
                    }
                }
            }
        }

        info!(
            "Mission finished: {} maneuvers, {} markers, {} misses",
            summary.reports.len(),
            summary.markers,
            summary.misses
        );
        Ok(summary)
    }
}
