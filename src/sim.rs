//! Simulated differential drive robot.
//!
//! [`SimRobot`] integrates a first order model of a two wheeled robot:
//! heading rate is proportional to the difference in wheel power and each
//! wheel turns at a rate proportional to its own power. Every heading read
//! advances the model by one control [`tick`](SimConfig::tick), and any time
//! that passes on the tokio clock (a pulse, a wait between steps) is
//! integrated before the next command or read.

use core::time::Duration;
use nalgebra::Vector2;
use tokio::time::Instant;

use crate::hal::{ColorSensor, HeadingSensor, Hsv, WheelEncoder};
use crate::motor::{DifferentialDrive, Side, WheelPower};

/// Physical parameters of the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Time that passes on every heading read.
    pub tick: Duration,

    /// Heading rate in degrees/second per percent of opposed wheel power.
    pub turn_rate: f32,

    /// Wheel rate in degrees/second per percent of power.
    pub wheel_rate: f32,

    /// How long a wheel keeps turning after it is braked.
    pub brake_slip: Duration,

    /// Fraction by which the right wheel outruns the left one for the same power.
    pub mismatch: f32,

    /// Heading reported regardless of motion, simulating a stuck or biased sensor.
    pub stuck_heading: Option<f32>,

    /// Color the sensor sees.
    pub color: Hsv,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(5),
            turn_rate: 0.8,
            wheel_rate: 8.,
            brake_slip: Duration::ZERO,
            mismatch: 0.,
            stuck_heading: None,
            color: Hsv::default(),
        }
    }
}

impl SimConfig {
    /// Builder method to set `brake_slip` and return `self`
    pub fn with_brake_slip(mut self, slip: Duration) -> Self {
        self.brake_slip = slip;
        self
    }

    /// Builder method to set `mismatch` and return `self`
    pub fn with_mismatch(mut self, mismatch: f32) -> Self {
        self.mismatch = mismatch;
        self
    }

    /// Builder method to set `stuck_heading` and return `self`
    pub fn with_stuck_heading(mut self, heading: f32) -> Self {
        self.stuck_heading = Some(heading);
        self
    }

    /// Builder method to set `color` and return `self`
    pub fn with_color(mut self, color: Hsv) -> Self {
        self.color = color;
        self
    }
}

/// A command received by the simulated drive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Power(Side, f32),
    Brake(Side),
}

pub struct SimRobot {
    pub config: SimConfig,
    heading: f32,
    wheels: Vector2<f32>,
    encoder_zero: f32,
    power: WheelPower,
    last_update: Instant,
    commands: Vec<Command>,
}

impl Default for SimRobot {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimRobot {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            heading: 0.,
            wheels: Vector2::zeros(),
            encoder_zero: 0.,
            power: WheelPower::zeros(),
            last_update: Instant::now(),
            commands: Vec::new(),
        }
    }

    /// Builder method to set the starting heading (in degrees) and return `self`
    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    /// The true heading of the robot in degrees, without wrapping.
    pub fn true_heading(&self) -> f32 {
        self.heading
    }

    /// Rotations turned by the left wheel since the start of the simulation.
    pub fn wheel_rotations(&self) -> f32 {
        self.wheels.x / 360.
    }

    /// The power currently applied to the left (`x`) and right (`y`) wheel.
    pub fn power(&self) -> WheelPower {
        self.power
    }

    /// Every command received since the last call to [`SimRobot::take_commands`].
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        core::mem::take(&mut self.commands)
    }

    fn advance(&mut self, dt: Duration, power: WheelPower) {
        let dt = dt.as_secs_f32();
        let left = power.x;
        let right = power.y * (1. + self.config.mismatch);

        self.heading += self.config.turn_rate * (right - left) / 2. * dt;
        self.wheels += Vector2::new(left, right) * self.config.wheel_rate * dt;
    }

    /// Integrate the time that passed on the clock since the last interaction.
    fn catch_up(&mut self) {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last_update);
        self.advance(dt, self.power);
        self.last_update = now;
    }
}

fn index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl HeadingSensor for SimRobot {
    fn heading(&mut self) -> f32 {
        self.catch_up();
        let tick = self.config.tick;
        self.advance(tick, self.power);

        self.config
            .stuck_heading
            .unwrap_or_else(|| self.heading.rem_euclid(360.))
    }
}

impl WheelEncoder for SimRobot {
    fn rotation(&mut self) -> f32 {
        self.catch_up();
        self.wheels.x - self.encoder_zero
    }

    fn reset_rotation(&mut self) {
        self.catch_up();
        self.encoder_zero = self.wheels.x;
    }
}

impl DifferentialDrive for SimRobot {
    fn set_power(&mut self, side: Side, percent: f32) {
        self.catch_up();
        self.commands.push(Command::Power(side, percent));
        self.power[index(side)] = percent.clamp(-100., 100.);
    }

    fn brake(&mut self, side: Side) {
        self.catch_up();
        self.commands.push(Command::Brake(side));

        let mut slipping = WheelPower::zeros();
        slipping[index(side)] = self.power[index(side)];
        let slip = self.config.brake_slip;
        self.advance(slip, slipping);

        self.power[index(side)] = 0.;
    }
}

impl ColorSensor for SimRobot {
    fn hsv(&mut self) -> Hsv {
        self.config.color
    }
}
