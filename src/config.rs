//! Tuning for the maneuvers.
//!
//! Every value defaults to the tuning the competition robot was run with.

use crate::pid::Gains;
use core::time::Duration;

/// Fixed power, fixed duration opposite-wheel pulse applied after a maneuver's control loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    /// Power (in percent) applied to each wheel.
    pub power: f32,

    /// How long the pulse is held before braking.
    pub duration: Duration,

    /// The pulse only fires when the remaining heading error (in degrees) is above this.
    pub tolerance: f32,
}

impl Pulse {
    pub const fn new(power: f32, duration: Duration, tolerance: f32) -> Self {
        Self {
            power,
            duration,
            tolerance,
        }
    }
}

/// Limits on how long a maneuver may run.
///
/// The default bounds only the time spent in the control loop. An unpaced
/// loop runs as fast as the sensors answer, so an iteration count says little
/// about how far a move got; set one with [`Budget::with_max_iterations`] when
/// the loop runs at a known rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Budget {
    /// Maximum number of control iterations, or `None` for no limit.
    pub max_iterations: Option<u32>,

    /// Maximum time spent in the control loop, or `None` for no limit.
    pub max_duration: Option<Duration>,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_iterations: None,
            max_duration: Some(Duration::from_secs(30)),
        }
    }
}

impl Budget {
    /// A budget that never expires.
    pub const fn unlimited() -> Self {
        Self {
            max_iterations: None,
            max_duration: None,
        }
    }

    /// Builder method to set `max_iterations` and return `self`
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Builder method to set `max_duration` and return `self`
    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }
}

/// Physical plausibility bounds for sensor readings and motor output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    /// Motor power is clamped to `[-max_power, max_power]` percent.
    pub max_power: f32,

    /// Largest wrapped heading change (in degrees) accepted between two consecutive reads.
    pub max_heading_step: f32,

    /// Largest wheel rotation (in degrees) accepted between two consecutive reads.
    pub max_encoder_step: f32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_power: 100.,
            max_heading_step: 45.,
            max_encoder_step: 720.,
        }
    }
}

/// Tuning for [`Turn`](crate::maneuver::Turn).
#[derive(Clone, Debug, PartialEq)]
pub struct TurnConfig {
    pub gains: Gains,

    /// The control loop stops once the heading error (in degrees) is within this.
    pub tolerance: f32,

    /// Lowest power (in percent) the wheels are driven at while turning.
    pub min_power: f32,

    /// Highest power (in percent) the wheels are driven at while turning.
    pub max_power: f32,

    pub pulse: Pulse,
    pub budget: Budget,
    pub limits: Limits,

    /// Time to wait between iterations. `None` only yields to other tasks.
    pub period: Option<Duration>,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            gains: Gains::new(5.7, 0.0006, 0.18),
            tolerance: 0.5,
            min_power: 50.,
            max_power: 80.,
            pulse: Pulse::new(15., Duration::from_millis(70), 0.5),
            budget: Budget::default(),
            limits: Limits::default(),
            period: None,
        }
    }
}

impl TurnConfig {
    /// Builder method to set `gains` and return `self`
    pub fn with_gains(mut self, gains: Gains) -> Self {
        self.gains = gains;
        self
    }

    /// Builder method to set the power band and return `self`
    pub fn with_power(mut self, min_power: f32, max_power: f32) -> Self {
        self.min_power = min_power;
        self.max_power = max_power;
        self
    }

    /// Builder method to set `pulse` and return `self`
    pub fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = pulse;
        self
    }

    /// Builder method to set `budget` and return `self`
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Builder method to set `limits` and return `self`
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Builder method to set `period` and return `self`
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

/// Tuning for [`Straight`](crate::maneuver::Straight).
#[derive(Clone, Debug, PartialEq)]
pub struct StraightConfig {
    pub gains: Gains,

    /// Speed (in percent) the ramp starts from.
    pub start_speed: f32,

    /// Speed change per iteration while accelerating or decelerating.
    pub increment: f32,

    /// Fraction of the distance over which the robot accelerates.
    pub accel_fraction: f32,

    /// Fraction of the distance after which the robot decelerates.
    pub decel_fraction: f32,

    /// Speed the robot never drops below once it stops accelerating.
    pub min_cruise: f32,

    pub pulse: Pulse,
    pub budget: Budget,
    pub limits: Limits,

    /// Time to wait between iterations. `None` only yields to other tasks.
    pub period: Option<Duration>,
}

impl Default for StraightConfig {
    fn default() -> Self {
        Self {
            gains: Gains::new(8.5, 0.002, 0.025),
            start_speed: 30.,
            increment: 2.,
            accel_fraction: 0.3,
            decel_fraction: 0.8,
            min_cruise: 50.,
            pulse: Pulse::new(15., Duration::from_millis(80), 0.05),
            budget: Budget::default(),
            limits: Limits::default(),
            period: None,
        }
    }
}

impl StraightConfig {
    /// Builder method to set `gains` and return `self`
    pub fn with_gains(mut self, gains: Gains) -> Self {
        self.gains = gains;
        self
    }

    /// Builder method to set `pulse` and return `self`
    pub fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.pulse = pulse;
        self
    }

    /// Builder method to set `budget` and return `self`
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Builder method to set `limits` and return `self`
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Builder method to set `period` and return `self`
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}
