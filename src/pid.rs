/// Proportional, integral and derivative gains for one [`PID`] step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl Gains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }
}

/// Incremental PID controller.
///
/// The integral is a plain running sum of the errors and the derivative is the
/// difference between consecutive errors, so the gains are expressed per
/// control iteration rather than per second.
/// The output is never saturated here; callers clamp the resulting motor power.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PID {
    /// Running sum of every error passed to [`PID::step`] since the last reset.
    pub integral: f32,

    /// The error from the previous step.
    pub previous_error: f32,

    /// The correction returned by the previous step.
    pub correction: f32,

    /// Optional symmetric bound on the integral. `None` leaves the integral unbounded.
    pub integral_limit: Option<f32>,
}

impl PID {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to bound the integral to `[-limit, limit]` and return `self`
    pub fn with_integral_limit(mut self, limit: f32) -> Self {
        self.integral_limit = Some(limit.abs());
        self
    }

    /// Clear the integral, previous error and last correction.
    pub fn reset(&mut self) {
        self.integral = 0.;
        self.previous_error = 0.;
        self.correction = 0.;
    }

    /// Feed a new error sample and return the correction.
    pub fn step(&mut self, error: f32, gains: Gains) -> f32 {
        self.integral += error;
        if let Some(limit) = self.integral_limit {
            self.integral = self.integral.clamp(-limit, limit);
        }

        let derivative = error - self.previous_error;
        self.correction = error * gains.kp + self.integral * gains.ki + derivative * gains.kd;
        self.previous_error = error;

        self.correction
    }
}
