use nalgebra::{Matrix2, Vector2};

pub mod hbridge;
pub use hbridge::HBridge;

/// A side of a differential drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A single drive motor.
pub trait Motor {
    /// Output a signed power in percent, [-100, 100].
    fn set_power(&mut self, percent: f32);

    /// Actively stop the motor.
    fn brake(&mut self);
}

impl<T> Motor for &mut T
where
    T: Motor + ?Sized,
{
    fn set_power(&mut self, percent: f32) {
        (**self).set_power(percent)
    }

    fn brake(&mut self) {
        (**self).brake()
    }
}

/// Left and right wheel power, in percent.
pub type WheelPower = Vector2<f32>;

/// Differential drive actuator.
pub trait DifferentialDrive {
    /// Output a signed power in percent to one side.
    fn set_power(&mut self, side: Side, percent: f32);

    /// Actively stop one side.
    fn brake(&mut self, side: Side);

    /// Output the left (`x`) and right (`y`) power.
    fn output(&mut self, power: WheelPower) {
        self.set_power(Side::Left, power.x);
        self.set_power(Side::Right, power.y);
    }

    /// Brake both sides.
    fn brake_all(&mut self) {
        self.brake(Side::Left);
        self.brake(Side::Right);
    }
}

impl<T> DifferentialDrive for &mut T
where
    T: DifferentialDrive + ?Sized,
{
    fn set_power(&mut self, side: Side, percent: f32) {
        (**self).set_power(side, percent)
    }

    fn brake(&mut self, side: Side) {
        (**self).brake(side)
    }
}

/// A differential drive made of one motor per side.
pub struct Differential<L, R> {
    pub left: L,
    pub right: R,
}

impl<L, R> Differential<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L: Motor, R: Motor> DifferentialDrive for Differential<L, R> {
    fn set_power(&mut self, side: Side, percent: f32) {
        match side {
            Side::Left => self.left.set_power(percent),
            Side::Right => self.right.set_power(percent),
        }
    }

    fn brake(&mut self, side: Side) {
        match side {
            Side::Left => self.left.brake(),
            Side::Right => self.right.brake(),
        }
    }
}

/// Mix a forward and a turn command (in percent) into left and right wheel power.
///
/// A positive `turn` drives the right wheel faster than the left, increasing the heading.
/// Each side is clamped to `[-max_power, max_power]`.
///
/// # Panics
/// Panics if `max_power` is negative or NaN. Maneuvers reject such limits before driving.
pub fn mix(forward: f32, turn: f32, max_power: f32) -> WheelPower {
    let mixer = Matrix2::new(
        1., -1., //
        1., 1.,
    );
    (mixer * Vector2::new(forward, turn)).map(|power| power.clamp(-max_power, max_power))
}
