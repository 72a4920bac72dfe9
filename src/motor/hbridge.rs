use embedded_hal::PwmPin;
use num_traits::{NumCast, ToPrimitive};

use super::Motor;

/// A motor driven through an H-bridge with one PWM input per direction.
///
/// Power is applied to the `forward` pin for positive output and to the
/// `reverse` pin for negative output. Braking drives both pins to full duty,
/// shorting the motor terminals.
pub struct HBridge<F, R> {
    forward: F,
    reverse: R,
}

impl<F, R> HBridge<F, R>
where
    F: PwmPin,
    R: PwmPin,
{
    /// Create a new H-bridge from its two PWM channels, enabling both.
    pub fn new(mut forward: F, mut reverse: R) -> Self {
        forward.enable();
        reverse.enable();
        Self { forward, reverse }
    }

    /// Disable both channels and return them.
    pub fn release(mut self) -> (F, R) {
        self.forward.disable();
        self.reverse.disable();
        (self.forward, self.reverse)
    }
}

/// Scale a fraction in [0, 1] to the pin's duty range.
fn duty<P>(pin: &P, fraction: f32) -> P::Duty
where
    P: PwmPin,
    P::Duty: NumCast + ToPrimitive + Copy,
{
    let max = pin.get_max_duty();
    let scaled = max.to_f32().unwrap_or(0.) * fraction.clamp(0., 1.);
    <P::Duty as NumCast>::from(scaled.round()).unwrap_or(max)
}

impl<F, R> Motor for HBridge<F, R>
where
    F: PwmPin,
    F::Duty: NumCast + ToPrimitive + Copy,
    R: PwmPin,
    R::Duty: NumCast + ToPrimitive + Copy,
{
    fn set_power(&mut self, percent: f32) {
        let fraction = percent / 100.;
        let (forward, reverse) = if fraction >= 0. {
            (fraction, 0.)
        } else {
            (0., -fraction)
        };

        let forward = duty(&self.forward, forward);
        let reverse = duty(&self.reverse, reverse);
        self.forward.set_duty(forward);
        self.reverse.set_duty(reverse);
    }

    fn brake(&mut self) {
        let forward = self.forward.get_max_duty();
        let reverse = self.reverse.get_max_duty();
        self.forward.set_duty(forward);
        self.reverse.set_duty(reverse);
    }
}
