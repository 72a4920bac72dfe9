use log::info;

use crate::angle::normalize;
use crate::error::{Error, Result};
use crate::hal::HeadingSensor;

/// Heading reference frame shared by consecutive maneuvers.
///
/// Raw sensor headings are read relative to a zero point. After every
/// maneuver the zero point is moved with [`HeadingFrame::rebase`] so the
/// frame heading equals whatever error the maneuver left behind. The next
/// maneuver targets an angle relative to where the robot was *meant* to be,
/// which keeps small errors from adding up over a long chain of moves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadingFrame {
    zero: f32,
}

impl HeadingFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw sensor heading (in degrees) this frame treats as zero.
    pub fn zero(&self) -> f32 {
        self.zero
    }

    /// Convert a raw sensor heading into this frame, in (-180, 180].
    pub fn heading(&self, raw: f32) -> f32 {
        normalize(raw - self.zero)
    }

    /// Move the zero point so the current heading reads as its residual error from `target`.
    ///
    /// Returns the residual `normalize(current - target)` in degrees.
    pub fn rebase(&mut self, raw: f32, target: f32) -> f32 {
        let residual = normalize(self.heading(raw) - target);
        self.zero = (raw - residual).rem_euclid(360.);

        info!("Heading residual set to {:.4} degrees", residual);
        residual
    }

    /// Read the sensor and [`rebase`](Self::rebase) against `target` without moving the robot.
    pub fn zero_residual<S>(&mut self, sensor: &mut S, target: f32) -> Result<f32>
    where
        S: HeadingSensor + ?Sized,
    {
        let raw = sensor.heading();
        if !raw.is_finite() {
            return Err(Error::ImplausibleHeading { reading: raw });
        }
        Ok(self.rebase(raw, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Fixed(f32);

    impl HeadingSensor for Fixed {
        fn heading(&mut self) -> f32 {
            self.0
        }
    }

    #[test]
    fn rebase_leaves_residual_as_heading() {
        let mut frame = HeadingFrame::new();

        // overshot a 90 degree turn by 1.5 degrees
        let residual = frame.rebase(91.5, 90.);
        assert_relative_eq!(residual, 1.5);
        assert_relative_eq!(frame.heading(91.5), 1.5);
        assert_relative_eq!(frame.zero(), 90.);

        // the next relative turn of 90 lands on the intended 180
        assert_relative_eq!(frame.heading(180.), 90.);
    }

    #[test]
    fn rebase_wraps_around_zero() {
        let mut frame = HeadingFrame::new();

        // turned -90 but stopped at 270.25
        let residual = frame.rebase(270.25, -90.);
        assert_relative_eq!(residual, 0.25);
        assert_relative_eq!(frame.heading(270.25), 0.25);
        assert_relative_eq!(frame.heading(0.), 90.);
    }

    #[test]
    fn rebase_chains() {
        let mut frame = HeadingFrame::new();
        frame.rebase(89.5, 90.);
        frame.rebase(179., 90.);

        // two undershoots are carried into the frame rather than the target
        assert_relative_eq!(frame.heading(179.), -1., epsilon = 1e-4);
        assert_relative_eq!(frame.zero(), 180.);
    }

    #[test]
    fn zero_residual_reads_the_sensor() {
        let mut frame = HeadingFrame::new();
        let residual = frame.zero_residual(&mut Fixed(3.), 0.).unwrap();
        assert_relative_eq!(residual, 3.);
        assert_relative_eq!(frame.heading(3.), 3.);
        assert_relative_eq!(frame.zero(), 0.);

        let before = frame;
        assert!(matches!(
            frame.zero_residual(&mut Fixed(f32::NAN), 0.),
            Err(Error::ImplausibleHeading { .. })
        ));
        assert_eq!(frame, before);
    }
}
