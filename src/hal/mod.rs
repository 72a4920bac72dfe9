//! Hardware abstraction layer.
//!
//! Maneuvers only see the robot through these traits. A robot built from
//! separate drivers can be assembled with [`Chassis`].

use crate::motor::{DifferentialDrive, Side};

/// Inertial heading sensor.
pub trait HeadingSensor {
    /// Current heading in degrees, expected in [0, 360).
    fn heading(&mut self) -> f32;
}

/// Encoder on the wheel used to measure travelled distance.
pub trait WheelEncoder {
    /// Signed angle (in degrees) the wheel has turned since the last reset.
    fn rotation(&mut self) -> f32;

    /// Reset the measured angle to zero.
    fn reset_rotation(&mut self);
}

/// A hue, saturation and value reading from a color sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsv {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl Hsv {
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }
}

/// Reflectance/color sensor used to recognize markers on the course.
pub trait ColorSensor {
    fn hsv(&mut self) -> Hsv;
}

/// Everything a maneuver needs from the robot.
pub trait Robot: HeadingSensor + WheelEncoder + DifferentialDrive {}

impl<T> Robot for T where T: HeadingSensor + WheelEncoder + DifferentialDrive {}

impl<T> HeadingSensor for &mut T
where
    T: HeadingSensor + ?Sized,
{
    fn heading(&mut self) -> f32 {
        (**self).heading()
    }
}

impl<T> WheelEncoder for &mut T
where
    T: WheelEncoder + ?Sized,
{
    fn rotation(&mut self) -> f32 {
        (**self).rotation()
    }

    fn reset_rotation(&mut self) {
        (**self).reset_rotation()
    }
}

impl<T> ColorSensor for &mut T
where
    T: ColorSensor + ?Sized,
{
    fn hsv(&mut self) -> Hsv {
        (**self).hsv()
    }
}

/// A robot assembled from an inertial sensor, a wheel encoder, a drive and a color sensor.
pub struct Chassis<S, E, D, C = ()> {
    pub imu: S,
    pub encoder: E,
    pub drive: D,
    pub color: C,
}

impl<S, E, D> Chassis<S, E, D> {
    pub fn new(imu: S, encoder: E, drive: D) -> Self {
        Self {
            imu,
            encoder,
            drive,
            color: (),
        }
    }
}

impl<S, E, D, C> Chassis<S, E, D, C> {
    /// Builder method to attach a color sensor and return the new chassis
    pub fn with_color<C2>(self, color: C2) -> Chassis<S, E, D, C2> {
        Chassis {
            imu: self.imu,
            encoder: self.encoder,
            drive: self.drive,
            color,
        }
    }
}

impl<S: HeadingSensor, E, D, C> HeadingSensor for Chassis<S, E, D, C> {
    fn heading(&mut self) -> f32 {
        self.imu.heading()
    }
}

impl<S, E: WheelEncoder, D, C> WheelEncoder for Chassis<S, E, D, C> {
    fn rotation(&mut self) -> f32 {
        self.encoder.rotation()
    }

    fn reset_rotation(&mut self) {
        self.encoder.reset_rotation()
    }
}

impl<S, E, D: DifferentialDrive, C> DifferentialDrive for Chassis<S, E, D, C> {
    fn set_power(&mut self, side: Side, percent: f32) {
        self.drive.set_power(side, percent)
    }

    fn brake(&mut self, side: Side) {
        self.drive.brake(side)
    }
}

impl<S, E, D, C: ColorSensor> ColorSensor for Chassis<S, E, D, C> {
    fn hsv(&mut self) -> Hsv {
        self.color.hsv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::{Differential, Motor};

    struct FixedImu(f32);

    impl HeadingSensor for FixedImu {
        fn heading(&mut self) -> f32 {
            self.0
        }
    }

    #[derive(Default)]
    struct CountingEncoder {
        degrees: f32,
    }

    impl WheelEncoder for CountingEncoder {
        fn rotation(&mut self) -> f32 {
            self.degrees += 10.;
            self.degrees
        }

        fn reset_rotation(&mut self) {
            self.degrees = 0.;
        }
    }

    #[derive(Default)]
    struct LastPower(Option<f32>);

    impl Motor for LastPower {
        fn set_power(&mut self, percent: f32) {
            self.0 = Some(percent);
        }

        fn brake(&mut self) {
            self.0 = None;
        }
    }

    struct Marker;

    impl ColorSensor for Marker {
        fn hsv(&mut self) -> Hsv {
            Hsv::new(140., 60., 70.)
        }
    }

    #[test]
    fn chassis_delegates_to_parts() {
        let drive = Differential::new(LastPower::default(), LastPower::default());
        let mut chassis =
            Chassis::new(FixedImu(42.), CountingEncoder::default(), drive).with_color(Marker);

        assert_eq!(chassis.heading(), 42.);
        assert_eq!(chassis.rotation(), 10.);
        chassis.reset_rotation();
        assert_eq!(chassis.rotation(), 10.);

        chassis.set_power(Side::Left, -20.);
        chassis.set_power(Side::Right, 35.);
        assert_eq!(chassis.drive.left.0, Some(-20.));
        assert_eq!(chassis.drive.right.0, Some(35.));

        chassis.brake_all();
        assert_eq!(chassis.drive.left.0, None);
        assert_eq!(chassis.drive.right.0, None);

        assert_eq!(chassis.hsv(), Hsv::new(140., 60., 70.));
    }
}
