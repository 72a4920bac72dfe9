//! Heading arithmetic in degrees.
//!
//! Every heading difference in this crate goes through [`normalize`] so the
//! error seen by a controller never jumps when the sensor wraps from 359° to 0°.

/// Wrap an angular difference (in degrees) onto the shortest signed turn in (-180, 180].
///
/// ```
/// use embedded_drive::angle::normalize;
///
/// assert_eq!(normalize(270.), -90.);
/// assert_eq!(normalize(-190.), 170.);
/// assert_eq!(normalize(180.), 180.);
/// ```
pub fn normalize(delta: f32) -> f32 {
    let wrapped = (delta + 540.).rem_euclid(360.) - 180.;

    // (x + 540) mod 360 - 180 lands on -180 for an exact half turn
    if wrapped <= -180. {
        180.
    } else {
        wrapped
    }
}

/// Calculate the signed shortest turn (in degrees) from the `current` heading to the `target` heading.
pub fn angle_error(target: f32, current: f32) -> f32 {
    normalize(target - current)
}
