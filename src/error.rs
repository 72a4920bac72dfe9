//! Error types for maneuvers

use core::fmt;
use core::time::Duration;

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;

/// The kind of maneuver that produced a [`Report`](crate::maneuver::Report) or an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManeuverKind {
    Turn,
    Straight,
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManeuverKind::Turn => f.pad("turn"),
            ManeuverKind::Straight => f.pad("straight"),
        }
    }
}

/// Maneuver error types
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The maneuver ran out of its iteration or time budget before reaching its target
    #[error("{maneuver} timed out after {iterations} iterations ({elapsed:?})")]
    Timeout {
        maneuver: ManeuverKind,
        iterations: u32,
        elapsed: Duration,
    },

    /// The heading sensor returned a value that is not a finite angle
    #[error("Implausible heading reading: {reading}")]
    ImplausibleHeading { reading: f32 },

    /// Two consecutive heading readings are further apart than one control step allows
    #[error("Heading jumped {delta:.2} degrees in one step (limit {limit:.2})")]
    HeadingJump { delta: f32, limit: f32 },

    /// The wheel encoder returned a value that is not a finite angle
    #[error("Implausible encoder reading: {reading}")]
    ImplausibleEncoder { reading: f32 },

    /// The wheel encoder moved further in one step than the wheel can turn
    #[error("Encoder jumped {delta:.2} degrees in one step (limit {limit:.2})")]
    EncoderJump { delta: f32, limit: f32 },

    /// A maneuver was requested with a non-finite argument
    #[error("Invalid {maneuver} target: {value}")]
    InvalidTarget { maneuver: ManeuverKind, value: f32 },

    /// A maneuver was configured with a power setting it cannot drive with
    #[error("Invalid {maneuver} {field}: {value}")]
    InvalidConfig {
        maneuver: ManeuverKind,
        field: &'static str,
        value: f32,
    },
}
