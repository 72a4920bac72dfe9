//! # embedded-drive
//! Closed loop motion control for two wheeled differential robots.
//!
//! # Building blocks
//! [`angle`] normalizes heading differences so every error takes the shortest way around.
//!
//! [`PID`] is an incremental controller shared by every maneuver.
//!
//! [`HeadingFrame`] carries the heading error left by one maneuver into the next.
//!
//! [`hal`] and [`motor`] contain the hardware abstraction layer.
//!
//! # Maneuvers
//! [`Turn`] rotates in place to a heading relative to the current frame.
//!
//! [`Straight`] drives a number of wheel rotations while holding heading.
//!
//! [`Mission`] runs a sequence of [`Step`]s once.
//!
//! ```
//! use embedded_drive::{sim::SimRobot, HeadingFrame, Turn, PID};
//!
//! let runtime = tokio::runtime::Builder::new_current_thread()
//!     .enable_time()
//!     .start_paused(true)
//!     .build()
//!     .unwrap();
//!
//! runtime.block_on(async {
//!     let mut robot = SimRobot::default();
//!     let mut frame = HeadingFrame::new();
//!
//!     let report = Turn::new(90.)
//!         .run(&mut robot, &mut frame, PID::new())
//!         .await
//!         .unwrap();
//!
//!     assert!(report.residual.abs() <= 0.5);
//!     assert!((robot.true_heading() - 90.).abs() <= 0.5);
//! });
//! ```

pub mod angle;
pub use angle::{angle_error, normalize};

pub mod config;
pub use config::{Budget, Limits, Pulse, StraightConfig, TurnConfig};

pub mod error;
pub use error::{Error, ManeuverKind, Result};

pub mod hal;
pub use hal::{Chassis, ColorSensor, HeadingSensor, Hsv, Robot, WheelEncoder};

pub mod heading;
pub use heading::HeadingFrame;

pub mod maneuver;
pub use maneuver::{Report, SpeedRamp, Straight, Turn};

pub mod mission;
pub use mission::{Mission, Step, Summary};

pub mod motor;
pub use motor::{mix, DifferentialDrive, HBridge, Motor, Side};

pub mod pid;
pub use pid::{Gains, PID};

pub mod sim;
