//! One-dimensional kinematic motion controller for a bounded track.
//!
//! A [`MotionController`] moves a body on the normalized track `[-1, 1]`
//! toward a target, limited by a maximum speed, an acceleration limit and a
//! deceleration limit. Each tick brakes just early enough to stop at the
//! target, and once the body is within `min_distance` it is stopped outright.
//!
//! ```
//! use track_motion::{FixedStep, MotionConfig, MotionControllerInit};
//!
//! let mut controller = MotionControllerInit::new(MotionConfig::shipped()).build();
//! controller.set_target(1.0);
//!
//! let ticks = FixedStep::new(0.1)?.settle(&mut controller, 100)?;
//! assert!(ticks.is_some());
//! assert!((controller.position() - 1.0).abs() <= 0.001);
//! # Ok::<(), track_motion::StepError>(())
//! ```

pub mod accel_control;
pub mod config;
pub mod constants;
pub mod driver;
pub mod motion_control;
pub mod speed_control;
pub mod target;

pub use accel_control::AccelLimit;
pub use config::{ConfigError, MotionConfig};
pub use driver::{FixedStep, TickClock};
pub use motion_control::{
    MotionController, MotionControllerInit, Report, State, Status, StepError,
};
pub use target::TargetHandle;
