use crate::{
    accel_control::{AccelControl, AccelController, AccelControllerInit, AccelLimit},
    config::MotionConfig,
    constants::{TRACK_MAX, TRACK_MIN},
    speed_control::{SpeedControl, SpeedController, SpeedControllerInit},
    target::TargetHandle,
};
use noisy_float::types::R64;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StepError {
    #[error("time delta must be a normal positive number, got {0}")]
    InvalidTimeDelta(f64),
}

#[derive(Debug, Clone)]
pub struct MotionControllerInit {
    pub config: MotionConfig,
    pub position: f64,
    pub velocity: f64,
}

impl MotionControllerInit {
    /// A body at rest in the middle of the track.
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            position: 0.0,
            velocity: 0.0,
        }
    }

    pub fn with_position(self, position: f64) -> Self {
        Self { position, ..self }
    }

    pub fn with_velocity(self, velocity: f64) -> Self {
        Self { velocity, ..self }
    }

    /// Builds the controller. Starting values outside their ranges are
    /// clamped, and a NaN start is treated as zero.
    pub fn build(&self) -> MotionController {
        let Self {
            ref config,
            position,
            velocity,
        } = *self;
        let max_speed = config.max_speed();
        let position = if position.is_nan() { 0.0 } else { position };
        let velocity = if velocity.is_nan() { 0.0 } else { velocity };

        MotionController {
            config: *config,
            speed_controller: SpeedControllerInit::from_config(config).build(),
            accel_controller: AccelControllerInit::from_config(config).build(),
            target: TargetHandle::default(),
            state: State {
                position: position.clamp(TRACK_MIN, TRACK_MAX),
                velocity: velocity.clamp(-max_speed, max_speed),
                acceleration: 0.0,
            },
            target_velocity: 0.0,
            status: None,
        }
    }
}

/// Kinematic state of the body after the latest tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Arrived,
    Accelerating,
    Coasting,
    Braking,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub status: Status,
    pub limit: Option<AccelLimit>,
    pub target_velocity: f64,
    pub acceleration: f64,
    pub distance: f64,
}

#[derive(Debug)]
pub struct MotionController {
    config: MotionConfig,
    speed_controller: SpeedController,
    accel_controller: AccelController,
    target: TargetHandle,
    state: State,
    target_velocity: f64,
    status: Option<Status>,
}

impl MotionController {
    pub fn set_target(&mut self, target: f64) {
        self.target.set(target);
    }

    pub fn target(&self) -> f64 {
        self.target.get()
    }

    /// A handle through which another actor, possibly on another thread, can
    /// retarget this controller between ticks.
    pub fn target_handle(&self) -> TargetHandle {
        self.target.clone()
    }

    /// Advances the body by `time_delta_sec` seconds.
    ///
    /// A time delta that is not a normal, strictly positive number is rejected
    /// and the state is left untouched.
    pub fn step(&mut self, time_delta_sec: f64) -> Result<Report, StepError> {
        let dt = match check_time_delta(time_delta_sec) {
            Ok(dt) => dt,
            Err(err) => {
                tracing::warn!("Rejecting time delta {}", time_delta_sec);
                return Err(err);
            }
        };

        let Self {
            config,
            speed_controller,
            accel_controller,
            target,
            state,
            ..
        } = self;
        let max_speed = config.max_speed();

        // The target is read once so a concurrent write lands on the next tick.
        let target = target.get();

        // Run speed controller
        let speed = speed_controller.step(target, state.position);

        // Run acceleration controller
        let AccelControl {
            acceleration,
            limit,
        } = accel_controller.step(&speed, state.velocity, dt);

        // Integrate. A forced stop lands on zero exactly, whatever the
        // rounding of `-velocity / dt` did to the acceleration.
        let velocity = if speed.arrived {
            0.0
        } else {
            (state.velocity + acceleration * dt).clamp(-max_speed, max_speed)
        };
        let position = (state.position + velocity * dt).clamp(TRACK_MIN, TRACK_MAX);

        *state = State {
            position,
            velocity,
            acceleration,
        };

        let status = status_of(&speed, limit, acceleration);
        let report = Report {
            status,
            limit,
            target_velocity: speed.target_velocity(),
            acceleration,
            distance: speed.distance,
        };
        tracing::trace!(
            goal = target,
            position,
            velocity,
            acceleration,
            target_velocity = report.target_velocity,
            "tick"
        );

        if self.status != Some(status) {
            tracing::debug!(
                "Motion status {:?} -> {:?} at position {:.4}",
                self.status,
                status,
                position
            );
        }
        self.status = Some(status);
        self.target_velocity = report.target_velocity;

        Ok(report)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn position(&self) -> f64 {
        self.state.position
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    pub fn acceleration(&self) -> f64 {
        self.state.acceleration
    }

    pub fn target_velocity(&self) -> f64 {
        self.target_velocity
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Whether the body is currently within `min_distance` of the target.
    pub fn is_arrived(&self) -> bool {
        (self.target() - self.state.position).abs() <= self.config.min_distance()
    }
}

/// Accepts only normal, strictly positive time deltas. Subnormal values would
/// overflow the forced-stop acceleration.
pub(crate) fn check_time_delta(time_delta_sec: f64) -> Result<f64, StepError> {
    match R64::try_new(time_delta_sec) {
        Some(dt) if dt.raw() > 0.0 && dt.raw().is_normal() => Ok(dt.raw()),
        _ => Err(StepError::InvalidTimeDelta(time_delta_sec)),
    }
}

fn status_of(speed: &SpeedControl, limit: Option<AccelLimit>, acceleration: f64) -> Status {
    match limit {
        _ if speed.arrived => Status::Arrived,
        Some(AccelLimit::Deceleration) => Status::Braking,
        _ if acceleration == 0.0 => Status::Coasting,
        _ => Status::Accelerating,
    }
}
