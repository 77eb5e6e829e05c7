use crate::{
    config::MotionConfig,
    speed_control::{sign, SpeedControl},
};

/// Which configured limit bounds the acceleration of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccelLimit {
    /// Speeding up toward the target in the current direction of travel.
    Acceleration,
    /// Slowing down, either to reverse or to get under the target speed.
    Deceleration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSelection {
    pub limit: AccelLimit,
    /// -1, 0 or 1.
    pub direction: f64,
}

/// Picks the acceleration limit and direction for a body moving at
/// `velocity` that should be heading `target_dir` at `target_speed`.
///
/// A body at rest never brakes: with no current direction there is nothing
/// to reverse, and zero speed cannot exceed any target speed.
pub fn select_limit(target_dir: f64, target_speed: f64, velocity: f64) -> AccelSelection {
    let current_speed = velocity.abs();
    let current_dir = sign(velocity);

    let reversing = target_dir * current_dir < 0.0;
    let too_fast = current_speed > target_speed;

    if reversing || too_fast {
        AccelSelection {
            limit: AccelLimit::Deceleration,
            direction: -current_dir,
        }
    } else {
        AccelSelection {
            limit: AccelLimit::Acceleration,
            direction: target_dir,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccelControllerInit {
    pub max_accel: f64,
    pub max_decel: f64,
}

impl AccelControllerInit {
    pub fn from_config(config: &MotionConfig) -> Self {
        Self {
            max_accel: config.acceleration(),
            max_decel: config.deceleration(),
        }
    }

    pub fn build(&self) -> AccelController {
        let Self {
            max_accel,
            max_decel,
        } = *self;
        AccelController {
            max_accel,
            max_decel,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccelController {
    max_accel: f64,
    max_decel: f64,
}

impl AccelController {
    pub fn step(&self, speed: &SpeedControl, velocity: f64, time_delta_sec: f64) -> AccelControl {
        let Self {
            max_accel,
            max_decel,
        } = *self;

        // Forced stop: cancel the whole velocity within this tick.
        if speed.arrived {
            return AccelControl {
                acceleration: -velocity / time_delta_sec,
                limit: None,
            };
        }

        let AccelSelection { limit, direction } =
            select_limit(speed.target_dir, speed.target_speed, velocity);
        let max = match limit {
            AccelLimit::Acceleration => max_accel,
            AccelLimit::Deceleration => max_decel,
        };
        let needed = (speed.target_speed - velocity.abs()).abs() / time_delta_sec;

        AccelControl {
            acceleration: direction * max.min(needed),
            limit: Some(limit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelControl {
    pub acceleration: f64,
    /// `None` for a forced stop, which ignores both limits.
    pub limit: Option<AccelLimit>,
}
