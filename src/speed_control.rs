use crate::config::MotionConfig;

#[derive(Debug, Clone)]
pub struct SpeedControllerInit {
    pub max_speed: f64,
    pub max_decel: f64,
    pub min_distance: f64,
}

impl SpeedControllerInit {
    pub fn from_config(config: &MotionConfig) -> Self {
        Self {
            max_speed: config.max_speed(),
            max_decel: config.deceleration(),
            min_distance: config.min_distance(),
        }
    }

    pub fn build(&self) -> SpeedController {
        let Self {
            max_speed,
            max_decel,
            min_distance,
        } = *self;

        SpeedController {
            max_speed,
            max_decel,
            min_distance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeedController {
    max_speed: f64,
    max_decel: f64,
    min_distance: f64,
}

impl SpeedController {
    /// Decides how fast, and in which direction, the body should be moving
    /// given where it is and where it is headed.
    pub fn step(&self, target: f64, position: f64) -> SpeedControl {
        let Self {
            max_speed,
            max_decel,
            min_distance,
        } = *self;

        let offset = target - position;
        let distance = offset.abs();

        if distance <= min_distance {
            return SpeedControl {
                distance,
                target_dir: 0.0,
                target_speed: 0.0,
                arrived: true,
            };
        }

        SpeedControl {
            distance,
            target_dir: sign(offset),
            target_speed: braking_speed(distance, max_decel, max_speed),
            arrived: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedControl {
    pub distance: f64,
    /// -1, 0 or 1. Zero only when arrived.
    pub target_dir: f64,
    pub target_speed: f64,
    pub arrived: bool,
}

impl SpeedControl {
    pub fn target_velocity(&self) -> f64 {
        self.target_dir * self.target_speed
    }
}

/// Highest speed from which the body can still stop within `distance` when
/// braking at `deceleration`, capped at `max_speed`.
pub fn braking_speed(distance: f64, deceleration: f64, max_speed: f64) -> f64 {
    (distance * 2.0 * deceleration).sqrt().min(max_speed)
}

/// Like `f64::signum`, except that both zeros map to zero.
pub(crate) fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
