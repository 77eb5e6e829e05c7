/// Lower bound of the normalized track.
pub const TRACK_MIN: f64 = -1.0;

/// Upper bound of the normalized track.
pub const TRACK_MAX: f64 = 1.0;

pub const DEFAULT_MAX_SPEED: f64 = 4.0;
pub const DEFAULT_ACCELERATION: f64 = 2.0;
pub const DEFAULT_DECELERATION: f64 = 2.0;
pub const DEFAULT_MIN_DISTANCE: f64 = 0.001;
