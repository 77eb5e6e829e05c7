use crate::constants::{TRACK_MAX, TRACK_MIN};
use noisy_float::types::N64;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Target position on the track, shared with whatever produces targets.
///
/// Clones refer to the same cell, so a handle can be moved to an input thread
/// while the controller keeps reading from its own copy. Every write is
/// clamped to the track, and the value is a single atomic word, so a reader
/// never observes a partially written target.
#[derive(Debug, Clone)]
pub struct TargetHandle {
    bits: Arc<AtomicU64>,
}

impl TargetHandle {
    pub fn new(target: f64) -> Self {
        let handle = Self {
            bits: Arc::new(AtomicU64::new(0.0f64.to_bits())),
        };
        handle.set(target);
        handle
    }

    /// Stores `target` clamped to `[-1, 1]`. NaN is ignored.
    pub fn set(&self, target: f64) {
        let Some(target) = N64::try_new(target) else {
            tracing::warn!("Ignoring NaN target, keeping {}", self.get());
            return;
        };
        let target = target.raw().clamp(TRACK_MIN, TRACK_MAX);
        self.bits.store(target.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for TargetHandle {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_track() {
        let target = TargetHandle::default();
        assert_eq!(target.get(), 0.0);

        target.set(0.25);
        assert_eq!(target.get(), 0.25);
        target.set(7.0);
        assert_eq!(target.get(), 1.0);
        target.set(-1.5);
        assert_eq!(target.get(), -1.0);
        target.set(f64::INFINITY);
        assert_eq!(target.get(), 1.0);
        target.set(f64::NEG_INFINITY);
        assert_eq!(target.get(), -1.0);
    }

    #[test]
    fn nan_keeps_previous() {
        let target = TargetHandle::new(0.5);
        target.set(f64::NAN);
        assert_eq!(target.get(), 0.5);
    }

    #[test]
    fn clones_share_the_cell() {
        let target = TargetHandle::default();
        let writer = target.clone();
        std::thread::spawn(move || writer.set(-0.75))
            .join()
            .unwrap();
        assert_eq!(target.get(), -0.75);
    }
}
