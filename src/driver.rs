use crate::motion_control::{check_time_delta, MotionController, Report, Status, StepError};
use noisy_float::types::R64;

/// Turns a stream of timestamps into time deltas for [`MotionController::step`].
///
/// The first timestamp only anchors the clock. A timestamp that does not move
/// forward (a repeat, a reset of the time source, a jump backwards) produces no
/// tick and re-anchors the clock at the new value.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    last_sec: Option<f64>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta(&mut self, now_sec: f64) -> Option<f64> {
        if R64::try_new(now_sec).is_none() {
            tracing::warn!("Ignoring non-finite timestamp {}", now_sec);
            return None;
        }

        let previous = self.last_sec.replace(now_sec)?;
        let delta = now_sec - previous;
        if delta > 0.0 && delta.is_normal() {
            Some(delta)
        } else {
            tracing::debug!("Time source did not advance ({} -> {})", previous, now_sec);
            None
        }
    }

    pub fn reset(&mut self) {
        self.last_sec = None;
    }
}

/// Steps a controller with a constant time delta.
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    dt: f64,
}

impl FixedStep {
    pub fn new(dt: f64) -> Result<Self, StepError> {
        Ok(Self {
            dt: check_time_delta(dt)?,
        })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Runs `ticks` updates and returns the last report, if any tick ran.
    pub fn run(
        &self,
        controller: &mut MotionController,
        ticks: usize,
    ) -> Result<Option<Report>, StepError> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(controller.step(self.dt)?);
        }
        Ok(last)
    }

    /// Runs until a tick reports [`Status::Arrived`], at most `max_ticks`
    /// times. Returns the number of ticks taken.
    pub fn settle(
        &self,
        controller: &mut MotionController,
        max_ticks: usize,
    ) -> Result<Option<usize>, StepError> {
        for tick in 1..=max_ticks {
            if controller.step(self.dt)?.status == Status::Arrived {
                return Ok(Some(tick));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::MotionConfig, motion_control::MotionControllerInit};

    #[test]
    fn clock_skips_first_and_stalled_ticks() {
        let mut clock = TickClock::new();
        assert_eq!(clock.delta(10.0), None);
        assert_eq!(clock.delta(10.5), Some(0.5));
        assert_eq!(clock.delta(10.5), None);
        assert_eq!(clock.delta(2.0), None);
        assert_eq!(clock.delta(2.25), Some(0.25));
        assert_eq!(clock.delta(f64::NAN), None);
        assert_eq!(clock.delta(2.5), Some(0.25));

        clock.reset();
        assert_eq!(clock.delta(3.0), None);
    }

    #[test]
    fn fixed_step_rejects_bad_dt() {
        assert!(FixedStep::new(0.0).is_err());
        assert!(FixedStep::new(-1.0).is_err());
        assert!(FixedStep::new(f64::NAN).is_err());
        assert!(FixedStep::new(1e-310).is_err());
        assert_eq!(FixedStep::new(0.05).unwrap().dt(), 0.05);
    }

    #[test]
    fn run_counts_ticks() {
        let mut controller = MotionControllerInit::new(MotionConfig::shipped()).build();
        let stepper = FixedStep::new(0.1).unwrap();
        assert_eq!(stepper.run(&mut controller, 0).unwrap(), None);

        controller.set_target(1.0);
        let report = stepper.run(&mut controller, 3).unwrap().unwrap();
        assert_eq!(report.status, Status::Accelerating);
        assert!(controller.position() > 0.0);
    }

    #[test]
    fn settle_reaches_the_end_of_the_track() {
        let mut controller = MotionControllerInit::new(MotionConfig::shipped()).build();
        controller.set_target(1.0);

        let ticks = FixedStep::new(0.1)
            .unwrap()
            .settle(&mut controller, 200)
            .unwrap();
        assert!(ticks.is_some());
        assert!(controller.is_arrived());
    }

    #[test]
    fn settle_gives_up() {
        let mut controller = MotionControllerInit::new(MotionConfig::shipped()).build();
        controller.set_target(1.0);

        let ticks = FixedStep::new(0.1)
            .unwrap()
            .settle(&mut controller, 2)
            .unwrap();
        assert_eq!(ticks, None);
    }
}
