use anyhow::{anyhow, Result};
use clap::Parser;
use rand::prelude::*;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;
use track_motion::{FixedStep, MotionConfig, MotionControllerInit, TargetHandle, TickClock};

#[derive(Parser)]
struct Opts {
    /// TOML file with max_speed, acceleration, deceleration and min_distance.
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Tick period in seconds.
    #[clap(long, default_value = "0.0166667")]
    pub dt: f64,
    #[clap(long, default_value = "300")]
    pub ticks: usize,
    /// How often the simulated drag handler picks a new target.
    #[clap(long, default_value = "1500")]
    pub retarget_ms: u64,
    #[clap(long)]
    pub seed: Option<u64>,
    /// Initial target.
    #[clap(long, default_value = "1.0", allow_hyphen_values = true)]
    pub target: f64,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("track_motion=info,track=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let Opts {
        config,
        dt,
        ticks,
        retarget_ms,
        seed,
        target,
    } = Opts::parse();

    let config = match config {
        Some(path) => MotionConfig::load(path)?,
        None => MotionConfig::shipped(),
    };
    tracing::info!(
        "max speed {}, acceleration {}, deceleration {}, min distance {}",
        config.max_speed(),
        config.acceleration(),
        config.deceleration(),
        config.min_distance()
    );

    let mut controller = MotionControllerInit::new(config).build();
    controller.set_target(target);

    // Plays the part of a pointer dragging the target around.
    let done = Arc::new(AtomicBool::new(false));
    let dragger = {
        let handle = controller.target_handle();
        let done = done.clone();
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let interval = Duration::from_millis(retarget_ms);

        thread::spawn(move || drag(&handle, &done, interval, &mut rng))
    };

    let period = Duration::from_secs_f64(FixedStep::new(dt)?.dt());
    let start = Instant::now();
    let mut clock = TickClock::new();
    clock.delta(0.0);

    for _ in 0..ticks {
        thread::sleep(period);

        // Compute time delta since last tick.
        let Some(time_delta_secs) = clock.delta(start.elapsed().as_secs_f64()) else {
            continue;
        };
        let report = controller.step(time_delta_secs)?;
        let state = controller.state();

        tracing::info!(
            "{:?} target {:+.3} position {:+.3} velocity {:+.3} accel {:+.3} target velocity {:+.3}",
            report.status,
            controller.target(),
            state.position,
            state.velocity,
            state.acceleration,
            report.target_velocity
        );
    }

    done.store(true, Ordering::Relaxed);
    dragger
        .join()
        .map_err(|_| anyhow!("drag thread panicked"))?;

    Ok(())
}

/// Moves the target to a random spot every `interval` until `done` is set.
fn drag(handle: &TargetHandle, done: &AtomicBool, interval: Duration, rng: &mut StdRng) {
    let slice = interval.clamp(Duration::from_millis(1), Duration::from_millis(20));
    let mut waited = Duration::ZERO;

    while !done.load(Ordering::Relaxed) {
        thread::sleep(slice);
        waited += slice;
        if waited < interval {
            continue;
        }
        waited = Duration::ZERO;

        let target = rng.gen_range(-1.0..=1.0);
        tracing::info!("Dragged target to {:.3}", target);
        handle.set(target);
    }
}
