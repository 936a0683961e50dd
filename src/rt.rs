//! Real-time driver on the tokio timer.

use crate::{sim::Telemetry, time::Clock, Error, Result, Simulation};
use std::time::Duration;
use tokio::{
    sync::watch,
    time::{self, Instant, MissedTickBehavior},
};

/// Display refresh period the driver ticks at by default.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_micros(16_667);

/// Steps a [`Simulation`] once per timer tick, using the measured time
/// between ticks as the step size.
///
/// Late ticks are skipped rather than bunched, and the plant and controller
/// clamp whatever step results.
#[derive(Clone, Copy, Debug)]
pub struct Realtime {
    tick_period: Duration,
    duration: Duration,
}

impl Realtime {
    /// Run for `duration` at the default tick period.
    pub fn new(duration: Duration) -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            duration,
        }
    }

    pub fn with_tick_period(mut self, tick_period: Duration) -> Result<Self> {
        if tick_period.is_zero() {
            return Err(Error::invalid("tick_period", 0., "must be positive"));
        }
        self.tick_period = tick_period;
        Ok(self)
    }

    /// Drive `sim` until the duration elapses, `stop` is set, or the pendulum
    /// falls while the config asks to stop on failure.
    pub async fn run<C: Clock>(
        &self,
        sim: &mut Simulation<C>,
        mut stop: watch::Receiver<bool>,
        mut on_tick: impl FnMut(&Telemetry),
    ) -> Telemetry {
        let mut telemetry = sim.telemetry();
        if *stop.borrow_and_update() {
            return telemetry;
        }

        let mut interval = time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await;

        let start = Instant::now();
        let mut last = start;
        let mut stop_closed = false;

        #[cfg(feature = "tracing")]
        tracing::info!(
            tick_period = ?self.tick_period,
            duration = ?self.duration,
            "Start real-time run"
        );

        loop {
            tokio::select! {
                biased;

                result = stop.changed(), if !stop_closed => {
                    match result {
                        Ok(()) if *stop.borrow_and_update() => break,
                        Ok(()) => {}
                        Err(_) => stop_closed = true,
                    }
                    continue;
                }
                _ = interval.tick() => {}
            }

            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f64();
            last = now;

            telemetry = sim.step(dt);
            on_tick(&telemetry);

            if sim.config().stop_on_failure && telemetry.state.has_failed {
                #[cfg(feature = "tracing")]
                tracing::info!(time = telemetry.time.as_secs(), "Stopped after failure");

                break;
            }
            if now.duration_since(start) >= self.duration {
                break;
            }
        }

        telemetry
    }
}
