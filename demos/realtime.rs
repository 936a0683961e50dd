use cartpole::{rt::Realtime, Simulation, SimulationConfig};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), cartpole::Error> {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(LevelFilter::INFO)
            .finish(),
    )
    .unwrap();

    let mut sim = Simulation::new(SimulationConfig::default())?;
    let (_stop, rx) = watch::channel(false);

    let mut frame = 0;
    let telemetry = Realtime::new(Duration::from_secs(3))
        .run(&mut sim, rx, |telemetry| {
            frame += 1;
            if frame % 30 == 0 {
                info!(
                    time = telemetry.time.as_secs(),
                    angle = telemetry.state.pendulum_angle,
                    force = telemetry.force,
                );
            }
        })
        .await;

    info!(?telemetry, "Done");
    Ok(())
}
