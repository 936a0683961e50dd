use cartpole::{Simulation, SimulationConfig};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), cartpole::Error> {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(LevelFilter::DEBUG)
            .finish(),
    )
    .unwrap();

    let config = SimulationConfig::default().with_initial_angle(0.2);
    let mut sim = Simulation::new(config)?;

    let mut step = 0;
    let telemetry = sim.run_for(10., |telemetry| {
        step += 1;
        if step % 50 == 0 {
            info!(
                time = telemetry.time.as_secs(),
                angle = telemetry.state.pendulum_angle,
                position = telemetry.state.cart_position,
                force = telemetry.force,
            );
        }
    })?;

    info!(?telemetry, "Done");
    Ok(())
}
