use cartpole::{Simulation, SimulationConfig};

fn main() -> Result<(), cartpole::Error> {
    let config = SimulationConfig::default()
        .with_initial_angle(0.)
        .with_stop_on_failure(true);

    for push in [0.1, 0.3, 0.6, 0.9] {
        let mut sim = Simulation::new(config)?;
        sim.run_for(1., |_| {})?;
        sim.disturb(push);

        let mut peak: f64 = 0.;
        let telemetry = sim.run_for(5., |telemetry| {
            peak = peak.max(telemetry.state.pendulum_angle.abs());
        })?;

        println!(
            "push {push:.1} rad: peak {peak:.3} rad, final {:.4} rad at {:.2} s, failed: {}",
            telemetry.state.pendulum_angle,
            telemetry.time.as_secs(),
            telemetry.state.has_failed,
        );
    }

    Ok(())
}
