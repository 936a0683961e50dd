#![cfg(feature = "rt")]

use cartpole::{rt::Realtime, Simulation, SimulationConfig};
use std::time::Duration;
use tokio::sync::watch;

#[tokio::test(start_paused = true)]
async fn it_balances_at_display_rate() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let (_tx, rx) = watch::channel(false);

    let mut ticks = 0;
    let telemetry = Realtime::new(Duration::from_secs(5))
        .run(&mut sim, rx, |telemetry| {
            ticks += 1;
            assert!(!telemetry.state.has_failed);
        })
        .await;

    assert!((295..=305).contains(&ticks), "{ticks}");
    assert!(telemetry.state.pendulum_angle.abs() < 0.05);
    assert!((telemetry.time.as_secs() - 5.).abs() < 0.05);
}

#[tokio::test(start_paused = true)]
async fn it_stops_on_signal() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let (tx, rx) = watch::channel(false);

    let telemetry = Realtime::new(Duration::from_secs(60))
        .with_tick_period(Duration::from_millis(10))
        .unwrap()
        .run(&mut sim, rx, |telemetry| {
            if telemetry.time.as_secs() >= 1. {
                tx.send(true).unwrap();
            }
        })
        .await;

    assert!(telemetry.time.as_secs() < 1.1);
}

#[tokio::test(start_paused = true)]
async fn it_stops_after_failure() {
    let config = SimulationConfig::default().with_stop_on_failure(true);
    let mut sim = Simulation::new(config).unwrap();
    sim.set_controller_enabled(false);
    let (_tx, rx) = watch::channel(false);

    let telemetry = Realtime::new(Duration::from_secs(60))
        .run(&mut sim, rx, |_| {})
        .await;

    assert!(telemetry.state.has_failed);
    assert!(telemetry.time.as_secs() < 5.);
}

#[tokio::test(start_paused = true)]
async fn it_returns_immediately_when_already_stopped() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let (_tx, rx) = watch::channel(true);

    let telemetry = Realtime::new(Duration::from_secs(60))
        .run(&mut sim, rx, |_| panic!("stepped after stop"))
        .await;

    assert_eq!(telemetry.time.as_secs(), 0.);
}
