mod autopilot;

use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use planet_drift::config::SimConfig;
use planet_drift::game::events::SimEvent;
use planet_drift::game::session::{Simulation, PRIMARY_PLAYER};

use crate::autopilot::Autopilot;

/// Default tick budget: two minutes at the default rate
const DEFAULT_MAX_TICKS: u64 = 60 * 120;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Planet Drift simulation v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::load_or_default();
    let max_ticks = runner_setting("PLANET_DRIFT_MAX_TICKS", DEFAULT_MAX_TICKS);
    let realtime = runner_setting("PLANET_DRIFT_REALTIME", true);
    info!(
        "Configuration loaded: {} Hz, seed {:?}, max {} ticks, realtime={}",
        config.tick_rate, config.seed, max_ticks, realtime
    );

    let tick_rate = config.tick_rate;
    let mut sim = Simulation::new(config)?;
    let mut pilot = Autopilot::new(PRIMARY_PLAYER, sim.control_sender());

    let mut ticker = interval(Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
            _ = pace(&mut ticker, realtime) => {}
        }

        let events = sim.tick();
        for event in &events {
            if let SimEvent::Crash { final_distance, score, .. } = event {
                info!("Crashed after {} ticks, final score {}", final_distance, score.total);
            }
        }

        // Log progress every 10 simulated seconds
        if sim.tick_count() % (tick_rate as u64 * 10).max(1) == 0 {
            let summary = sim.summary();
            info!(
                "Tick {}, distance {}, {} debris, balance {:.3}, {} warp cores",
                summary.ticks,
                summary.distance,
                sim.debris().live_count(),
                summary.ledger.relative_mass,
                summary.warp_cores
            );
        }

        if sim.is_crashed() || sim.tick_count() >= max_ticks {
            break;
        }
        pilot.steer(&sim);
    }

    let summary = sim.summary();
    info!("Session finished: score {}", summary.score.total);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Wait for the next tick slot. Fast mode only yields so Ctrl+C is still polled.
async fn pace(ticker: &mut Interval, realtime: bool) {
    if realtime {
        ticker.tick().await;
    } else {
        tokio::task::yield_now().await;
    }
}

fn runner_setting<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} '{}', using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
