//! Headless lander: flies rounds with a simple descent autopilot and logs the readout.

use anyhow::{Context, Result};
use game::{GameConfig, RoundState, Simulation};
use physics::ControlInput;

/// Hard stop for a round that never touches down.
const MAX_TICKS: u64 = 200_000;
/// Readout is logged every this many ticks.
const READOUT_INTERVAL: u64 = 600;
/// Autopilot fires the engine above this descent rate.
const TARGET_DESCENT: f32 = 0.08;

/// Keep the craft upright and brake when falling faster than [`TARGET_DESCENT`].
fn autopilot(sim: &Simulation) -> ControlInput {
    let craft = sim.craft();
    let angle = craft.angle();
    let tilted = angle > 1.0 && angle < 359.0;
    ControlInput {
        thrust: !tilted && craft.velocity.y > TARGET_DESCENT,
        turn_left: tilted && angle >= 180.0,
        turn_right: tilted && angle < 180.0,
    }
}

fn fly_round(sim: &mut Simulation, dev_tools: bool) -> RoundState {
    for _ in 0..MAX_TICKS {
        let input = autopilot(sim);
        let report = sim.tick(input);
        if report.tick % READOUT_INTERVAL == 0 {
            log::info!("[tick {}] {}", report.tick, sim.readout(dev_tools).join(" | "));
        }
        match report.round {
            RoundState::Airborne => {}
            state => return state,
        }
    }
    log::warn!("Round did not finish within {} ticks", MAX_TICKS);
    sim.round()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║                    LANDER                    ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  Usage: lander [SEED] [ROUNDS]               ║");
    println!("║  Settings: ./config.ron (created if missing) ║");
    println!("╚══════════════════════════════════════════════╝");

    let mut args = std::env::args().skip(1);
    let mut config = GameConfig::load();
    if !GameConfig::default_path().exists() {
        // First run: leave an editable config behind.
        if let Err(e) = config.save() {
            log::warn!("{:#}", anyhow::Error::from(e));
        }
    }
    if let Some(seed) = args.next() {
        config.seed = Some(
            seed.parse()
                .with_context(|| format!("seed must be a non-negative integer, got '{}'", seed))?,
        );
    }
    let rounds: u32 = match args.next() {
        Some(n) => n
            .parse()
            .with_context(|| format!("round count must be a positive integer, got '{}'", n))?,
        None => 1,
    };

    let mut sim = Simulation::from_config(&config)
        .with_context(|| format!("could not set up map {:?}", config.map_path))?;
    log::info!(
        "Flying '{}' over '{}' (seed {})",
        sim.craft_spec().name,
        sim.terrain().map_name(),
        sim.seed()
    );

    for round in 1..=rounds {
        if round > 1 {
            sim.new_round(config.seed);
        }
        let outcome = fly_round(&mut sim, config.dev_tools);
        log::info!(
            "Round {} ended {:?}: {}",
            round,
            outcome,
            sim.readout(config.dev_tools).join(" | ")
        );
    }

    Ok(())
}
