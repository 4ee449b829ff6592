//! Havoc Harness
//!
//! Runs a scripted skirmish against the combat core with no renderer, audio
//! or level runtime attached, then prints what happened.
//!
//! Run with: cargo run -p havoc_harness
//!       or: HAVOC_CONFIG=havoc.json HAVOC_SEED=7 cargo run --bin havoc

mod boot_config;
mod skirmish;

use boot_config::HarnessConfig;
use skirmish::{Outcome, Skirmish};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = HarnessConfig::load();
    config.print_summary();

    let summary = Skirmish::new(&config).run();

    match summary.outcome {
        Outcome::Victory => log::info!("Level complete"),
        Outcome::Defeat => log::info!("Player killed"),
        Outcome::TimedOut => log::warn!("Gave up after {} frames", summary.frames),
    }
    log::info!(
        "{} frames, {:.1}s simulated",
        summary.frames,
        summary.elapsed_ms as f64 / 1000.0
    );
    log::info!(
        "Spawned {}, killed {}, loot rolls {}, drops {} ({} left on the floor)",
        summary.stats.spawned,
        summary.stats.kills,
        summary.stats.loot_rolls,
        summary.stats.drops,
        summary.items_left
    );
    log::info!(
        "Projectiles launched: {}, effects requested: {}",
        summary.stats.projectiles_launched,
        summary.effects
    );
    log::info!(
        "Player: health {:.0}/{:.0}, armor {:.0}",
        summary.player.health,
        summary.player.max_health,
        summary.player.armor
    );
    for (sound, count) in &summary.sounds {
        log::debug!("  {:<16} x{}", sound, count);
    }

    if summary.outcome == Outcome::Defeat {
        std::process::exit(1);
    }
}
