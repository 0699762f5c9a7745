//! Headless demo driver
//!
//! Runs a seeded world for a few simulated seconds and logs what the
//! generation core does. Useful for eyeballing spacing/tuning changes:
//!
//! ```text
//! RUST_LOG=debug cargo run -- 42
//! ```

use log::info;

use runner_core::consts::SIM_DT;
use runner_core::error::CoreError;
use runner_core::hud::LogHud;
use runner_core::{TickInput, Tuning, World};

fn main() -> Result<(), CoreError> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42u64);

    let mut world = World::new(Tuning::default(), seed, Box::new(LogHud))?;
    world.start()?;

    // 30 simulated seconds, with a pause/unpause in the middle.
    let total_ticks = (30.0 / SIM_DT) as u64;
    for step in 0..total_ticks {
        let input = TickInput {
            pause: step == total_ticks / 2 || step == total_ticks / 2 + 50,
            ..Default::default()
        };
        world.tick(&input, SIM_DT)?;
    }

    info!(
        "done: {} ticks, score {:.0}, {} of {} entities active, scroll x {:.1}",
        world.time_ticks(),
        world.manager().points(),
        world.pool().active_count(),
        world.pool().capacity(),
        world.scroll_position().x,
    );
    Ok(())
}
