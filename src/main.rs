//! Deep Descent entry point
//!
//! Runs the simulation headless with a scripted dive: build a small demo
//! stage, feed inputs at the fixed tick rate and log the diver's progress.
//! Rendering frontends drive `sim::tick` exactly the same way.

use deep_descent::consts::TICKS_PER_SEC;
use deep_descent::sim::{GamePhase, GameState, Stage, TickInput, TileSource, tick};
use deep_descent::tuning::{EnemyCatalog, PlayerTuning};

/// Narrow shaft with solid borders and a ledge partway down.
struct DemoShaft;

impl TileSource for DemoShaft {
    fn width(&self) -> i32 {
        15
    }

    fn height(&self) -> i32 {
        40
    }

    fn tile_size(&self) -> i32 {
        16
    }

    fn tile_id(&self, col: i32, row: i32) -> i32 {
        let border = col == 0 || col == 14 || row == 39;
        let ledge = row == 20 && (5..10).contains(&col);
        i32::from(border || ledge)
    }
}

fn main() {
    env_logger::init();

    let stage = Stage::from_source(&DemoShaft).expect("demo stage is well-formed");
    let mut state = GameState::new(
        stage,
        &EnemyCatalog::demo(),
        PlayerTuning::default(),
        0xD1_7E,
    );
    // The demo shaft is 640px deep; trigger the finale near its floor
    state.set_finale_zone_y(600.0);

    // Leave the title screen
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );

    // Scripted dive: drift right for the first while, throw in two swim
    // strokes to show the floaty arc, and otherwise sink
    let total_ticks = 60 * TICKS_PER_SEC as u64;
    for t in 0..total_ticks {
        let input = TickInput {
            right: t < 240,
            swim: t == 300 || t == 600,
            ..Default::default()
        };
        tick(&mut state, &input);

        if t % u64::from(TICKS_PER_SEC) == 0 {
            log::info!(
                "t={:>4} depth={:>6.1} oxygen={:>5.1} progress={:>4.0}% phase={:?}",
                t,
                state.player.pos().y,
                state.player.oxygen(),
                state.descent_progress() * 100.0,
                state.phase
            );
        }
        if state.phase == GamePhase::Ending && state.finale_ticks > 5 * TICKS_PER_SEC {
            break;
        }
    }

    println!(
        "dive over after {} ticks: depth {:.1}, oxygen {:.1}, phase {:?}",
        state.time_ticks,
        state.player.pos().y,
        state.player.oxygen(),
        state.phase
    );
}
