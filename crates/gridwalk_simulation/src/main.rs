//! Headless симуляция Gridwalk
//!
//! Загружает уровень (встроенный или TOML из argv[1]), спавнит игрока,
//! wanderers и табличку, прогоняет 600 fixed ticks без рендера.

use bevy::prelude::*;
use gridwalk_simulation::{
    create_headless_app, load_level, log_info, run_fixed_tick, set_log_level, CollisionObstacle,
    DestinationChanged, Grid, GridError, GridwalkSet, InteractIntent, Interactable, Interacted,
    LevelLayout, LogLevel, MoveAction, MoveRejected, Mover, MoverSettings, PlayerController, Position,
    SimulationPlugin, Wanderer,
};

const DEMO_LEVEL: &str = r#"
tile_width = 32.0
tile_height = 32.0

[mover_defaults]
mode = "Mixed"
lerp_factor = 0.25
speed = 2.0

[[collision_layers]]
origin = [-8, -5]
rows = [
    '#################',
    '#...............#',
    '#...##......#...#',
    '#...............#',
    '#.......#.......#',
    '#...............#',
    '#...#.......##..#',
    '#...............#',
    '#...............#',
    '#...............#',
    '#################',
]

[[collision_layers]]
cells = [[0, -2], [1, -2]]
"#;

const TICK_COUNT: u32 = 600;
const WANDERER_TILES: [IVec2; 4] = [
    IVec2::new(-6, -3),
    IVec2::new(5, -3),
    IVec2::new(-6, 3),
    IVec2::new(5, 3),
];

/// Счётчики демо-прогона
#[derive(Resource, Default, Debug)]
struct DemoStats {
    committed: u32,
    rejected: u32,
    interactions: u32,
}

fn count_outcomes(
    mut committed: EventReader<DestinationChanged>,
    mut rejected: EventReader<MoveRejected>,
    mut stats: ResMut<DemoStats>,
) {
    stats.committed += committed.read().count() as u32;
    stats.rejected += rejected.read().count() as u32;
}

/// Скриптованный "ввод": удерживаемое направление по расписанию
fn scripted_action(tick: u32) -> Option<MoveAction> {
    match tick {
        0..=119 => Some(MoveAction::East),
        120..=239 => Some(MoveAction::North),
        240..=359 => Some(MoveAction::West),
        360..=479 => Some(MoveAction::South),
        _ => None,
    }
}

fn main() -> Result<(), GridError> {
    let seed = 42;
    let layout = match std::env::args().nth(1) {
        Some(path) => LevelLayout::load(path)?,
        None => LevelLayout::from_toml_str(DEMO_LEVEL)?,
    };

    let mut app = create_headless_app(seed);
    // Debug логи каждого шага слишком шумные для демо
    set_log_level(LogLevel::Info);
    app.add_plugins(SimulationPlugin)
        .init_resource::<DemoStats>()
        .add_systems(FixedUpdate, count_outcomes.after(GridwalkSet::Interaction));
    load_level(app.world_mut(), &layout)?;

    log_info(&format!("🚀 Starting Gridwalk headless simulation (seed: {})", seed));

    let settings = *app.world().resource::<MoverSettings>();
    let (player_position, sign_position, wanderer_positions) = {
        let grid = app.world().resource::<Grid>();
        (
            Position::from_grid(grid, IVec2::ZERO),
            Position::from_grid(grid, IVec2::new(3, -1)),
            WANDERER_TILES.map(|tile| Position::from_grid(grid, tile)),
        )
    };

    let player = app
        .world_mut()
        .spawn((
            PlayerController::default(),
            Mover::from_settings(&settings).with_interaction(true),
            CollisionObstacle,
            player_position,
        ))
        .id();

    app.world_mut()
        .spawn((Interactable, CollisionObstacle, sign_position))
        .observe(|_trigger: Trigger<Interacted>, mut stats: ResMut<DemoStats>| {
            stats.interactions += 1;
            log_info("📜 Sign: \"Welcome to the grid\"");
        });

    for (index, position) in wanderer_positions.into_iter().enumerate() {
        app.world_mut().spawn((
            Wanderer::new(20 + index as u32 * 5),
            Mover::from_settings(&settings),
            CollisionObstacle,
            position,
        ));
    }

    let mut held = None;
    for tick in 0..TICK_COUNT {
        let action = scripted_action(tick);
        if action != held {
            if let Some(mut controller) = app.world_mut().get_mut::<PlayerController>(player) {
                if let Some(previous) = held {
                    controller.release(previous);
                }
                if let Some(next) = action {
                    controller.press(next);
                }
            }
            held = action;
        }

        // Стоим — пробуем поговорить с тем, на кого смотрим
        if tick % 30 == 0 {
            app.world_mut().send_event(InteractIntent { entity: player });
        }

        run_fixed_tick(&mut app);

        if tick % 100 == 0 {
            let world = app.world();
            let grid = world.resource::<Grid>();
            if let Some(mover) = world.get::<Mover>(player) {
                log_info(&format!(
                    "Tick {}: player at {:?}, facing {}°",
                    tick,
                    mover.destination_grid(grid),
                    mover.facing_angle_degrees()
                ));
            }
        }
    }

    let stats = app.world().resource::<DemoStats>();
    log_info(&format!(
        "✅ Simulation complete: {} moves, {} rejected, {} interactions",
        stats.committed, stats.rejected, stats.interactions
    ));

    Ok(())
}
