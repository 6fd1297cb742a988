//! Gridwalk Simulation Core
//!
//! ECS-симуляция тайловой сетки на Bevy 0.16: движение по тайлам,
//! коллизии с разрешением диагоналей, facing и interactables.
//!
//! Разделение ответственности:
//! - ECS = grid state, movement rules, interaction events
//! - Движок = рендер, input devices, загрузка сцен (пишет intents, слушает triggers)
//!
//! Поток одного tick (FixedUpdate, GridwalkSet по порядку):
//! Input → Occupancy → Intents → Motion → Interaction

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod interaction;
pub mod logger;
pub mod movement;
pub mod npc;
pub mod registry;

// Re-export базовых типов для удобства
pub use components::*;
pub use controller::{ControllerPlugin, MoveAction, PlayerController};
pub use error::{ConfigurationError, GridError, RejectedCommand};
pub use grid::{Grid, LevelLayout, Occupant};
pub use interaction::InteractionPlugin;
pub use logger::{
    init_logger, log, log_error, log_error_once, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter, LOGGER_LEVEL,
};
pub use movement::{
    DestinationChanged, InteractIntent, MoveDirection, MoveIntent, MoveRejected, MovementMode,
    MovementPlugin, Mover, MoverSettings,
};
pub use npc::{NpcPlugin, Wanderer};
pub use registry::RegistryPlugin;

/// Фазы simulation tick (FixedUpdate, выполняются по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridwalkSet {
    /// PlayerController / Wanderer → MoveIntent
    Input,
    /// Snap static occupants, sync реестров Grid (до проверок коллизий)
    Occupancy,
    /// MoveIntent → Mover destination
    Intents,
    /// Per-tick движение + facing detection
    Motion,
    /// InteractIntent → Interacted
    Interaction,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Grid НЕ вставляется: его даёт загрузчик уровня (`load_level` или
/// `insert_resource(Grid)`). Без Grid системы — no-op с диагностикой.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<MoverSettings>();

        // Детерминистичный RNG (seed по умолчанию, если headless app не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.configure_sets(
            FixedUpdate,
            (
                GridwalkSet::Input,
                GridwalkSet::Occupancy,
                GridwalkSet::Intents,
                GridwalkSet::Motion,
                GridwalkSet::Interaction,
            )
                .chain(),
        );

        app.add_plugins((
            RegistryPlugin,
            MovementPlugin,
            InteractionPlugin,
            ControllerPlugin,
            NpcPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Загружает уровень: Grid + MoverSettings из layout
///
/// Вызывать до spawn entity уровня (observers регистрации читают Grid).
pub fn load_level(world: &mut World, layout: &LevelLayout) -> Result<(), GridError> {
    let grid = layout.build_grid()?;
    world.insert_resource(grid);
    world.insert_resource(layout.mover_defaults);
    Ok(())
}

/// Один simulation tick: FixedUpdate schedule ровно один раз
///
/// Не зависит от real time — для тестов и детерминированных прогонов.
pub fn run_fixed_tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
