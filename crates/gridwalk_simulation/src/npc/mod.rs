//! NPC wanderers — случайные шаги по сетке (детерминированный RNG)
//!
//! Каждые `interval_ticks` стоящий wanderer выбирает одно из 8 направлений.
//! Используется headless демо и тестами детерминизма.

use bevy::prelude::*;
use rand::Rng;

use crate::movement::{MoveDirection, MoveIntent, Mover};
use crate::{DeterministicRng, GridwalkSet};

/// 8 направлений (включая диагонали), north = -Y
const DIRECTIONS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(1, 1),
    IVec2::new(0, 1),
    IVec2::new(-1, 1),
    IVec2::new(-1, 0),
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
];

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Mover)]
pub struct Wanderer {
    /// Пауза между шагами (ticks)
    pub interval_ticks: u32,
    countdown: u32,
}

impl Default for Wanderer {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Wanderer {
    pub fn new(interval_ticks: u32) -> Self {
        Self {
            interval_ticks,
            countdown: interval_ticks,
        }
    }

    /// Тикает countdown; true когда пора шагать (countdown сбрасывается)
    pub fn tick(&mut self) -> bool {
        if self.countdown > 0 {
            self.countdown -= 1;
            return false;
        }
        self.countdown = self.interval_ticks;
        true
    }
}

/// NPC Plugin
pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, drive_wanderers.in_set(GridwalkSet::Input));
    }
}

/// Система: Wanderer → случайный MoveIntent
///
/// Пока mover в движении countdown стоит на месте.
pub fn drive_wanderers(
    mut wanderers: Query<(Entity, &mut Wanderer, &Mover)>,
    rng: Option<ResMut<DeterministicRng>>,
    mut intents: EventWriter<MoveIntent>,
) {
    let Some(mut rng) = rng else {
        return;
    };

    for (entity, mut wanderer, mover) in wanderers.iter_mut() {
        if mover.is_moving() || !wanderer.tick() {
            continue;
        }

        let vector = DIRECTIONS[rng.rng.gen_range(0..DIRECTIONS.len())];
        intents.write(MoveIntent {
            entity,
            direction: MoveDirection::from_vector(vector),
        });
    }
}
