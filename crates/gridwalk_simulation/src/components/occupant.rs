//! Static occupants и collision obstacles
//!
//! - StaticOccupant: позиция всегда snap к сетке (без анимации)
//! - CollisionObstacle: entity блокирует свой тайл для movers
//!
//! Регистрация в Grid — observers в `registry` (OnAdd / OnRemove),
//! поэтому toggle через `set_collision_obstacle` регистрирует ровно один раз
//! на переход, а повторная установка того же значения — no-op.

use bevy::prelude::*;

use super::Position;
use crate::grid::Grid;

/// Entity, стоящий на тайле (позиция snap сразу, без анимации)
///
/// Автоматически добавляет Position через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Position)]
pub struct StaticOccupant;

impl StaticOccupant {
    /// Текущий тайл (производный от Position)
    pub fn grid_position(position: &Position, grid: &Grid) -> IVec2 {
        position.grid_coords(grid)
    }

    /// Ставит occupant на тайл: позиция тайла сразу + обновление реестров Grid
    pub fn set_grid_position(entity: Entity, position: &mut Position, grid: &mut Grid, coord: IVec2) {
        position.0 = grid.to_position(coord);
        grid.sync_occupant(entity, &*position);
    }
}

/// Маркер: entity блокирует тайл (static — текущий, mover — destination)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Position)]
pub struct CollisionObstacle;

/// Явный toggle collision obstacle (insert / remove маркера)
pub trait CollisionObstacleExt {
    fn set_collision_obstacle(&mut self, enabled: bool) -> &mut Self;
}

impl CollisionObstacleExt for EntityCommands<'_> {
    fn set_collision_obstacle(&mut self, enabled: bool) -> &mut Self {
        if enabled {
            self.insert(CollisionObstacle)
        } else {
            self.remove::<CollisionObstacle>()
        }
    }
}

impl CollisionObstacleExt for EntityWorldMut<'_> {
    fn set_collision_obstacle(&mut self, enabled: bool) -> &mut Self {
        if enabled {
            self.insert(CollisionObstacle)
        } else {
            self.remove::<CollisionObstacle>()
        }
    }
}
