//! Grid — геометрия тайлов + реестр занятости
//!
//! Один Grid на уровень (Resource). Entity регистрируют себя сами
//! (через observers в `registry`), Grid никогда не владеет entity.
//!
//! Реестры:
//! - collidable_occupants: entity, блокирующие тайл (static: текущий тайл, mover: destination)
//! - blocked_coordinates: статическая геометрия уровня (collision layers)
//! - interactables: entity с Interactable (для facing detection)
//!
//! Реестры — Vec с уникальным членством: порядок регистрации детерминирован.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::error::GridError;
use crate::geometry::snap_to;

pub mod level;


pub use level::{CollisionLayer, LevelLayout};

/// Capability: entity занимает тайл сетки
///
/// Static occupant занимает текущий тайл, mover — тайл destination
/// (блокирует цель сразу после commit, а не по прибытии).
pub trait Occupant {
    fn occupied_tile(&self, grid: &Grid) -> IVec2;
}

/// Запись реестра: entity + закэшированный тайл
///
/// Тайл обновляет сам владелец через `Grid::sync_occupant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub entity: Entity,
    pub tile: IVec2,
}

#[derive(Resource, Debug, Clone)]
pub struct Grid {
    tile_width: f32,
    tile_height: f32,
    collidable_occupants: Vec<RegistryEntry>,
    blocked_coordinates: HashSet<IVec2>,
    interactables: Vec<RegistryEntry>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            tile_width: 32.0,
            tile_height: 32.0,
            collidable_occupants: Vec::new(),
            blocked_coordinates: HashSet::new(),
            interactables: Vec::new(),
        }
    }
}

impl Grid {
    pub fn new(tile_width: f32, tile_height: f32) -> Result<Self, GridError> {
        let mut grid = Self::default();
        grid.configure(tile_width, tile_height)?;
        Ok(grid)
    }

    /// Задаёт размер тайла
    ///
    /// Вызывается при загрузке уровня, до регистрации occupants: закэшированные
    /// тайлы реестров в grid-координатах и не пересчитываются.
    pub fn configure(&mut self, tile_width: f32, tile_height: f32) -> Result<(), GridError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(tile_width) || !valid(tile_height) {
            return Err(GridError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        self.tile_width = tile_width;
        self.tile_height = tile_height;
        Ok(())
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// Continuous position → grid coordinate (round half to even)
    pub fn to_grid_coords(&self, position: Vec2) -> IVec2 {
        IVec2::new(
            (position.x / self.tile_width).round_ties_even() as i32,
            (position.y / self.tile_height).round_ties_even() as i32,
        )
    }

    /// Grid coordinate → позиция центра тайла
    pub fn to_position(&self, coord: IVec2) -> Vec2 {
        Vec2::new(
            coord.x as f32 * self.tile_width,
            coord.y as f32 * self.tile_height,
        )
    }

    /// Snap позиции к ближайшему тайлу
    pub fn snap(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            snap_to(position.x, self.tile_width),
            snap_to(position.y, self.tile_height),
        )
    }

    /// true если позиция лежит ровно на тайле
    pub fn is_aligned(&self, position: Vec2) -> bool {
        self.to_position(self.to_grid_coords(position)) == position
    }

    /// Заблокирован ли тайл: статическая геометрия или collidable occupant
    pub fn is_blocked(&self, coord: IVec2) -> bool {
        self.blocked_coordinates.contains(&coord)
            || self.collidable_occupants.iter().any(|entry| entry.tile == coord)
    }

    // ------------------------------------------------------------------------
    // Collidable occupants
    // ------------------------------------------------------------------------

    /// Регистрирует collidable occupant (повторная регистрация — no-op)
    ///
    /// Возвращает true если entity добавлен.
    pub fn register_collidable(&mut self, entity: Entity, occupant: &impl Occupant) -> bool {
        if self.is_collidable(entity) {
            return false;
        }
        let tile = occupant.occupied_tile(self);
        self.collidable_occupants.push(RegistryEntry { entity, tile });
        true
    }

    /// Удаляет collidable occupant (не зарегистрирован — no-op)
    pub fn unregister_collidable(&mut self, entity: Entity) -> bool {
        let before = self.collidable_occupants.len();
        self.collidable_occupants.retain(|entry| entry.entity != entity);
        self.collidable_occupants.len() != before
    }

    pub fn is_collidable(&self, entity: Entity) -> bool {
        self.collidable_occupants.iter().any(|entry| entry.entity == entity)
    }

    pub fn collidable_occupants(&self) -> &[RegistryEntry] {
        &self.collidable_occupants
    }

    // ------------------------------------------------------------------------
    // Interactables
    // ------------------------------------------------------------------------

    pub fn register_interactable(&mut self, entity: Entity, occupant: &impl Occupant) -> bool {
        if self.is_interactable(entity) {
            return false;
        }
        let tile = occupant.occupied_tile(self);
        self.interactables.push(RegistryEntry { entity, tile });
        true
    }

    pub fn unregister_interactable(&mut self, entity: Entity) -> bool {
        let before = self.interactables.len();
        self.interactables.retain(|entry| entry.entity != entity);
        self.interactables.len() != before
    }

    pub fn is_interactable(&self, entity: Entity) -> bool {
        self.interactables.iter().any(|entry| entry.entity == entity)
    }

    pub fn interactables(&self) -> &[RegistryEntry] {
        &self.interactables
    }

    /// Первый (по порядку регистрации) interactable на тайле
    pub fn interactable_at(&self, coord: IVec2) -> Option<Entity> {
        self.interactables
            .iter()
            .find(|entry| entry.tile == coord)
            .map(|entry| entry.entity)
    }

    // ------------------------------------------------------------------------
    // Sync + static geometry
    // ------------------------------------------------------------------------

    /// Обновляет закэшированный тайл entity во всех реестрах, где он есть
    ///
    /// Незарегистрированный entity — no-op.
    pub fn sync_occupant(&mut self, entity: Entity, occupant: &impl Occupant) {
        let tile = occupant.occupied_tile(self);
        for entry in self
            .collidable_occupants
            .iter_mut()
            .chain(self.interactables.iter_mut())
            .filter(|entry| entry.entity == entity)
        {
            entry.tile = tile;
        }
    }

    /// Помечает тайл как статическое препятствие
    pub fn block(&mut self, coord: IVec2) -> bool {
        self.blocked_coordinates.insert(coord)
    }

    pub fn unblock(&mut self, coord: IVec2) -> bool {
        self.blocked_coordinates.remove(&coord)
    }

    pub fn blocked_coordinates(&self) -> impl Iterator<Item = &IVec2> {
        self.blocked_coordinates.iter()
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked_coordinates.len()
    }
}
