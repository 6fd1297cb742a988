//! Movement компоненты: Mover (state machine), режимы движения, направление
//!
//! Состояния Mover:
//! - Idle: moving == false, position == destination
//! - Moving: moving == true, position сходится к destination каждый tick
//!
//! Инвариант: moving == (distance(position, destination) > STOP_EPSILON),
//! destination всегда выровнен по сетке (единственный мутатор — retarget).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::Position;
use crate::error::{GridError, RejectedCommand};
use crate::geometry::{bearing_degrees, facing_offset, move_toward, STOP_EPSILON};
use crate::grid::{Grid, Occupant};

/// Как position догоняет destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum MovementMode {
    /// Экспоненциальное приближение: position = lerp(position, destination, lerp_factor)
    #[default]
    Lerp,
    /// Постоянная скорость: speed единиц за tick
    Speed,
    /// Lerp + Speed в одном tick
    Mixed,
    /// Мгновенно в set_destination
    Teleport,
}

/// Настройки по умолчанию для новых movers (из level файла)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoverSettings {
    pub mode: MovementMode,
    /// (0, 1]
    pub lerp_factor: f32,
    /// > 0, единиц за tick
    pub speed: f32,
    pub interacting_enabled: bool,
}

impl Default for MoverSettings {
    fn default() -> Self {
        Self {
            mode: MovementMode::Lerp,
            lerp_factor: 0.1,
            speed: 1.0,
            interacting_enabled: false,
        }
    }
}

fn valid_lerp_factor(lerp_factor: f32) -> bool {
    lerp_factor > 0.0 && lerp_factor <= 1.0
}

fn valid_speed(speed: f32) -> bool {
    speed.is_finite() && speed > 0.0
}

/// lerp_factor > 1 → 1 (за один tick); ≤ 0 или NaN → default
fn sanitize_lerp_factor(lerp_factor: f32) -> f32 {
    if lerp_factor > 1.0 {
        1.0
    } else if valid_lerp_factor(lerp_factor) {
        lerp_factor
    } else {
        MoverSettings::default().lerp_factor
    }
}

/// Неположительная или нечисловая скорость → default
fn sanitize_speed(speed: f32) -> f32 {
    if valid_speed(speed) {
        speed
    } else {
        MoverSettings::default().speed
    }
}

impl MoverSettings {
    /// lerp_factor в (0, 1], speed > 0
    pub fn validate(&self) -> Result<(), GridError> {
        if valid_lerp_factor(self.lerp_factor) && valid_speed(self.speed) {
            Ok(())
        } else {
            Err(GridError::InvalidMoverSettings {
                lerp_factor: self.lerp_factor,
                speed: self.speed,
            })
        }
    }
}

/// Команда направления (west/east/north/south), north = -Y
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct MoveDirection {
    pub west: bool,
    pub east: bool,
    pub north: bool,
    pub south: bool,
}

impl MoveDirection {
    pub fn new(west: bool, east: bool, north: bool, south: bool) -> Self {
        Self { west, east, north, south }
    }

    /// Из вектора шага (знак компонент)
    pub fn from_vector(vector: IVec2) -> Self {
        Self {
            west: vector.x < 0,
            east: vector.x > 0,
            north: vector.y < 0,
            south: vector.y > 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.west || self.east || self.north || self.south)
    }

    /// Единичный шаг: (east - west, south - north)
    pub fn vector(&self) -> IVec2 {
        IVec2::new(
            self.east as i32 - self.west as i32,
            self.south as i32 - self.north as i32,
        )
    }
}

/// Смена активного interactable (edge-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveInteractableChange {
    /// Бывший активный (получает EndedActive, если ещё существует)
    pub ended: Option<Entity>,
    /// Новый активный (получает BeganActive)
    pub began: Option<Entity>,
}

impl ActiveInteractableChange {
    pub fn is_empty(&self) -> bool {
        self.ended.is_none() && self.began.is_none()
    }
}

/// Moveable entity на сетке
///
/// Position хранится отдельно (`Position` компонент), Mover держит
/// destination, режим движения, facing и активный interactable.
/// Все переходы — методы с явным `&Grid`, без ECS.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Position)]
pub struct Mover {
    pub mode: MovementMode,
    pub lerp_factor: f32,
    pub speed: f32,
    /// Искать interactable перед собой, когда стоим
    pub interacting_enabled: bool,
    destination: Vec2,
    moving: bool,
    facing_angle_degrees: f32,
    active_interactable: Option<Entity>,
}

impl Default for Mover {
    fn default() -> Self {
        Self::from_settings(&MoverSettings::default())
    }
}

impl Mover {
    pub fn new(mode: MovementMode) -> Self {
        Self {
            mode,
            ..default()
        }
    }

    pub fn from_settings(settings: &MoverSettings) -> Self {
        Self {
            mode: settings.mode,
            lerp_factor: sanitize_lerp_factor(settings.lerp_factor),
            speed: sanitize_speed(settings.speed),
            interacting_enabled: settings.interacting_enabled,
            destination: Vec2::ZERO,
            moving: false,
            facing_angle_degrees: 0.0,
            active_interactable: None,
        }
    }

    pub fn with_lerp_factor(mut self, lerp_factor: f32) -> Self {
        self.lerp_factor = sanitize_lerp_factor(lerp_factor);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = sanitize_speed(speed);
        self
    }

    pub fn with_interaction(mut self, enabled: bool) -> Self {
        self.interacting_enabled = enabled;
        self
    }

    pub fn destination(&self) -> Vec2 {
        self.destination
    }

    pub fn destination_grid(&self, grid: &Grid) -> IVec2 {
        grid.to_grid_coords(self.destination)
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn facing_angle_degrees(&self) -> f32 {
        self.facing_angle_degrees
    }

    pub fn active_interactable(&self) -> Option<Entity> {
        self.active_interactable
    }

    /// Ставит mover на сетку: position snap, destination = position, Idle
    ///
    /// Вызывается при spawn (observer OnAdd<Mover>, он же синхронизирует Grid).
    pub(crate) fn place(&mut self, position: &mut Vec2, grid: &Grid) {
        *position = grid.snap(*position);
        self.destination = *position;
        self.moving = false;
    }

    /// Новая цель движения (snap к сетке + facing от текущей позиции)
    ///
    /// Teleport: position = destination сразу, mover остаётся Idle.
    /// Занятый тайл в реестре Grid обновляется сразу.
    pub fn set_destination(&mut self, entity: Entity, position: &mut Vec2, target: Vec2, grid: &mut Grid) {
        self.retarget(position, target, grid);
        grid.sync_occupant(entity, &*self);
    }

    pub fn set_destination_grid(&mut self, entity: Entity, position: &mut Vec2, coord: IVec2, grid: &mut Grid) {
        let target = grid.to_position(coord);
        self.set_destination(entity, position, target, grid);
    }

    /// Шаг на соседний тайл с axis-split разрешением коллизий
    ///
    /// Facing всегда поворачивается к намерению (hor + vert), даже если
    /// ход частично или полностью заблокирован. Горизонталь проверяется от
    /// текущего destination, вертикаль — от уже сдвинутого тайла: диагональ
    /// деградирует в скольжение по свободной оси.
    ///
    /// Ok(новый тайл) только если destination изменился; тогда же
    /// обновляется тайл mover в реестре Grid.
    pub fn try_move_in_direction(
        &mut self,
        entity: Entity,
        position: &mut Vec2,
        direction: MoveDirection,
        grid: &mut Grid,
    ) -> Result<IVec2, RejectedCommand> {
        let target = self.resolve_move(position, direction, grid)?;
        grid.sync_occupant(entity, &*self);
        Ok(target)
    }

    /// Bool-вариант: true ⇔ destination тайл изменился
    pub fn move_in_direction(
        &mut self,
        entity: Entity,
        position: &mut Vec2,
        direction: MoveDirection,
        grid: &mut Grid,
    ) -> bool {
        self.try_move_in_direction(entity, position, direction, grid).is_ok()
    }

    /// set_destination без синхронизации реестра (вызывающий синхронизирует сам)
    fn retarget(&mut self, position: &mut Vec2, target: Vec2, grid: &Grid) {
        self.destination = grid.snap(target);
        self.facing_angle_degrees = bearing_degrees(*position, self.destination);

        if self.mode == MovementMode::Teleport {
            *position = self.destination;
        }
        self.moving = position.distance(self.destination) > STOP_EPSILON;
    }

    fn resolve_move(
        &mut self,
        position: &mut Vec2,
        direction: MoveDirection,
        grid: &Grid,
    ) -> Result<IVec2, RejectedCommand> {
        if self.moving {
            return Err(RejectedCommand::AlreadyMoving);
        }

        let intent = direction.vector();
        if direction.is_empty() || intent == IVec2::ZERO {
            return Err(RejectedCommand::NoDirection);
        }

        let intent_facing = bearing_degrees(Vec2::ZERO, intent.as_vec2());
        self.facing_angle_degrees = intent_facing;

        let current = self.destination_grid(grid);
        let mut target = current;

        let horizontal = IVec2::new(intent.x, 0);
        if horizontal != IVec2::ZERO && !grid.is_blocked(target + horizontal) {
            target += horizontal;
        }

        let vertical = IVec2::new(0, intent.y);
        if vertical != IVec2::ZERO && !grid.is_blocked(target + vertical) {
            target += vertical;
        }

        if target == current {
            return Err(RejectedCommand::Blocked);
        }

        self.retarget(position, grid.to_position(target), grid);
        self.facing_angle_degrees = intent_facing;
        self.active_interactable = None;
        Ok(target)
    }

    /// Один simulation tick движения
    ///
    /// Возвращает true в tick прибытия (position snap на destination).
    pub fn step(&mut self, position: &mut Vec2) -> bool {
        if !self.moving {
            return false;
        }

        // Поля публичные: невалидные значения не должны заморозить mover
        let lerp_factor = sanitize_lerp_factor(self.lerp_factor);
        let speed = sanitize_speed(self.speed);

        match self.mode {
            MovementMode::Lerp => {
                *position = position.lerp(self.destination, lerp_factor);
            }
            MovementMode::Speed => {
                *position = move_toward(*position, self.destination, speed);
            }
            MovementMode::Mixed => {
                *position = position.lerp(self.destination, lerp_factor);
                *position = move_toward(*position, self.destination, speed);
            }
            MovementMode::Teleport => {
                *position = self.destination;
            }
        }

        if position.distance(self.destination) <= STOP_EPSILON {
            *position = self.destination;
            self.moving = false;
            return true;
        }

        false
    }

    /// Тайл перед mover: destination + (round(cos), round(sin)) от facing
    pub fn facing_tile(&self, grid: &Grid) -> IVec2 {
        self.destination_grid(grid) + facing_offset(self.facing_angle_degrees)
    }

    /// Interactable на тайле перед mover (без изменения состояния)
    pub fn detect_interactable(&self, grid: &Grid) -> Option<Entity> {
        grid.interactable_at(self.facing_tile(grid))
    }

    /// Применяет результат detection; одинаковый результат — пустое изменение
    pub fn update_active_interactable(&mut self, found: Option<Entity>) -> ActiveInteractableChange {
        if found == self.active_interactable {
            return ActiveInteractableChange::default();
        }

        let ended = self.active_interactable;
        self.active_interactable = found;
        ActiveInteractableChange { ended, began: found }
    }

    /// Сбрасывает активный interactable, возвращает бывший
    pub fn clear_active_interactable(&mut self) -> Option<Entity> {
        self.active_interactable.take()
    }
}

impl Occupant for Mover {
    fn occupied_tile(&self, grid: &Grid) -> IVec2 {
        self.destination_grid(grid)
    }
}
