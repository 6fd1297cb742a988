//! Registry — связь lifecycle entity ↔ реестры Grid
//!
//! Entity регистрируют себя сами (observers на OnAdd / OnRemove):
//! - Mover (OnAdd): snap на сетку, destination = position
//! - StaticOccupant (OnAdd): snap на сетку
//! - CollisionObstacle (OnAdd/OnRemove): Grid.collidable_occupants
//! - Interactable (OnAdd/OnRemove): Grid.interactables
//!
//! Despawn вызывает OnRemove для всех компонентов → реестры не держат
//! мёртвых entity. Без Grid resource все операции — no-op + ConfigurationError (один раз).

use bevy::prelude::*;

use crate::components::{CollisionObstacle, Interactable, Position, StaticOccupant};
use crate::error::ConfigurationError;
use crate::grid::Grid;
use crate::movement::Mover;
use crate::GridwalkSet;


/// Registry Plugin
///
/// Observers регистрации + snap_static_occupants (GridwalkSet::Occupancy).
pub struct RegistryPlugin;

impl Plugin for RegistryPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(place_mover)
            .add_observer(place_static_occupant)
            .add_observer(register_collision_obstacle)
            .add_observer(unregister_collision_obstacle)
            .add_observer(register_interactable)
            .add_observer(unregister_interactable);

        app.add_systems(FixedUpdate, snap_static_occupants.in_set(GridwalkSet::Occupancy));
    }
}

/// Observer: новый Mover встаёт на сетку (Idle на ближайшем тайле)
pub fn place_mover(
    trigger: Trigger<OnAdd, Mover>,
    mut movers: Query<(&mut Mover, &mut Position)>,
    grid: Option<ResMut<Grid>>,
) {
    let Some(mut grid) = grid else {
        ConfigurationError::MissingGrid { operation: "place_mover" }.report();
        return;
    };
    let entity = trigger.target();
    let Ok((mut mover, mut position)) = movers.get_mut(entity) else {
        return;
    };

    mover.place(&mut position.0, &grid);
    // Если CollisionObstacle зарегистрирован раньше (порядок OnAdd) — обновляем тайл
    grid.sync_occupant(entity, &*mover);
}

/// Observer: новый StaticOccupant snap на сетку
pub fn place_static_occupant(
    trigger: Trigger<OnAdd, StaticOccupant>,
    mut occupants: Query<&mut Position, Without<Mover>>,
    grid: Option<ResMut<Grid>>,
) {
    let Some(mut grid) = grid else {
        ConfigurationError::MissingGrid { operation: "place_static_occupant" }.report();
        return;
    };
    let entity = trigger.target();
    let Ok(mut position) = occupants.get_mut(entity) else {
        return;
    };

    position.0 = grid.snap(position.0);
    grid.sync_occupant(entity, &*position);
}

/// Observer: CollisionObstacle добавлен → entity блокирует свой тайл
pub fn register_collision_obstacle(
    trigger: Trigger<OnAdd, CollisionObstacle>,
    occupants: Query<(&Position, Option<&Mover>)>,
    grid: Option<ResMut<Grid>>,
) {
    let Some(mut grid) = grid else {
        ConfigurationError::MissingGrid { operation: "register_collidable" }.report();
        return;
    };
    let entity = trigger.target();
    let Ok((position, mover)) = occupants.get(entity) else {
        return;
    };

    let registered = match mover {
        Some(mover) => grid.register_collidable(entity, mover),
        None => grid.register_collidable(entity, position),
    };
    if registered {
        crate::log(&format!("🧱 {:?} registered as collision obstacle", entity));
    }
}

/// Observer: CollisionObstacle удалён (toggle off или despawn)
pub fn unregister_collision_obstacle(
    trigger: Trigger<OnRemove, CollisionObstacle>,
    grid: Option<ResMut<Grid>>,
) {
    let Some(mut grid) = grid else {
        ConfigurationError::MissingGrid { operation: "unregister_collidable" }.report();
        return;
    };
    let entity = trigger.target();
    if grid.unregister_collidable(entity) {
        crate::log(&format!("{:?} no longer blocks its tile", entity));
    }
}

/// Observer: Interactable появился на сетке
pub fn register_interactable(
    trigger: Trigger<OnAdd, Interactable>,
    occupants: Query<&Position>,
    grid: Option<ResMut<Grid>>,
) {
    let Some(mut grid) = grid else {
        ConfigurationError::MissingGrid { operation: "register_interactable" }.report();
        return;
    };
    let entity = trigger.target();
    let Ok(position) = occupants.get(entity) else {
        return;
    };

    if grid.register_interactable(entity, position) {
        crate::log(&format!(
            "💬 {:?} registered as interactable at {:?}",
            entity,
            position.grid_coords(&grid)
        ));
    }
}

/// Observer: Interactable удалён (despawn)
pub fn unregister_interactable(
    trigger: Trigger<OnRemove, Interactable>,
    grid: Option<ResMut<Grid>>,
) {
    let Some(mut grid) = grid else {
        ConfigurationError::MissingGrid { operation: "unregister_interactable" }.report();
        return;
    };
    grid.unregister_interactable(trigger.target());
}

/// Система: static occupant, чья Position изменилась, snap обратно на сетку
///
/// Позиция static occupant всегда кратна тайлу; реестры Grid получают новый тайл.
pub fn snap_static_occupants(
    mut occupants: Query<
        (Entity, &mut Position),
        (With<StaticOccupant>, Without<Mover>, Changed<Position>),
    >,
    grid: Option<ResMut<Grid>>,
) {
    let Some(mut grid) = grid else {
        if !occupants.is_empty() {
            ConfigurationError::MissingGrid { operation: "snap_static_occupants" }.report();
        }
        return;
    };

    for (entity, mut position) in occupants.iter_mut() {
        let snapped = grid.snap(position.0);
        if snapped != position.0 {
            position.0 = snapped;
        }
        grid.sync_occupant(entity, &*position);
    }
}
