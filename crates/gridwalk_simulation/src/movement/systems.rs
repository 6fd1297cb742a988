//! Movement systems (FixedUpdate)

use bevy::prelude::*;

use super::components::{ActiveInteractableChange, Mover};
use super::events::{DestinationChanged, MoveIntent, MoveRejected};
use crate::components::{BeganActive, EndedActive, Position};
use crate::error::ConfigurationError;
use crate::grid::Grid;

/// Система: MoveIntent → Mover::try_move_in_direction
///
/// Intents обрабатываются последовательно в порядке записи. Успешный commit
/// сразу обновляет тайл mover в реестре Grid (внутри try_move_in_direction),
/// поэтому collidable mover, закоммитивший первым, блокирует тайл для всех
/// следующих intents этого tick.
///
/// Commit сбрасывает активный interactable → EndedActive бывшему.
pub fn process_move_intents(
    mut intents: EventReader<MoveIntent>,
    mut movers: Query<(&mut Mover, &mut Position)>,
    grid: Option<ResMut<Grid>>,
    mut commands: Commands,
    mut changed: EventWriter<DestinationChanged>,
    mut rejected: EventWriter<MoveRejected>,
) {
    let Some(mut grid) = grid else {
        if !intents.is_empty() {
            ConfigurationError::MissingGrid { operation: "move_in_direction" }.report();
            intents.clear();
        }
        return;
    };

    for intent in intents.read() {
        let Ok((mut mover, mut position)) = movers.get_mut(intent.entity) else {
            crate::log_warning(&format!(
                "MoveIntent for {:?} ignored: entity has no Mover",
                intent.entity
            ));
            continue;
        };

        let from = mover.destination_grid(&grid);
        let previous_active = mover.active_interactable();

        match mover.try_move_in_direction(intent.entity, &mut position.0, intent.direction, &mut grid) {
            Ok(to) => {
                fire_active_change(
                    &mut commands,
                    &grid,
                    intent.entity,
                    ActiveInteractableChange { ended: previous_active, began: None },
                );

                changed.write(DestinationChanged { entity: intent.entity, from, to });
                crate::log(&format!(
                    "🚶 {:?}: {:?} → {:?} (facing {}°)",
                    intent.entity,
                    from,
                    to,
                    mover.facing_angle_degrees()
                ));
            }
            Err(reason) => {
                rejected.write(MoveRejected { entity: intent.entity, reason });
                crate::log(&format!("⛔ {:?}: move rejected ({:?})", intent.entity, reason));
            }
        }
    }
}

/// Система: per-tick движение + facing-interactable detection
///
/// Detection выполняется каждый tick, пока mover стоит (включая tick прибытия).
/// Результат edge-triggered: повтор с тем же interactable — без событий.
pub fn advance_movers(
    mut movers: Query<(Entity, &mut Mover, &mut Position)>,
    grid: Option<Res<Grid>>,
    mut commands: Commands,
) {
    let Some(grid) = grid else {
        if !movers.is_empty() {
            ConfigurationError::MissingGrid { operation: "advance_movers" }.report();
        }
        return;
    };

    for (entity, mut mover, mut position) in movers.iter_mut() {
        if mover.is_moving() {
            debug_assert!(
                grid.is_aligned(mover.destination()),
                "Mover {:?} destination {:?} is not grid-aligned",
                entity,
                mover.destination()
            );
            mover.step(&mut position.0);
        }

        if mover.is_moving() {
            continue;
        }

        let change = if mover.interacting_enabled {
            let found = mover.detect_interactable(&grid);
            if found == mover.active_interactable() {
                continue;
            }
            mover.update_active_interactable(found)
        } else if mover.active_interactable().is_some() {
            // Interaction выключили — отпускаем текущий
            ActiveInteractableChange { ended: mover.clear_active_interactable(), began: None }
        } else {
            continue;
        };

        fire_active_change(&mut commands, &grid, entity, change);
    }
}

/// Отправляет EndedActive / BeganActive triggers на interactable entities
///
/// EndedActive только если бывший interactable ещё зарегистрирован в Grid
/// (despawned interactable событий не получает).
pub(crate) fn fire_active_change(
    commands: &mut Commands,
    grid: &Grid,
    interactor: Entity,
    change: ActiveInteractableChange,
) {
    if let Some(ended) = change.ended {
        if grid.is_interactable(ended) {
            commands.trigger_targets(EndedActive { interactor }, ended);
            crate::log_info(&format!("👋 {:?} no longer facing {:?}", interactor, ended));
        }
    }

    if let Some(began) = change.began {
        commands.trigger_targets(BeganActive { interactor }, began);
        crate::log_info(&format!("👀 {:?} is now facing {:?}", interactor, began));
    }
}
