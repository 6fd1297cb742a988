//! Interaction — interact() команда mover → Interacted trigger
//!
//! Detection (какой interactable активен) выполняет `advance_movers`,
//! здесь только обработка InteractIntent.

use bevy::prelude::*;

use crate::components::Interacted;
use crate::error::ConfigurationError;
use crate::grid::Grid;
use crate::movement::{InteractIntent, Mover};
use crate::GridwalkSet;

/// Interaction Plugin
///
/// process_interact_intents в GridwalkSet::Interaction (после Motion:
/// активный interactable уже обновлён в этом tick).
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, process_interact_intents.in_set(GridwalkSet::Interaction));
    }
}

/// Система: InteractIntent → Interacted на активном interactable
///
/// Нет активного interactable (или он уже despawned) — no-op.
pub fn process_interact_intents(
    mut intents: EventReader<InteractIntent>,
    movers: Query<&Mover>,
    grid: Option<Res<Grid>>,
    mut commands: Commands,
) {
    let Some(grid) = grid else {
        if !intents.is_empty() {
            ConfigurationError::MissingGrid { operation: "interact" }.report();
            intents.clear();
        }
        return;
    };

    for intent in intents.read() {
        let Some(target) = movers
            .get(intent.entity)
            .ok()
            .and_then(|mover| mover.active_interactable())
        else {
            continue;
        };

        if !grid.is_interactable(target) {
            continue;
        }

        commands.trigger_targets(Interacted { interactor: intent.entity }, target);
        crate::log_info(&format!("🤝 {:?} interacted with {:?}", intent.entity, target));
    }
}
