//! Movement domain — Mover state machine и команды перемещения
//!
//! Содержит:
//! - Mover (destination, режим движения, facing, активный interactable)
//! - MoveIntent / InteractIntent (команды от input/AI/движка)
//! - DestinationChanged / MoveRejected (результаты команд)
//! - системы: process_move_intents, advance_movers

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;


// Re-export all components and events
pub use components::*;
pub use events::*;
pub use systems::{advance_movers, process_move_intents};

use crate::GridwalkSet;

/// Movement Plugin
///
/// Регистрирует movement события и системы в FixedUpdate.
/// Порядок: process_move_intents (GridwalkSet::Intents) → advance_movers (GridwalkSet::Motion)
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveIntent>()
            .add_event::<InteractIntent>()
            .add_event::<DestinationChanged>()
            .add_event::<MoveRejected>();

        app.add_systems(FixedUpdate, process_move_intents.in_set(GridwalkSet::Intents))
            .add_systems(FixedUpdate, advance_movers.in_set(GridwalkSet::Motion));
    }
}
