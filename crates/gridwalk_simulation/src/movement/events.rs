//! Movement events
//!
//! Intent events пишет внешний слой (input adapter, AI, движок),
//! outcome events пишет `process_move_intents`.

use bevy::prelude::*;

use super::components::MoveDirection;
use crate::error::RejectedCommand;

/// Event: намерение шагнуть на соседний тайл
///
/// Генерируется:
/// - PlayerController (удерживаемые направления)
/// - Wanderer (случайное направление)
/// - движок напрямую
///
/// Обрабатывается: process_move_intents → Mover::try_move_in_direction
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveIntent {
    pub entity: Entity,
    pub direction: MoveDirection,
}

/// Event: взаимодействовать с активным interactable
///
/// Без активного interactable — no-op.
#[derive(Event, Debug, Clone, Copy)]
pub struct InteractIntent {
    pub entity: Entity,
}

/// Event: mover закоммитил новый destination тайл
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationChanged {
    pub entity: Entity,
    pub from: IVec2,
    pub to: IVec2,
}

/// Event: MoveIntent отклонён (destination не изменился)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRejected {
    pub entity: Entity,
    pub reason: RejectedCommand,
}
