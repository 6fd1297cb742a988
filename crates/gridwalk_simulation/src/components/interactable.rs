//! Interactable — пассивный occupant с событиями
//!
//! Вся логика detection живёт в Mover; Interactable только данные + события.
//!
//! События — entity-targeted triggers, "подписка" = observer на entity:
//! ```ignore
//! commands
//!     .spawn((Interactable, Position::from_grid(&grid, IVec2::new(3, 2))))
//!     .observe(|trigger: Trigger<Interacted>| {
//!         info!("{:?} read the sign", trigger.event().interactor);
//!     });
//! ```
//! Глобальные observers (`app.add_observer`) получают события всех interactables.

use bevy::prelude::*;

use super::StaticOccupant;

/// Interactable на сетке
///
/// Регистрируется в Grid.interactables при spawn, удаляется при despawn.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(StaticOccupant)]
pub struct Interactable;

/// Trigger: mover вызвал interact(), будучи повёрнутым к interactable
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interacted {
    pub interactor: Entity,
}

/// Trigger: interactable стал активным для mover (mover смотрит на него)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeganActive {
    pub interactor: Entity,
}

/// Trigger: interactable перестал быть активным для mover
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndedActive {
    pub interactor: Entity,
}
