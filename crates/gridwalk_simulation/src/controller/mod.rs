//! Player controller — удерживаемые направления → MoveIntent
//!
//! Движок (input adapter) вызывает `press` / `release` на компоненте,
//! симуляция каждый tick превращает очередь в MoveIntent.
//!
//! Очередь: последнее нажатое направление первое. С `diagonal_allowed`
//! суммируются все удерживаемые направления, без него — только последнее.

use bevy::prelude::*;

use crate::movement::{MoveDirection, MoveIntent, Mover};
use crate::GridwalkSet;

/// Направление ввода
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MoveAction {
    West,
    East,
    North,
    South,
}

impl MoveAction {
    pub fn vector(self) -> IVec2 {
        match self {
            MoveAction::West => IVec2::new(-1, 0),
            MoveAction::East => IVec2::new(1, 0),
            MoveAction::North => IVec2::new(0, -1),
            MoveAction::South => IVec2::new(0, 1),
        }
    }
}

/// Управляемый игроком mover
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Mover)]
pub struct PlayerController {
    pub diagonal_allowed: bool,
    /// Удерживаемые направления, последнее нажатое первым
    held: Vec<MoveAction>,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            diagonal_allowed: true,
            held: Vec::new(),
        }
    }
}

impl PlayerController {
    pub fn press(&mut self, action: MoveAction) {
        if !self.held.contains(&action) {
            self.held.insert(0, action);
        }
    }

    pub fn release(&mut self, action: MoveAction) {
        self.held.retain(|&held| held != action);
    }

    pub fn held(&self) -> &[MoveAction] {
        &self.held
    }

    /// Итоговый вектор шага из удерживаемых направлений
    pub fn resolve(&self) -> IVec2 {
        let mut vector = IVec2::ZERO;
        for action in &self.held {
            vector += action.vector();
            if !self.diagonal_allowed {
                break;
            }
        }
        vector
    }
}

/// Controller Plugin
pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, drive_player_controllers.in_set(GridwalkSet::Input));
    }
}

/// Система: PlayerController → MoveIntent (только когда mover стоит)
pub fn drive_player_controllers(
    controllers: Query<(Entity, &PlayerController, &Mover)>,
    mut intents: EventWriter<MoveIntent>,
) {
    for (entity, controller, mover) in controllers.iter() {
        if mover.is_moving() {
            continue;
        }

        let vector = controller.resolve();
        if vector == IVec2::ZERO {
            continue;
        }

        intents.write(MoveIntent {
            entity,
            direction: MoveDirection::from_vector(vector),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_press_first() {
        let mut controller = PlayerController::default();
        controller.press(MoveAction::North);
        controller.press(MoveAction::East);
        controller.press(MoveAction::North); // уже удерживается

        assert_eq!(controller.held(), &[MoveAction::East, MoveAction::North]);
    }

    #[test]
    fn test_diagonal_sums_held_directions() {
        let mut controller = PlayerController::default();
        controller.press(MoveAction::North);
        controller.press(MoveAction::East);

        assert_eq!(controller.resolve(), IVec2::new(1, -1));
    }

    #[test]
    fn test_without_diagonal_only_newest_counts() {
        let mut controller = PlayerController {
            diagonal_allowed: false,
            ..default()
        };
        controller.press(MoveAction::North);
        controller.press(MoveAction::East);

        assert_eq!(controller.resolve(), IVec2::new(1, 0));

        controller.release(MoveAction::East);
        assert_eq!(controller.resolve(), IVec2::new(0, -1));
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let mut controller = PlayerController::default();
        controller.press(MoveAction::West);
        controller.press(MoveAction::East);

        assert_eq!(controller.resolve(), IVec2::ZERO);
    }
}
