//! ECS Components для entity на сетке
//!
//! Организация:
//! - position: непрерывная позиция (Position) — база для всех entity сетки
//! - occupant: StaticOccupant, CollisionObstacle (+ set_collision_obstacle)
//! - interactable: Interactable и его события (Interacted, BeganActive, EndedActive)
//!
//! Mover живёт в `movement` (state machine + системы рядом).

pub mod interactable;
pub mod occupant;
pub mod position;

// Re-exports для удобного импорта
pub use interactable::*;
pub use occupant::*;
pub use position::*;
