//! Position компонент: непрерывная 2D позиция entity на сетке

use bevy::prelude::*;

use crate::grid::{Grid, Occupant};

/// Непрерывная позиция (world units, Y вниз)
///
/// Static occupant: всегда кратна размеру тайла.
/// Mover: сходится к destination, кратна тайлу в состоянии покоя.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Позиция тайла с данными grid-координатами
    pub fn from_grid(grid: &Grid, coord: IVec2) -> Self {
        Self(grid.to_position(coord))
    }

    pub fn grid_coords(&self, grid: &Grid) -> IVec2 {
        grid.to_grid_coords(self.0)
    }
}

/// Static occupant занимает тайл своей текущей позиции
impl Occupant for Position {
    fn occupied_tile(&self, grid: &Grid) -> IVec2 {
        self.grid_coords(grid)
    }
}
