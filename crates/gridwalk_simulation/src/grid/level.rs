//! Level layout (TOML) → Grid
//!
//! Формат:
//! ```toml
//! tile_width = 32.0
//! tile_height = 32.0
//!
//! [mover_defaults]
//! mode = "Speed"
//! speed = 2.0
//!
//! [[collision_layers]]
//! origin = [0, 0]
//! rows = [
//!     '#####',
//!     '#...#',
//!     '#####',
//! ]
//!
//! [[collision_layers]]
//! origin = [10, 0]
//! cells = [[0, 0], [1, 0]]
//! ```
//!
//! Каждая занятая клетка collision layer (со смещением origin) становится
//! blocked coordinate. Дубликаты между слоями игнорируются.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::Grid;
use crate::error::GridError;
use crate::movement::MoverSettings;

/// Символ заблокированной клетки в ASCII слое
pub const BLOCKED_SYMBOL: char = '#';

fn default_tile_size() -> f32 {
    32.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelLayout {
    #[serde(default = "default_tile_size")]
    pub tile_width: f32,
    #[serde(default = "default_tile_size")]
    pub tile_height: f32,
    /// Настройки по умолчанию для movers этого уровня
    #[serde(default)]
    pub mover_defaults: MoverSettings,
    #[serde(default)]
    pub collision_layers: Vec<CollisionLayer>,
}

/// Слой коллизий: явный список клеток и/или ASCII карта
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollisionLayer {
    /// Смещение слоя в grid-координатах
    #[serde(default)]
    pub origin: [i32; 2],
    #[serde(default)]
    pub cells: Vec<[i32; 2]>,
    /// Строка = ряд (y), символ = колонка (x); `#` — блок, `.` или пробел — свободно
    #[serde(default)]
    pub rows: Vec<String>,
}

impl CollisionLayer {
    /// Все занятые клетки слоя в координатах сетки
    pub fn used_cells(&self, layer_index: usize) -> Result<Vec<IVec2>, GridError> {
        let origin = IVec2::from(self.origin);
        let mut cells: Vec<IVec2> = self
            .cells
            .iter()
            .map(|cell| origin + IVec2::from(*cell))
            .collect();

        for (row, line) in self.rows.iter().enumerate() {
            for (column, symbol) in line.chars().enumerate() {
                match symbol {
                    BLOCKED_SYMBOL => {
                        cells.push(origin + IVec2::new(column as i32, row as i32));
                    }
                    '.' | ' ' => {}
                    other => {
                        return Err(GridError::InvalidLayerRow {
                            layer: layer_index,
                            row,
                            column,
                            symbol: other,
                        });
                    }
                }
            }
        }

        Ok(cells)
    }
}

impl LevelLayout {
    pub fn from_toml_str(source: &str) -> Result<Self, GridError> {
        let layout: Self = toml::from_str(source)?;
        layout.mover_defaults.validate()?;
        Ok(layout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| GridError::LevelIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Строит Grid: tile size + blocked coordinates из всех collision layers
    pub fn build_grid(&self) -> Result<Grid, GridError> {
        self.mover_defaults.validate()?;
        let mut grid = Grid::new(self.tile_width, self.tile_height)?;
        for (index, layer) in self.collision_layers.iter().enumerate() {
            for cell in layer.used_cells(index)? {
                grid.block(cell);
            }
        }

        crate::log_info(&format!(
            "🗺️ Level loaded: tile {}x{}, {} blocked tiles from {} layers",
            self.tile_width,
            self.tile_height,
            grid.blocked_count(),
            self.collision_layers.len()
        ));

        Ok(grid)
    }
}
