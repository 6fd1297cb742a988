//! Ошибки grid/level слоя
//!
//! - `GridError` — ошибки построения Grid (tile size, mover settings, level файлы)
//! - `ConfigurationError` — Grid не подключен; логируется один раз, операция = no-op
//! - `RejectedCommand` — причина отказа команды движения (не ошибка, а результат)

use std::path::PathBuf;
use thiserror::Error;

/// Ошибки построения Grid и загрузки уровня
#[derive(Error, Debug)]
pub enum GridError {
    /// Размер тайла должен быть положительным
    #[error("invalid tile size: {width}x{height} (both must be positive)")]
    InvalidTileSize {
        width: f32,
        height: f32,
    },

    /// Level файл не парсится как TOML
    #[error("failed to parse level layout: {0}")]
    LevelParse(#[from] toml::de::Error),

    /// Level файл не читается
    #[error("failed to read level layout {path:?}: {source}")]
    LevelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Настройки mover вне допустимого диапазона
    #[error("invalid mover settings: lerp_factor {lerp_factor} must be in (0, 1], speed {speed} must be positive")]
    InvalidMoverSettings {
        lerp_factor: f32,
        speed: f32,
    },

    /// Неизвестный символ в ASCII слое коллизий
    #[error("collision layer {layer}: unknown symbol {symbol:?} at row {row}, column {column}")]
    InvalidLayerRow {
        layer: usize,
        row: usize,
        column: usize,
        symbol: char,
    },
}

/// Ошибка конфигурации: операция требует Grid, но он не вставлен в World
///
/// Не пробрасывается наружу — логируется один раз через `log_error_once`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no Grid resource configured; {operation} is a no-op until a Grid is inserted")]
    MissingGrid {
        operation: &'static str,
    },
}

impl ConfigurationError {
    /// Сообщает об ошибке (один раз на операцию)
    pub fn report(&self) {
        match self {
            ConfigurationError::MissingGrid { operation } => {
                crate::logger::log_error_once(operation, &self.to_string());
            }
        }
    }
}

/// Причина отказа `MoveIntent`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedCommand {
    /// Mover ещё не доехал до destination
    AlreadyMoving,
    /// Все четыре флага направления false (или взаимно погасились)
    NoDirection,
    /// Обе оси заблокированы — destination не изменился
    Blocked,
}
