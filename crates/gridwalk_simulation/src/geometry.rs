//! Геометрия тайловой сетки: snap, углы, шаг движения
//!
//! Все функции чистые (без ECS), используются Grid и Mover.
//! Ось Y направлена вниз (north = -Y), углы в градусах по часовой стрелке
//! от east: 0° = east, 90° = south, 180° = west, 270° = north.

use bevy::prelude::*;

/// Дистанция до destination, на которой движение считается завершённым
pub const STOP_EPSILON: f32 = 0.5;

/// Шаг квантования направления взгляда (8 направлений)
pub const FACING_STEP_DEGREES: f32 = 45.0;

/// Snap числа к ближайшему кратному `step`
///
/// Ничьи (ровно половина тайла) разрешаются к чётному кратному,
/// так же как в `Grid::to_grid_coords` — оба пути обязаны совпадать.
pub fn snap_to(value: f32, step: f32) -> f32 {
    (value / step).round_ties_even() * step
}

/// Нормализует угол в диапазон [0, 360)
pub fn fix_angle_degrees(angle: f32) -> f32 {
    let fixed = angle.rem_euclid(360.0);
    // rem_euclid может вернуть ровно 360.0 для крошечных отрицательных углов
    if fixed >= 360.0 { 0.0 } else { fixed }
}

/// Квантует угол к ближайшему шагу `FACING_STEP_DEGREES` в диапазоне [0, 360)
pub fn quantize_facing(angle: f32) -> f32 {
    let snapped = (fix_angle_degrees(angle) / FACING_STEP_DEGREES).round() * FACING_STEP_DEGREES;
    fix_angle_degrees(snapped)
}

/// Направление взгляда от `from` к `to` (квантованное)
///
/// Нулевой вектор даёт 0° (east).
pub fn bearing_degrees(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    quantize_facing(delta.y.atan2(delta.x).to_degrees())
}

/// Соседний тайл в направлении взгляда: (round(cos), round(sin))
pub fn facing_offset(angle_degrees: f32) -> IVec2 {
    let radians = angle_degrees.to_radians();
    IVec2::new(radians.cos().round() as i32, radians.sin().round() as i32)
}

/// Линейный шаг к цели с постоянной скоростью (clamp на цели)
pub fn move_toward(from: Vec2, to: Vec2, delta: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= delta || distance <= f32::EPSILON {
        to
    } else {
        from + offset / distance * delta
    }
}
