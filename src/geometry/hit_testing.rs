use egui::Pos2;

use super::Area;

/// Open-interval containment: a point lying exactly on an edge is outside.
pub fn contains_open(area: &Area, pos: Pos2) -> bool {
    pos.x > area.x
        && pos.x < area.x + area.width
        && pos.y > area.y
        && pos.y < area.y + area.height
}

/// Sign of `v` as -1, 0 or 1. Unlike `f32::signum`, zero maps to zero.
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
