use egui::Pos2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down,
    Move,
    Up,
}

/// A primary-button pointer event in stage-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub stage_pos: Pos2,
}

impl MouseEvent {
    pub fn down(stage_pos: Pos2) -> Self {
        Self {
            kind: MouseEventKind::Down,
            stage_pos,
        }
    }

    pub fn moved(stage_pos: Pos2) -> Self {
        Self {
            kind: MouseEventKind::Move,
            stage_pos,
        }
    }

    pub fn up(stage_pos: Pos2) -> Self {
        Self {
            kind: MouseEventKind::Up,
            stage_pos,
        }
    }
}

/// One frame of the stage's update loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Seconds since the UNIX epoch (native) or page load (web)
    pub time: f64,
    /// Seconds since the previous tick, zero for the first one
    pub delta: f64,
}
