use egui::{Pos2, Vec2};
use log::debug;

use crate::config::SelectionStyle;
use crate::event::{EventBus, MouseEvent, MouseEventKind, Subscription};
use crate::geometry::{Area, contains_open, sign};
use crate::stage::{ChildId, DisplayObject, RectShape, SELECTION_Z, Stage};

/// Limits applied while a selection is drawn
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Constraints {
    /// Height of the selection per unit of width; `None` leaves it free.
    /// Not validated: zero or negative ratios give degenerate rectangles.
    pub ratio_w_to_h: Option<f32>,
}

impl Constraints {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn with_ratio(ratio_w_to_h: f32) -> Self {
        Self {
            ratio_w_to_h: Some(ratio_w_to_h),
        }
    }

    /// Applies the ratio to a raw drag extent.
    ///
    /// The height follows the width, keeping the sign of both drag
    /// directions so the far corner stays on the pointer's side. A drag with
    /// no vertical movement counts as going down.
    fn apply(&self, extent: Vec2) -> Vec2 {
        match self.ratio_w_to_h {
            Some(ratio) => {
                let vertical = if extent.y < 0.0 { -1.0 } else { 1.0 };
                Vec2::new(extent.x, sign(extent.x) * vertical * extent.x * ratio)
            }
            None => extent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    Idle,
    /// A new rectangle is being drawn from `anchor`; `extent` may be negative
    Drawing { anchor: Pos2, extent: Vec2 },
    Confirmed { area: Area },
    /// A confirmed rectangle is being moved; `last` is the previous pointer sample
    Dragging { last: Pos2, area: Area },
}

impl SelectionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Drawing { .. } => "Drawing",
            Self::Confirmed { .. } => "Confirmed",
            Self::Dragging { .. } => "Dragging",
        }
    }
}

/// Pointer cursor to show over the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Crosshair,
    Grab,
    Grabbing,
}

impl CursorHint {
    pub fn icon(&self) -> egui::CursorIcon {
        match self {
            Self::Crosshair => egui::CursorIcon::Crosshair,
            Self::Grab => egui::CursorIcon::Grab,
            Self::Grabbing => egui::CursorIcon::Grabbing,
        }
    }
}

/// Turns pointer drags on a stage into a confirmed, movable rectangle.
///
/// Subscribers registered with [`AreaSelection::on_change`] receive the
/// normalized area when a drawn rectangle is released, and on every move
/// while a confirmed rectangle is dragged.
#[derive(Debug)]
pub struct AreaSelection {
    constraints: Constraints,
    style: SelectionStyle,
    state: SelectionState,
    shape: Option<ChildId>,
    changes: EventBus<Area>,
}

impl AreaSelection {
    pub fn new(constraints: Constraints, style: SelectionStyle) -> Self {
        Self {
            constraints,
            style,
            state: SelectionState::Idle,
            shape: None,
            changes: EventBus::new(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn on_change(&self, listener: impl FnMut(&Area) + Send + 'static) -> Subscription {
        self.changes.subscribe(listener)
    }

    /// The rectangle currently shown, normalized
    pub fn area(&self) -> Option<Area> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Drawing { anchor, extent } => Some(Area::from_signed(anchor, extent)),
            SelectionState::Confirmed { area } | SelectionState::Dragging { area, .. } => Some(area),
        }
    }

    /// The last released rectangle, also while it is being dragged
    pub fn confirmed_area(&self) -> Option<Area> {
        match self.state {
            SelectionState::Confirmed { area } | SelectionState::Dragging { area, .. } => Some(area),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: &MouseEvent, stage: &mut Stage) {
        match event.kind {
            MouseEventKind::Down => self.pointer_down(event.stage_pos, stage),
            MouseEventKind::Move => self.pointer_move(event.stage_pos, stage),
            MouseEventKind::Up => self.pointer_up(event.stage_pos, stage),
        }
    }

    /// A press inside the confirmed rectangle starts moving it and is not
    /// treated as the start of a new rectangle; any other press starts one.
    pub fn pointer_down(&mut self, pos: Pos2, stage: &mut Stage) {
        if let Some(area) = self.confirmed_area() {
            if contains_open(&area, pos) {
                debug!("Selection drag started at {:?}", pos);
                self.state = SelectionState::Dragging { last: pos, area };
                return;
            }
        }

        self.remove_shape(stage);
        let shape = DisplayObject::Shape(RectShape {
            area: Area::new(pos.x, pos.y, 0.0, 0.0),
            style: self.style,
        });
        self.shape = Some(stage.add_child_with_z(shape, SELECTION_Z));
        self.state = SelectionState::Drawing {
            anchor: pos,
            extent: Vec2::ZERO,
        };
        debug!("Selection drawing started at {:?}", pos);
    }

    pub fn pointer_move(&mut self, pos: Pos2, stage: &mut Stage) {
        match self.state {
            SelectionState::Drawing { anchor, .. } => {
                let extent = self.constraints.apply(pos - anchor);
                self.state = SelectionState::Drawing { anchor, extent };
                self.sync_shape(stage);
            }
            SelectionState::Dragging { last, area } => {
                let area = area.translated(pos - last);
                self.state = SelectionState::Dragging { last: pos, area };
                self.sync_shape(stage);
                self.emit(area);
            }
            SelectionState::Idle | SelectionState::Confirmed { .. } => {}
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2, stage: &mut Stage) {
        match self.state {
            SelectionState::Drawing { anchor, .. } => {
                let extent = self.constraints.apply(pos - anchor);
                let area = Area::from_signed(anchor, extent);

                if area.is_empty() {
                    debug!("Ignoring empty selection at {:?}", anchor);
                    self.remove_shape(stage);
                    self.state = SelectionState::Idle;
                    return;
                }

                self.state = SelectionState::Confirmed { area };
                self.sync_shape(stage);
                debug!("Selection confirmed: {:?}", area);
                self.emit(area);
            }
            SelectionState::Dragging { area, .. } => {
                self.state = SelectionState::Confirmed { area };
            }
            SelectionState::Idle | SelectionState::Confirmed { .. } => {}
        }
    }

    /// Places a confirmed selection at `area` scaled by `ratio` and notifies
    /// subscribers, e.g. to carry a selection over a canvas resize.
    pub fn restore_scaled(&mut self, area: Area, ratio: f32, stage: &mut Stage) {
        self.remove_shape(stage);

        let area = area.scaled(ratio);
        let shape = DisplayObject::Shape(RectShape {
            area,
            style: self.style,
        });
        self.shape = Some(stage.add_child_with_z(shape, SELECTION_Z));
        self.state = SelectionState::Confirmed { area };
        self.emit(area);
    }

    /// Drops the rectangle without notifying subscribers
    pub fn clear(&mut self, stage: &mut Stage) {
        self.remove_shape(stage);
        self.state = SelectionState::Idle;
    }

    pub fn cursor_at(&self, pos: Pos2) -> CursorHint {
        match self.state {
            SelectionState::Dragging { .. } => CursorHint::Grabbing,
            SelectionState::Confirmed { area } if contains_open(&area, pos) => CursorHint::Grab,
            _ => CursorHint::Crosshair,
        }
    }

    fn sync_shape(&self, stage: &mut Stage) {
        let (Some(id), Some(area)) = (self.shape, self.area()) else {
            return;
        };
        if let Some(DisplayObject::Shape(shape)) = stage.child_mut(id) {
            shape.area = area;
        }
    }

    fn remove_shape(&mut self, stage: &mut Stage) {
        if let Some(id) = self.shape.take() {
            stage.remove_child(id);
        }
    }

    fn emit(&self, area: Area) {
        if !area.is_empty() {
            self.changes.emit(&area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Dimensions;
    use egui::pos2;

    fn stage() -> Stage {
        Stage::new(Dimensions::new(400.0, 300.0))
    }

    fn shape_area(stage: &Stage) -> Option<Area> {
        stage.children().find_map(|child| match child {
            DisplayObject::Shape(shape) => Some(shape.area),
            _ => None,
        })
    }

    #[test]
    fn test_shape_created_on_press() {
        let mut stage = stage();
        let mut selection = AreaSelection::new(Constraints::free(), SelectionStyle::default());

        selection.pointer_down(pos2(20.0, 30.0), &mut stage);

        assert_eq!(selection.state().name(), "Drawing");
        assert_eq!(shape_area(&stage), Some(Area::new(20.0, 30.0, 0.0, 0.0)));
    }

    #[test]
    fn test_shape_tracks_pointer() {
        let mut stage = stage();
        let mut selection = AreaSelection::new(Constraints::free(), SelectionStyle::default());

        selection.pointer_down(pos2(50.0, 50.0), &mut stage);
        selection.pointer_move(pos2(20.0, 80.0), &mut stage);

        assert_eq!(shape_area(&stage), Some(Area::new(20.0, 50.0, 30.0, 30.0)));
    }

    #[test]
    fn test_empty_selection_removes_shape() {
        let mut stage = stage();
        let mut selection = AreaSelection::new(Constraints::free(), SelectionStyle::default());

        selection.pointer_down(pos2(50.0, 50.0), &mut stage);
        selection.pointer_up(pos2(50.0, 50.0), &mut stage);

        assert_eq!(*selection.state(), SelectionState::Idle);
        assert_eq!(stage.num_children(), 0);
    }

    #[test]
    fn test_press_outside_redraws() {
        let mut stage = stage();
        let mut selection = AreaSelection::new(Constraints::free(), SelectionStyle::default());

        selection.pointer_down(pos2(10.0, 10.0), &mut stage);
        selection.pointer_up(pos2(60.0, 60.0), &mut stage);
        selection.pointer_down(pos2(200.0, 200.0), &mut stage);

        assert_eq!(selection.state().name(), "Drawing");
        assert_eq!(stage.num_children(), 1);
        assert_eq!(shape_area(&stage), Some(Area::new(200.0, 200.0, 0.0, 0.0)));
    }

    #[test]
    fn test_press_on_edge_redraws() {
        let mut stage = stage();
        let mut selection = AreaSelection::new(Constraints::free(), SelectionStyle::default());

        selection.pointer_down(pos2(10.0, 10.0), &mut stage);
        selection.pointer_up(pos2(60.0, 60.0), &mut stage);
        selection.pointer_down(pos2(10.0, 30.0), &mut stage);

        assert_eq!(selection.state().name(), "Drawing");
    }

    #[test]
    fn test_ratio_with_flat_drag() {
        let constraints = Constraints::with_ratio(0.5);
        assert_eq!(constraints.apply(Vec2::new(100.0, 0.0)), Vec2::new(100.0, 50.0));
        assert_eq!(constraints.apply(Vec2::new(-100.0, 0.0)), Vec2::new(-100.0, 50.0));
        assert_eq!(constraints.apply(Vec2::new(-100.0, -3.0)), Vec2::new(-100.0, -50.0));
        assert_eq!(constraints.apply(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_cursor_hints() {
        let mut stage = stage();
        let mut selection = AreaSelection::new(Constraints::free(), SelectionStyle::default());
        assert_eq!(selection.cursor_at(pos2(30.0, 30.0)), CursorHint::Crosshair);

        selection.pointer_down(pos2(10.0, 10.0), &mut stage);
        selection.pointer_up(pos2(60.0, 60.0), &mut stage);
        assert_eq!(selection.cursor_at(pos2(30.0, 30.0)), CursorHint::Grab);
        assert_eq!(selection.cursor_at(pos2(100.0, 30.0)), CursorHint::Crosshair);

        selection.pointer_down(pos2(30.0, 30.0), &mut stage);
        assert_eq!(selection.cursor_at(pos2(300.0, 300.0)), CursorHint::Grabbing);
    }

    #[test]
    fn test_clear_removes_shape_without_event() {
        let mut stage = stage();
        let mut selection = AreaSelection::new(Constraints::free(), SelectionStyle::default());
        let count = std::sync::Arc::new(parking_lot::Mutex::new(0));
        let counter = count.clone();
        let _sub = selection.on_change(move |_| *counter.lock() += 1);

        selection.pointer_down(pos2(10.0, 10.0), &mut stage);
        selection.pointer_up(pos2(60.0, 60.0), &mut stage);
        selection.clear(&mut stage);

        assert_eq!(*count.lock(), 1);
        assert_eq!(*selection.state(), SelectionState::Idle);
        assert_eq!(stage.num_children(), 0);
    }
}
