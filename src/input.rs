use egui::{Context, PointerButton, Pos2, Rect};

use crate::event::MouseEvent;

/// Converts raw egui pointer input into stage mouse events.
///
/// Only the primary button is tracked. A press starts a gesture only over
/// the canvas; once started, moves and the release are reported wherever the
/// pointer goes, in coordinates relative to the canvas' top-left corner.
#[derive(Debug, Default)]
pub struct InputHandler {
    pressed: bool,
    last_pointer_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a gesture that started on the canvas is still in progress
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Forget any gesture in progress, e.g. when the canvas goes away
    pub fn reset(&mut self) {
        self.pressed = false;
        self.last_pointer_pos = None;
    }

    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<MouseEvent> {
        let (pos, pressed, released) = ctx.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.button_pressed(PointerButton::Primary),
                input.pointer.button_released(PointerButton::Primary),
            )
        });
        self.translate(pos, pressed, released, canvas_rect)
    }

    /// The conversion itself, independent of an egui context
    pub fn translate(
        &mut self,
        pos: Option<Pos2>,
        pressed: bool,
        released: bool,
        canvas_rect: Rect,
    ) -> Vec<MouseEvent> {
        let mut events = Vec::new();
        let Some(pos) = pos else {
            return events;
        };
        let stage_pos = (pos - canvas_rect.min).to_pos2();

        if pressed && !self.pressed && canvas_rect.contains(pos) {
            self.pressed = true;
            events.push(MouseEvent::down(stage_pos));
        } else if self.pressed && Some(pos) != self.last_pointer_pos {
            events.push(MouseEvent::moved(stage_pos));
        }

        if released && self.pressed {
            self.pressed = false;
            events.push(MouseEvent::up(stage_pos));
        }

        self.last_pointer_pos = Some(pos);
        events
    }
}
