use egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::config::SelectionStyle;
use crate::event::{EventBus, MouseEvent, Subscription, Tick};
use crate::geometry::{Area, Dimensions};
use crate::media::MediaHandle;
use crate::texture_manager::TextureManager;

/// Z-index of the base image
pub const BASE_Z: i32 = 0;
/// Z-index of the recursive composite, above the base image
pub const COMPOSITE_Z: i32 = 1;
/// Z-index of the selection outline, kept above the composite
pub const SELECTION_Z: i32 = 2;

/// Media scaled into a destination rectangle
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub media: MediaHandle,
    pub dest: Area,
}

/// Outlined and filled rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub area: Area,
    pub style: SelectionStyle,
}

#[derive(Debug, Clone)]
pub enum DisplayObject {
    Bitmap(Bitmap),
    Shape(RectShape),
    /// Children drawn in order, first at the back
    Container(Vec<DisplayObject>),
}

impl DisplayObject {
    fn paint(&self, ctx: &egui::Context, painter: &Painter, origin: Pos2, textures: &mut TextureManager) {
        match self {
            Self::Bitmap(bitmap) => {
                let rect = bitmap.dest.to_rect(origin);
                match textures.texture_for(&bitmap.media, ctx) {
                    Some(texture_id) => {
                        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                        painter.image(texture_id, rect, uv, Color32::WHITE);
                    }
                    None => {
                        painter.rect_filled(rect, 0.0, Color32::from_gray(200));
                    }
                }
            }
            Self::Shape(shape) => {
                let rect = shape.area.to_rect(origin);
                let style = shape.style;
                painter.rect_filled(rect, 0.0, Color32::from_black_alpha(style.fill_alpha));
                painter.rect_stroke(
                    rect,
                    0.0,
                    Stroke::new(style.stroke_width, Color32::from_gray(style.stroke_gray)),
                );
            }
            Self::Container(children) => {
                for child in children {
                    child.paint(ctx, painter, origin, textures);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildId(u64);

#[derive(Debug)]
struct Child {
    id: ChildId,
    z_index: i32,
    object: DisplayObject,
}

/// The canvas: a retained display list plus its mouse and tick buses.
///
/// Children are kept sorted by z-index; children with equal z keep their
/// insertion order.
#[derive(Debug)]
pub struct Stage {
    size: Dimensions,
    children: Vec<Child>,
    next_child_id: u64,
    mouse: EventBus<MouseEvent>,
    ticker: EventBus<Tick>,
    dom_events: bool,
    dirty: bool,
}

impl Stage {
    pub fn new(size: Dimensions) -> Self {
        Self {
            size,
            children: Vec::new(),
            next_child_id: 1,
            mouse: EventBus::new(),
            ticker: EventBus::new(),
            dom_events: true,
            dirty: true,
        }
    }

    pub fn size(&self) -> Dimensions {
        self.size
    }

    pub fn set_size(&mut self, size: Dimensions) {
        if self.size != size {
            self.size = size;
            self.dirty = true;
        }
    }

    pub fn add_child(&mut self, object: DisplayObject) -> ChildId {
        self.add_child_with_z(object, BASE_Z)
    }

    /// Inserts `object` after every child whose z-index is lower or equal
    pub fn add_child_with_z(&mut self, object: DisplayObject, z_index: i32) -> ChildId {
        let id = ChildId(self.next_child_id);
        self.next_child_id += 1;

        let index = self.children.partition_point(|child| child.z_index <= z_index);
        self.children.insert(index, Child { id, z_index, object });
        self.dirty = true;
        id
    }

    pub fn remove_child(&mut self, id: ChildId) -> Option<DisplayObject> {
        let index = self.children.iter().position(|child| child.id == id)?;
        self.dirty = true;
        Some(self.children.remove(index).object)
    }

    pub fn child(&self, id: ChildId) -> Option<&DisplayObject> {
        self.children.iter().find(|child| child.id == id).map(|child| &child.object)
    }

    /// Mutable access to a child; marks the stage for redraw
    pub fn child_mut(&mut self, id: ChildId) -> Option<&mut DisplayObject> {
        let child = self.children.iter_mut().find(|child| child.id == id)?;
        self.dirty = true;
        Some(&mut child.object)
    }

    /// Display objects back to front
    pub fn children(&self) -> impl Iterator<Item = &DisplayObject> {
        self.children.iter().map(|child| &child.object)
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Removes every display object
    pub fn clear(&mut self) {
        self.children.clear();
        self.dirty = true;
    }

    pub fn on_mouse(&self, listener: impl FnMut(&MouseEvent) + Send + 'static) -> Subscription {
        self.mouse.subscribe(listener)
    }

    pub fn on_tick(&self, listener: impl FnMut(&Tick) + Send + 'static) -> Subscription {
        self.ticker.subscribe(listener)
    }

    /// Turns delivery of mouse events on or off
    pub fn enable_dom_events(&mut self, enabled: bool) {
        self.dom_events = enabled;
    }

    pub fn dispatch_mouse(&self, event: &MouseEvent) {
        if self.dom_events {
            self.mouse.emit(event);
        }
    }

    /// Whether anything listens to the ticker
    pub fn is_ticking(&self) -> bool {
        self.ticker.listener_count() > 0
    }

    /// Runs one frame of the update loop.
    ///
    /// Returns true when the stage changed since the previous tick and
    /// should be repainted.
    pub fn tick(&mut self, tick: Tick) -> bool {
        if !self.is_ticking() {
            return false;
        }
        self.ticker.emit(&tick);
        std::mem::take(&mut self.dirty)
    }

    /// Mouse plus tick listeners currently registered
    pub fn listener_count(&self) -> usize {
        self.mouse.listener_count() + self.ticker.listener_count()
    }

    /// Draws the display list with the stage's top-left corner at `origin`
    pub fn paint(&self, ctx: &egui::Context, painter: &Painter, origin: Pos2, textures: &mut TextureManager) {
        let clip = Area::from_dimensions(self.size).to_rect(origin);
        let painter = painter.with_clip_rect(clip.intersect(painter.clip_rect()));

        for child in &self.children {
            child.object.paint(ctx, &painter, origin, textures);
        }
    }
}
