use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

pub mod hit_testing;

pub use hit_testing::{contains_open, sign};

/// Width and height of a canvas or of a media's natural size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Height over width, as used by the fit and by the selection ratio constraint
    pub fn aspect_h_to_w(&self) -> f32 {
        self.height / self.width
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A rectangle in stage coordinates.
///
/// Areas handed out to consumers are normalized: `(x, y)` is the top-left
/// corner and `width`/`height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The full canvas as an area anchored at the origin
    pub fn from_dimensions(dim: Dimensions) -> Self {
        Self::new(0.0, 0.0, dim.width, dim.height)
    }

    /// Builds a normalized area from an anchor and a signed extent.
    ///
    /// A drag can go in any direction, so the extent may be negative on either
    /// axis; the anchor then sits on the right/bottom edge of the result.
    pub fn from_signed(anchor: Pos2, extent: Vec2) -> Self {
        let x = if extent.x < 0.0 { anchor.x + extent.x } else { anchor.x };
        let y = if extent.y < 0.0 { anchor.y + extent.y } else { anchor.y };

        Self::new(x, y, extent.x.abs(), extent.y.abs())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Scales position and extent uniformly, e.g. when the canvas is resized
    pub fn scaled(&self, ratio: f32) -> Self {
        Self::new(
            self.x * ratio,
            self.y * ratio,
            self.width * ratio,
            self.height * ratio,
        )
    }

    /// Screen rectangle of this area for a stage drawn at `origin`
    pub fn to_rect(&self, origin: Pos2) -> Rect {
        Rect::from_min_size(
            origin + Vec2::new(self.x, self.y),
            Vec2::new(self.width, self.height),
        )
    }
}
