use crate::geometry::{Area, Dimensions};
use crate::media::MediaHandle;
use crate::stage::{Bitmap, DisplayObject};

/// One nested copy of the media
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecursionFrame {
    pub scene: Area,
    /// 0 for the outermost copy
    pub depth: usize,
}

/// Rectangles of the nested copies, outermost first.
///
/// The first copy fills `selected`. Each following copy is the previous one
/// mapped through the canvas-to-selection transform, so it lands inside the
/// previous copy the same way the selection sits inside the canvas.
/// Exactly `max_depth` frames are returned.
pub fn recursion_frames(canvas: Dimensions, selected: Area, max_depth: usize) -> Vec<RecursionFrame> {
    let factor_x = selected.width / canvas.width;
    let factor_y = selected.height / canvas.height;

    let mut frames = Vec::with_capacity(max_depth);
    let mut scene = selected;

    for depth in 0..max_depth {
        frames.push(RecursionFrame { scene, depth });

        scene = Area {
            width: factor_x * scene.width,
            height: factor_y * scene.height,
            x: selected.x + factor_x * scene.x,
            y: selected.y + factor_y * scene.y,
        };
    }

    frames
}

/// The stack of nested bitmaps drawn over the base image
#[derive(Debug, Clone)]
pub struct CompositedContainer {
    /// The selection the recursion was built from
    pub init_area: Area,
    pub media: MediaHandle,
    pub frames: Vec<RecursionFrame>,
}

impl CompositedContainer {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// One container of bitmaps, innermost copy drawn last
    pub fn to_display_object(&self) -> DisplayObject {
        DisplayObject::Container(
            self.frames
                .iter()
                .map(|frame| {
                    DisplayObject::Bitmap(Bitmap {
                        media: self.media.clone(),
                        dest: frame.scene,
                    })
                })
                .collect(),
        )
    }
}

/// Builds `max_depth` nested copies of `media` for the selected area
pub fn compose(canvas: Dimensions, selected: Area, media: &MediaHandle, max_depth: usize) -> CompositedContainer {
    CompositedContainer {
        init_area: selected,
        media: media.clone(),
        frames: recursion_frames(canvas, selected, max_depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Media;
    use egui::{Color32, ColorImage};

    #[test]
    fn test_depth_indices() {
        let frames = recursion_frames(
            Dimensions::new(100.0, 100.0),
            Area::new(10.0, 10.0, 50.0, 50.0),
            4,
        );
        let depths: Vec<usize> = frames.iter().map(|f| f.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_non_uniform_factor() {
        let frames = recursion_frames(
            Dimensions::new(200.0, 100.0),
            Area::new(0.0, 0.0, 100.0, 25.0),
            2,
        );
        assert_eq!(frames[1].scene, Area::new(0.0, 0.0, 50.0, 6.25));
    }

    #[test]
    fn test_display_object_order() {
        let media = Media::new_ref("m", "image/png", ColorImage::new([4, 4], Color32::WHITE));
        let container = compose(
            Dimensions::new(200.0, 200.0),
            Area::new(50.0, 50.0, 100.0, 100.0),
            &media,
            3,
        );

        let DisplayObject::Container(children) = container.to_display_object() else {
            panic!("expected a container");
        };
        let widths: Vec<f32> = children
            .iter()
            .map(|child| match child {
                DisplayObject::Bitmap(bitmap) => bitmap.dest.width,
                _ => f32::NAN,
            })
            .collect();
        assert_eq!(widths, vec![100.0, 50.0, 25.0]);
    }
}
