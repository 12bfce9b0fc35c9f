use crate::config::FitConfig;
use crate::geometry::Dimensions;

/// Layout bounds a media is fitted against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBounds {
    /// Available layout width, and the height cap for landscape media.
    /// Only the height is read by [`fit`]; the width never caps the result.
    pub container: Dimensions,
    /// Width cap for portrait media
    pub portrait_max_width: f32,
}

impl FitBounds {
    pub fn new(container_width: f32, fit: &FitConfig) -> Self {
        Self {
            container: Dimensions::new(container_width, fit.landscape_max_height),
            portrait_max_width: fit.portrait_max_width,
        }
    }
}

/// Computes the on-canvas render size of a media.
///
/// The first matching rule wins:
/// 1. an explicit positive `required_width`
/// 2. portrait media wider than the portrait cap
/// 3. landscape or square media taller than the landscape cap
/// 4. the natural size
///
/// The aspect ratio is kept in every branch. Zero-sized media gives
/// non-finite results, which are passed through unchanged.
pub fn fit(natural: Dimensions, bounds: &FitBounds, required_width: Option<f32>) -> Dimensions {
    let h_to_w = natural.height / natural.width;
    let w_to_h = natural.width / natural.height;
    let is_portrait = h_to_w > 1.0;

    if let Some(width) = required_width.filter(|w| *w > 0.0) {
        return Dimensions::new(width, width * h_to_w);
    }

    if is_portrait && natural.width > bounds.portrait_max_width {
        let width = bounds.portrait_max_width;
        return Dimensions::new(width, width * h_to_w);
    }

    let landscape_max_height = bounds.container.height;
    if !is_portrait && natural.height > landscape_max_height {
        return Dimensions::new(landscape_max_height * w_to_h, landscape_max_height);
    }

    Dimensions::new(natural.width, natural.width * h_to_w)
}
