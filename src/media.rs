use std::sync::Arc;

use egui::ColorImage;
use log::debug;
use uuid::Uuid;

use crate::error::{MediaError, MediaResult};
use crate::geometry::Dimensions;

/// A decoded image ready to be drawn.
///
/// Shared as a [`MediaHandle`]; never copied once loaded.
pub struct Media {
    id: Uuid,
    name: String,
    mime: String,
    pixels: ColorImage,
}

/// Reference-counted handle to the loaded media
pub type MediaHandle = Arc<Media>;

// ColorImage's Debug would dump every pixel
impl std::fmt::Debug for Media {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Media")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.pixels.size)
            .finish()
    }
}

impl Media {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, pixels: ColorImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            mime: mime.into(),
            pixels,
        }
    }

    pub fn new_ref(name: impl Into<String>, mime: impl Into<String>, pixels: ColorImage) -> MediaHandle {
        Arc::new(Self::new(name, mime, pixels))
    }

    /// Decodes an encoded image (png, jpeg, gif, ...) into a handle
    pub fn decode(name: &str, mime: &str, bytes: &[u8]) -> MediaResult<MediaHandle> {
        if mime.starts_with("video/") {
            return Err(MediaError::VideoUnsupported(name.to_owned()));
        }

        let decoded = image::load_from_memory(bytes)?;
        debug!("Decoded {}: {}x{}", name, decoded.width(), decoded.height());

        let size = [decoded.width() as usize, decoded.height() as usize];
        let rgba = decoded.to_rgba8();
        let pixels = ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice());

        Ok(Self::new_ref(name, mime, pixels))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn pixels(&self) -> &ColorImage {
        &self.pixels
    }

    /// Width and height in source pixels
    pub fn natural_size(&self) -> Dimensions {
        Dimensions::new(self.pixels.size[0] as f32, self.pixels.size[1] as f32)
    }
}

/// Whether `mime` starts with one of the accepted prefixes
pub fn is_accepted(mime: &str, accepted_prefixes: &[String]) -> bool {
    !mime.is_empty() && accepted_prefixes.iter().any(|prefix| mime.starts_with(prefix.as_str()))
}

/// Guesses a MIME type from a file name's extension
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> Vec<String> {
        vec!["image/".to_owned(), "video/".to_owned()]
    }

    #[test]
    fn test_mime_filter() {
        assert!(is_accepted("image/png", &accepted()));
        assert!(is_accepted("video/webm", &accepted()));
        assert!(!is_accepted("text/plain", &accepted()));
        assert!(!is_accepted("", &accepted()));
    }

    #[test]
    fn test_mime_from_name() {
        assert_eq!(mime_from_name("cat.PNG"), Some("image/png"));
        assert_eq!(mime_from_name("clip.webm"), Some("video/webm"));
        assert_eq!(mime_from_name("notes.txt"), None);
        assert_eq!(mime_from_name("no_extension"), None);
    }

    #[test]
    fn test_natural_size() {
        let media = Media::new("blank", "image/png", ColorImage::new([40, 30], egui::Color32::WHITE));
        assert_eq!(media.natural_size(), Dimensions::new(40.0, 30.0));
    }

    #[test]
    fn test_decode_png() {
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let media = Media::decode("red.png", "image/png", &bytes).unwrap();
        assert_eq!(media.natural_size(), Dimensions::new(3.0, 2.0));
        assert_eq!(media.pixels().pixels[0], egui::Color32::RED);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = Media::decode("bad.png", "image/png", b"not an image").unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn test_video_is_reported() {
        let err = Media::decode("clip.mp4", "video/mp4", &[]).unwrap_err();
        assert!(matches!(err, MediaError::VideoUnsupported(_)));
    }
}
