use std::collections::HashMap;

use egui::{Context, TextureHandle, TextureId, TextureOptions};
use log::debug;
use uuid::Uuid;

use crate::media::Media;

/// Uploads each media's pixels once and keeps the textures around.
///
/// The composite draws the same media many times per frame, so every
/// bitmap of one media shares a single texture.
pub struct TextureManager {
    texture_cache: HashMap<Uuid, TextureHandle>,
    /// Frame in which each texture was last used
    last_used: HashMap<Uuid, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture for `media`, uploading it on first use
    pub fn texture_for(&mut self, media: &Media, ctx: &Context) -> Option<TextureId> {
        let key = media.id();

        if let Some(handle) = self.texture_cache.get(&key) {
            self.last_used.insert(key, self.current_frame);
            return Some(handle.id());
        }

        let [width, height] = media.pixels().size;
        if width == 0 || height == 0 {
            return None;
        }

        self.last_used.insert(key, self.current_frame);
        debug!("Uploading texture for {} ({}x{})", media.name(), width, height);
        let handle = ctx.load_texture(
            format!("media_{}", key),
            media.pixels().clone(),
            TextureOptions::LINEAR,
        );
        let id = handle.id();
        self.texture_cache.insert(key, handle);
        self.prune_cache_if_needed();

        Some(id)
    }

    /// Drops the texture of one media
    pub fn invalidate(&mut self, media_id: Uuid) {
        self.texture_cache.remove(&media_id);
        self.last_used.remove(&media_id);
    }

    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(Uuid, u64)> = self
            .texture_cache
            .keys()
            .map(|key| (*key, self.last_used.get(key).copied().unwrap_or(0)))
            .collect();

        // oldest first
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - self.max_cache_size;
        for (key, _) in entries.iter().take(to_remove) {
            self.invalidate(*key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    pub fn contains(&self, media_id: Uuid) -> bool {
        self.texture_cache.contains_key(&media_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, ColorImage};

    fn media() -> Media {
        Media::new("white", "image/png", ColorImage::new([10, 10], Color32::WHITE))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let media = media();

        let first = manager.texture_for(&media, &ctx).unwrap();
        let second = manager.texture_for(&media, &ctx).unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_invalidation() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let media = media();

        manager.texture_for(&media, &ctx).unwrap();
        manager.invalidate(media.id());

        assert_eq!(manager.cache_size(), 0);
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let (a, b, c) = (media(), media(), media());

        manager.texture_for(&a, &ctx).unwrap();
        manager.begin_frame();
        manager.texture_for(&b, &ctx).unwrap();
        manager.begin_frame();
        manager.texture_for(&c, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(!manager.contains(a.id()));
        assert!(manager.contains(b.id()));
        assert!(manager.contains(c.id()));
    }

    #[test]
    fn test_empty_media_has_no_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let empty = Media::new("empty", "image/png", ColorImage::new([0, 0], Color32::WHITE));

        assert!(manager.texture_for(&empty, &ctx).is_none());
    }
}
