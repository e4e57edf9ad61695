use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions, Vec2};
use thiserror::Error;

use crate::element::{ElementId, MediaSource};

/// Errors that can occur during texture generation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureGenerationError {
    #[error("Failed to decode texture: {0}")]
    Decode(String),
    #[error("Invalid texture dimensions")]
    InvalidDimensions,
}

/// What a cached texture belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureOwner {
    Element(ElementId),
    Background,
}

type CacheKey = (TextureOwner, u64);

/// Content version of a media source: changes whenever the pixels would
pub fn source_version(source: &MediaSource) -> u64 {
    let mut hasher = DefaultHasher::new();
    match source {
        MediaSource::Inline { mime, data } => {
            mime.hash(&mut hasher);
            Arc::as_ptr(data).hash(&mut hasher);
            data.len().hash(&mut hasher);
        }
        MediaSource::Url { url } => url.hash(&mut hasher),
    }
    hasher.finish()
}

/// Manages textures for media elements and the page background, providing
/// caching and invalidation
pub struct TextureManager {
    /// Cache of textures by (owner, version)
    texture_cache: HashMap<CacheKey, (TextureHandle, Vec2)>,
    /// Tracks when each texture was last used
    last_used: HashMap<CacheKey, u64>,
    /// Sources that failed to decode; not retried until their version changes
    failed: HashSet<CacheKey>,
    current_frame: u64,
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("failed", &self.failed.len())
            .field("frame", &self.current_frame)
            .finish()
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            failed: HashSet::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or creates a texture. Returns its id and pixel size.
    pub fn get_or_create_texture<F>(
        &mut self,
        owner: TextureOwner,
        version: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<(TextureId, Vec2), TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (owner, version);

        if let Some((handle, size)) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok((handle.id(), *size));
        }
        if self.failed.contains(&cache_key) {
            return Err(TextureGenerationError::Decode("previous attempt failed".to_owned()));
        }

        self.prune_cache_if_needed();

        let image = match generator() {
            Ok(image) => image,
            Err(err) => {
                self.failed.insert(cache_key);
                return Err(err);
            }
        };
        if image.size[0] == 0 || image.size[1] == 0 {
            self.failed.insert(cache_key);
            return Err(TextureGenerationError::InvalidDimensions);
        }
        let size = Vec2::new(image.size[0] as f32, image.size[1] as f32);

        let name = match owner {
            TextureOwner::Element(id) => format!("{id}_v{version}"),
            TextureOwner::Background => format!("background_v{version}"),
        };
        let handle = ctx.load_texture(name, image, TextureOptions::LINEAR);

        let id = handle.id();
        self.texture_cache.insert(cache_key, (handle, size));
        self.last_used.insert(cache_key, self.current_frame);
        Ok((id, size))
    }

    /// Invalidates all textures of one owner
    pub fn invalidate(&mut self, owner: TextureOwner) {
        self.texture_cache.retain(|(o, _), _| *o != owner);
        self.last_used.retain(|(o, _), _| *o != owner);
        self.failed.retain(|(o, _)| *o != owner);
    }

    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<(CacheKey, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() + 1 - self.max_cache_size.max(1);
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
        self.failed.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn contains(&self, owner: TextureOwner, version: u64) -> bool {
        self.texture_cache.contains_key(&(owner, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_texture_generator() -> Result<ColorImage, TextureGenerationError> {
        Ok(ColorImage::new([10, 10], egui::Color32::WHITE))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let owner = TextureOwner::Element(ElementId::new());

        let (first, size) = manager.get_or_create_texture(owner, 1, mock_texture_generator, &ctx).unwrap();
        let (second, _) = manager
            .get_or_create_texture(owner, 1, || panic!("should hit the cache"), &ctx)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(size, Vec2::new(10.0, 10.0));
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_invalidation() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let owner = TextureOwner::Element(ElementId::new());
        manager.get_or_create_texture(owner, 1, mock_texture_generator, &ctx).unwrap();
        manager.get_or_create_texture(TextureOwner::Background, 1, mock_texture_generator, &ctx).unwrap();

        manager.invalidate(owner);

        assert_eq!(manager.cache_size(), 1);
        assert!(manager.contains(TextureOwner::Background, 1));
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let (a, b, c) = (
            TextureOwner::Element(ElementId::new()),
            TextureOwner::Element(ElementId::new()),
            TextureOwner::Element(ElementId::new()),
        );

        manager.get_or_create_texture(a, 1, mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(b, 1, mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(c, 1, mock_texture_generator, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(!manager.contains(a, 1));
        assert!(manager.contains(b, 1));
        assert!(manager.contains(c, 1));
    }

    #[test]
    fn failed_sources_are_not_retried() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(4);
        let owner = TextureOwner::Background;
        let broken = || Err(TextureGenerationError::Decode("bad bytes".to_owned()));

        assert!(manager.get_or_create_texture(owner, 7, broken, &ctx).is_err());
        assert!(
            manager
                .get_or_create_texture(owner, 7, || panic!("should not decode again"), &ctx)
                .is_err()
        );
        assert!(manager.get_or_create_texture(owner, 8, mock_texture_generator, &ctx).is_ok());
    }

    #[test]
    fn versions_follow_sources() {
        let a = MediaSource::url("https://example.test/a.png");
        let b = MediaSource::url("https://example.test/b.png");
        assert_eq!(source_version(&a), source_version(&a.clone()));
        assert_ne!(source_version(&a), source_version(&b));
    }
}
