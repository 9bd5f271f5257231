//! Session-lifetime cache of fonts by name.

use super::GlyphFont;
use std::collections::HashMap;
use std::path::Path;

/// Fonts loaded during a session, keyed by name.
///
/// A cached handle is returned as-is even if its load later fails; build a
/// fresh handle with [`FontCache::insert`] to retry.
#[derive(Debug, Default)]
pub struct FontCache {
    fonts: HashMap<String, GlyphFont>,
}

impl FontCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached font, if any.
    pub fn get(&self, name: &str) -> Option<GlyphFont> {
        self.fonts.get(name).cloned()
    }

    /// Cached font, or start loading `path` in the background and cache the handle.
    pub fn get_or_load(&mut self, name: &str, path: impl AsRef<Path>) -> GlyphFont {
        if let Some(font) = self.fonts.get(name) {
            log::debug!("Font cache hit: {}", name);
            return font.clone();
        }
        log::info!("Loading font {} from {}", name, path.as_ref().display());
        let font = GlyphFont::spawn_load_file(name, path);
        self.fonts.insert(name.to_string(), font.clone());
        font
    }

    /// Cache a handle under its own name, replacing any previous one.
    pub fn insert(&mut self, font: GlyphFont) -> Option<GlyphFont> {
        self.fonts.insert(font.name().to_string(), font)
    }

    /// Number of cached fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
