//! Caller-side font selection.
//!
//! The render core only ever sees a [`GlyphFont`] handle. A [`FontSession`]
//! is what an interactive caller holds: it caches fonts by name, remembers
//! which one is active, and lets a caller block until the active font has
//! loaded. Selecting a new font while an older wait is in flight makes the
//! older wait give up rather than hand back a stale font.

use crate::error::{Error, Result};
use crate::fonts::{FontCache, GlyphFont};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default delay between readiness checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default time to wait for a font before giving up.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Font cache plus the currently selected font.
#[derive(Debug)]
pub struct FontSession {
    cache: FontCache,
    active: Option<FontSelection>,
    generation: Arc<AtomicU64>,
    poll_interval: Duration,
    timeout: Duration,
}

impl Default for FontSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSession {
    /// Create a session with the default polling interval and timeout.
    pub fn new() -> Self {
        Self {
            cache: FontCache::new(),
            active: None,
            generation: Arc::new(AtomicU64::new(0)),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    /// Override the polling interval and timeout.
    pub fn with_timing(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.timeout = timeout;
        self
    }

    /// Select the font `name`, loading it from `path` unless it is cached.
    pub fn select_font(&mut self, name: &str, path: impl AsRef<Path>) -> FontSelection {
        let font = self.cache.get_or_load(name, path);
        self.activate(font)
    }

    /// Select an already constructed font handle and cache it.
    pub fn select_loaded(&mut self, font: GlyphFont) -> FontSelection {
        let font = match self.cache.get(font.name()) {
            Some(cached) if cached.shares_load_with(&font) => cached,
            _ => {
                self.cache.insert(font.clone());
                font
            },
        };
        self.activate(font)
    }

    fn activate(&mut self, font: GlyphFont) -> FontSelection {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        log::debug!("Selected font {} (generation {})", font.name(), generation);
        let selection = FontSelection {
            font,
            generation,
            current: Arc::clone(&self.generation),
            poll_interval: self.poll_interval,
            timeout: self.timeout,
        };
        self.active = Some(selection.clone());
        selection
    }

    /// The most recent selection.
    pub fn active(&self) -> Option<&FontSelection> {
        self.active.as_ref()
    }

    /// Wait for the most recent selection to load.
    pub fn wait_until_ready(&self) -> Result<GlyphFont> {
        match &self.active {
            Some(selection) => selection.wait_until_ready(),
            None => Err(Error::FontNotReady("no font selected".to_string())),
        }
    }

    /// The session's font cache.
    pub fn cache(&self) -> &FontCache {
        &self.cache
    }
}

/// One font selection, tagged with the session generation it was made in.
#[derive(Debug, Clone)]
pub struct FontSelection {
    font: GlyphFont,
    generation: u64,
    current: Arc<AtomicU64>,
    poll_interval: Duration,
    timeout: Duration,
}

impl FontSelection {
    /// The selected handle, ready or not.
    pub fn font(&self) -> &GlyphFont {
        &self.font
    }

    /// Generation this selection was made in.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while no newer font has been selected.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    /// Block until the font is ready.
    ///
    /// # Errors
    ///
    /// - [`Error::FontLoadFailed`] if the load failed or a newer font was
    ///   selected in the meantime
    /// - [`Error::FontLoadTimeout`] if the font is still loading after the
    ///   session timeout
    pub fn wait_until_ready(&self) -> Result<GlyphFont> {
        let started = Instant::now();
        loop {
            if !self.is_current() {
                log::debug!("Font {} superseded while waiting", self.font.name());
                return Err(Error::FontLoadFailed(format!("{}: superseded", self.font.name())));
            }
            if self.font.is_ready() {
                self.font.warm_up();
                return Ok(self.font.clone());
            }
            if let Some(reason) = self.font.load_error() {
                return Err(Error::FontLoadFailed(format!("{}: {}", self.font.name(), reason)));
            }
            if started.elapsed() >= self.timeout {
                log::warn!(
                    "Font {} not ready after {} ms",
                    self.font.name(),
                    self.timeout.as_millis()
                );
                return Err(Error::FontLoadTimeout {
                    name: self.font.name().to_string(),
                    millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}
