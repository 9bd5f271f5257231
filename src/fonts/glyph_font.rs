//! Single-line SVG fonts.
//!
//! An SVG font is a plain SVG document:
//!
//! ```text
//! <font horiz-adv-x="500">
//!   <font-face units-per-em="1000"/>
//!   <glyph unicode="A" horiz-adv-x="560" d="M 30 0 L 280 700 L 530 0 M 110 230 L 450 230"/>
//!   <glyph unicode=" " horiz-adv-x="300"/>
//! </font>
//! ```
//!
//! Loading can run on a background thread ([`GlyphFont::spawn_load`]); the
//! handle becomes ready exactly once and callers poll [`GlyphFont::is_ready`].
//! A failed load is permanent for that handle.

use crate::document::dom::collect_attributes;
use crate::error::{Error, Result};
use crate::path::{parse_path_data, OutlineCommand};
use crate::utils::parse_leading_number;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Em size used when `<font-face>` does not declare `units-per-em`.
pub const DEFAULT_UNITS_PER_EM: f64 = 1000.0;

/// Advance, in font units, for characters the font does not map.
pub const FALLBACK_ADVANCE: f64 = 300.0;

/// Characters touched by [`GlyphFont::warm_up`].
const WARM_UP_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";

/// One character's single-line outline and advance width.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Raw path data; `None` for whitespace glyphs
    pub outline: Option<String>,
    /// Outline tokenized once at load time
    pub commands: Vec<OutlineCommand>,
    /// Horizontal advance in font units
    pub advance_width: f64,
}

impl Glyph {
    /// True when the glyph draws something.
    pub fn has_outline(&self) -> bool {
        !self.commands.is_empty()
    }
}

/// Parsed contents of an SVG font.
#[derive(Debug, Clone, PartialEq)]
pub struct FontData {
    /// Glyph table keyed by character
    pub glyphs: HashMap<char, Glyph>,
    /// Em size of the outline coordinate space
    pub units_per_em: f64,
}

impl FontData {
    /// Parse an SVG font document.
    ///
    /// Individual malformed `<glyph>` entries (multi-character `unicode`,
    /// non-numeric `horiz-adv-x`, unparseable `d`) are dropped and logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Xml`] for malformed XML and [`Error::InvalidFont`]
    /// when the document holds no usable glyph at all.
    pub fn from_svg(svg: &str) -> Result<Self> {
        let mut reader = Reader::from_str(svg);
        reader.trim_text(true);

        let mut units_per_em = DEFAULT_UNITS_PER_EM;
        let mut default_advance: Option<f64> = None;
        let mut raw_glyphs: Vec<(char, Option<String>, Option<f64>)> = Vec::new();
        let mut dropped = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    let local = e.local_name();
                    match local.as_ref() {
                        b"font" => {
                            let attrs = collect_attributes(&e);
                            default_advance = attrs
                                .get("horiz-adv-x")
                                .and_then(|v| parse_leading_number(v));
                        },
                        b"font-face" => {
                            let attrs = collect_attributes(&e);
                            if let Some(upm) = attrs
                                .get("units-per-em")
                                .and_then(|v| parse_leading_number(v))
                                .filter(|v| *v > 0.0)
                            {
                                units_per_em = upm;
                            }
                        },
                        b"glyph" => {
                            let attrs = collect_attributes(&e);
                            let Some(unicode) = attrs.get("unicode") else {
                                continue;
                            };
                            let mut chars = unicode.chars();
                            let (Some(ch), None) = (chars.next(), chars.next()) else {
                                log::debug!("Skipping glyph with multi-character unicode {:?}", unicode);
                                dropped += 1;
                                continue;
                            };
                            let advance = match attrs.get("horiz-adv-x") {
                                Some(v) => match parse_leading_number(v) {
                                    Some(n) => Some(n),
                                    None => {
                                        log::debug!("Skipping glyph {:?}: bad horiz-adv-x {:?}", ch, v);
                                        dropped += 1;
                                        continue;
                                    },
                                },
                                None => None,
                            };
                            let outline = attrs.get("d").map(|d| d.trim().to_string());
                            raw_glyphs.push((ch, outline, advance));
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "font parse error at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                },
            }
        }

        let mut glyphs = HashMap::with_capacity(raw_glyphs.len());
        for (ch, outline, advance) in raw_glyphs {
            let outline = outline.filter(|d| !d.is_empty());
            let commands = match outline.as_deref() {
                Some(d) => match parse_path_data(d) {
                    Ok(commands) => commands,
                    Err(e) => {
                        log::debug!("Skipping glyph {:?}: {}", ch, e);
                        dropped += 1;
                        continue;
                    },
                },
                None => Vec::new(),
            };
            let advance_width = advance.or(default_advance).unwrap_or(0.0);
            glyphs.insert(
                ch,
                Glyph {
                    outline,
                    commands,
                    advance_width,
                },
            );
        }

        if glyphs.is_empty() {
            return Err(Error::InvalidFont(format!(
                "no usable <glyph> entries ({} dropped)",
                dropped
            )));
        }

        log::info!(
            "Parsed SVG font: {} glyphs, units-per-em {}, {} entries dropped",
            glyphs.len(),
            units_per_em,
            dropped
        );

        Ok(Self {
            glyphs,
            units_per_em,
        })
    }
}

/// Shared load state behind a [`GlyphFont`] handle.
#[derive(Debug, Default)]
struct LoadState {
    outcome: OnceLock<std::result::Result<FontData, String>>,
}

/// Handle to a single-line font that may still be loading.
///
/// Cloning is cheap; all clones observe the same load.
#[derive(Debug, Clone)]
pub struct GlyphFont {
    name: String,
    state: Arc<LoadState>,
}

impl GlyphFont {
    /// Create a handle whose load has not completed yet.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(LoadState::default()),
        }
    }

    /// Parse a font synchronously; the handle is ready on return.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::GlyphFont;
    ///
    /// let svg = r#"<svg><font><font-face units-per-em="1000"/>
    ///     <glyph unicode="I" horiz-adv-x="200" d="M 100 0 L 100 700"/>
    /// </font></svg>"#;
    /// let font = GlyphFont::parse("demo", svg).unwrap();
    /// assert!(font.is_ready());
    /// assert_eq!(font.advance_for('I'), 200.0);
    /// ```
    pub fn parse(name: impl Into<String>, svg: &str) -> Result<Self> {
        let data = FontData::from_svg(svg)?;
        let font = Self::pending(name);
        font.complete(Ok(data));
        Ok(font)
    }

    /// Start loading a font on a background thread.
    ///
    /// Returns immediately. Poll [`is_ready`](Self::is_ready); a failure is
    /// reported by [`load_error`](Self::load_error) and is never retried.
    pub fn spawn_load<R>(name: impl Into<String>, reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        let font = Self::pending(name);
        let worker = font.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("font-load-{}", font.name))
            .spawn(move || worker.load_from_reader(reader));
        if let Err(e) = spawned {
            font.complete(Err(Error::Io(e)));
        }
        font
    }

    /// Start loading a font file on a background thread.
    pub fn spawn_load_file(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match std::fs::File::open(&path) {
            Ok(file) => Self::spawn_load(name, file),
            Err(e) => {
                let font = Self::pending(name);
                font.complete(Err(Error::FontLoadFailed(format!("{}: {}", path.display(), e))));
                font
            },
        }
    }

    fn load_from_reader<R: Read>(&self, mut reader: R) {
        let mut source = String::new();
        let result = reader
            .read_to_string(&mut source)
            .map_err(Error::from)
            .and_then(|_| FontData::from_svg(&source));
        self.complete(result);
    }

    /// Record the outcome of the load. Only the first call has an effect.
    pub fn complete(&self, result: Result<FontData>) {
        let outcome = result.map_err(|e| e.to_string());
        if let Err(reason) = &outcome {
            log::error!("Font {} failed to load: {}", self.name, reason);
        }
        if self.state.outcome.set(outcome).is_err() {
            log::warn!("Font {} already finished loading; ignoring second result", self.name);
        }
    }

    /// Font name used for caching and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both handles observe the same load.
    pub fn shares_load_with(&self, other: &GlyphFont) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// True once the font has loaded successfully.
    pub fn is_ready(&self) -> bool {
        matches!(self.state.outcome.get(), Some(Ok(_)))
    }

    /// True once the load finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.state.outcome.get().is_some()
    }

    /// Why the load failed, if it did.
    pub fn load_error(&self) -> Option<&str> {
        match self.state.outcome.get() {
            Some(Err(reason)) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Parsed font contents, once ready.
    pub fn data(&self) -> Option<&FontData> {
        match self.state.outcome.get() {
            Some(Ok(data)) => Some(data),
            _ => None,
        }
    }

    /// Look up a glyph. Always `None` while the font is not ready.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.data().and_then(|d| d.glyphs.get(&ch))
    }

    /// Em size, or the default while the font is not ready.
    pub fn units_per_em(&self) -> f64 {
        self.data().map_or(DEFAULT_UNITS_PER_EM, |d| d.units_per_em)
    }

    /// Advance for `ch` in font units, using the fallback for unmapped characters.
    pub fn advance_for(&self, ch: char) -> f64 {
        self.glyph(ch).map_or(FALLBACK_ADVANCE, |g| g.advance_width)
    }

    /// Number of glyphs, 0 while not ready.
    pub fn glyph_count(&self) -> usize {
        self.data().map_or(0, |d| d.glyphs.len())
    }

    /// Touch the metrics of common characters. Does not change any state.
    ///
    /// Returns how many of them the font maps.
    pub fn warm_up(&self) -> usize {
        let mapped = WARM_UP_CHARS
            .chars()
            .filter(|ch| self.glyph(*ch).is_some())
            .count();
        log::debug!("Font {} metrics warmed up ({} common glyphs)", self.name, mapped);
        mapped
    }
}
