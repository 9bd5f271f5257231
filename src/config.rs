//! Configuration for a render pass.
//!
//! The surrounding application owns these values (sliders, checkboxes) and
//! passes a fresh [`RenderConfig`] into every render call. The core never
//! caches or mutates it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// User-level adjustments applied to every converted text run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Manual horizontal offset in document units.
    pub x_offset: f64,

    /// Manual vertical offset in document units.
    pub y_offset: f64,

    /// Uniform scale applied about each run's center (1.0 = unchanged).
    pub font_scale: f64,

    /// Multiplier on every glyph advance (1.0 = font metrics).
    pub letter_spacing: f64,

    /// Multiplier on the distance between lines of a multi-line text.
    pub line_spacing: f64,

    /// Stroke width of generated paths.
    pub stroke_width: f64,

    /// Stroke color of generated paths.
    pub stroke_color: String,

    /// Keep the original text visible (dimmed) next to the converted paths.
    pub keep_original_text: bool,

    /// Emit target/generated/final boxes as dashed rectangles.
    pub show_debug_boxes: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            x_offset: 0.0,
            y_offset: 0.0,
            font_scale: 1.0,
            letter_spacing: 1.0,
            line_spacing: 1.0,
            stroke_width: 0.5,
            stroke_color: "#000000".to_string(),
            keep_original_text: false,
            show_debug_boxes: false,
        }
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the manual offsets.
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.x_offset = x;
        self.y_offset = y;
        self
    }

    /// Set the uniform font-scale multiplier.
    pub fn with_font_scale(mut self, scale: f64) -> Self {
        self.font_scale = scale;
        self
    }

    /// Set the letter-spacing multiplier.
    pub fn with_letter_spacing(mut self, spacing: f64) -> Self {
        self.letter_spacing = spacing;
        self
    }

    /// Set the line-spacing multiplier.
    pub fn with_line_spacing(mut self, spacing: f64) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set the stroke width and color.
    pub fn with_stroke(mut self, width: f64, color: impl Into<String>) -> Self {
        self.stroke_width = width;
        self.stroke_color = color.into();
        self
    }

    /// Keep the original text visible in the output.
    pub fn with_keep_original_text(mut self, keep: bool) -> Self {
        self.keep_original_text = keep;
        self
    }

    /// Emit debug rectangles.
    pub fn with_debug_boxes(mut self, show: bool) -> Self {
        self.show_debug_boxes = show;
        self
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("xOffset", self.x_offset),
            ("yOffset", self.y_offset),
            ("fontScale", self.font_scale),
            ("letterSpacing", self.letter_spacing),
            ("lineSpacing", self.line_spacing),
            ("strokeWidth", self.stroke_width),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be finite, got {}", name, value)));
            }
        }

        let positive = [
            ("fontScale", self.font_scale),
            ("letterSpacing", self.letter_spacing),
            ("lineSpacing", self.line_spacing),
            ("strokeWidth", self.stroke_width),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(Error::Config(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.stroke_color.trim().is_empty() {
            return Err(Error::Config("strokeColor must not be empty".to_string()));
        }
        Ok(())
    }

    /// Metadata string recorded on each generated path.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::config::RenderConfig;
    ///
    /// let summary = RenderConfig::new().with_offset(2.0, -1.5).adjustments_summary();
    /// assert!(summary.starts_with("x:2,y:-1.5,scale:1,"));
    /// ```
    pub fn adjustments_summary(&self) -> String {
        format!(
            "x:{},y:{},scale:{},letterSpacing:{},lineSpacing:{},strokeWidth:{},strokeColor:{},keepOriginalText:{}",
            self.x_offset,
            self.y_offset,
            self.font_scale,
            self.letter_spacing,
            self.line_spacing,
            self.stroke_width,
            self.stroke_color,
            self.keep_original_text
        )
    }
}
