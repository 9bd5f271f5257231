//! Placement of generated glyph geometry onto the original text footprint.
//!
//! - [`bbox`]: target and generated bounding boxes
//! - [`alignment`]: scale + translation between the two boxes
//! - [`compose`]: user adjustments layered on top of the alignment

pub mod alignment;
pub mod bbox;
pub mod compose;

pub use alignment::{AlignmentTransform, MAX_SCALE, MIN_SCALE};
pub use bbox::{estimate_text_width, generated_box, generated_box_from_path_data, target_box};
pub use compose::{
    compose, final_box, line_spacing_offset, ComposedTransform, TransformChain, TransformStep,
};

use std::fmt;

/// Horizontal alignment of a text run relative to its declared origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum TextAnchor {
    /// Origin is the left edge
    #[default]
    Start,
    /// Origin is the horizontal centre
    Middle,
    /// Origin is the right edge
    End,
}

impl TextAnchor {
    /// Parse a `text-anchor` value. Unknown keywords yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use single_line_text::layout::TextAnchor;
    ///
    /// assert_eq!(TextAnchor::parse(" middle "), Some(TextAnchor::Middle));
    /// assert_eq!(TextAnchor::parse("inherit"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "start" => Some(TextAnchor::Start),
            "middle" => Some(TextAnchor::Middle),
            "end" => Some(TextAnchor::End),
            _ => None,
        }
    }

    /// Keyword as written in SVG.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }

    /// Horizontal shift from the declared origin to the left edge of a run `width` wide.
    pub fn offset_for_width(&self, width: f64) -> f64 {
        match self {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -width / 2.0,
            TextAnchor::End => -width,
        }
    }
}

impl fmt::Display for TextAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_parse_and_display() {
        assert_eq!(TextAnchor::parse("start"), Some(TextAnchor::Start));
        assert_eq!(TextAnchor::parse("end"), Some(TextAnchor::End));
        assert_eq!(TextAnchor::parse("END"), None);
        assert_eq!(TextAnchor::default(), TextAnchor::Start);
        assert_eq!(TextAnchor::Middle.to_string(), "middle");
    }

    #[test]
    fn test_anchor_offsets() {
        assert_eq!(TextAnchor::Start.offset_for_width(40.0), 0.0);
        assert_eq!(TextAnchor::Middle.offset_for_width(40.0), -20.0);
        assert_eq!(TextAnchor::End.offset_for_width(40.0), -40.0);
    }
}
