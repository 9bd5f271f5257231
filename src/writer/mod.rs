//! Output document generation.
//!
//! ```text
//! SvgDocument (source) + RenderedRun[]
//!     ↓
//! [SvgWriter] hide originals, add converted group, debug boxes, header
//!     ↓
//! SVG string
//! ```

mod svg_writer;

pub use svg_writer::{
    SvgWriter, CONVERTED_GROUP_ID, HIDDEN_TEXT_STYLE, KEPT_TEXT_STYLE, LABELS_LAYER_ID,
};
