//! Source SVG documents.
//!
//! - [`dom`]: owned node arena parsed with quick-xml
//! - [`style`]: class rules and inline styles
//! - [`transform_list`]: `transform` attribute grammar and ancestor composition
//! - [`extractor`]: flatten text into positioned [`TextRun`]s

pub mod dom;
pub mod extractor;
pub mod style;
pub mod transform_list;

pub use dom::{Element, NodeId, NodeKind, SvgDocument};
pub use extractor::{DocumentTextExtractor, NodeRef, TextExtraction, TextRun};
pub use style::StyleSheet;
pub use transform_list::{cumulative_transform, parse_transform_list, AncestorChain, TransformFunction};
