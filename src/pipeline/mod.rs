//! Render pass orchestration.
//!
//! ```text
//! source SVG
//!     ↓
//! [DocumentTextExtractor]              Idle → Extracting
//!     ↓
//! TextRun[]
//!     ↓ per run
//! [TextRasterizer] → generated box
//! [target_box]     → target box
//! [AlignmentTransform::solve]          Aligning
//! [compose]                            Composed
//!     ↓
//! RenderedRun[]
//!     ↓
//! [SvgWriter]                          Serialized
//!     ↓
//! converted SVG + Diagnostics
//! ```
//!
//! A pass is single-use; reloading a document means starting a new pass.

mod converter;
mod render_pass;

pub use converter::{ConversionOutput, Converter};
pub use render_pass::{RenderPass, RenderStage, RenderedRun};
