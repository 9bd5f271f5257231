//! Flatten a document's text into positioned text runs.
//!
//! Each `<text>` without `<tspan>` children is one run. A `<text>` with
//! tspans yields one run per tspan, all sharing the `<text>` as their
//! parent grouping.
//!
//! Resolution rules:
//! - position: raw `x`/`y` (tspan, then its `<text>`, then 100) mapped
//!   through the axis-aligned cumulative ancestor transform
//! - font size: class rule > inline style > `font-size` attribute, then the
//!   parent `<text>` for tspans, then 14
//! - anchor: same precedence, defaulting to `start`
//! - font size is kept unscaled; ancestor scale is stored separately

use super::dom::{NodeId, SvgDocument};
use super::style::{inline_property, StyleSheet};
use super::transform_list::{cumulative_transform, AncestorChain};
use crate::diagnostics::Diagnostics;
use crate::layout::TextAnchor;
use crate::utils::parse_leading_number;

/// Font size used when nothing declares one.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

/// Coordinate used when neither the run nor its `<text>` declares one.
pub const DEFAULT_COORDINATE: f64 = 100.0;

/// One positioned run of text from the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Trimmed, non-empty text
    pub content: String,
    /// Absolute x of the declared origin
    pub x: f64,
    /// Absolute y of the baseline
    pub y: f64,
    /// Declared font size, not multiplied by ancestor scale
    pub font_size: f64,
    /// Cumulative ancestor x scale
    pub transform_scale_x: f64,
    /// Cumulative ancestor y scale
    pub transform_scale_y: f64,
    /// Resolved anchor
    pub text_anchor: TextAnchor,
    /// Class attribute of the run (or its `<text>`)
    pub class_name: String,
    /// Element the run came from
    pub node: Option<NodeId>,
    /// Enclosing `<text>` for tspan runs
    pub parent_group: Option<NodeId>,
}

impl Default for TextRun {
    fn default() -> Self {
        Self {
            content: String::new(),
            x: 0.0,
            y: 0.0,
            font_size: DEFAULT_FONT_SIZE,
            transform_scale_x: 1.0,
            transform_scale_y: 1.0,
            text_anchor: TextAnchor::Start,
            class_name: String::new(),
            node: None,
            parent_group: None,
        }
    }
}

/// Runs found in a document plus the diagnostics raised while resolving them.
#[derive(Debug, Clone, Default)]
pub struct TextExtraction {
    /// Runs in document order
    pub runs: Vec<TextRun>,
    /// Rotation warnings and similar
    pub diagnostics: Diagnostics,
}

impl TextExtraction {
    /// Baseline of the first run sharing `runs[index]`'s parent grouping.
    ///
    /// `None` for standalone runs.
    pub fn group_baseline_y(&self, index: usize) -> Option<f64> {
        let group = self.runs.get(index)?.parent_group?;
        self.runs
            .iter()
            .find(|r| r.parent_group == Some(group))
            .map(|r| r.y)
    }
}

/// Borrowed view of a document node as an ancestor chain.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a SvgDocument,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// View `id` in `doc`.
    pub fn new(doc: &'a SvgDocument, id: NodeId) -> Self {
        Self { doc, id }
    }
}

impl AncestorChain for NodeRef<'_> {
    fn transform_declaration(&self) -> Option<&str> {
        self.doc.attribute(self.id, "transform")
    }

    fn parent_node(&self) -> Option<Self> {
        let parent = self.doc.parent(self.id)?;
        self.doc.element(parent).map(|_| NodeRef::new(self.doc, parent))
    }

    fn label(&self) -> String {
        self.doc
            .attribute(self.id, "id")
            .or_else(|| self.doc.local_name(self.id))
            .unwrap_or("?")
            .to_string()
    }
}

/// Walks a parsed document and resolves every text run.
pub struct DocumentTextExtractor<'a> {
    doc: &'a SvgDocument,
    styles: StyleSheet,
}

impl<'a> DocumentTextExtractor<'a> {
    /// Prepare extraction over `doc`, reading its style sheets.
    pub fn new(doc: &'a SvgDocument) -> Self {
        Self {
            doc,
            styles: StyleSheet::from_document(doc),
        }
    }

    /// Extract every non-empty run.
    pub fn extract(&self) -> TextExtraction {
        let mut extraction = TextExtraction::default();

        for text in self.doc.elements_named("text") {
            let tspans: Vec<NodeId> = self
                .doc
                .descendants(text)
                .into_iter()
                .skip(1)
                .filter(|id| self.doc.local_name(*id) == Some("tspan"))
                .collect();

            if tspans.is_empty() {
                let content = self.doc.text_content(text);
                if let Some(run) = self.resolve(text, None, &content, &mut extraction.diagnostics) {
                    extraction.runs.push(run);
                }
            } else {
                for tspan in tspans {
                    let content = self.doc.own_text(tspan);
                    if let Some(run) =
                        self.resolve(tspan, Some(text), &content, &mut extraction.diagnostics)
                    {
                        extraction.runs.push(run);
                    }
                }
            }
        }

        log::info!("Found {} text runs", extraction.runs.len());
        extraction
    }

    fn resolve(
        &self,
        node: NodeId,
        parent_text: Option<NodeId>,
        content: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<TextRun> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let matrix = cumulative_transform(&NodeRef::new(self.doc, node), diagnostics);

        let raw_x = self.coordinate(node, parent_text, "x");
        let raw_y = self.coordinate(node, parent_text, "y");
        let position = matrix.transform_point(raw_x, raw_y);

        let font_size = self
            .font_size(node)
            .or_else(|| parent_text.and_then(|t| self.font_size(t)))
            .unwrap_or(DEFAULT_FONT_SIZE);
        let text_anchor = self
            .anchor(node)
            .or_else(|| parent_text.and_then(|t| self.anchor(t)))
            .unwrap_or_default();
        let class_name = self
            .doc
            .attribute(node, "class")
            .or_else(|| parent_text.and_then(|t| self.doc.attribute(t, "class")))
            .unwrap_or_default()
            .to_string();

        let run = TextRun {
            content: content.to_string(),
            x: position.x,
            y: position.y,
            font_size,
            transform_scale_x: matrix.scale_x(),
            transform_scale_y: matrix.scale_y(),
            text_anchor,
            class_name,
            node: Some(node),
            parent_group: parent_text,
        };
        log::debug!(
            "Text run {:?} at ({}, {}) font size {} scale {}x{} anchor {}",
            run.content,
            run.x,
            run.y,
            run.font_size,
            run.transform_scale_x,
            run.transform_scale_y,
            run.text_anchor
        );
        Some(run)
    }

    fn coordinate(&self, node: NodeId, parent_text: Option<NodeId>, name: &str) -> f64 {
        self.doc
            .attribute(node, name)
            .and_then(parse_leading_number)
            .or_else(|| {
                parent_text
                    .and_then(|t| self.doc.attribute(t, name))
                    .and_then(parse_leading_number)
            })
            .unwrap_or(DEFAULT_COORDINATE)
    }

    /// Style property with class > inline > attribute precedence.
    fn property(&self, node: NodeId, property: &str) -> Option<String> {
        let element = self.doc.element(node)?;
        if let Some(value) = self
            .styles
            .lookup(element.local_name(), element.attribute("class"), property)
        {
            return Some(value.to_string());
        }
        if let Some(value) = element
            .attribute("style")
            .and_then(|style| inline_property(style, property))
        {
            return Some(value);
        }
        element.attribute(property).map(str::to_string)
    }

    fn font_size(&self, node: NodeId) -> Option<f64> {
        self.property(node, "font-size")
            .and_then(|v| parse_leading_number(&v))
            .filter(|size| *size > 0.0)
    }

    fn anchor(&self, node: NodeId) -> Option<TextAnchor> {
        self.property(node, "text-anchor")
            .and_then(|v| TextAnchor::parse(&v))
    }
}
