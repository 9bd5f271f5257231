//! Write converted runs into a copy of the source document.

use crate::config::RenderConfig;
use crate::document::{Element, NodeId, NodeKind, SvgDocument};
use crate::error::Result;
use crate::geometry::Rect;
use crate::path::format_number;
use crate::pipeline::RenderedRun;

/// Id of the group holding every converted path.
pub const CONVERTED_GROUP_ID: &str = "single-line-text-converted";

/// Id of the layer the converted group is appended to.
pub const LABELS_LAYER_ID: &str = "master-text-labels-layer";

/// Style given to original text when it is hidden.
pub const HIDDEN_TEXT_STYLE: &str = "display: none;";

/// Style given to original text when it is kept for comparison.
pub const KEPT_TEXT_STYLE: &str = "fill: #cccccc; opacity: 0.7;";

/// Debug box colours.
const TARGET_COLOR: &str = "red";
const GENERATED_COLOR: &str = "blue";
const FINAL_COLOR: &str = "green";

/// Writes the converted document.
#[derive(Debug, Clone)]
pub struct SvgWriter<'a> {
    config: &'a RenderConfig,
    font_name: &'a str,
}

impl<'a> SvgWriter<'a> {
    /// Create a writer for one render pass.
    pub fn new(config: &'a RenderConfig, font_name: &'a str) -> Self {
        Self { config, font_name }
    }

    /// Apply the conversion to `doc` in place.
    ///
    /// Returns the id of the converted group.
    pub fn apply(&self, doc: &mut SvgDocument, runs: &[RenderedRun]) -> NodeId {
        let style = if self.config.keep_original_text {
            KEPT_TEXT_STYLE
        } else {
            HIDDEN_TEXT_STYLE
        };
        for text in doc.elements_named("text") {
            doc.set_attribute(text, "style", style);
        }

        let root = doc.root();
        let layer = match doc.find_by_id(LABELS_LAYER_ID) {
            Some(layer) => layer,
            None => {
                log::debug!("Creating #{}", LABELS_LAYER_ID);
                doc.append_element(root, Element::new("g").with_attribute("id", LABELS_LAYER_ID))
            },
        };

        let group = doc.append_element(
            layer,
            Element::new("g")
                .with_attribute("id", CONVERTED_GROUP_ID)
                .with_attribute("stroke", self.config.stroke_color.as_str())
                .with_attribute("stroke-width", format_number(self.config.stroke_width))
                .with_attribute("fill", "none"),
        );

        let adjustments = self.config.adjustments_summary();
        for rendered in runs {
            if self.config.show_debug_boxes {
                let slug = debug_slug(&rendered.run.content);
                append_debug_rect(doc, group, &rendered.target_box, TARGET_COLOR, &format!("target-{}", slug));
                append_debug_rect(
                    doc,
                    group,
                    &rendered.generated_box,
                    GENERATED_COLOR,
                    &format!("generated-{}", slug),
                );
                append_debug_rect(
                    doc,
                    group,
                    &rendered.composed.final_box,
                    FINAL_COLOR,
                    &format!("final-{}", slug),
                );
            }

            let run_group = doc.append_element(
                group,
                Element::new("g")
                    .with_attribute("class", format!("converted-text-{}", rendered.index))
                    .with_attribute("transform", rendered.composed.chain.to_svg()),
            );
            doc.append_element(
                run_group,
                Element::new("path")
                    .with_attribute("d", rendered.path_data.as_str())
                    .with_attribute("data-original-text", rendered.run.content.as_str())
                    .with_attribute("data-adjustments", adjustments.as_str()),
            );
        }

        doc.prepend_child(root, NodeKind::Comment(self.header_comment()));
        log::info!("Wrote {} converted runs into #{}", runs.len(), CONVERTED_GROUP_ID);
        group
    }

    /// Apply the conversion to a copy of `doc` and serialize it.
    pub fn write(&self, doc: &SvgDocument, runs: &[RenderedRun]) -> Result<String> {
        let mut output = doc.clone();
        self.apply(&mut output, runs);
        output.to_xml()
    }

    fn header_comment(&self) -> String {
        let originals = if self.config.keep_original_text {
            "Original text elements kept visible (light gray)"
        } else {
            "Original text elements hidden"
        };
        format!(
            "\n  Converted to single-line fonts using {}\n  {}, converted paths in group #{}\n",
            comment_safe(self.font_name),
            originals,
            CONVERTED_GROUP_ID
        )
    }
}

/// XML comments may not contain `--`.
fn comment_safe(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains("--") {
        out = out.replace("--", "-_");
    }
    out
}

/// Whitespace runs become underscores.
fn debug_slug(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join("_")
}

fn append_debug_rect(doc: &mut SvgDocument, parent: NodeId, bbox: &Rect, color: &str, id: &str) {
    doc.append_element(
        parent,
        Element::new("rect")
            .with_attribute("x", format_number(bbox.x))
            .with_attribute("y", format_number(bbox.y))
            .with_attribute("width", format_number(bbox.width))
            .with_attribute("height", format_number(bbox.height))
            .with_attribute("fill", "none")
            .with_attribute("stroke", color)
            .with_attribute("stroke-width", "1")
            .with_attribute("stroke-dasharray", "3,3")
            .with_attribute("id", format!("debug-{}", id))
            .with_attribute("opacity", "0.7"),
    );
}
