//! Whole-document conversion tests.

use single_line_text::document::SvgDocument;
use single_line_text::geometry::Rect;
use single_line_text::layout::generated_box_from_path_data;
use single_line_text::{Converter, Diagnostic, GlyphFont, RenderConfig, RenderPass, RenderStage};

const TRIANGLE_FONT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><defs>
  <font id="Triangles" horiz-adv-x="500">
    <font-face font-family="Triangles" units-per-em="1000"/>
    <glyph unicode="A" horiz-adv-x="500" d="M 0 0 L 250 1000 L 500 0"/>
    <glyph unicode="B" horiz-adv-x="500" d="M 0 0 L 500 0 L 250 1000"/>
    <glyph unicode=" " horiz-adv-x="250"/>
  </font>
</defs></svg>"#;

fn font() -> GlyphFont {
    GlyphFont::parse("Triangles", TRIANGLE_FONT).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_two_glyph_run_lands_on_target_box() {
    let font = font();
    let source = r#"<svg><text x="10" y="10" font-size="20">AB</text></svg>"#;
    let output = Converter::new(&font).convert(source, &RenderConfig::default()).unwrap();

    assert_eq!(output.runs.len(), 1);
    let rendered = &output.runs[0];
    assert_eq!(rendered.path_data.matches('M').count(), 2);

    assert!(rendered.target_box.approx_eq(&Rect::new(10.0, -6.0, 20.0, 20.0), 1e-6));
    assert!(rendered.generated_box.approx_eq(&Rect::new(0.0, -20.0, 20.0, 20.0), 1e-6));
    assert!(approx(rendered.alignment.scale, 1.0));
    assert!(approx(rendered.alignment.translate_x, 10.0));
    assert!(approx(rendered.alignment.translate_y, 14.0));

    let aligned = rendered
        .generated_box
        .transformed(&rendered.composed.chain.to_matrix());
    assert!(aligned.approx_eq(&rendered.target_box, 1e-6));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_output_document_structure() {
    let font = font();
    let source = r#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
  <!-- labels -->
  <text x="10" y="10" font-size="20">AB</text>
  <rect x="0" y="0" width="5" height="5"/>
</svg>"#;
    let output = Converter::new(&font).convert(source, &RenderConfig::default()).unwrap();

    let doc = SvgDocument::parse(&output.svg).unwrap();
    let text = doc.elements_named("text")[0];
    assert_eq!(doc.attribute(text, "style"), Some("display: none;"));
    assert_eq!(doc.elements_named("rect").len(), 1);
    assert!(output.svg.starts_with("<?xml"));
    assert!(output.svg.contains("<!-- labels -->"));

    let group = doc.find_by_id("single-line-text-converted").unwrap();
    let layer = doc.find_by_id("master-text-labels-layer").unwrap();
    assert_eq!(doc.parent(group), Some(layer));
    assert_eq!(doc.parent(layer), Some(doc.root()));
    assert_eq!(doc.attribute(group, "fill"), Some("none"));

    let path = doc.elements_named("path")[0];
    assert_eq!(doc.attribute(path, "data-original-text"), Some("AB"));
    let d = doc.attribute(path, "d").unwrap();
    assert!(generated_box_from_path_data(d).approx_eq(&Rect::new(0.0, -20.0, 20.0, 20.0), 1e-6));
}

#[test]
fn test_adjustments_are_recorded_and_applied() {
    let font = font();
    let source = r#"<svg><text x="10" y="10" font-size="20">AB</text></svg>"#;
    let config = RenderConfig::default()
        .with_offset(5.0, -3.0)
        .with_font_scale(2.0)
        .with_stroke(1.5, "red");
    let output = Converter::new(&font).convert(source, &config).unwrap();

    let rendered = &output.runs[0];
    let moved = rendered
        .generated_box
        .transformed(&rendered.composed.chain.to_matrix());
    assert!(moved.approx_eq(&Rect::new(5.0, -19.0, 40.0, 40.0), 1e-6));
    assert!(moved.approx_eq(&rendered.composed.final_box, 1e-6));

    assert!(output.svg.contains(r#"stroke="red" stroke-width="1.5""#));
    assert!(output.svg.contains("data-adjustments=\"x:5,y:-3,scale:2,"));
}

#[test]
fn test_multi_line_text_gets_line_spacing() {
    let font = font();
    let source = r#"<svg><text x="0" font-size="10">
        <tspan y="20">AB</tspan>
        <tspan y="32">BA</tspan>
        <tspan y="44">A B</tspan>
    </text></svg>"#;
    let config = RenderConfig::default().with_line_spacing(1.5);
    let output = Converter::new(&font).convert(source, &config).unwrap();

    let offsets: Vec<f64> = output
        .runs
        .iter()
        .map(|r| r.composed.line_spacing_offset)
        .collect();
    assert_eq!(offsets.len(), 3);
    assert!(approx(offsets[0], 0.0));
    assert!(approx(offsets[1], 6.0));
    assert!(approx(offsets[2], 12.0));
}

#[test]
fn test_nested_group_scale_is_not_applied_twice() {
    let font = font();
    let source = r#"<svg><g transform="scale(2)"><text x="10" y="10" font-size="20">AB</text></g></svg>"#;
    let output = Converter::new(&font).convert(source, &RenderConfig::default()).unwrap();

    let rendered = &output.runs[0];
    assert_eq!(rendered.run.font_size, 20.0);
    assert!(rendered.target_box.approx_eq(&Rect::new(20.0, -12.0, 40.0, 40.0), 1e-6));
    assert!(approx(rendered.alignment.scale, 2.0));
    assert!(!output
        .diagnostics
        .entries()
        .iter()
        .any(|d| matches!(d, Diagnostic::ScaleMismatch { .. })));
}

#[test]
fn test_rotation_warns_but_converts() {
    let font = font();
    let source = r#"<svg><g id="turned" transform="rotate(30)"><text x="10" y="10">AB</text></g></svg>"#;
    let output = Converter::new(&font).convert(source, &RenderConfig::default()).unwrap();
    assert_eq!(output.runs.len(), 1);
    assert!(output.diagnostics.contains(&Diagnostic::RotationDetected {
        element: "turned".to_string()
    }));
}

#[test]
fn test_step_by_step_pass_matches_converter() {
    let font = font();
    let source = r#"<svg><text x="10" y="10" font-size="20">AB</text><text x="50" y="60" text-anchor="end">BA</text></svg>"#;
    let config = RenderConfig::default().with_debug_boxes(true);

    let mut pass = RenderPass::new(&font, &config).unwrap();
    assert_eq!(pass.extract(source).unwrap().len(), 2);
    let first = pass.align_next().unwrap().cloned().unwrap();
    assert_eq!(pass.stage(), RenderStage::Aligning);
    pass.align_next().unwrap();
    assert_eq!(pass.stage(), RenderStage::Composed);
    let svg = pass.serialize().unwrap();

    let output = Converter::new(&font).convert(source, &config).unwrap();
    assert_eq!(svg, output.svg);
    assert_eq!(first, output.runs[0]);
    assert_eq!(svg.matches("debug-target-").count(), 2);
}

#[test]
fn test_illustrator_entity_header_keeps_namespace() {
    let font = font();
    let source = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd" [
  <!ENTITY ns_svg "http://www.w3.org/2000/svg">
]>
<svg xmlns="&ns_svg;"><text x="10" y="10" font-size="20">AB</text></svg>"#;
    let output = Converter::new(&font).convert(source, &RenderConfig::default()).unwrap();
    assert!(output.svg.contains(r#"<svg xmlns="http://www.w3.org/2000/svg">"#));
    assert!(!output.svg.contains("&amp;ns_svg;"));
    assert_eq!(output.runs.len(), 1);
}
