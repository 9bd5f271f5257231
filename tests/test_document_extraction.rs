//! Text extraction from source documents.

use single_line_text::document::{DocumentTextExtractor, SvgDocument};
use single_line_text::layout::TextAnchor;
use single_line_text::Diagnostic;

fn extract(svg: &str) -> single_line_text::document::TextExtraction {
    let doc = SvgDocument::parse(svg).unwrap();
    DocumentTextExtractor::new(&doc).extract()
}

#[test]
fn test_three_level_nesting_composes_in_ancestor_order() {
    let out = extract(
        r#"<svg>
          <g transform="translate(10,20)">
            <g transform="scale(2)">
              <g transform="matrix(1,0,0,1,5,5)">
                <text x="1" y="1" font-size="12">deep</text>
              </g>
            </g>
          </g>
        </svg>"#,
    );
    assert_eq!(out.runs.len(), 1);
    let run = &out.runs[0];
    assert_eq!(run.x, 22.0);
    assert_eq!(run.y, 32.0);
    assert_eq!(run.transform_scale_x, 2.0);
    assert_eq!(run.transform_scale_y, 2.0);
    assert_eq!(run.font_size, 12.0);
}

#[test]
fn test_style_precedence() {
    let out = extract(
        r#"<svg>
          <style>
            .label { font-size: 30px; text-anchor: end; }
          </style>
          <text class="label" style="font-size: 20px" font-size="10" x="0" y="0">class wins</text>
          <text style="font-size: 20px; text-anchor: middle" font-size="10" x="0" y="0">inline wins</text>
          <text font-size="10px" x="0" y="0">attribute</text>
          <text x="0" y="0">default</text>
        </svg>"#,
    );
    let sizes: Vec<f64> = out.runs.iter().map(|r| r.font_size).collect();
    assert_eq!(sizes, vec![30.0, 20.0, 10.0, 14.0]);
    let anchors: Vec<TextAnchor> = out.runs.iter().map(|r| r.text_anchor).collect();
    assert_eq!(
        anchors,
        vec![TextAnchor::End, TextAnchor::Middle, TextAnchor::Start, TextAnchor::Start]
    );
    assert_eq!(out.runs[0].class_name, "label");
}

#[test]
fn test_tspans_are_separate_runs_sharing_a_group() {
    let doc = SvgDocument::parse(
        r#"<svg><text x="5" y="10" font-size="8" text-anchor="middle">
            <tspan>first</tspan>
            <tspan x="7" y="22">second</tspan>
        </text><text x="1" y="2">alone</text></svg>"#,
    )
    .unwrap();
    let out = DocumentTextExtractor::new(&doc).extract();
    assert_eq!(out.runs.len(), 3);

    let (first, second, alone) = (&out.runs[0], &out.runs[1], &out.runs[2]);
    assert_eq!((first.x, first.y), (5.0, 10.0));
    assert_eq!((second.x, second.y), (7.0, 22.0));
    assert_eq!(second.font_size, 8.0);
    assert_eq!(second.text_anchor, TextAnchor::Middle);
    assert_eq!(first.parent_group, second.parent_group);
    assert_eq!(first.parent_group, Some(doc.elements_named("text")[0]));
    assert_eq!(alone.parent_group, None);

    assert_eq!(out.group_baseline_y(1), Some(10.0));
    assert_eq!(out.group_baseline_y(2), None);
}

#[test]
fn test_missing_coordinates_default_to_one_hundred() {
    let out = extract(r#"<svg><text>  padded  </text></svg>"#);
    assert_eq!(out.runs[0].content, "padded");
    assert_eq!((out.runs[0].x, out.runs[0].y), (100.0, 100.0));
}

#[test]
fn test_whitespace_only_text_is_skipped() {
    let out = extract("<svg><text x=\"1\" y=\"1\">  \n\t </text><text><tspan> </tspan></text></svg>");
    assert!(out.runs.is_empty());
}

#[test]
fn test_rotation_is_reported_once_per_element() {
    let out = extract(
        r#"<svg><g id="spin" transform="rotate(45) translate(3, 4)">
            <text x="0" y="0">a</text>
            <text x="0" y="0">b</text>
        </g></svg>"#,
    );
    assert_eq!(out.runs.len(), 2);
    assert_eq!(out.runs[0].x, 3.0);
    assert_eq!(out.runs[0].y, 4.0);
    let rotations = out
        .diagnostics
        .entries()
        .iter()
        .filter(|d| matches!(d, Diagnostic::RotationDetected { .. }))
        .count();
    assert_eq!(rotations, 1);
}
