//! Property tests for the geometry core.

use proptest::prelude::*;
use single_line_text::geometry::{Point, Rect};
use single_line_text::layout::{compose, AlignmentTransform, TextAnchor};
use single_line_text::path::{transform_outline, OutlineCommand, PathOperation};
use single_line_text::text::TextRasterizer;
use single_line_text::document::TextRun;
use single_line_text::{GlyphFont, RenderConfig};

const FONT: &str = r#"<font><font-face units-per-em="1000"/>
    <glyph unicode="a" horiz-adv-x="520" d="M 0 0 L 260 700 L 520 0"/>
    <glyph unicode="b" horiz-adv-x="480" d="M 0 0 L 0 700 C 300 700 300 350 0 350"/>
    <glyph unicode="c" horiz-adv-x="610" d="M 500 600 C 100 700 100 0 500 100"/>
    <glyph unicode=" " horiz-adv-x="250"/>
</font>"#;

fn advance_of(ch: char) -> f64 {
    match ch {
        'a' => 520.0,
        'b' => 480.0,
        'c' => 610.0,
        ' ' => 250.0,
        _ => 300.0,
    }
}

fn coord() -> impl Strategy<Value = f64> {
    -2000.0..2000.0f64
}

fn command() -> impl Strategy<Value = OutlineCommand> {
    prop_oneof![
        (coord(), coord()).prop_map(|(x, y)| OutlineCommand::new('M', vec![x, y])),
        (coord(), coord()).prop_map(|(x, y)| OutlineCommand::new('L', vec![x, y])),
        (coord(), coord(), coord(), coord(), coord(), coord())
            .prop_map(|(a, b, c, d, e, f)| OutlineCommand::new('C', vec![a, b, c, d, e, f])),
    ]
}

fn rect() -> impl Strategy<Value = Rect> {
    (-500.0..500.0f64, -500.0..500.0f64, 0.5..300.0f64, 0.5..300.0f64)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn transform_keeps_one_operation_per_command_and_mirrors_y(
        commands in prop::collection::vec(command(), 1..24),
        ox in coord(),
        oy in coord(),
    ) {
        let out = transform_outline(&commands, Point::new(ox, oy), 1000.0, 1000.0);
        prop_assert!(out.skipped.is_empty());
        prop_assert_eq!(out.operations.len(), commands.len());

        for (cmd, op) in commands.iter().zip(&out.operations) {
            let ys: Vec<f64> = cmd.args.iter().skip(1).step_by(2).copied().collect();
            let out_ys: Vec<f64> = match *op {
                PathOperation::MoveTo(_, y) | PathOperation::LineTo(_, y) => vec![y],
                PathOperation::CurveTo(_, y1, _, y2, _, y3) => vec![y1, y2, y3],
                PathOperation::ClosePath => vec![],
            };
            prop_assert_eq!(ys.len(), out_ys.len());
            for (y, out_y) in ys.iter().zip(out_ys) {
                prop_assert!((out_y - (oy - y)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn rasterizer_advance_is_sum_of_scaled_advances(
        text in "[abcxyz ]{0,40}",
        font_size in 1.0..200.0f64,
        spacing in 0.1..3.0f64,
    ) {
        let font = GlyphFont::parse("props", FONT).unwrap();
        let out = TextRasterizer::new(&font).rasterize(&text, Point::origin(), font_size, spacing);

        let expected: f64 = text
            .chars()
            .map(|ch| advance_of(ch) * font_size / 1000.0 * spacing)
            .sum();
        prop_assert!((out.advance - expected).abs() < 1e-6 * expected.max(1.0));

        let drawn = text.chars().filter(|ch| matches!(ch, 'a' | 'b' | 'c')).count();
        prop_assert_eq!(out.fragments.len(), drawn);
        let missing = text.chars().filter(|ch| matches!(ch, 'x' | 'y' | 'z')).count();
        prop_assert_eq!(out.missing.len(), missing);
    }

    #[test]
    fn self_alignment_is_identity(b in rect()) {
        let t = AlignmentTransform::solve(&b, &b, TextAnchor::Start, 1.0);
        prop_assert_eq!(t.scale, 1.0);
        prop_assert!(t.translate_x.abs() < 1e-9);
        prop_assert!(t.translate_y.abs() < 1e-9);
    }

    #[test]
    fn alignment_scale_stays_in_range(target in rect(), generated in rect()) {
        let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Middle, 1.0);
        prop_assert!((0.01..=10.0).contains(&t.scale));
        prop_assert_eq!(t.clamped, t.scale != t.raw_scale);
    }

    #[test]
    fn aligned_box_matches_target_when_unclamped(
        target in rect(),
        generated in rect(),
        anchor in prop_oneof![Just(TextAnchor::Start), Just(TextAnchor::Middle), Just(TextAnchor::End)],
    ) {
        let t = AlignmentTransform::solve(&target, &generated, anchor, 1.0);
        prop_assume!(!t.clamped);
        let placed = generated.transformed(&t.to_matrix());
        prop_assert!((placed.width - target.width).abs() < 1e-6);
        prop_assert!((placed.center().y - target.center().y).abs() < 1e-6);
        match anchor {
            TextAnchor::Start => prop_assert!((placed.left() - target.left()).abs() < 1e-6),
            TextAnchor::Middle => prop_assert!((placed.center().x - target.center().x).abs() < 1e-6),
            TextAnchor::End => prop_assert!((placed.right() - target.right()).abs() < 1e-6),
        }
    }

    #[test]
    fn composed_box_tracks_final_box(
        target in rect(),
        generated in rect(),
        font_scale in 0.1..5.0f64,
        x_offset in -100.0..100.0f64,
        y_offset in -100.0..100.0f64,
    ) {
        let t = AlignmentTransform::solve(&target, &generated, TextAnchor::Start, 1.0);
        prop_assume!(!t.clamped);
        let config = RenderConfig::default()
            .with_font_scale(font_scale)
            .with_offset(x_offset, y_offset);
        let run = TextRun { content: "p".to_string(), ..TextRun::default() };
        let composed = compose(&run, &t, &target, &config, None);
        let aligned = generated.transformed(&t.to_matrix());
        let expected = aligned
            .scaled_about_center(font_scale)
            .translated(x_offset, y_offset);
        let placed = generated.transformed(&composed.chain.to_matrix());
        prop_assert!(placed.approx_eq(&expected, 1e-6));
        prop_assert!((placed.width - composed.final_box.width).abs() < 1e-6);
        prop_assert!((placed.center().y - composed.final_box.center().y).abs() < 1e-6);
    }
}
