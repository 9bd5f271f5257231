//! Stage-by-stage render pass.

use crate::config::RenderConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::document::{DocumentTextExtractor, SvgDocument, TextExtraction, TextRun};
use crate::error::{Error, Result};
use crate::fonts::GlyphFont;
use crate::geometry::{Point, Rect};
use crate::layout::{compose, generated_box, target_box, AlignmentTransform, ComposedTransform};
use crate::path::to_path_data;
use crate::text::TextRasterizer;
use crate::writer::SvgWriter;
use std::fmt;

/// Where a [`RenderPass`] currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    /// Nothing loaded
    Idle,
    /// Runs extracted, none aligned yet
    Extracting,
    /// Some runs aligned
    Aligning,
    /// Every run aligned and composed
    Composed,
    /// Output document written
    Serialized,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStage::Idle => "idle",
            RenderStage::Extracting => "extracting",
            RenderStage::Aligning => "aligning",
            RenderStage::Composed => "composed",
            RenderStage::Serialized => "serialized",
        };
        f.write_str(name)
    }
}

/// One converted run, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRun {
    /// Position of the run in extraction order
    pub index: usize,
    /// The source run
    pub run: TextRun,
    /// Generated strokes at the neutral origin
    pub path_data: String,
    /// Estimated footprint of the original text
    pub target_box: Rect,
    /// Measured extent of the generated strokes
    pub generated_box: Rect,
    /// Generated-to-target mapping
    pub alignment: AlignmentTransform,
    /// Final transform including user adjustments
    pub composed: ComposedTransform,
}

/// A single render pass over one document with one font and one configuration.
pub struct RenderPass<'a> {
    font: &'a GlyphFont,
    config: RenderConfig,
    stage: RenderStage,
    document: Option<SvgDocument>,
    extraction: TextExtraction,
    next_run: usize,
    rendered: Vec<RenderedRun>,
    diagnostics: Diagnostics,
}

impl<'a> RenderPass<'a> {
    /// Start a pass. The configuration is validated and copied.
    pub fn new(font: &'a GlyphFont, config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            font,
            config: config.clone(),
            stage: RenderStage::Idle,
            document: None,
            extraction: TextExtraction::default(),
            next_run: 0,
            rendered: Vec::new(),
            diagnostics: Diagnostics::new(),
        })
    }

    /// Current stage.
    pub fn stage(&self) -> RenderStage {
        self.stage
    }

    fn expect_stage(&self, allowed: &[RenderStage], operation: &str) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "stage {}: cannot {} now",
                self.stage, operation
            )))
        }
    }

    /// Parse `source` and extract its text runs.
    pub fn extract(&mut self, source: &str) -> Result<&[TextRun]> {
        self.expect_stage(&[RenderStage::Idle], "extract")?;
        let document = SvgDocument::parse(source)?;
        let extraction = DocumentTextExtractor::new(&document).extract();

        self.document = Some(document);
        self.extraction = extraction;
        self.diagnostics.absorb(std::mem::take(&mut self.extraction.diagnostics));
        self.stage = RenderStage::Extracting;

        if !self.font.is_ready() {
            self.diagnostics.push(Diagnostic::FontNotReady {
                font: self.font.name().to_string(),
            });
        }
        if self.extraction.runs.is_empty() {
            self.stage = RenderStage::Composed;
        }
        Ok(&self.extraction.runs)
    }

    /// Runs extracted so far.
    pub fn runs(&self) -> &[TextRun] {
        &self.extraction.runs
    }

    /// Align and compose the next run.
    ///
    /// Returns `Ok(None)` for a run that produced no strokes; it is skipped
    /// with a diagnostic. The stage becomes `Composed` after the last run.
    pub fn align_next(&mut self) -> Result<Option<&RenderedRun>> {
        self.expect_stage(&[RenderStage::Extracting, RenderStage::Aligning], "align")?;
        self.stage = RenderStage::Aligning;

        let index = self.next_run;
        self.next_run += 1;
        if self.next_run >= self.extraction.runs.len() {
            self.stage = RenderStage::Composed;
        }

        let rendered = self.render_run(index);
        match rendered {
            Some(r) => {
                self.rendered.push(r);
                Ok(self.rendered.last())
            },
            None => Ok(None),
        }
    }

    /// Align every remaining run.
    pub fn align_all(&mut self) -> Result<&[RenderedRun]> {
        while matches!(self.stage, RenderStage::Extracting | RenderStage::Aligning) {
            self.align_next()?;
        }
        self.expect_stage(&[RenderStage::Composed], "finish alignment")?;
        Ok(&self.rendered)
    }

    fn render_run(&mut self, index: usize) -> Option<RenderedRun> {
        let run = self.extraction.runs.get(index)?;
        let letter_spacing = self.config.letter_spacing;

        let raster = TextRasterizer::new(self.font).rasterize(
            &run.content,
            Point::origin(),
            run.font_size,
            letter_spacing,
        );
        raster.report(&mut self.diagnostics);
        if raster.is_empty() {
            self.diagnostics.push(Diagnostic::EmptyRun {
                content: run.content.clone(),
            });
            return None;
        }

        let operations = raster.operations();
        let target = target_box(run, self.font, letter_spacing);
        let generated = generated_box(&operations);
        let alignment =
            AlignmentTransform::solve(&target, &generated, run.text_anchor, run.transform_scale_x);
        alignment.report(&run.content, &mut self.diagnostics);

        let composed = compose(
            run,
            &alignment,
            &target,
            &self.config,
            self.extraction.group_baseline_y(index),
        );

        log::debug!(
            "Run {} {:?}: scale {} translate ({}, {})",
            index,
            run.content,
            alignment.scale,
            alignment.translate_x,
            alignment.translate_y
        );

        Some(RenderedRun {
            index,
            run: run.clone(),
            path_data: to_path_data(&operations),
            target_box: target,
            generated_box: generated,
            alignment,
            composed,
        })
    }

    /// Runs converted so far.
    pub fn rendered(&self) -> &[RenderedRun] {
        &self.rendered
    }

    /// Write the converted document.
    pub fn serialize(&mut self) -> Result<String> {
        self.expect_stage(&[RenderStage::Composed], "serialize")?;
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| Error::Config("stage composed: no document loaded".to_string()))?;
        let svg = SvgWriter::new(&self.config, self.font.name()).write(document, &self.rendered)?;
        self.stage = RenderStage::Serialized;
        Ok(svg)
    }

    /// Diagnostics raised so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume the pass, returning its converted runs and diagnostics.
    pub fn finish(self) -> (Vec<RenderedRun>, Diagnostics) {
        (self.rendered, self.diagnostics)
    }
}
