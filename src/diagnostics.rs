//! Non-fatal diagnostics raised during font loading and render passes.
//!
//! Diagnostics are notifications, not errors: the render pass always
//! completes. Each diagnostic pushed into a [`Diagnostics`] sink is also
//! forwarded to the `log` facade.

use std::fmt;

/// How long a diagnostic stays relevant to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Shown until the document is reloaded; affects output correctness
    Persistent,
    /// Relevant to the current pass only
    Transient,
}

/// A single non-fatal condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Rotation or skew found in an element's transform chain
    RotationDetected {
        /// Id or tag name of the element carrying the transform
        element: String,
    },
    /// Alignment scale fell outside the plausible range
    ExtremeScale {
        /// Text content of the run
        content: String,
        /// Scale after clamping
        scale: f64,
    },
    /// Alignment scale was clamped into the safety range
    ScaleClamped {
        /// Text content of the run
        content: String,
        /// Scale ratio before clamping
        raw: f64,
        /// Scale actually used
        clamped: f64,
    },
    /// Computed alignment scale disagrees with the ancestor scale
    ScaleMismatch {
        /// Text content of the run
        content: String,
        /// Scale derived from the boxes
        computed: f64,
        /// Scale expected from the ancestor transforms
        expected: f64,
    },
    /// Character has no glyph in the active font
    MissingGlyph {
        /// The unmapped character
        character: char,
    },
    /// Generated or target box collapsed; identity alignment used
    DegenerateBox {
        /// Text content of the run
        content: String,
    },
    /// Outline command skipped while transforming a glyph
    SkippedCommand {
        /// Command letter
        command: char,
        /// Why it was skipped
        reason: String,
    },
    /// Rasterization produced no strokes for a run
    EmptyRun {
        /// Text content of the run
        content: String,
    },
    /// Font was not ready when a pass needed it
    FontNotReady {
        /// Font name
        font: String,
    },
}

impl Diagnostic {
    /// Persistence class of this diagnostic.
    pub fn persistence(&self) -> Persistence {
        match self {
            Diagnostic::RotationDetected { .. } => Persistence::Persistent,
            _ => Persistence::Transient,
        }
    }

    /// True for conditions logged at `warn` level.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Diagnostic::MissingGlyph { .. } | Diagnostic::SkippedCommand { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RotationDetected { element } => write!(
                f,
                "Rotation transform detected in element \"{}\". Text positioning may be inaccurate.",
                element
            ),
            Diagnostic::ExtremeScale { content, scale } => {
                write!(f, "Extreme scale detected for \"{}\": {}", content, scale)
            },
            Diagnostic::ScaleClamped {
                content,
                raw,
                clamped,
            } => write!(f, "Scale for \"{}\" clamped from {} to {}", content, raw, clamped),
            Diagnostic::ScaleMismatch {
                content,
                computed,
                expected,
            } => write!(
                f,
                "Scale mismatch for \"{}\": calculated {} vs expected {}",
                content, computed, expected
            ),
            Diagnostic::MissingGlyph { character } => {
                write!(f, "Missing glyph: '{}' (U+{:04X})", character, *character as u32)
            },
            Diagnostic::DegenerateBox { content } => {
                write!(f, "Invalid bounding boxes for \"{}\"; using identity alignment", content)
            },
            Diagnostic::SkippedCommand { command, reason } => {
                write!(f, "Skipped path command '{}': {}", command, reason)
            },
            Diagnostic::EmptyRun { content } => {
                write!(f, "Failed to generate single-line text for \"{}\"", content)
            },
            Diagnostic::FontNotReady { font } => write!(f, "Font \"{}\" is not ready", font),
        }
    }
}

/// Ordered collection of diagnostics for one render pass.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            log::warn!("{}", diagnostic);
        } else {
            log::debug!("{}", diagnostic);
        }
        self.entries.push(diagnostic);
    }

    /// Move every entry of `other` into this sink without logging again.
    pub fn absorb(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// All recorded diagnostics in order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// True when an equal diagnostic was already recorded.
    pub fn contains(&self, diagnostic: &Diagnostic) -> bool {
        self.entries.contains(diagnostic)
    }

    /// Diagnostics that should stay visible until the next reload.
    pub fn persistent(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.persistence() == Persistence::Persistent)
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything, e.g. on document reload.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
