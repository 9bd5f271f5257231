//! SVG path-data tokenizer.
//!
//! Splits path data such as `M 10,20 l5-3 C1 2 3 4 5 6` into command letters
//! with their numeric arguments. Interpretation (absolute vs relative,
//! implicit repetition) belongs to [`super::transformer`].
//!
//! Accepted syntax:
//! - command letters: any ASCII letter (unsupported ones are kept so the
//!   transformer can report them)
//! - numbers: optional sign, digits, decimal point, exponent (`-1.5e-3`, `.5`)
//! - separators: whitespace and commas, or none between a number and a sign
//!   or second decimal point (`1.5.5`, `10-3`)

use crate::error::{Error, Result};
use nom::{
    IResult,
    bytes::complete::take_while,
    character::complete::satisfy,
    multi::many0,
    number::complete::recognize_float,
    sequence::preceded,
};

/// One command letter and the raw numbers following it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineCommand {
    /// Command letter exactly as written (case carries absolute/relative)
    pub letter: char,
    /// Numeric arguments, possibly several repetitions of the command
    pub args: Vec<f64>,
}

impl OutlineCommand {
    /// Create a command.
    pub fn new(letter: char, args: Vec<f64>) -> Self {
        Self { letter, args }
    }

    /// True for lowercase (relative) commands.
    pub fn is_relative(&self) -> bool {
        self.letter.is_ascii_lowercase()
    }

    /// Number of arguments one repetition of the command takes, if known.
    pub fn arity(&self) -> Option<usize> {
        match self.letter.to_ascii_uppercase() {
            'Z' => Some(0),
            'H' | 'V' => Some(1),
            'M' | 'L' | 'T' => Some(2),
            'S' | 'Q' => Some(4),
            'C' => Some(6),
            'A' => Some(7),
            _ => None,
        }
    }
}

/// Parse SVG path data into outline commands.
///
/// # Examples
///
/// ```
/// use single_line_text::path::parse_path_data;
///
/// let commands = parse_path_data("M10,20 l5-3").unwrap();
/// assert_eq!(commands.len(), 2);
/// assert_eq!(commands[1].letter, 'l');
/// assert_eq!(commands[1].args, vec![5.0, -3.0]);
/// ```
///
/// # Errors
///
/// Returns [`Error::PathData`] when a number appears before any command
/// letter, or when a character is neither a letter, number nor separator.
pub fn parse_path_data(data: &str) -> Result<Vec<OutlineCommand>> {
    let mut commands = Vec::new();
    let mut input = data;

    loop {
        if let Ok((rest, _)) = separators(input) {
            input = rest;
        }

        if input.is_empty() {
            break;
        }

        match command(input) {
            Ok((rest, cmd)) => {
                commands.push(cmd);
                input = rest;
            },
            Err(_) => {
                let found = input.chars().next().unwrap_or_default();
                return Err(Error::PathData {
                    offset: data.len() - input.len(),
                    reason: format!("expected command letter, found '{}'", found),
                });
            },
        }
    }

    Ok(commands)
}

/// Skip whitespace and commas.
fn separators(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace() || c == ',')(input)
}

/// Parse one number, skipping leading separators.
fn number(input: &str) -> IResult<&str, f64> {
    let (rest, text) = preceded(separators, recognize_float)(input)?;
    let value = text.parse::<f64>().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;
    Ok((rest, value))
}

/// Parse a command letter followed by any number of arguments.
fn command(input: &str) -> IResult<&str, OutlineCommand> {
    let (rest, letter) = satisfy(|c: char| c.is_ascii_alphabetic())(input)?;
    let (rest, args) = many0(number)(rest)?;
    Ok((rest, OutlineCommand { letter, args }))
}
