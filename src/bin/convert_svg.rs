//! Convert the text of an SVG document to single-line glyph paths.
//!
//! Usage:
//!   convert_svg --font EMSReadability.svg --input labels.svg
//!   convert_svg --font font.svg --input in.svg --output out.svg --config adjustments.json
//!   convert_svg --font font.svg --input in.svg --keep-original --debug-boxes
//!
//! Without `--output` the converted document is written to stdout.
//! Diagnostics are printed to stderr; set `RUST_LOG=debug` for per-run detail.

use single_line_text::session::FontSession;
use single_line_text::{Converter, RenderConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

struct CliOptions {
    font: PathBuf,
    font_name: Option<String>,
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    keep_original: bool,
    debug_boxes: bool,
}

impl CliOptions {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut font = None;
        let mut font_name = None;
        let mut input = None;
        let mut output = None;
        let mut config = None;
        let mut keep_original = false;
        let mut debug_boxes = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--font" | "-f" => {
                    i += 1;
                    font = args.get(i).map(PathBuf::from);
                },
                "--font-name" => {
                    i += 1;
                    font_name = args.get(i).cloned();
                },
                "--input" | "-i" => {
                    i += 1;
                    input = args.get(i).map(PathBuf::from);
                },
                "--output" | "-o" => {
                    i += 1;
                    output = args.get(i).map(PathBuf::from);
                },
                "--config" | "-c" => {
                    i += 1;
                    config = args.get(i).map(PathBuf::from);
                },
                "--keep-original" => keep_original = true,
                "--debug-boxes" => debug_boxes = true,
                other => return Err(format!("unknown argument: {}", other)),
            }
            i += 1;
        }

        Ok(Self {
            font: font.ok_or("missing --font")?,
            font_name,
            input: input.ok_or("missing --input")?,
            output,
            config,
            keep_original,
            debug_boxes,
        })
    }

    fn render_config(&self) -> Result<RenderConfig, String> {
        let config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("reading {}: {}", path.display(), e))?;
                RenderConfig::from_json(&json).map_err(|e| e.to_string())?
            },
            None => RenderConfig::default(),
        };
        let config = if self.keep_original {
            config.with_keep_original_text(true)
        } else {
            config
        };
        Ok(if self.debug_boxes {
            config.with_debug_boxes(true)
        } else {
            config
        })
    }
}

fn font_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".to_string())
}

fn run(options: &CliOptions) -> Result<usize, String> {
    let config = options.render_config()?;
    let source = fs::read_to_string(&options.input)
        .map_err(|e| format!("reading {}: {}", options.input.display(), e))?;

    let name = options
        .font_name
        .clone()
        .unwrap_or_else(|| font_name_for(&options.font));
    let mut session = FontSession::new();
    let font = session
        .select_font(&name, &options.font)
        .wait_until_ready()
        .map_err(|e| e.to_string())?;

    let output = Converter::new(&font)
        .convert(&source, &config)
        .map_err(|e| e.to_string())?;

    for diagnostic in output.diagnostics.entries() {
        eprintln!("warning: {}", diagnostic);
    }

    match &options.output {
        Some(path) => fs::write(path, &output.svg)
            .map_err(|e| format!("writing {}: {}", path.display(), e))?,
        None => println!("{}", output.svg),
    }
    Ok(output.runs.len())
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match CliOptions::from_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: convert_svg --font <font.svg> --input <in.svg> [--output <out.svg>] \
                 [--config <config.json>] [--font-name <name>] [--keep-original] [--debug-boxes]"
            );
            return ExitCode::from(2);
        },
    };

    match run(&options) {
        Ok(count) => {
            eprintln!("Converted {} text runs", count);
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
