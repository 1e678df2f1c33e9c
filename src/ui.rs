// UI layer: renders results as fixed-width banners and drives the
// single-shot and interactive flows. Input comes from dialoguer when a
// person is at the terminal, or plain lines when stdin is piped.

use crate::api::OcrBackend;
use crate::extract::{Outcome, Scanner, Target};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const BANNER_WIDTH: usize = 50;

fn rule(ch: char) -> String {
    ch.to_string().repeat(BANNER_WIDTH)
}

/// Render an outcome exactly as it is printed.
pub fn render(outcome: &Outcome) -> String {
    let heavy = rule('=');
    let light = rule('-');
    let mut s = String::new();

    match outcome {
        Err(e) => {
            let _ = writeln!(s, "\n{heavy}");
            let _ = writeln!(s, "  Error: {e}");
            let _ = writeln!(s, "{heavy}\n");
        }
        Ok(ex) => {
            let _ = writeln!(s, "\n{heavy}");
            let _ = writeln!(s, "  OCR Scanner - Extracted Text");
            let _ = writeln!(s, "{heavy}");
            let _ = writeln!(s, "\n  Source: {}\n", ex.source);
            let _ = writeln!(s, "{light}");

            let text = ex.text.trim();
            if text.is_empty() {
                let _ = writeln!(s, "  (No text found in image)");
            } else {
                for line in text.lines() {
                    let _ = writeln!(s, "  {line}");
                }
            }

            let _ = writeln!(s, "{light}");
            let _ = writeln!(s, "\n  Characters extracted: {}", text.chars().count());
            let _ = writeln!(s, "{heavy}\n");
        }
    }
    s
}

/// Print an outcome to stdout.
pub fn print_result(outcome: &Outcome) {
    print!("{}", render(outcome));
}

/// Classify `input`, run the matching extractor and show a spinner while
/// the request is in flight. The spinner hides itself off-terminal.
pub fn scan<B: OcrBackend>(scanner: &Scanner<B>, input: &str) -> Outcome {
    let target = Target::classify(input);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Scanning {target}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = scanner.extract(&target);
    spinner.finish_and_clear();
    outcome
}

/// Single-shot mode: one target, one result, done.
pub fn run_once<B: OcrBackend, W: Write>(
    scanner: &Scanner<B>,
    input: &str,
    out: &mut W,
) -> io::Result<()> {
    let outcome = scan(scanner, input);
    out.write_all(render(&outcome).as_bytes())?;
    out.flush()
}

/// Where the interactive loop gets its next line from.
pub trait SourceReader {
    /// `None` on end of input, interrupt or a read failure.
    fn read_source(&mut self) -> Option<String>;
}

/// Prompts on the terminal with dialoguer.
pub struct TerminalReader;

impl SourceReader for TerminalReader {
    fn read_source(&mut self) -> Option<String> {
        Input::<String>::new()
            .with_prompt("Enter image path or URL")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| tracing::debug!(error = %e, "prompt ended"))
            .ok()
    }
}

/// Reads one source per line, for piped stdin and tests.
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader { inner }
    }
}

impl<R: BufRead> SourceReader for LineReader<R> {
    fn read_source(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.inner.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                None
            }
        }
    }
}

/// Set from the Ctrl-C handler; the loop checks it after every blocking
/// step and ends the session.
#[derive(Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

fn intro() -> String {
    let heavy = rule('=');
    format!(
        "\n{heavy}\n  OCR Scanner\n  Powered by APIVerve\n{heavy}\n\
         \nExtract text from images (files or URLs)\nType 'quit' to exit\n\n"
    )
}

/// Prompt, scan, print, repeat until `quit`, end of input or an interrupt.
/// Errors from a scan are printed and the loop keeps going. A result that
/// arrives after an interrupt is dropped.
pub fn interactive<B, R, W>(
    scanner: &Scanner<B>,
    reader: &mut R,
    out: &mut W,
    interrupt: &Interrupt,
) -> io::Result<()>
where
    B: OcrBackend,
    R: SourceReader,
    W: Write,
{
    out.write_all(intro().as_bytes())?;
    out.flush()?;

    while let Some(raw) = reader.read_source() {
        if interrupt.is_set() {
            writeln!(out)?;
            break;
        }
        let source = raw.trim();
        if source.eq_ignore_ascii_case("quit") {
            break;
        }
        if source.is_empty() {
            writeln!(out, "Please enter a file path or URL.\n")?;
            continue;
        }

        let outcome = scan(scanner, source);
        if interrupt.is_set() {
            writeln!(out)?;
            break;
        }
        out.write_all(render(&outcome).as_bytes())?;
        out.flush()?;
    }

    writeln!(out, "Goodbye!\n")?;
    out.flush()
}
