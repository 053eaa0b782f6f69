//! Input front ends: stdin line mode and the interactive terminal session.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::batch::{BarcodeGenerator, BatchError, BatchReport, ItemOutcome};
use crate::report;

/// A line holding only this ends one pasted batch
pub const END_OF_BATCH: &str = ".";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No UPC numbers provided.")]
    NoInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// One trimmed line, `None` at EOF. Bytes that are not UTF-8 become
/// replacement characters, which `clean` later drops.
fn read_line_lossy<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
}

/// Read every line until EOF, each trimmed. Blank lines are kept so that
/// batch indices match line numbers.
pub fn read_upc_lines<R: BufRead>(mut reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    while let Some(line) = read_line_lossy(&mut reader)? {
        lines.push(line);
    }
    Ok(lines)
}

/// Stdin line mode: one batch over everything read until EOF.
///
/// Successes and the summary go to `out`, the banner and failures to `err`.
/// With `json` set, only the serialized report is written to `out`.
pub fn run_line_mode<R, O, E>(
    generator: &BarcodeGenerator,
    input: R,
    mut out: O,
    mut err: E,
    json: bool,
) -> Result<BatchReport, SessionError>
where
    R: BufRead,
    O: Write,
    E: Write,
{
    writeln!(err, "{}", "=".repeat(60))?;
    writeln!(err, "BatchMe - UPC Barcode Generator (CLI Mode)")?;
    writeln!(err, "{}", "=".repeat(60))?;
    writeln!(err)?;
    writeln!(err, "Paste your UPC numbers below (one per line).")?;
    writeln!(err, "Press Ctrl+D (Mac/Linux) or Ctrl+Z then Enter (Windows) when done.")?;
    writeln!(err)?;

    let lines = read_upc_lines(input)?;
    if lines.is_empty() {
        writeln!(out, "No UPC numbers provided.")?;
        return Err(SessionError::NoInput);
    }

    let total = lines.len();
    let mut written = Ok(());
    let batch = generator.run_batch_with(&lines, |outcome| {
        if json || written.is_err() {
            return;
        }
        let line = report::outcome_line(outcome, total);
        written = match outcome {
            ItemOutcome::Generated(_) => writeln!(out, "{}", line),
            ItemOutcome::Failed(_) => writeln!(err, "{}", line),
        };
    })?;
    written?;

    if json {
        serde_json::to_writer_pretty(&mut out, &batch).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        for line in report::summary(&batch) {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()?;

    Ok(batch)
}

/// Interactive session over any reader/writer pair
pub struct InteractiveSession<'g, R, W> {
    generator: &'g mut BarcodeGenerator,
    input: R,
    output: W,
}

impl<'g, R: BufRead, W: Write> InteractiveSession<'g, R, W> {
    pub fn new(generator: &'g mut BarcodeGenerator, input: R, output: W) -> Self {
        Self { generator, input, output }
    }

    /// Run until an empty paste or EOF. Returns the reports of every batch.
    pub fn run(&mut self) -> Result<Vec<BatchReport>, SessionError> {
        writeln!(self.output, "BatchMe - UPC Barcode Generator")?;
        writeln!(self.output)?;
        self.choose_output_dir()?;

        let mut reports = Vec::new();
        loop {
            writeln!(
                self.output,
                "Paste your UPC numbers below (one per line), then a line with '{}' to generate.",
                END_OF_BATCH
            )?;
            writeln!(self.output, "Submit an empty batch to quit.")?;
            self.output.flush()?;

            let (lines, eof) = self.read_paste()?;
            if lines.iter().all(|l| l.trim().is_empty()) {
                if reports.is_empty() {
                    writeln!(self.output, "Please paste UPC numbers first.")?;
                    return Err(SessionError::NoInput);
                }
                break;
            }

            writeln!(self.output, "Generating barcodes...")?;
            let report = self.generate(&lines)?;
            reports.push(report);

            if eof {
                break;
            }
        }

        debug!("Interactive session ran {} batch(es)", reports.len());
        Ok(reports)
    }

    fn choose_output_dir(&mut self) -> Result<(), SessionError> {
        write!(
            self.output,
            "Output folder [{}]: ",
            self.generator.output_dir().display()
        )?;
        self.output.flush()?;

        let answer = read_line_lossy(&mut self.input)?.unwrap_or_default();
        if !answer.is_empty() {
            self.generator.set_output_dir(PathBuf::from(answer));
        }
        writeln!(self.output, "Output: {}", self.generator.output_dir().display())?;
        writeln!(self.output)?;
        Ok(())
    }

    /// Lines up to the end marker; the flag is set when input ran out.
    fn read_paste(&mut self) -> Result<(Vec<String>, bool), SessionError> {
        let mut lines = Vec::new();
        while let Some(line) = read_line_lossy(&mut self.input)? {
            if line == END_OF_BATCH {
                return Ok((lines, false));
            }
            lines.push(line);
        }
        Ok((lines, true))
    }

    fn generate(&mut self, lines: &[String]) -> Result<BatchReport, SessionError> {
        let total = lines.len();
        let mut progress = Vec::new();
        let batch = self
            .generator
            .run_batch_with(lines, |outcome| progress.push(report::outcome_line(outcome, total)))?;

        for line in progress.iter().chain(report::summary(&batch).iter()) {
            writeln!(self.output, "{}", line)?;
        }
        writeln!(self.output)?;
        Ok(batch)
    }
}
