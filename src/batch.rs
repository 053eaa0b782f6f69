//! Batch Generation - Single Entry Point
//!
//! Every line goes through clean -> classify -> render. A failing line is
//! recorded and the batch moves on; only an unusable output directory
//! stops a batch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, GeneratorConfig};
use crate::render::{PngRenderer, RenderError, SymbolRenderer};
use crate::upc::{self, UpcError, UpcKind};

/// Per-item failure; never fatal to a batch
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidLength(#[from] UpcError),

    #[error("Render failed: {0}")]
    RenderFailure(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Cannot create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GeneratedBarcode {
    /// 1-based position in the submitted list
    pub index: usize,
    /// Trimmed input line as submitted
    pub input: String,
    /// Cleaned digits
    pub upc: String,
    pub kind: UpcKind,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    /// Trimmed input line as submitted
    pub input: String,
    pub error: String,
}

/// Outcome of one non-blank line, passed to progress callbacks
#[derive(Debug, Clone, Copy)]
pub enum ItemOutcome<'a> {
    Generated(&'a GeneratedBarcode),
    Failed(&'a BatchFailure),
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub total_lines: usize,
    pub skipped_blank: usize,
    pub generated: Vec<GeneratedBarcode>,
    pub failures: Vec<BatchFailure>,
    pub completed_at: DateTime<Utc>,
}

impl BatchReport {
    /// Paths of every artifact written, in input order
    pub fn paths(&self) -> Vec<&Path> {
        self.generated.iter().map(|g| g.path.as_path()).collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// The batch generator - owns the output directory and a renderer
pub struct BarcodeGenerator {
    config: GeneratorConfig,
    renderer: Box<dyn SymbolRenderer>,
}

impl BarcodeGenerator {
    /// Generator with the PNG renderer; fails on invalid raster geometry.
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        let renderer: Box<dyn SymbolRenderer> = Box::new(PngRenderer::new(config.raster)?);
        Ok(Self { config, renderer })
    }

    pub fn with_renderer(config: GeneratorConfig, renderer: Box<dyn SymbolRenderer>) -> Self {
        Self { config, renderer }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Point subsequent batches at another directory
    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.config.output_dir = output_dir.into();
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a single barcode image
    ///
    /// `raw` may contain separators; only its digits are used. The output
    /// directory must already exist.
    pub fn generate_barcode(&self, raw: &str, index: usize) -> Result<GeneratedBarcode, GenerateError> {
        let cleaned = upc::clean(raw);
        let kind = upc::classify(&cleaned)?;

        let stem = self.config.output_dir.join(upc::file_stem(index, &cleaned));
        let path = self.renderer.render(&cleaned, kind, &stem)?;

        Ok(GeneratedBarcode {
            index,
            input: raw.trim().to_string(),
            upc: cleaned,
            kind,
            path,
        })
    }

    /// Generate barcodes for every non-blank line
    pub fn run_batch<S: AsRef<str>>(&self, lines: &[S]) -> Result<BatchReport, BatchError> {
        self.run_batch_with(lines, |_| {})
    }

    /// Like `run_batch`, calling `on_item` as each non-blank line finishes.
    ///
    /// Indices are positions in `lines`, so blank lines leave gaps.
    pub fn run_batch_with<S, F>(&self, lines: &[S], mut on_item: F) -> Result<BatchReport, BatchError>
    where
        S: AsRef<str>,
        F: FnMut(ItemOutcome<'_>),
    {
        let output_dir = self.config.output_dir.clone();
        fs::create_dir_all(&output_dir).map_err(|source| BatchError::OutputDir {
            path: output_dir.clone(),
            source,
        })?;

        info!(
            "Generating {} line(s) into {:?} with {} renderer",
            lines.len(),
            output_dir,
            self.renderer.name()
        );

        let mut generated = Vec::new();
        let mut failures = Vec::new();
        let mut skipped_blank = 0;

        for (offset, line) in lines.iter().enumerate() {
            let index = offset + 1;
            let input = line.as_ref().trim();
            if input.is_empty() {
                skipped_blank += 1;
                continue;
            }

            match self.generate_barcode(input, index) {
                Ok(barcode) => {
                    debug!("#{} {} -> {:?}", index, barcode.kind, barcode.path);
                    on_item(ItemOutcome::Generated(&barcode));
                    generated.push(barcode);
                }
                Err(e) => {
                    debug!("#{} '{}' failed: {}", index, input, e);
                    let failure = BatchFailure {
                        index,
                        input: input.to_string(),
                        error: e.to_string(),
                    };
                    on_item(ItemOutcome::Failed(&failure));
                    failures.push(failure);
                }
            }
        }

        info!(
            "Batch complete: {} generated, {} failed, {} blank",
            generated.len(),
            failures.len(),
            skipped_blank
        );

        Ok(BatchReport {
            output_dir,
            total_lines: lines.len(),
            skipped_blank,
            generated,
            failures,
            completed_at: Utc::now(),
        })
    }
}
