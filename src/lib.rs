//! BatchMe Core - UPC Barcode Batch Generator
//!
//! # Pipeline
//! 1. Clean: keep digits only
//! 2. Classify: 12 digits is UPC-A, 8 is UPC-E, anything else is rejected
//! 3. Render: hand digits to a `SymbolRenderer`, file named `{index:04}_{digits}`
//! 4. Report: one failure never stops the batch

pub mod upc;
pub mod symbology;
pub mod config;
pub mod render;
pub mod batch;
pub mod report;
pub mod session;
pub mod logging;

pub use upc::{clean, classify, UpcError, UpcKind};
pub use config::{ConfigError, GeneratorConfig, RasterOptions, DEFAULT_OUTPUT_DIR};
pub use render::{PngRenderer, RenderError, SymbolRenderer};
pub use batch::{BarcodeGenerator, BatchError, BatchFailure, BatchReport, GenerateError, GeneratedBarcode, ItemOutcome};
pub use session::{read_upc_lines, run_line_mode, InteractiveSession, SessionError};
