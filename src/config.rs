//! Generator Configuration
//!
//! The output directory is the only state a generator carries between
//! batches. Raster geometry is fixed per generator.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_OUTPUT_DIR: &str = "barcodes";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Module width must be between 1 and 20 pixels, got {0}")]
    ModuleWidth(u32),

    #[error("Bar height must be between 10 and 2000 pixels, got {0}")]
    BarHeight(u32),
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    pub raster: RasterOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            raster: RasterOptions::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

/// Pixel geometry for rasterized symbols
///
/// Fields are public for struct-update syntax; `PngRenderer::new` runs
/// `validate` before any of them are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Pixels per module
    pub module_width: u32,
    /// Height of data bars in pixels
    pub bar_height: u32,
    /// Blank modules left and right of the symbol
    pub quiet_zone: u32,
    /// Extra pixels guard bars extend below the data bars
    pub guard_extension: u32,
    /// Blank pixels above and below
    pub margin: u32,
    /// Reject inputs whose check digit is wrong instead of correcting it
    pub strict_check_digit: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            module_width: 3,
            bar_height: 150,
            quiet_zone: 9,
            guard_extension: 15,
            margin: 12,
            strict_check_digit: false,
        }
    }
}

impl RasterOptions {
    /// Create from user-supplied sizes with validation
    pub fn from_user(module_width: u32, bar_height: u32) -> Result<Self, ConfigError> {
        let options = Self {
            module_width,
            bar_height,
            guard_extension: bar_height / 10,
            ..Self::default()
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=20).contains(&self.module_width) {
            return Err(ConfigError::ModuleWidth(self.module_width));
        }
        if !(10..=2000).contains(&self.bar_height) {
            return Err(ConfigError::BarHeight(self.bar_height));
        }
        Ok(())
    }

    /// Image dimensions for a symbol `modules` wide.
    pub fn image_size(&self, modules: usize) -> (u32, u32) {
        let width = (modules as u32 + 2 * self.quiet_zone) * self.module_width;
        let height = self.bar_height + self.guard_extension + 2 * self.margin;
        (width, height)
    }
}
