//! Symbol Rendering - Renderer trait and PNG output
//!
//! The batch layer hands a renderer cleaned digits, a symbology and a
//! file stem. The renderer owns check digits, bar encoding and the image
//! format, and reports the path it actually wrote.

use image::{GrayImage, ImageFormat, Luma};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, RasterOptions};
use crate::symbology::{Module, Symbol, SymbolError};
use crate::upc::UpcKind;

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error("Check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },

    #[error("Image write failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Renderer trait - writes one symbol, returns the artifact path
pub trait SymbolRenderer {
    fn name(&self) -> &'static str;

    /// `stem` is the output path without extension; the renderer picks one.
    fn render(&self, digits: &str, kind: UpcKind, stem: &Path) -> Result<PathBuf, RenderError>;
}

/// Grayscale PNG renderer
#[derive(Debug, Clone, Default)]
pub struct PngRenderer {
    options: RasterOptions,
}

impl PngRenderer {
    pub fn new(options: RasterOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &RasterOptions {
        &self.options
    }

    fn rasterize(&self, modules: &[Module]) -> GrayImage {
        let opts = &self.options;
        let (width, height) = opts.image_size(modules.len());
        let bar_top = opts.margin;
        let bar_bottom = opts.margin + opts.bar_height;
        let guard_bottom = bar_bottom + opts.guard_extension;

        GrayImage::from_fn(width, height, |x, y| {
            let column = (x / opts.module_width) as usize;
            let Some(index) = column.checked_sub(opts.quiet_zone as usize) else {
                return WHITE;
            };
            let bottom = match modules.get(index) {
                Some(Module::Bar) => bar_bottom,
                Some(Module::Guard) => guard_bottom,
                Some(Module::Space) | None => return WHITE,
            };
            if y >= bar_top && y < bottom { BLACK } else { WHITE }
        })
    }
}

impl SymbolRenderer for PngRenderer {
    fn name(&self) -> &'static str {
        "png"
    }

    fn render(&self, digits: &str, kind: UpcKind, stem: &Path) -> Result<PathBuf, RenderError> {
        let symbol = Symbol::prepare(kind, digits)?;

        if symbol.check_corrected() {
            if self.options.strict_check_digit {
                return Err(RenderError::CheckDigitMismatch {
                    expected: symbol.check_digit(),
                    found: symbol.supplied_check,
                });
            }
            warn!(
                "{} {}: check digit {} replaced with {}",
                kind,
                digits,
                symbol.supplied_check,
                symbol.check_digit()
            );
        }

        let image = self.rasterize(&symbol.modules());
        let path = stem.with_extension("png");
        image.save_with_format(&path, ImageFormat::Png)?;

        debug!("Wrote {} {} to {:?}", kind, symbol.code(), path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbology::{UPC_A_MODULES, UPC_E_MODULES};
    use tempfile::tempdir;

    #[test]
    fn test_png_written_with_expected_size() {
        let dir = tempdir().unwrap();
        let renderer = PngRenderer::default();

        let path = renderer
            .render("036000291452", UpcKind::UpcA, &dir.path().join("0001_036000291452"))
            .unwrap();
        assert_eq!(path.extension().unwrap(), "png");

        let img = image::open(&path).unwrap().to_luma8();
        let (w, h) = renderer.options().image_size(UPC_A_MODULES);
        assert_eq!(img.dimensions(), (w, h));
    }

    #[test]
    fn test_quiet_zone_and_guard_pixels() {
        let renderer = PngRenderer::default();
        let opts = *renderer.options();
        let symbol = Symbol::prepare(UpcKind::UpcE, "01234565").unwrap();
        let img = renderer.rasterize(&symbol.modules());

        assert_eq!(img.width(), (UPC_E_MODULES as u32 + 2 * opts.quiet_zone) * opts.module_width);

        let mid_y = opts.margin + opts.bar_height / 2;
        assert_eq!(*img.get_pixel(0, mid_y), WHITE);

        let guard_x = opts.quiet_zone * opts.module_width;
        assert_eq!(*img.get_pixel(guard_x, mid_y), BLACK);
        // guard bars reach below the data bars
        let below = opts.margin + opts.bar_height + 1;
        assert_eq!(*img.get_pixel(guard_x, below), BLACK);
        assert_eq!(*img.get_pixel(guard_x, 0), WHITE);
    }

    #[test]
    fn test_strict_mode_rejects_bad_check_digit() {
        let dir = tempdir().unwrap();
        let renderer = PngRenderer::new(RasterOptions {
            strict_check_digit: true,
            ..RasterOptions::default()
        })
        .unwrap();

        let err = renderer
            .render("036000291453", UpcKind::UpcA, &dir.path().join("x"))
            .unwrap_err();
        assert!(matches!(err, RenderError::CheckDigitMismatch { expected: 2, found: 3 }));
        assert!(!dir.path().join("x.png").exists());
    }

    #[test]
    fn test_lenient_mode_corrects_check_digit() {
        let dir = tempdir().unwrap();
        let path = PngRenderer::default()
            .render("12345678", UpcKind::UpcE, &dir.path().join("0003_12345678"))
            .unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "0003_12345678.png");
    }

    #[test]
    fn test_new_rejects_invalid_geometry() {
        let zero_width = RasterOptions {
            module_width: 0,
            ..RasterOptions::default()
        };
        assert!(matches!(PngRenderer::new(zero_width), Err(ConfigError::ModuleWidth(0))));
    }

    #[test]
    fn test_unsupported_number_system() {
        let dir = tempdir().unwrap();
        let err = PngRenderer::default()
            .render("91234565", UpcKind::UpcE, &dir.path().join("x"))
            .unwrap_err();
        assert!(err.to_string().contains("number system"));
    }
}
