//! Geometry stages of sheet reading: band detection and mark extraction.

pub mod annotate;
pub mod band;
pub mod config;
pub mod marks;
pub mod pixel;

use image::RgbImage;
use serde::Serialize;

use crate::punch_decode::{DecodeError, DefinitionTable, PunchPattern};
pub use band::Band;
pub use config::{ROW_COUNT, SheetConfig};
use pixel::InkMap;

/// Errors raised while locating the sheet grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    #[error("image has no pixels")]
    EmptyImage,

    #[error("no scan column shows exactly {expected} row bands")]
    RowBands { expected: usize },

    #[error("no scan row shows exactly {expected} column bands plus the header")]
    ColumnBands { expected: usize },

    #[error("read {found} column patterns, expected {expected}")]
    PatternCount { expected: usize, found: usize },
}

/// Geometry and punch patterns read from one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReading {
    pub row_bands: Vec<Band>,
    pub column_bands: Vec<Band>,
    pub patterns: Vec<PunchPattern>,
}

impl SheetReading {
    /// Resolves every column against `table`, in column order.
    pub fn decode(&self, table: &DefinitionTable) -> Result<String, DecodeError> {
        table.decode_patterns(&self.patterns)
    }
}

/// Locates the grid of `image` and reads the punch pattern of every column.
pub fn read_sheet(image: &RgbImage, config: &SheetConfig) -> Result<SheetReading, SheetError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(SheetError::EmptyImage);
    }
    let ink = InkMap::new(image, config.dark_threshold);

    let row_bands = band::detect_row_bands(&ink)?;
    let column_bands = band::detect_column_bands(&ink, config.columns)?;
    let patterns = marks::extract_patterns(&ink, &row_bands, &column_bands);

    if patterns.len() != config.columns {
        return Err(SheetError::PatternCount {
            expected: config.columns,
            found: patterns.len(),
        });
    }
    log::debug!(
        "read {} columns, {} punched",
        patterns.len(),
        patterns.iter().filter(|p| !p.is_empty()).count()
    );

    Ok(SheetReading {
        row_bands,
        column_bands,
        patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn empty_image_is_rejected() {
        let img = RgbImage::new(0, 0);
        assert_eq!(
            read_sheet(&img, &SheetConfig::default()),
            Err(SheetError::EmptyImage)
        );
    }

    #[test]
    fn blank_page_has_no_row_bands() {
        let img = RgbImage::from_pixel(20, 20, Rgb([250, 250, 250]));
        assert_eq!(
            read_sheet(&img, &SheetConfig::with_columns(2)),
            Err(SheetError::RowBands { expected: 12 })
        );
    }

    #[test]
    fn huge_column_count_is_an_error() {
        let mut img = RgbImage::from_pixel(4, 40, Rgb([255, 255, 255]));
        for i in 0..12 {
            img.put_pixel(0, i * 3, Rgb([0, 0, 0]));
        }
        assert_eq!(
            read_sheet(&img, &SheetConfig::with_columns(usize::MAX)),
            Err(SheetError::ColumnBands {
                expected: usize::MAX
            })
        );
    }

    #[test]
    fn threshold_comes_from_config() {
        // Grey bars are ink only once the threshold admits them.
        let mut img = RgbImage::from_pixel(4, 40, Rgb([255, 255, 255]));
        for i in 0..12 {
            img.put_pixel(0, i * 3, Rgb([90, 90, 90]));
        }
        let strict = SheetConfig::with_columns(1);
        assert_eq!(
            read_sheet(&img, &strict),
            Err(SheetError::RowBands { expected: 12 })
        );
        let loose = SheetConfig {
            dark_threshold: 100,
            ..strict
        };
        // Rows now resolve; the sheet has no column ticks.
        assert_eq!(
            read_sheet(&img, &loose),
            Err(SheetError::ColumnBands { expected: 1 })
        );
    }
}
