//! Band detection along the two sheet axes.
//!
//! Both detectors run the same search: walk candidate scan lines in a fixed
//! order, collect the dark runs on each line, and accept the first line whose
//! run count matches what the sheet layout demands. Lines with too many or
//! too few runs (blank margins, printed text, smudges) are skipped.

use serde::Serialize;

use super::SheetError;
use super::config::ROW_COUNT;
use super::pixel::InkMap;

/// Inclusive coordinate interval along one image axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Band {
    pub min: u32,
    pub max: u32,
}

impl Band {
    pub fn new(min: u32, max: u32) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    pub fn contains(&self, c: u32) -> bool {
        c >= self.min && c <= self.max
    }

    /// Number of pixels covered.
    pub fn span(&self) -> u32 {
        self.max - self.min + 1
    }

    fn extend(self, c: u32) -> Self {
        Self {
            min: self.min.min(c),
            max: self.max.max(c),
        }
    }
}

/// Index of the first band containing `c`.
pub fn band_index(bands: &[Band], c: u32) -> Option<usize> {
    bands.iter().position(|b| b.contains(c))
}

/// Folds one scan line into its dark runs.
///
/// Each cell is `(coordinate, state)`, where `state` is `None` for ink that
/// continues from the suppression neighbor. Such cells neither extend nor
/// close the open run. A run still open at the end of the line is dropped.
fn runs_on_line(cells: impl Iterator<Item = (u32, Option<bool>)>) -> Vec<Band> {
    let mut runs = Vec::new();
    let mut open: Option<Band> = None;
    for (c, state) in cells {
        match state {
            None => continue,
            Some(true) => {
                open = Some(match open {
                    Some(band) => band.extend(c),
                    None => Band::new(c, c),
                });
            }
            Some(false) => {
                if let Some(band) = open.take() {
                    runs.push(band);
                }
            }
        }
    }
    runs
}

/// First scan line, in iteration order, whose run count equals `expected`.
fn first_scan_with_bands<L, F>(lines: L, expected: usize, scan: F) -> Option<(u32, Vec<Band>)>
where
    L: IntoIterator<Item = u32>,
    F: Fn(u32) -> Vec<Band>,
{
    lines
        .into_iter()
        .map(|line| (line, scan(line)))
        .find(|(_, bands)| bands.len() == expected)
}

/// Locates the 12 punch-row bands.
///
/// Columns are scanned left to right, each from top to bottom, suppressing
/// ink whose left neighbor is ink, so a horizontal mark only counts in its
/// leftmost column.
pub(crate) fn detect_row_bands(ink: &InkMap<'_>) -> Result<Vec<Band>, SheetError> {
    let height = ink.height();
    let found = first_scan_with_bands(0..ink.width(), ROW_COUNT, |x| {
        runs_on_line((0..height).map(|y| (y, ink.leading_from_left(x, y))))
    });

    match found {
        Some((x, bands)) => {
            log::debug!("row bands taken from column x={x}: {bands:?}");
            Ok(bands)
        }
        None => {
            log::warn!("no column shows {ROW_COUNT} row bands");
            Err(SheetError::RowBands {
                expected: ROW_COUNT,
            })
        }
    }
}

/// Locates the `columns` column bands.
///
/// Rows are scanned bottom to top, each from left to right, suppressing ink
/// whose upper neighbor is ink. The accepted row carries one extra leading
/// band (the header tick), which is dropped.
pub(crate) fn detect_column_bands(
    ink: &InkMap<'_>,
    columns: usize,
) -> Result<Vec<Band>, SheetError> {
    let Some(with_header) = columns.checked_add(1) else {
        return Err(SheetError::ColumnBands { expected: columns });
    };
    let width = ink.width();
    let found = first_scan_with_bands((0..ink.height()).rev(), with_header, |y| {
        runs_on_line((0..width).map(|x| (x, ink.leading_from_above(x, y))))
    });

    match found {
        Some((y, bands)) => {
            log::debug!("column bands taken from row y={y} ({} bands)", bands.len());
            Ok(bands.into_iter().skip(1).collect())
        }
        None => {
            log::warn!("no row shows {with_header} column bands");
            Err(SheetError::ColumnBands { expected: columns })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const INK: Rgb<u8> = Rgb([0, 0, 0]);
    const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

    fn fill(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, INK);
            }
        }
    }

    #[test]
    fn runs_close_on_background_and_drop_open_tail() {
        let cells = [
            (0, Some(true)),
            (1, Some(true)),
            (2, Some(false)),
            (3, Some(true)),
            (4, None),
            (5, Some(true)),
            (6, Some(false)),
            (7, Some(true)),
        ];
        let runs = runs_on_line(cells.into_iter());
        assert_eq!(runs, vec![Band::new(0, 1), Band::new(3, 5)]);
    }

    #[test]
    fn fully_suppressed_run_is_not_a_band() {
        let cells = [(0, None), (1, None), (2, Some(false))];
        assert!(runs_on_line(cells.into_iter()).is_empty());
    }

    #[test]
    fn band_index_is_inclusive() {
        let bands = [Band::new(10, 30), Band::new(31, 50)];
        assert_eq!(band_index(&bands, 9), None);
        assert_eq!(band_index(&bands, 10), Some(0));
        assert_eq!(band_index(&bands, 30), Some(0));
        assert_eq!(band_index(&bands, 31), Some(1));
        assert_eq!(band_index(&bands, 50), Some(1));
        assert_eq!(band_index(&bands, 51), None);
    }

    #[test]
    fn row_bands_skip_columns_with_wrong_count() {
        // Column 0 carries a single tall smear; twelve bars start at x = 2.
        let mut img = RgbImage::from_pixel(8, 40, PAPER);
        fill(&mut img, 0, 0, 1, 30);
        for i in 0..12 {
            fill(&mut img, 2, 1 + i * 3, 4, 2);
        }
        let ink = InkMap::new(&img, 40);
        let bands = detect_row_bands(&ink).expect("row bands");
        assert_eq!(bands.len(), 12);
        assert_eq!(bands[0], Band::new(1, 2));
        assert_eq!(bands[11], Band::new(34, 35));
    }

    #[test]
    fn row_bands_fail_without_twelve_runs() {
        let mut img = RgbImage::from_pixel(5, 20, PAPER);
        for i in 0..5 {
            fill(&mut img, 0, i * 3, 5, 1);
        }
        let ink = InkMap::new(&img, 40);
        assert!(matches!(
            detect_row_bands(&ink),
            Err(SheetError::RowBands { expected: 12 })
        ));
    }

    #[test]
    fn column_bands_drop_header_and_use_bottom_most_match() {
        let mut img = RgbImage::from_pixel(30, 10, PAPER);
        // Header tick then two column ticks on the bottom row.
        fill(&mut img, 0, 9, 3, 1);
        fill(&mut img, 10, 9, 5, 1);
        fill(&mut img, 20, 9, 4, 1);
        // A row higher up with the same count must not win.
        fill(&mut img, 1, 2, 2, 1);
        fill(&mut img, 6, 2, 2, 1);
        fill(&mut img, 26, 2, 2, 1);
        let ink = InkMap::new(&img, 40);
        let bands = detect_column_bands(&ink, 2).expect("column bands");
        assert_eq!(bands, vec![Band::new(10, 14), Band::new(20, 23)]);
    }

    #[test]
    fn column_ticks_count_only_at_their_top_row() {
        let mut img = RgbImage::from_pixel(20, 10, PAPER);
        for x in [0, 6, 12] {
            fill(&mut img, x, 6, 3, 4);
        }
        let ink = InkMap::new(&img, 40);
        let bands = detect_column_bands(&ink, 2).expect("column bands");
        assert_eq!(bands, vec![Band::new(6, 8), Band::new(12, 14)]);
    }

    #[test]
    fn column_count_without_room_for_header_fails() {
        let img = RgbImage::from_pixel(4, 4, PAPER);
        let ink = InkMap::new(&img, 40);
        assert_eq!(
            detect_column_bands(&ink, usize::MAX),
            Err(SheetError::ColumnBands {
                expected: usize::MAX
            })
        );
    }
}
