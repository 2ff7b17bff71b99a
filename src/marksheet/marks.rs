use super::band::{Band, band_index};
use super::config::ROW_COUNT;
use super::pixel::InkMap;
use crate::punch_decode::PunchPattern;

/// Maps a row band index (top to bottom) to its punch-row label.
///
/// The two top rows are the zone punches 12 and 11; the remaining ten are
/// the digit rows 0 through 9. Indices past the last row have no label.
pub fn punch_row(index: usize) -> Option<u8> {
    match index {
        0 => Some(12),
        1 => Some(11),
        i if i < ROW_COUNT => u8::try_from(i - 2).ok(),
        _ => None,
    }
}

/// Inverse of [`punch_row`]; `None` for labels that are not card rows.
pub fn row_index(label: u8) -> Option<usize> {
    match label {
        12 => Some(0),
        11 => Some(1),
        0..=9 => Some(label as usize + 2),
        _ => None,
    }
}

/// Reads the punched rows of every column band.
///
/// Every pixel column is sampled. Ink continuing from the pixel to its left
/// is ignored, so a mark registers in its leftmost pixel column only. Within
/// a column band the first sample is kept, unless it saw nothing and a later
/// sample of the same band did.
pub(crate) fn extract_patterns(
    ink: &InkMap<'_>,
    row_bands: &[Band],
    column_bands: &[Band],
) -> Vec<PunchPattern> {
    let mut patterns: Vec<PunchPattern> = Vec::with_capacity(column_bands.len());
    let mut last_band: Option<usize> = None;

    for x in 0..ink.width() {
        let rows = sample_column(ink, x, row_bands);

        let Some(band) = band_index(column_bands, x) else {
            continue;
        };

        if last_band == Some(band) {
            if let Some(existing) = patterns.get_mut(band)
                && existing.is_empty()
                && !rows.is_empty()
            {
                *existing = rows;
            }
        } else {
            patterns.push(rows);
            last_band = Some(band);
        }
    }

    patterns
}

fn sample_column(ink: &InkMap<'_>, x: u32, row_bands: &[Band]) -> PunchPattern {
    let mut rows = PunchPattern::new();
    let mut connected = false;

    for y in 0..ink.height() {
        match ink.leading_from_left(x, y) {
            None => continue,
            Some(true) => {
                if !connected {
                    if let Some(label) = band_index(row_bands, y).and_then(punch_row) {
                        rows.push(label);
                    }
                    connected = true;
                }
            }
            Some(false) => connected = false,
        }
    }

    rows
}
