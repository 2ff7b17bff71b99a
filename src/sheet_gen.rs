//! Renders synthetic mark sheets that [`crate::read_sheet`] reads back.
//!
//! The sheet carries everything the reader's geometry search looks for:
//! - twelve row-marker bars starting at x = 0, one per punch row;
//! - a header tick plus one tick per column along the bottom edge;
//! - a filled block for every punch, aligned to the top-left of its cell.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::marksheet::ROW_COUNT;
use crate::marksheet::marks::row_index;
use crate::punch_decode::{DefinitionTable, PunchPattern};

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, thiserror::Error)]
pub enum SheetGenError {
    #[error("{found} columns do not fit a {columns}-column sheet")]
    TooManyColumns { columns: usize, found: usize },

    #[error("column {column}: {label} is not a punch row")]
    BadRowLabel { column: usize, label: u8 },

    #[error("no definition encodes {0:?}")]
    Unencodable(char),

    #[error("layout leaves no room between bands")]
    DegenerateLayout,

    #[error("layout is too large to draw")]
    OversizedLayout,
}

/// Pixel geometry of a rendered sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub columns: usize,
    /// Width of the row-marker bars and of the header tick.
    pub marker_width: u32,
    pub top_margin: u32,
    pub row_height: u32,
    pub row_gap: u32,
    /// X of the first column band.
    pub grid_left: u32,
    pub column_width: u32,
    pub column_gap: u32,
    /// Space between the last row band and the column ticks.
    pub bottom_gap: u32,
    pub tick_height: u32,
    pub right_margin: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            columns: crate::marksheet::config::DEFAULT_COLUMNS,
            marker_width: 8,
            top_margin: 10,
            row_height: 6,
            row_gap: 4,
            grid_left: 16,
            column_width: 5,
            column_gap: 3,
            bottom_gap: 10,
            tick_height: 4,
            right_margin: 6,
        }
    }
}

impl SheetLayout {
    pub fn for_columns(columns: usize) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Image width in pixels, `None` if it does not fit the drawing range.
    pub fn width(&self) -> Option<u32> {
        let columns = u32::try_from(self.columns).ok()?;
        let pitch = self.column_width.checked_add(self.column_gap)?;
        columns
            .checked_mul(pitch)?
            .checked_add(self.grid_left)?
            .checked_add(self.right_margin)?
            .checked_sub(self.column_gap)
            .filter(|&w| i32::try_from(w).is_ok())
    }

    /// Image height in pixels, `None` if it does not fit the drawing range.
    pub fn height(&self) -> Option<u32> {
        let pitch = self.row_height.checked_add(self.row_gap)?;
        (ROW_COUNT as u32)
            .checked_mul(pitch)?
            .checked_add(self.top_margin)?
            .checked_add(self.bottom_gap)?
            .checked_add(self.tick_height)?
            .checked_sub(self.row_gap)
            .filter(|&h| i32::try_from(h).is_ok())
    }

    // Row and column offsets stay below `height()`/`width()`, which
    // `validate` has already bounded.
    fn row_top(&self, row: usize) -> u32 {
        self.top_margin + row as u32 * (self.row_height + self.row_gap)
    }

    fn column_left(&self, column: usize) -> u32 {
        self.grid_left + column as u32 * (self.column_width + self.column_gap)
    }

    fn validate(&self) -> Result<(u32, u32), SheetGenError> {
        let separated = self.row_gap > 0
            && self.column_gap > 0
            && self.bottom_gap > 0
            && self.right_margin > 0
            && self.grid_left > self.marker_width;
        let sized = self.marker_width > 0
            && self.row_height > 0
            && self.column_width > 0
            && self.tick_height > 0;
        if !(separated && sized && self.columns > 0) {
            return Err(SheetGenError::DegenerateLayout);
        }
        self.width()
            .zip(self.height())
            .ok_or(SheetGenError::OversizedLayout)
    }
}

/// Draws a sheet with `patterns` punched, left to right. Columns beyond
/// `patterns.len()` stay blank.
pub fn render_sheet(
    layout: &SheetLayout,
    patterns: &[PunchPattern],
) -> Result<RgbImage, SheetGenError> {
    let (width, height) = layout.validate()?;
    if patterns.len() > layout.columns {
        return Err(SheetGenError::TooManyColumns {
            columns: layout.columns,
            found: patterns.len(),
        });
    }

    let mut img = RgbImage::from_pixel(width, height, PAPER);

    for row in 0..ROW_COUNT {
        let rect = Rect::at(0, layout.row_top(row) as i32)
            .of_size(layout.marker_width, layout.row_height);
        draw_filled_rect_mut(&mut img, rect, INK);
    }

    let tick_top = (height - layout.tick_height) as i32;
    draw_filled_rect_mut(
        &mut img,
        Rect::at(0, tick_top).of_size(layout.marker_width, layout.tick_height),
        INK,
    );
    for column in 0..layout.columns {
        let rect = Rect::at(layout.column_left(column) as i32, tick_top)
            .of_size(layout.column_width, layout.tick_height);
        draw_filled_rect_mut(&mut img, rect, INK);
    }

    for (column, pattern) in patterns.iter().enumerate() {
        for &label in pattern {
            let row = row_index(label).ok_or(SheetGenError::BadRowLabel { column, label })?;
            let rect = Rect::at(layout.column_left(column) as i32, layout.row_top(row) as i32)
                .of_size(layout.column_width, layout.row_height);
            draw_filled_rect_mut(&mut img, rect, INK);
        }
    }

    Ok(img)
}

/// Looks up each character of `text` in `table`. Spaces become blank
/// columns.
pub fn encode_text(table: &DefinitionTable, text: &str) -> Result<Vec<PunchPattern>, SheetGenError> {
    text.chars()
        .map(|ch| {
            let mut buf = [0u8; 4];
            table
                .pattern_for(ch.encode_utf8(&mut buf))
                .map(<[u8]>::to_vec)
                .ok_or(SheetGenError::Unencodable(ch))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_dimensions() {
        let layout = SheetLayout::for_columns(2);
        // 16 + 2 * 8 - 3 + 6
        assert_eq!(layout.width(), Some(35));
        // 10 + 12 * 10 - 4 + 10 + 4
        assert_eq!(layout.height(), Some(140));
    }

    #[test]
    fn oversized_layouts_are_rejected() {
        let wide = SheetLayout::for_columns(usize::MAX);
        assert_eq!(wide.width(), None);
        assert!(matches!(
            render_sheet(&wide, &[]),
            Err(SheetGenError::OversizedLayout)
        ));

        let tall = SheetLayout {
            row_height: u32::MAX,
            ..SheetLayout::for_columns(2)
        };
        assert_eq!(tall.height(), None);
        assert!(matches!(
            render_sheet(&tall, &[]),
            Err(SheetGenError::OversizedLayout)
        ));

        let just_too_wide = SheetLayout {
            column_width: i32::MAX as u32,
            ..SheetLayout::for_columns(1)
        };
        assert!(matches!(
            render_sheet(&just_too_wide, &[]),
            Err(SheetGenError::OversizedLayout)
        ));
    }

    #[test]
    fn punches_land_in_their_cells() {
        let layout = SheetLayout::for_columns(2);
        let img = render_sheet(&layout, &[vec![12, 9]]).unwrap();
        // Column 0 left edge x = 16; row 12 top y = 10; row 9 top y = 120.
        assert_eq!(*img.get_pixel(16, 10), INK);
        assert_eq!(*img.get_pixel(16, 120), INK);
        assert_eq!(*img.get_pixel(16, 20), PAPER);
        // Column 1 is blank.
        assert_eq!(*img.get_pixel(24, 10), PAPER);
    }

    #[test]
    fn rejects_bad_input() {
        let layout = SheetLayout::for_columns(1);
        assert!(matches!(
            render_sheet(&layout, &[vec![], vec![]]),
            Err(SheetGenError::TooManyColumns { columns: 1, found: 2 })
        ));
        assert!(matches!(
            render_sheet(&layout, &[vec![10]]),
            Err(SheetGenError::BadRowLabel { column: 0, label: 10 })
        ));
        let cramped = SheetLayout {
            column_gap: 0,
            ..layout
        };
        assert!(matches!(
            render_sheet(&cramped, &[]),
            Err(SheetGenError::DegenerateLayout)
        ));
    }

    #[test]
    fn encode_maps_spaces_to_blank_columns() {
        let table = DefinitionTable::parse("12,1\tA\n0\t0\n").unwrap();
        let patterns = encode_text(&table, "A 0").unwrap();
        assert_eq!(patterns, vec![vec![12, 1], vec![], vec![0]]);
        assert!(matches!(
            encode_text(&table, "B"),
            Err(SheetGenError::Unencodable('B'))
        ));
    }
}
