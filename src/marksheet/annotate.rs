//! Overlay of the detected grid on the scan, for checking mis-reads.

use image::{DynamicImage, Rgba, RgbImage, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use super::SheetReading;
use super::marks::row_index;

const COLOR_ROW: Rgba<u8> = Rgba([60, 110, 220, 255]);
const COLOR_COLUMN: Rgba<u8> = Rgba([110, 170, 90, 255]);
const COLOR_PUNCH: Rgba<u8> = Rgba([230, 130, 30, 255]);

/// Draws row bands, column bands and every punched cell over a copy of
/// `source`.
pub fn annotate_sheet(source: &RgbImage, reading: &SheetReading) -> RgbaImage {
    let mut canvas = DynamicImage::ImageRgb8(source.clone()).to_rgba8();
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return canvas;
    }

    for band in &reading.row_bands {
        let rect = Rect::at(0, band.min as i32).of_size(width, band.span());
        draw_hollow_rect_mut(&mut canvas, rect, COLOR_ROW);
    }
    for band in &reading.column_bands {
        let rect = Rect::at(band.min as i32, 0).of_size(band.span(), height);
        draw_hollow_rect_mut(&mut canvas, rect, COLOR_COLUMN);
    }

    for (column, pattern) in reading.column_bands.iter().zip(&reading.patterns) {
        for &label in pattern {
            let Some(row) = row_index(label).and_then(|i| reading.row_bands.get(i)) else {
                continue;
            };
            let rect = Rect::at(column.min as i32, row.min as i32)
                .of_size(column.span(), row.span());
            draw_filled_rect_mut(&mut canvas, rect, COLOR_PUNCH);
        }
    }

    canvas
}
