//! Off-screen 128×64 monochrome frame and the fixed text-row layout.
//!
//! # Layout
//!
//! | Row | y (px) | Use |
//! |-----|--------|-----|
//! | 0 | -2 | Header (address) |
//! | 2–4 | 16–34 | Page body |
//! | 6 | 52 | Temperature / spinner footer |
//!
//! Row `n` is drawn with its top edge at `n × 9 − 2` and a 4 px left margin.
//! Pixels outside the canvas are silently clipped.

use std::convert::Infallible;

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::ascii::FONT_6X9;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Canvas width in pixels.
pub const FRAME_WIDTH: u32 = 128;
/// Canvas height in pixels.
pub const FRAME_HEIGHT: u32 = 64;
/// Number of addressable text rows.
pub const TEXT_ROWS: usize = 8;

const ROW_PITCH: i32 = 9;
const ROW_OFFSET: i32 = -2;
const LEFT_MARGIN: i32 = 4;
const FRAME_BYTES: usize = (FRAME_WIDTH * FRAME_HEIGHT / 8) as usize;

/// Immutable layout and font shared by everything that draws.
#[derive(Clone, Copy)]
pub struct RenderContext {
    /// Fixed-size bitmap font for every row.
    pub font: &'static MonoFont<'static>,
    pub row_pitch: i32,
    pub row_offset: i32,
    pub left_margin: i32,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            font: &FONT_6X9,
            row_pitch: ROW_PITCH,
            row_offset: ROW_OFFSET,
            left_margin: LEFT_MARGIN,
        }
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("font", &self.font.character_size)
            .field("row_pitch", &self.row_pitch)
            .field("row_offset", &self.row_offset)
            .field("left_margin", &self.left_margin)
            .finish()
    }
}

impl RenderContext {
    /// Top-left corner of the text for `row`.
    #[must_use]
    pub const fn row_origin(&self, row: usize) -> Point {
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let y = row as i32 * self.row_pitch + self.row_offset;
        Point::new(self.left_margin, y)
    }

    /// Full-width band occupied by `row`.
    #[must_use]
    pub const fn row_band(&self, row: usize) -> Rectangle {
        let origin = self.row_origin(row);
        #[allow(clippy::cast_sign_loss)]
        let height = self.row_pitch as u32;
        Rectangle::new(Point::new(0, origin.y), Size::new(FRAME_WIDTH, height))
    }
}

/// Monochrome pixel buffer plus a shadow copy of the text on each row.
#[derive(Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    bits: [u8; FRAME_BYTES],
    rows: [Option<String>; TEXT_ROWS],
}

impl Default for DisplayFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DisplayFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayFrame")
            .field("lit_pixels", &self.lit_count())
            .field("rows", &self.rows)
            .finish()
    }
}

impl DisplayFrame {
    /// A blank frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bits: [0; FRAME_BYTES],
            rows: Default::default(),
        }
    }

    /// Set every pixel to the background and forget all row text.
    pub fn reset(&mut self) {
        self.bits = [0; FRAME_BYTES];
        self.rows = Default::default();
    }

    /// Whether the pixel at (`x`, `y`) is lit. Out-of-range reads are dark.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        Self::index(x, y).is_some_and(|(byte, mask)| self.bits[byte] & mask != 0)
    }

    /// Every pixel is at the background value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.bits.iter().all(|b| *b == 0)
    }

    /// Number of lit pixels.
    #[must_use]
    pub fn lit_count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Lit pixels inside `band`.
    #[must_use]
    pub fn lit_count_in_band(&self, band: &Rectangle) -> u32 {
        let mut lit = 0;
        for p in band.points() {
            if let (Ok(x), Ok(y)) = (u32::try_from(p.x), u32::try_from(p.y))
                && self.pixel(x, y)
            {
                lit += 1;
            }
        }
        lit
    }

    /// Coordinates of every lit pixel, row-major.
    pub fn lit_pixels(&self) -> impl Iterator<Item = Point> + '_ {
        (0..FRAME_HEIGHT).flat_map(move |y| {
            (0..FRAME_WIDTH).filter_map(move |x| {
                #[allow(clippy::cast_possible_wrap)]
                let point = Point::new(x as i32, y as i32);
                self.pixel(x, y).then_some(point)
            })
        })
    }

    /// Text last written to `row`, if any.
    #[must_use]
    pub fn row_text(&self, row: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.as_deref())
    }

    /// All row texts, top to bottom.
    #[must_use]
    pub fn text_rows(&self) -> Vec<Option<&str>> {
        self.rows.iter().map(|r| r.as_deref()).collect()
    }

    pub(crate) fn set_row_text(&mut self, row: usize, text: &str) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = Some(text.to_string());
        }
    }

    fn set(&mut self, x: u32, y: u32, on: bool) {
        if let Some((byte, mask)) = Self::index(x, y) {
            if on {
                self.bits[byte] |= mask;
            } else {
                self.bits[byte] &= !mask;
            }
        }
    }

    fn index(x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= FRAME_WIDTH || y >= FRAME_HEIGHT {
            return None;
        }
        let bit = (y * FRAME_WIDTH + x) as usize;
        Some((bit / 8, 1 << (bit % 8)))
    }
}

impl OriginDimensions for DisplayFrame {
    fn size(&self) -> Size {
        Size::new(FRAME_WIDTH, FRAME_HEIGHT)
    }
}

impl DrawTarget for DisplayFrame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                self.set(x, y, color.is_on());
            }
        }
        Ok(())
    }
}
