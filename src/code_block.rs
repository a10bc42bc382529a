//! Rasterization of highlighted code into a line-numbered bitmap.
//!
//! ```text
//!  pad  gutter     sep  code                                  pad
//! +---+----------+-+-----------------------------------------+---+
//! |   | 1        | |  let x = 1;                             |   |
//! |   | 2        | |  println!("{x}");                       |   |
//! +---+----------+-+-----------------------------------------+---+
//! ```
//!
//! The gutter is two `M` widths plus [`LINE_NUMBER_PAD`] on each side.
//! Every line is `font height + line_padding` tall. The whole block, gutter
//! included, is filled with the canvas background; the code style only
//! colors the text.

use image::RgbImage;

use crate::color::Color;
use crate::config::CodeConfig;
use crate::geometry::{PointPx, RectPx};
use crate::highlight::HighlightedCode;
use crate::layer::raster::fill_rect;
use crate::text::Font;

/// Padding around the whole block.
pub const IMAGE_PAD: u32 = 10;
/// Digits reserved for line numbers.
pub const LINE_NUMBER_CHARS: usize = 2;
/// Padding on each side of the line numbers.
pub const LINE_NUMBER_PAD: u32 = 6;

fn line_number_color() -> Color {
    Color::new(0x88 as f32 / 255.0, 0x88 as f32 / 255.0, 0x66 as f32 / 255.0, 1.0)
}

/// Draws `code` with `config`'s font settings.
///
/// `background` fills the whole block, line-number column included.
pub fn render_code_block(code: &HighlightedCode, font: &Font, config: &CodeConfig, background: Color) -> RgbImage {
    let size = config.font_size;
    let em = font.advance('M', size);
    let gutter_width = (em * LINE_NUMBER_CHARS as f32).ceil() as u32 + LINE_NUMBER_PAD * 2;
    let line_height = font.line_height(size) + config.line_padding;

    let line_widths: Vec<u32> = code
        .lines
        .iter()
        .map(|line| line.iter().map(|span| font.measure(&span.text, size).width).sum())
        .collect();
    let max_width = line_widths.iter().copied().max().unwrap_or(0);
    let lines = code.lines.len().max(1) as u32;

    let width = max_width + gutter_width + IMAGE_PAD * 2;
    let height = line_height * lines + IMAGE_PAD * 2;

    let mut block = RgbImage::from_pixel(width, height, background.to_rgb8());

    let separator = (IMAGE_PAD + gutter_width - LINE_NUMBER_PAD) as i32;
    fill_rect(&mut block, RectPx::new(separator, 0, 1, height), line_number_color());

    let text_x = (IMAGE_PAD + gutter_width) as i32;
    for (index, line) in code.lines.iter().enumerate() {
        let y = (IMAGE_PAD + index as u32 * line_height) as i32;
        let number = format!("{:>width$}", index + 1, width = LINE_NUMBER_CHARS);
        font.draw(&mut block, &number, size, PointPx::new(IMAGE_PAD as i32, y), line_number_color());

        let mut x = text_x;
        for span in line {
            font.draw(&mut block, &span.text, size, PointPx::new(x, y), span.color);
            x += font.measure(&span.text, size).width as i32;
        }
    }

    block
}
