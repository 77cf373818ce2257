//! Text at arbitrary angles.
//!
//! plotters only turns text by quarter turns, so labels are rasterised on a
//! scratch buffer first and the pixels are rotated onto the chart.

use super::ChartError;
use image::{GrayImage, Luma, Rgb, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const SCRATCH_PAD: u32 = 2;

/// Coverage mask of `text`, 255 where a glyph is fully inked.
pub fn rasterize_text(text: &str, font: &FontDesc) -> Result<GrayImage, ChartError> {
    if text.is_empty() {
        return Ok(GrayImage::new(0, 0));
    }

    let (text_w, text_h) = font
        .box_size(text)
        .map_err(|e| ChartError::Drawing(e.to_string()))?;
    let w = text_w + 2 * SCRATCH_PAD;
    let h = text_h + 2 * SCRATCH_PAD;

    // Black glyphs on white
    let mut buffer = vec![255u8; w as usize * h as usize * 3];
    {
        let area = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        area.draw(&Text::new(
            text,
            (SCRATCH_PAD as i32, SCRATCH_PAD as i32),
            font.color(&BLACK).pos(Pos::new(HPos::Left, VPos::Top)),
        ))?;
        area.present()?;
    }

    Ok(GrayImage::from_fn(w, h, |x, y| {
        let i = (y as usize * w as usize + x as usize) * 3;
        let darkest = buffer[i..i + 3].iter().copied().min().unwrap_or(255);
        Luma([255 - darkest])
    }))
}

/// Blend `mask` onto `img` in `color`, turned counter-clockwise by `degrees`.
///
/// The top-right corner of the unrotated text lands on `anchor`, so the text
/// ends at the anchor and runs away from it down to the left.
pub fn blit_rotated(
    img: &mut RgbImage,
    mask: &GrayImage,
    anchor: (i32, i32),
    degrees: f64,
    color: Rgb<u8>,
) {
    let (w, h) = (mask.width() as f64, mask.height() as f64);
    if w == 0.0 || h == 0.0 {
        return;
    }

    let (sin, cos) = degrees.to_radians().sin_cos();

    // Corners of the text relative to the anchor, after rotation
    let corners = [(-w, 0.0), (-w, h), (0.0, h), (0.0, 0.0)]
        .map(|(x, y)| (x * cos + y * sin, -x * sin + y * cos));
    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min).floor() as i32;
    let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max).ceil() as i32;
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min).floor() as i32;
    let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max).ceil() as i32;

    for dy in min_y..=max_y {
        for dx in min_x..=max_x {
            let dest_x = anchor.0 + dx;
            let dest_y = anchor.1 + dy;
            if dest_x < 0
                || dest_y < 0
                || dest_x as u32 >= img.width()
                || dest_y as u32 >= img.height()
            {
                continue;
            }

            // Inverse rotation of the pixel centre back into the scratch text
            let fx = dx as f64 + 0.5;
            let fy = dy as f64 + 0.5;
            let sx = fx * cos - fy * sin + w;
            let sy = fx * sin + fy * cos;
            if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                continue;
            }

            let alpha = mask.get_pixel(sx as u32, sy as u32)[0] as u16;
            if alpha == 0 {
                continue;
            }

            let dest = img.get_pixel_mut(dest_x as u32, dest_y as u32);
            let bg = *dest;
            for c in 0..3 {
                dest[c] = ((color[c] as u16 * alpha + bg[c] as u16 * (255 - alpha)) / 255) as u8;
            }
        }
    }
}
