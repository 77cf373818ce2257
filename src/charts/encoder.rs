//! PNG encoding of rendered chart buffers.

use super::ChartError;
use image::RgbImage;

const METERS_PER_INCH: f64 = 0.0254;

/// Pixels per meter for a dots-per-inch resolution, as stored in `pHYs`.
pub fn pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// Encode an RGB image as PNG and record the print resolution.
pub fn encode_png(img: &RgbImage, dpi: u32) -> Result<Vec<u8>, ChartError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, img.width(), img.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let ppu = pixels_per_meter(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppu,
            yppu: ppu,
            unit: png::Unit::Meter,
        }));

        let mut writer = encoder.write_header()?;
        writer.write_image_data(img.as_raw())?;
        writer.finish()?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;

    #[test]
    fn ppm_for_common_resolutions() {
        assert_eq!(pixels_per_meter(300), 11811);
        assert_eq!(pixels_per_meter(72), 2835);
    }

    #[test]
    fn encoded_png_keeps_size_and_pixels() {
        let img = RgbImage::from_pixel(8, 4, Rgb([0x4c, 0x72, 0xb0]));
        let bytes = encode_png(&img, 300).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 4));
        assert_eq!(decoded.get_pixel(3, 2), &Rgb([0x4c, 0x72, 0xb0]));
    }

    #[test]
    fn encoded_png_records_dpi() {
        let img = RgbImage::new(2, 2);
        let bytes = encode_png(&img, 300).unwrap();

        let reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
        let dims = reader.info().pixel_dims.unwrap();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }
}
