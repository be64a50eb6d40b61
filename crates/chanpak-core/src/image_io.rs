//! Raster I/O: probing, loading, resizing and saving source maps.
//!
//! Everything downstream works in 8 bits per channel, so 16-bit and float
//! sources get reduced on load. Float sources (EXR) hold linear light and
//! are run through the sRGB transfer curve on the way down, matching what
//! image editors show when opening the file at gamma 1.0.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Read dimensions from the file header without decoding pixel data.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), ImageIoError> {
    Ok(image::image_dimensions(path)?)
}

/// Load an image and normalize it to 8 bits per channel.
pub fn load(path: &Path) -> Result<DynamicImage, ImageIoError> {
    Ok(reduce_bit_depth(image::open(path)?))
}

/// Reduce 16-bit and float images to their 8-bit equivalents. High-byte
/// truncation for integer sources keeps flat control maps exact.
fn reduce_bit_depth(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma16(buf) => {
            let out = GrayImage::from_fn(buf.width(), buf.height(), |x, y| {
                image::Luma([(buf.get_pixel(x, y).0[0] >> 8) as u8])
            });
            DynamicImage::ImageLuma8(out)
        }
        DynamicImage::ImageLumaA16(buf) => {
            let out = image::GrayAlphaImage::from_fn(buf.width(), buf.height(), |x, y| {
                let p = buf.get_pixel(x, y).0;
                image::LumaA([(p[0] >> 8) as u8, (p[1] >> 8) as u8])
            });
            DynamicImage::ImageLumaA8(out)
        }
        DynamicImage::ImageRgb16(buf) => {
            let out = RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
                let p = buf.get_pixel(x, y).0;
                image::Rgb([(p[0] >> 8) as u8, (p[1] >> 8) as u8, (p[2] >> 8) as u8])
            });
            DynamicImage::ImageRgb8(out)
        }
        DynamicImage::ImageRgba16(buf) => {
            let out = RgbaImage::from_fn(buf.width(), buf.height(), |x, y| {
                let p = buf.get_pixel(x, y).0;
                image::Rgba([
                    (p[0] >> 8) as u8,
                    (p[1] >> 8) as u8,
                    (p[2] >> 8) as u8,
                    (p[3] >> 8) as u8,
                ])
            });
            DynamicImage::ImageRgba8(out)
        }
        DynamicImage::ImageRgb32F(buf) => {
            let out = RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
                let p = buf.get_pixel(x, y).0;
                image::Rgb([srgb_encode(p[0]), srgb_encode(p[1]), srgb_encode(p[2])])
            });
            DynamicImage::ImageRgb8(out)
        }
        DynamicImage::ImageRgba32F(buf) => {
            let out = RgbaImage::from_fn(buf.width(), buf.height(), |x, y| {
                let p = buf.get_pixel(x, y).0;
                image::Rgba([
                    srgb_encode(p[0]),
                    srgb_encode(p[1]),
                    srgb_encode(p[2]),
                    // Alpha is coverage, not light; no transfer curve.
                    (p[3].clamp(0.0, 1.0) * 255.0).round() as u8,
                ])
            });
            DynamicImage::ImageRgba8(out)
        }
        other => other,
    }
}

/// Linear [0, 1] value to an 8-bit sRGB-encoded one. Out-of-range HDR
/// values clamp to the displayable range.
fn srgb_encode(linear: f32) -> u8 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

/// Bilinear resize to an exact size, ignoring aspect ratio.
pub fn resize_to(image: &DynamicImage, size: (u32, u32)) -> DynamicImage {
    image.resize_exact(size.0, size.1, FilterType::Triangle)
}

/// A flat single-value grayscale image, used for synthesized maps.
pub fn flat_fill(size: (u32, u32), value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(size.0, size.1, image::Luma([value])))
}

/// Save with the format inferred from the path's extension.
pub fn save(image: &DynamicImage, path: &Path) -> Result<(), ImageIoError> {
    Ok(image.save(path)?)
}
