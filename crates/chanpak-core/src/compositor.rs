//! Compositing: turning a qualified mode and its source maps into one
//! packed image.
//!
//! Each base type is loaded from disk once per (set, mode) and resized to
//! the target resolution; slots referencing the same type re-extract from
//! the cached image. Missing or unreadable maps are synthesized as flat
//! fills with the type's default value, so compositing itself never fails.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chanpak_config::{Component, MapKind, PackingMode, SlotSource, TextureTypeTable};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::image_io;
use crate::resolve::resolution_to_suffix;
use crate::set_builder::TextureMapEntry;

/// Everything needed to composite one output for one set.
#[derive(Debug)]
pub struct ComposeInput<'a> {
    pub set_name: &'a str,
    pub mode: &'a PackingMode,
    /// Source maps keyed by lowercase base type name.
    pub maps: &'a BTreeMap<String, &'a TextureMapEntry>,
    pub target: (u32, u32),
    pub table: &'a TextureTypeTable,
}

/// A source map that failed to decode and was replaced by a flat fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug)]
pub struct ComposeResult {
    pub image: DynamicImage,
    /// Output filename without extension, e.g. `Wall_ARM_2K`.
    pub file_stem: String,
    /// Canonical names of types that had to be synthesized.
    pub synthesized_types: Vec<String>,
    pub load_failures: Vec<LoadFailure>,
}

/// Composite the packed image for one (set, mode) pair.
pub fn compose(input: &ComposeInput<'_>) -> ComposeResult {
    let mut loaded: BTreeMap<String, DynamicImage> = BTreeMap::new();
    let mut load_failures = Vec::new();
    let mut synthesized_types = Vec::new();

    for (type_key, entry) in input.maps {
        match image_io::load(&entry.path) {
            Ok(image) => {
                let image = if (image.width(), image.height()) != input.target {
                    image_io::resize_to(&image, input.target)
                } else {
                    image
                };
                loaded.insert(type_key.clone(), image);
            }
            Err(err) => {
                load_failures.push(LoadFailure {
                    path: entry.path.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    // Every referenced type must end up loaded; fill the gaps.
    for (_, source) in input.mode.slot_sources() {
        let key = source.base_lower();
        if loaded.contains_key(&key) {
            continue;
        }
        let fill = input
            .table
            .get(&source.base)
            .map(|t| t.default_fill)
            .unwrap_or(128);
        loaded.insert(key, image_io::flat_fill(input.target, fill));
        if !synthesized_types.contains(&source.base) {
            synthesized_types.push(source.base.clone());
        }
    }

    let channel = |source: &SlotSource| {
        let image = &loaded[&source.base_lower()];
        let kind = input
            .table
            .get(&source.base)
            .map(|t| t.kind)
            .unwrap_or(MapKind::Grayscale);
        extract_slot_channel(image, source.component, kind)
    };

    let r = channel(&input.mode.r);
    let g = channel(&input.mode.g);
    let b = channel(&input.mode.b);
    let (width, height) = input.target;

    let image = match &input.mode.a {
        Some(alpha_source) => {
            let a = channel(alpha_source);
            DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
                image::Rgba([
                    r.get_pixel(x, y).0[0],
                    g.get_pixel(x, y).0[0],
                    b.get_pixel(x, y).0[0],
                    a.get_pixel(x, y).0[0],
                ])
            }))
        }
        None => DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                r.get_pixel(x, y).0[0],
                g.get_pixel(x, y).0[0],
                b.get_pixel(x, y).0[0],
            ])
        })),
    };

    ComposeResult {
        image,
        file_stem: output_file_stem(input),
        synthesized_types,
        load_failures,
    }
}

/// `{set}_{mode suffix}`, plus a resolution bucket when any source filename
/// declared one.
fn output_file_stem(input: &ComposeInput<'_>) -> String {
    let any_declared = input.maps.values().any(|m| m.size_suffix.is_some());
    if any_declared {
        format!(
            "{}_{}_{}",
            input.set_name,
            input.mode.suffix,
            resolution_to_suffix(input.target)
        )
    } else {
        format!("{}_{}", input.set_name, input.mode.suffix)
    }
}

/// Reduce one source image to the single channel a slot asks for.
///
/// Grayscale images pass through. Color images yield the requested
/// component when one is named; otherwise a grayscale-typed map saved as
/// RGB uses its red channel when red and green agree everywhere, and
/// anything else falls back to Rec. 601 luminance.
fn extract_slot_channel(
    image: &DynamicImage,
    component: Option<Component>,
    kind: MapKind,
) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(buf) => buf.clone(),
        DynamicImage::ImageLumaA8(_) => image.to_luma8(),
        _ => {
            let rgba = image.to_rgba8();
            if let Some(component) = component {
                let index = match component {
                    Component::R => 0,
                    Component::G => 1,
                    Component::B => 2,
                };
                return GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                    image::Luma([rgba.get_pixel(x, y).0[index]])
                });
            }
            if kind == MapKind::Grayscale && r_and_g_identical(&rgba) {
                return GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                    image::Luma([rgba.get_pixel(x, y).0[0]])
                });
            }
            GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                let p = rgba.get_pixel(x, y).0;
                let luma =
                    0.299 * f32::from(p[0]) + 0.587 * f32::from(p[1]) + 0.114 * f32::from(p[2]);
                image::Luma([luma.round().clamp(0.0, 255.0) as u8])
            })
        }
    }
}

/// Only red and green are compared; blue may diverge (some export tools
/// write grayscale data plus an unrelated blue channel).
fn r_and_g_identical(rgba: &RgbaImage) -> bool {
    rgba.pixels().all(|p| p.0[0] == p.0[1])
}
