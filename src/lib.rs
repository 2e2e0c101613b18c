use std::path::PathBuf;

use image::{DynamicImage, ImageReader};
use js_sys::{Array, Object, Reflect, Uint8Array};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod color;
pub mod config;
pub mod entries;
pub mod error;
pub mod frequency;
pub mod reduce;
pub mod report;
pub mod select;
pub mod swatch;

pub use color::{Color, ParseColorError, distance};
pub use config::{Config, ExtractOptions};
pub use entries::{Palette, PaletteEntry};
pub use error::{ConfigError, Error, PaletteError};
pub use frequency::{IgnoreList, ScanStats, scan};
pub use reduce::{Removal, distinctiveness, reduce};
pub use report::{LogObserver, Observer};
pub use select::select;

/// Outcome of a palette extraction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Extraction {
    pub stats: ScanStats,
    /// Colors that passed the minimum-percentage filter, before reduction.
    pub candidates: usize,
    pub palette: Palette,
    /// Colors dropped by reduction, in removal order.
    pub removed: Vec<Removal>,
}

// ------------------------------------------------------------
// Extraction pipeline
// ------------------------------------------------------------

/// Extract a representative palette from an already decoded image.
///
/// Steps performed:
/// 1. Validate `options` (before touching any pixel).
/// 2. Count colors, skipping pixels near an ignored color.
/// 3. Keep colors covering at least `min_pixel_percentage` of the counted pixels.
/// 4. Drop the least distinct colors until at most `max_colors` remain.
pub fn extract<O: Observer + ?Sized>(
    image: &DynamicImage,
    options: &ExtractOptions,
    observer: &mut O,
) -> Result<Extraction, Error> {
    options.validate()?;

    let rgba = image.to_rgba8();
    let (frequencies, stats) = scan(&rgba, &options.ignore_list());
    observer.scanned(&stats);

    let mut palette = select(&frequencies, options.min_pixel_percentage);
    let candidates = palette.len();
    tracing::debug!(
        unique = frequencies.len(),
        candidates,
        min_pixel_percentage = options.min_pixel_percentage,
        "selected candidate colors"
    );

    let removed = reduce(&mut palette, options.max_colors, observer)?;
    observer.finished(&palette);

    Ok(Extraction {
        stats,
        candidates,
        palette,
        removed,
    })
}

/// Decode `input` and run [`extract`] on it.
pub fn extract_palette_bytes<O: Observer + ?Sized>(
    input: &[u8],
    options: &ExtractOptions,
    observer: &mut O,
) -> Result<Extraction, Error> {
    // Reject bad options before paying for the decode; `extract` checks again.
    options.validate()?;
    let img = image::load_from_memory(input)?;
    extract(&img, options, observer)
}

/// Decode the configured source image. The format is detected from the file
/// contents, not its extension.
pub fn open_source(config: &Config) -> Result<DynamicImage, Error> {
    let source = &config.palette_source_path;
    if !source.exists() {
        return Err(Error::InputNotFound(source.clone()));
    }
    Ok(ImageReader::open(source)?.with_guessed_format()?.decode()?)
}

/// Run the whole pipeline described by `config` and write one swatch per
/// palette color into `config.output_path`.
///
/// Returns the written paths in palette order. Nothing is written unless
/// extraction and rendering succeed.
pub fn run<O: Observer + ?Sized>(config: &Config, observer: &mut O) -> Result<Vec<PathBuf>, Error> {
    config.validate()?;
    let img = open_source(config)?;
    let extraction = extract(&img, &config.options, observer)?;

    let options = &config.options;
    tracing::info!(
        final_colors = extraction.palette.len(),
        threshold = options.average_difference_threshold,
        min_pixel_percentage = options.min_pixel_percentage,
        max_colors = options.max_colors,
        ignored_colors = options.ignore_colors.len(),
        "Summary"
    );

    let colors = extraction.palette.colors();
    let swatches = swatch::render(&colors, options.swatch_size);
    let paths = swatch::write(&swatches, &config.output_path)?;
    for (i, (path, &color)) in paths.iter().zip(&colors).enumerate() {
        observer.saved(i, path, color);
    }

    Ok(paths)
}

// ------------------------------------------------------------
// WebAssembly entry point
// ------------------------------------------------------------

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Extract a palette and render its swatches.
///
/// `ignore` is an optional list of color strings (`#RRGGBB`, `#RRGGBBAA` or
/// `r,g,b,a`) replacing the default ignore list.
///
/// The returned object has `palette` (hex strings), `percentages`,
/// `swatches` (PNG bytes, one per palette color) and `removed` (hex strings
/// in removal order).
#[wasm_bindgen]
pub fn extract_swatches(
    input: Vec<u8>,
    max_colors: usize,
    min_pixel_percentage: f64,
    threshold: f64,
    swatch_size: Option<u32>,
    ignore: Option<Array>,
) -> Result<Object, JsValue> {
    let mut options = ExtractOptions {
        average_difference_threshold: threshold,
        max_colors,
        min_pixel_percentage,
        swatch_size: swatch_size.unwrap_or(swatch::DEFAULT_SWATCH_SIZE),
        ..ExtractOptions::default()
    };

    if let Some(list) = ignore {
        let mut colors = Vec::new();
        for val in list.iter() {
            let s = val
                .as_string()
                .ok_or_else(|| JsValue::from_str("Ignore colors must be strings"))?;
            colors.push(s.parse::<Color>().map_err(js_error)?);
        }
        options.ignore_colors = colors;
    }

    let extraction = extract_palette_bytes(&input, &options, &mut ()).map_err(js_error)?;

    let palette_js = Array::new();
    let percentages_js = Array::new();
    let swatches_js = Array::new();
    for entry in &extraction.palette {
        palette_js.push(&JsValue::from_str(&entry.color.to_hex()));
        percentages_js.push(&JsValue::from_f64(entry.percentage));
    }
    for img in swatch::render(&extraction.palette.colors(), options.swatch_size) {
        let png = swatch::encode_png(&img).map_err(js_error)?;
        swatches_js.push(&Uint8Array::from(png.as_slice()));
    }

    let removed_js = Array::new();
    for removal in &extraction.removed {
        removed_js.push(&JsValue::from_str(&removal.color.to_hex()));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("percentages"), &percentages_js)?;
    Reflect::set(&result, &JsValue::from_str("swatches"), &swatches_js)?;
    Reflect::set(&result, &JsValue::from_str("removed"), &removed_js)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    /// Image with `count` pixels of each color, laid out in one row.
    fn striped(colors: &[(Color, u32)]) -> DynamicImage {
        let width: u32 = colors.iter().map(|&(_, n)| n).sum();
        let mut row = Vec::new();
        for &(color, n) in colors {
            row.extend(std::iter::repeat_n(color, n as usize));
        }
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, 1, |x, _| {
            Rgba(row[x as usize].to_array())
        }))
    }

    #[test]
    fn test_extract_reduces_reds() {
        let red = Color::new(255, 0, 0, 255);
        let dark_red = Color::new(250, 0, 0, 255);
        let green = Color::new(0, 255, 0, 255);
        let img = striped(&[(red, 40), (dark_red, 35), (green, 25), (Color::WHITE, 50)]);
        let options = ExtractOptions { max_colors: 2, ..Default::default() };

        let extraction = extract(&img, &options, &mut ()).unwrap();

        assert_eq!(extraction.stats, ScanStats { total_pixels: 150, counted_pixels: 100 });
        assert_eq!(extraction.candidates, 3);
        assert_eq!(extraction.palette.colors(), vec![red, green]);
        assert_eq!(extraction.palette.percentage_of(red), Some(40.0));
        assert_eq!(extraction.removed.len(), 1);
        assert_eq!(extraction.removed[0].color, dark_red);
        assert_eq!(extraction.removed[0].percentage, 35.0);
    }

    #[test]
    fn test_extract_applies_min_percentage() {
        let blue = Color::new(0, 0, 255, 255);
        let speck = Color::new(200, 100, 0, 255);
        let img = striped(&[(blue, 199), (speck, 1)]);

        let extraction = extract(&img, &ExtractOptions::default(), &mut ()).unwrap();
        assert_eq!(extraction.palette.colors(), vec![blue]);
        assert!(extraction.removed.is_empty());
    }

    #[test]
    fn test_extract_all_ignored() {
        let img = striped(&[(Color::TRANSPARENT, 10), (Color::BLACK, 5), (Color::WHITE, 5)]);

        let extraction = extract(&img, &ExtractOptions::default(), &mut ()).unwrap();
        assert_eq!(extraction.stats.counted_pixels, 0);
        assert_eq!(extraction.candidates, 0);
        assert!(extraction.palette.is_empty());
        assert!(extraction.removed.is_empty());
    }

    #[test]
    fn test_extract_rejects_bad_options_first() {
        let img = striped(&[(Color::new(1, 2, 3, 255), 1)]);
        let options = ExtractOptions { max_colors: 0, ..Default::default() };
        assert!(matches!(
            extract(&img, &options, &mut ()),
            Err(Error::Config(ConfigError::ZeroMaxColors))
        ));
    }

    #[test]
    fn test_extract_palette_bytes_rejects_garbage() {
        let err = extract_palette_bytes(b"not an image", &ExtractOptions::default(), &mut ())
            .unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn test_extract_palette_bytes_validates_before_decoding() {
        let options = ExtractOptions { swatch_size: 0, ..Default::default() };
        let err = extract_palette_bytes(b"not an image", &options, &mut ()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ZeroSwatchSize)));
    }

    #[test]
    fn test_run_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let config = Config::new(dir.path().join("missing.png"), &out);

        let err = run(&config, &mut ()).unwrap_err();

        assert!(matches!(err, Error::InputNotFound(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_extraction_serializes() {
        let img = striped(&[(Color::new(10, 20, 30, 255), 3), (Color::new(200, 20, 30, 255), 1)]);
        let extraction = extract(&img, &ExtractOptions::default(), &mut ()).unwrap();

        let json = serde_json::to_value(&extraction).unwrap();
        assert_eq!(json["candidates"], 2);
        assert_eq!(json["stats"]["counted_pixels"], 4);
        assert_eq!(json["palette"][0]["color"], serde_json::json!([10, 20, 30, 255]));
        assert_eq!(json["palette"][0]["percentage"], 75.0);
    }
}
