use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::color::Color;
use crate::error::Error;

/// Edge length of a swatch square, in pixels.
pub const DEFAULT_SWATCH_SIZE: u32 = 32;

/// One flat `size`×`size` square per color, alpha included.
pub fn render(colors: &[Color], size: u32) -> Vec<RgbaImage> {
    colors
        .iter()
        .map(|&color| RgbaImage::from_pixel(size, size, color.into()))
        .collect()
}

/// File name of the swatch at `index`.
pub fn swatch_file_name(index: usize) -> String {
    format!("{index}.png")
}

/// Write `images` into `dir` as `0.png`, `1.png`, ... creating `dir` if needed.
pub fn write(images: &[RgbaImage], dir: &Path) -> Result<Vec<PathBuf>, Error> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(images.len());
    for (i, img) in images.iter().enumerate() {
        let path = dir.join(swatch_file_name(i));
        img.save_with_format(&path, ImageFormat::Png)?;
        paths.push(path);
    }
    Ok(paths)
}

/// PNG-encode a swatch into memory.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
