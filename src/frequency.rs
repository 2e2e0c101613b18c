use std::collections::HashMap;

use image::RgbaImage;
use serde::Serialize;

use crate::color::Color;
use crate::entries::{Palette, PaletteEntry};

/// Reference colors whose near matches are dropped before counting.
#[derive(Clone, Debug, PartialEq)]
pub struct IgnoreList {
    pub colors: Vec<Color>,
    /// A pixel is ignored when its distance to any reference color is at
    /// most this value.
    pub threshold: f64,
}

impl IgnoreList {
    pub fn new(colors: Vec<Color>, threshold: f64) -> Self {
        Self { colors, threshold }
    }

    /// Transparent black, opaque black and opaque white.
    pub fn default_colors() -> Vec<Color> {
        vec![Color::TRANSPARENT, Color::BLACK, Color::WHITE]
    }

    #[inline]
    pub fn matches(&self, color: Color) -> bool {
        self.colors
            .iter()
            .any(|&ignored| color.distance(ignored) <= self.threshold)
    }
}

/// Pixel totals from a single scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub total_pixels: u64,
    pub counted_pixels: u64,
}

impl ScanStats {
    pub fn ignored_pixels(&self) -> u64 {
        self.total_pixels - self.counted_pixels
    }

    /// Percent of the image that was counted. Zero for an empty image.
    pub fn counted_share(&self) -> f64 {
        share(self.counted_pixels, self.total_pixels)
    }

    /// Percent of the image that matched the ignore list. Zero for an empty image.
    pub fn ignored_share(&self) -> f64 {
        share(self.ignored_pixels(), self.total_pixels)
    }
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Count every pixel color, drop the ones matching `ignore`, and convert the
/// remaining counts into percentages of the counted pixels.
///
/// The returned palette is ordered by descending pixel count, ties broken by
/// ascending [`Color`] order, so the result does not depend on hash order.
pub fn scan(image: &RgbaImage, ignore: &IgnoreList) -> (Palette, ScanStats) {
    let total_pixels = u64::from(image.width()) * u64::from(image.height());

    let mut histogram: HashMap<Color, u64> = HashMap::new();
    for pixel in image.pixels() {
        *histogram.entry(Color::from(*pixel)).or_insert(0) += 1;
    }

    // Matching is per color, so each unique color is tested once.
    let mut counts: Vec<(Color, u64)> = histogram
        .into_iter()
        .filter(|&(color, _)| !ignore.matches(color))
        .collect();

    let counted_pixels: u64 = counts.iter().map(|&(_, n)| n).sum();
    let stats = ScanStats {
        total_pixels,
        counted_pixels,
    };

    if counted_pixels == 0 {
        return (Palette::empty(), stats);
    }

    counts.sort_unstable_by(|(ca, na), (cb, nb)| nb.cmp(na).then(ca.cmp(cb)));

    let entries = counts
        .into_iter()
        .map(|(color, n)| PaletteEntry::new(color, n as f64 / counted_pixels as f64 * 100.0))
        .collect();

    (Palette::from_entries_unchecked(entries), stats)
}
