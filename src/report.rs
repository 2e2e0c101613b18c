use std::path::Path;

use crate::color::Color;
use crate::entries::Palette;
use crate::frequency::ScanStats;
use crate::reduce::Removal;

/// Progress hooks for an extraction run.
///
/// Every hook defaults to doing nothing. `()` is the silent observer.
pub trait Observer {
    fn scanned(&mut self, _stats: &ScanStats) {}

    /// Reduction is about to shrink the candidates from `from` to `to` colors.
    fn reducing(&mut self, _from: usize, _to: usize) {}

    fn removed(&mut self, _removal: &Removal) {}

    fn finished(&mut self, _palette: &Palette) {}

    fn saved(&mut self, _index: usize, _path: &Path, _color: Color) {}
}

impl Observer for () {}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn scanned(&mut self, stats: &ScanStats) {
        (**self).scanned(stats)
    }

    fn reducing(&mut self, from: usize, to: usize) {
        (**self).reducing(from, to)
    }

    fn removed(&mut self, removal: &Removal) {
        (**self).removed(removal)
    }

    fn finished(&mut self, palette: &Palette) {
        (**self).finished(palette)
    }

    fn saved(&mut self, index: usize, path: &Path, color: Color) {
        (**self).saved(index, path, color)
    }
}

/// Writes human-readable progress through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn scanned(&mut self, stats: &ScanStats) {
        tracing::info!(
            total = stats.total_pixels,
            ignored = stats.ignored_pixels(),
            ignored_share = %format!("{:.1}%", stats.ignored_share()),
            considered = stats.counted_pixels,
            considered_share = %format!("{:.1}%", stats.counted_share()),
            "Pixel analysis"
        );
        if stats.counted_pixels == 0 {
            tracing::warn!("All pixels matched ignore list");
        }
    }

    fn reducing(&mut self, from: usize, to: usize) {
        tracing::info!("Reducing from {from} colors to {to} colors");
    }

    fn removed(&mut self, removal: &Removal) {
        tracing::info!(
            distinctiveness = %format!("{:.2}", removal.distinctiveness),
            "Removed color {} ({:.2}% of non-ignored pixels)",
            removal.color,
            removal.percentage
        );
    }

    fn finished(&mut self, palette: &Palette) {
        for entry in palette {
            tracing::info!(
                "Final color {} ({:.2}% of non-ignored pixels)",
                entry.color,
                entry.percentage
            );
        }
    }

    fn saved(&mut self, index: usize, path: &Path, color: Color) {
        tracing::info!(path = %path.display(), "Saved color {index}: {color}");
    }
}
