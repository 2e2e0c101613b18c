use serde::Serialize;

use crate::color::Color;
use crate::error::PaletteError;

/// A palette color together with its share of the counted pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub color: Color,
    /// Percent of non-ignored pixels covered by `color`, in (0, 100].
    pub percentage: f64,
}

impl PaletteEntry {
    pub const fn new(color: Color, percentage: f64) -> Self {
        Self { color, percentage }
    }
}

/// An ordered set of unique colors, each with a positive percentage.
///
/// Order is insertion order. It is the enumeration order used to break ties
/// during reduction and the position used to name swatch files.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Build a palette, rejecting duplicate colors and percentages outside
    /// (0, 100].
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        for (index, entry) in entries.iter().enumerate() {
            let p = entry.percentage;
            if !(p > 0.0 && p <= 100.0) {
                return Err(PaletteError::InvalidPercentage { index, percentage: p });
            }
            if entries[..index].iter().any(|e| e.color == entry.color) {
                return Err(PaletteError::DuplicateColor { index });
            }
        }
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Caller guarantees the palette invariants.
    pub(crate) fn from_entries_unchecked(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<PaletteEntry> {
        self.entries
    }

    pub fn colors(&self) -> Vec<Color> {
        self.entries.iter().map(|e| e.color).collect()
    }

    pub fn percentage_of(&self, color: Color) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.color == color)
            .map(|e| e.percentage)
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&PaletteEntry) -> bool) {
        self.entries.retain(keep);
    }

    pub(crate) fn remove(&mut self, index: usize) -> PaletteEntry {
        self.entries.remove(index)
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_order() {
        let palette = Palette::new(vec![
            PaletteEntry::new(Color::new(1, 0, 0, 255), 60.0),
            PaletteEntry::new(Color::new(0, 1, 0, 255), 40.0),
        ])
        .unwrap();
        assert_eq!(
            palette.colors(),
            vec![Color::new(1, 0, 0, 255), Color::new(0, 1, 0, 255)]
        );
        assert_eq!(palette.percentage_of(Color::new(0, 1, 0, 255)), Some(40.0));
        assert_eq!(palette.percentage_of(Color::WHITE), None);
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let err = Palette::new(vec![
            PaletteEntry::new(Color::BLACK, 50.0),
            PaletteEntry::new(Color::WHITE, 25.0),
            PaletteEntry::new(Color::BLACK, 25.0),
        ])
        .unwrap_err();
        assert_eq!(err, PaletteError::DuplicateColor { index: 2 });
    }

    #[test]
    fn test_new_rejects_bad_percentages() {
        for bad in [0.0, -1.0, 100.5, f64::NAN] {
            let err = Palette::new(vec![PaletteEntry::new(Color::BLACK, bad)]).unwrap_err();
            assert!(matches!(err, PaletteError::InvalidPercentage { index: 0, .. }));
        }
    }

    #[test]
    fn test_empty() {
        let palette = Palette::empty();
        assert!(palette.is_empty());
        assert_eq!(palette.len(), 0);
        assert_eq!(Palette::new(Vec::new()).unwrap(), palette);
    }
}
