use crate::entries::Palette;

/// Keep the colors covering at least `min_percentage` percent of the counted
/// pixels. Order is preserved.
pub fn select(frequencies: &Palette, min_percentage: f64) -> Palette {
    let mut candidates = frequencies.clone();
    candidates.retain(|entry| entry.percentage >= min_percentage);
    candidates
}
