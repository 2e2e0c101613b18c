//! Greedy palette reduction.
//!
//! While the palette holds more colors than requested, the color with the
//! lowest distinctiveness (mean distance to every other surviving color) is
//! dropped. Ties go to the earliest entry in palette order.

use serde::Serialize;

use crate::color::Color;
use crate::entries::Palette;
use crate::error::PaletteError;
use crate::report::Observer;

/// One dropped color, in the order it was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Removal {
    pub color: Color,
    pub percentage: f64,
    /// Mean distance to the other colors at the moment of removal.
    pub distinctiveness: f64,
}

/// Mean distance from each color to every other color in `colors`.
///
/// A lone color has no neighbours and scores `f64::INFINITY`.
pub fn distinctiveness(colors: &[Color]) -> Vec<f64> {
    let table = DistanceTable::new(colors);
    let active: Vec<usize> = (0..colors.len()).collect();
    table.mean_distances(&active)
}

/// Symmetric pairwise distance table, filled once per reduction.
struct DistanceTable {
    n: usize,
    distances: Vec<f64>,
}

impl DistanceTable {
    fn new(colors: &[Color]) -> Self {
        let n = colors.len();
        let mut distances = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = colors[i].distance(colors[j]);
                distances[i * n + j] = d;
                distances[j * n + i] = d;
            }
        }
        Self { n, distances }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[i * self.n + j]
    }

    /// Scores for the colors in `active`, in the same order.
    fn mean_distances(&self, active: &[usize]) -> Vec<f64> {
        if active.len() < 2 {
            return vec![f64::INFINITY; active.len()];
        }
        let others = (active.len() - 1) as f64;
        active
            .iter()
            .map(|&i| {
                let total: f64 = active
                    .iter()
                    .filter(|&&j| j != i)
                    .map(|&j| self.get(i, j))
                    .sum();
                total / others
            })
            .collect()
    }
}

/// Position of the first minimum. Strict comparison keeps the earliest entry
/// on ties.
fn first_min(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if score >= b => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Shrink `palette` in place to at most `target` colors.
///
/// Returns the removals in order. A palette already within `target` is left
/// untouched and yields an empty trace. `target == 0` is rejected unless the
/// palette is already empty.
pub fn reduce<O: Observer + ?Sized>(
    palette: &mut Palette,
    target: usize,
    observer: &mut O,
) -> Result<Vec<Removal>, PaletteError> {
    if palette.is_empty() {
        return Ok(Vec::new());
    }
    if target == 0 {
        return Err(PaletteError::InvalidTarget);
    }
    if palette.len() <= target {
        return Ok(Vec::new());
    }

    observer.reducing(palette.len(), target);

    let table = DistanceTable::new(&palette.colors());
    // Table indices of the surviving entries, kept parallel to `palette`.
    let mut active: Vec<usize> = (0..palette.len()).collect();
    let mut trace = Vec::with_capacity(palette.len() - target);

    while palette.len() > target {
        let scores = table.mean_distances(&active);
        let Some(pos) = first_min(&scores) else {
            break;
        };

        let entry = palette.remove(pos);
        active.remove(pos);

        let removal = Removal {
            color: entry.color,
            percentage: entry.percentage,
            distinctiveness: scores[pos],
        };
        tracing::debug!(
            color = %removal.color,
            score = removal.distinctiveness,
            remaining = palette.len(),
            "dropped least distinct color"
        );
        observer.removed(&removal);
        trace.push(removal);
    }

    Ok(trace)
}
