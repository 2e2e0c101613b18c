use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the extraction pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not find palette file at {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected extraction options. Raised before any pixel is scanned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_colors must be at least 1")]
    ZeroMaxColors,

    #[error("average_difference_threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),

    #[error("min_pixel_percentage must be within 0..=100, got {0}")]
    InvalidMinPercentage(f64),

    #[error("swatch_size must be at least 1")]
    ZeroSwatchSize,

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    #[error("duplicate color found at index {index}")]
    DuplicateColor { index: usize },

    #[error("invalid percentage {percentage} at index {index} (expected 0 < p <= 100)")]
    InvalidPercentage { index: usize, percentage: f64 },

    #[error("target color count must be at least 1")]
    InvalidTarget,
}
