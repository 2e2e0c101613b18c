use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::ConfigError;
use crate::frequency::IgnoreList;
use crate::swatch::DEFAULT_SWATCH_SIZE;

/// Tuning knobs for palette extraction.
///
/// Missing fields take their defaults when deserialized, so a configuration
/// file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractOptions {
    /// Distance at or below which a pixel counts as one of `ignore_colors`.
    pub average_difference_threshold: f64,

    /// Palette size to reduce to.
    pub max_colors: usize,

    /// Minimum share of the non-ignored pixels a color must cover, in percent.
    pub min_pixel_percentage: f64,

    pub ignore_colors: Vec<Color>,

    /// Edge length of each output swatch.
    pub swatch_size: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            average_difference_threshold: 10.0,
            max_colors: 10,
            min_pixel_percentage: 1.0,
            ignore_colors: IgnoreList::default_colors(),
            swatch_size: DEFAULT_SWATCH_SIZE,
        }
    }
}

impl ExtractOptions {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.average_difference_threshold;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.max_colors == 0 {
            return Err(ConfigError::ZeroMaxColors);
        }
        let min = self.min_pixel_percentage;
        if !(0.0..=100.0).contains(&min) {
            return Err(ConfigError::InvalidMinPercentage(min));
        }
        if self.swatch_size == 0 {
            return Err(ConfigError::ZeroSwatchSize);
        }
        Ok(())
    }

    pub fn ignore_list(&self) -> IgnoreList {
        IgnoreList::new(self.ignore_colors.clone(), self.average_difference_threshold)
    }
}

/// A full run: where to read the source image, where to put the swatches,
/// and how to extract the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub palette_source_path: PathBuf,
    pub output_path: PathBuf,
    pub options: ExtractOptions,
}

impl Config {
    pub fn new(palette_source_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            palette_source_path: palette_source_path.into(),
            output_path: output_path.into(),
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.average_difference_threshold, 10.0);
        assert_eq!(opts.max_colors, 10);
        assert_eq!(opts.min_pixel_percentage, 1.0);
        assert_eq!(
            opts.ignore_colors,
            vec![Color::TRANSPARENT, Color::BLACK, Color::WHITE]
        );
        assert_eq!(opts.swatch_size, 32);
        assert_eq!(opts.validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts = ExtractOptions::from_json_str(
            r#"{ "max_colors": 4, "ignore_colors": [[0, 0, 0, 0]] }"#,
        )
        .unwrap();
        assert_eq!(
            opts,
            ExtractOptions {
                max_colors: 4,
                ignore_colors: vec![Color::TRANSPARENT],
                ..ExtractOptions::default()
            }
        );
    }

    #[test]
    fn test_json_rejects_malformed_colors() {
        for bad in [
            r#"{ "ignore_colors": [[0, 0, 0]] }"#,
            r#"{ "ignore_colors": [[0, 0, 0, 256]] }"#,
            r#"{ "ignore_colors": [[0, 0, 0, -1]] }"#,
            r#"{ "max_colours": 3 }"#,
        ] {
            assert!(matches!(
                ExtractOptions::from_json_str(bad),
                Err(ConfigError::Parse(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_zero_max_colors() {
        let opts = ExtractOptions { max_colors: 0, ..Default::default() };
        assert_eq!(opts.validate(), Err(ConfigError::ZeroMaxColors));
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let opts = ExtractOptions {
            average_difference_threshold: -0.5,
            ..Default::default()
        };
        assert_eq!(opts.validate(), Err(ConfigError::InvalidThreshold(-0.5)));
    }

    #[test]
    fn test_validate_min_percentage_range() {
        for ok in [0.0, 50.0, 100.0] {
            let opts = ExtractOptions { min_pixel_percentage: ok, ..Default::default() };
            assert_eq!(opts.validate(), Ok(()));
        }
        for bad in [-1.0, 100.1, f64::NAN] {
            let opts = ExtractOptions { min_pixel_percentage: bad, ..Default::default() };
            assert!(matches!(
                opts.validate(),
                Err(ConfigError::InvalidMinPercentage(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_zero_swatch() {
        let opts = ExtractOptions { swatch_size: 0, ..Default::default() };
        assert_eq!(opts.validate(), Err(ConfigError::ZeroSwatchSize));
    }

    #[test]
    fn test_config_validates_options() {
        let config = Config::new("in.png", "out").with_options(ExtractOptions {
            max_colors: 0,
            ..Default::default()
        });
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxColors));
        assert_eq!(Config::new("in.png", "out").validate(), Ok(()));
    }

    #[test]
    fn test_ignore_list_uses_threshold() {
        let opts = ExtractOptions {
            average_difference_threshold: 3.0,
            ..Default::default()
        };
        let ignore = opts.ignore_list();
        assert_eq!(ignore.threshold, 3.0);
        assert_eq!(ignore.colors, opts.ignore_colors);
    }
}
