use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_to_swatches_wasm::{Color, Config, ExtractOptions, LogObserver, extract, open_source};

/// Extract a small palette from an image and save one swatch per color.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source image
    source: PathBuf,

    /// Output directory for the swatches (created if missing)
    #[arg(short = 'o', long, default_value = "swatches")]
    out_dir: PathBuf,

    /// JSON file with extraction options; flags below override it
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Distance at or below which a pixel matches an ignored color
    #[arg(short = 't', long)]
    threshold: Option<f64>,

    /// Palette size to reduce to
    #[arg(short = 'k', long)]
    max_colors: Option<usize>,

    /// Minimum share of non-ignored pixels a color must cover (percent)
    #[arg(short = 'm', long)]
    min_percentage: Option<f64>,

    /// Extra color to ignore, as r,g,b,a or #RRGGBB[AA] (repeatable)
    #[arg(short = 'i', long = "ignore")]
    ignore: Vec<Color>,

    /// Do not ignore transparent, black and white by default
    #[arg(long)]
    no_default_ignore: bool,

    /// Swatch edge length in pixels
    #[arg(short = 's', long)]
    swatch_size: Option<u32>,

    /// Print the extraction report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn options(&self) -> Result<ExtractOptions> {
        let mut opts = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                ExtractOptions::from_json_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ExtractOptions::default(),
        };

        if let Some(t) = self.threshold {
            opts.average_difference_threshold = t;
        }
        if let Some(k) = self.max_colors {
            opts.max_colors = k;
        }
        if let Some(m) = self.min_percentage {
            opts.min_pixel_percentage = m;
        }
        if let Some(s) = self.swatch_size {
            opts.swatch_size = s;
        }
        if self.no_default_ignore {
            opts.ignore_colors.clear();
        }
        opts.ignore_colors.extend(self.ignore.iter().copied());

        Ok(opts)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_to_swatches_wasm=info,swatches_cli=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::new(&args.source, &args.out_dir).with_options(args.options()?);

    if args.json {
        // Report only; no swatches are written.
        config.validate()?;
        let img = open_source(&config)?;
        let extraction = extract(&img, &config.options, &mut LogObserver)?;
        println!("{}", serde_json::to_string_pretty(&extraction)?);
        return Ok(());
    }

    let paths = image_to_swatches_wasm::run(&config, &mut LogObserver)
        .context("palette extraction failed")?;

    for path in &paths {
        println!("Saved → {}", path.display());
    }
    if paths.is_empty() {
        tracing::warn!("No colors left to save");
    }

    Ok(())
}
