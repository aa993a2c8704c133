//! Example: pedestrian-window HOG features for one image.
//!
//! Loads a PNG as 8-bit grayscale (or synthesizes a test pattern when no
//! input is given), computes the 64x128 pedestrian descriptor once per bin
//! order and reports the length, timing and the first cell histogram.
//!
//! Run from the workspace root:
//!   cargo run -p vision-hog --example pedestrian -- --help
//!   cargo run -p vision-hog --example pedestrian -- --input data/person.png

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use serde::Serialize;
use vision_hog::{BinOrder, HogConfig, Image, Session};

#[derive(Parser, Debug)]
#[command(about = "Compute pedestrian HOG features for an image")]
struct Args {
    /// Input PNG; a synthetic 96x160 pattern is used when omitted
    #[arg(long)]
    input: Option<String>,

    /// Number of timed repetitions per bin order
    #[arg(long, default_value_t = 20)]
    repeat: usize,

    /// Optional JSON report path
    #[arg(long)]
    out: Option<String>,
}

#[derive(Serialize)]
struct OrderReport {
    bin_order: BinOrder,
    descriptor_size: usize,
    mean_ms: f64,
    first_cell: Vec<f32>,
}

fn synthetic(width: usize, height: usize) -> Result<Image<u8>> {
    // A bright upright ellipse on a horizontal ramp.
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let (rx, ry) = (width as f32 / 5.0, height as f32 / 3.0);
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            let v = if dx * dx + dy * dy <= 1.0 {
                220
            } else {
                (x * 100 / width) as u8
            };
            data.push(v);
        }
    }
    Image::from_vec(width, height, data).context("building synthetic image")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let img = match &args.input {
        Some(path) => {
            let gray = ImageReader::open(path)
                .with_context(|| format!("opening {path}"))?
                .decode()
                .with_context(|| format!("decoding {path}"))?
                .into_luma8();
            let (w, h) = gray.dimensions();
            Image::from_vec(w as usize, h as usize, gray.into_raw())
                .with_context(|| format!("building image from {path}"))?
        }
        None => synthetic(96, 160)?,
    };
    println!("input: {}x{}", img.width(), img.height());

    let repeat = args.repeat.max(1);
    let mut reports = Vec::new();
    for bin_order in [BinOrder::Auto, BinOrder::Legacy, BinOrder::Native] {
        let config = HogConfig {
            window_size: [128, 64],
            cell_size: [8, 8],
            block_size: [2, 2],
            block_overlap: [1, 1],
            num_bins: 9,
            bin_order,
        };

        let mut session = Session::new();
        session
            .construct(&config)
            .context("constructing descriptor")?;

        let mut features = Vec::new();
        let start = Instant::now();
        for _ in 0..repeat {
            features = session
                .compute(&img.as_view())
                .context("computing features")?;
        }
        let mean_ms = start.elapsed().as_secs_f64() * 1e3 / repeat as f64;
        session.close();

        println!(
            "  {bin_order:>6}: {} values  ({mean_ms:.3} ms/call)",
            features.len()
        );
        reports.push(OrderReport {
            bin_order,
            descriptor_size: features.len(),
            mean_ms,
            first_cell: features.iter().take(9).copied().collect(),
        });
    }

    if let Some(out_path) = &args.out {
        let out_file =
            std::fs::File::create(out_path).with_context(|| format!("creating {out_path}"))?;
        serde_json::to_writer_pretty(out_file, &reports)
            .with_context(|| format!("writing JSON to {out_path}"))?;
        println!("report written to {out_path}");
    }
    Ok(())
}
