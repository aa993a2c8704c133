use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use hog_core::Image;
use hog_host::{BinOrder, HogConfig, HostValue, Matrix, MatrixData, Session};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "hog_cli")]
#[command(about = "Compute HOG feature vectors for grayscale images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run construct, compute and destroy on one image.
    #[command(name = "compute")]
    Compute(ComputeArgs),
    /// Print the feature vector length for a config.
    #[command(name = "size")]
    Size(ConfigArgs),
    /// Validate a config and print the derived pixel geometry.
    #[command(name = "check")]
    Check(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    #[arg(long, required = true)]
    config: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ComputeArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[command(flatten)]
    common: ConfigArgs,
    /// Overrides `bin_order` from the config file.
    #[arg(long)]
    bin_order: Option<BinOrder>,
    /// Pretty JSON output; printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Serialize)]
struct FeaturesDto {
    input: String,
    width: usize,
    height: usize,
    config: HogConfig,
    descriptor_size: usize,
    features: Vec<f32>,
}

#[derive(Serialize)]
struct GeometryDto {
    win_size: [usize; 2],
    block_size: [usize; 2],
    block_stride: [usize; 2],
    cell_size: [usize; 2],
    nbins: usize,
    cells_per_block: [usize; 2],
    blocks_per_window: [usize; 2],
    descriptor_size: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Compute(args) => run_compute(args),
        Command::Size(args) => run_size(args),
        Command::Check(args) => run_check(args),
    }
}

fn run_compute(args: ComputeArgs) -> Result<()> {
    ensure_file_exists(&args.input, "input")?;
    let mut config = load_config(&args.common.config)?;
    if let Some(order) = args.bin_order {
        config.bin_order = order;
    }
    let img = load_input_u8(&args.input)?;

    let mut session = Session::new();
    session
        .dispatch(0, &[HostValue::string("construct"), config.to_record()])
        .context("constructing descriptor")?;

    let matrix = Matrix::from_image_u8(&img.as_view());
    let start = Instant::now();
    let outputs = session
        .dispatch(1, &[HostValue::string("compute"), matrix.into()])
        .context("computing features")?;
    let elapsed = start.elapsed();

    session
        .dispatch(0, &[HostValue::string("destroy")])
        .context("destroying descriptor")?;

    let features = take_features(outputs)?;
    info!(
        width = img.width(),
        height = img.height(),
        len = features.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "features computed"
    );

    if let Some(path) = &args.csv {
        write_csv(path, &features)?;
    }

    let dto = FeaturesDto {
        input: args.input.display().to_string(),
        width: img.width(),
        height: img.height(),
        config,
        descriptor_size: features.len(),
        features,
    };
    match &args.out {
        Some(path) => write_json(path, &dto)?,
        None => {
            let text = serde_json::to_string_pretty(&dto).context("serializing json")?;
            println!("{text}");
        }
    }

    Ok(())
}

fn run_size(args: ConfigArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let geometry = config
        .geometry()
        .with_context(|| format!("invalid geometry in {}", args.config.display()))?;
    println!("{}", geometry.descriptor_size());
    Ok(())
}

fn run_check(args: ConfigArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let g = config
        .geometry()
        .with_context(|| format!("invalid geometry in {}", args.config.display()))?;

    let wh = |s: hog_core::Size2| [s.width, s.height];
    let dto = GeometryDto {
        win_size: wh(g.win_size),
        block_size: wh(g.block_size),
        block_stride: wh(g.block_stride),
        cell_size: wh(g.cell_size),
        nbins: g.nbins,
        cells_per_block: wh(g.cells_per_block()),
        blocks_per_window: wh(g.blocks_per_window()),
        descriptor_size: g.descriptor_size(),
    };
    let text = serde_json::to_string_pretty(&dto).context("serializing json")?;
    println!("{text}");
    Ok(())
}

fn take_features(outputs: Vec<HostValue>) -> Result<Vec<f32>> {
    let Some(HostValue::Matrix(m)) = outputs.into_iter().next() else {
        bail!("compute returned no feature matrix");
    };
    match m.data() {
        MatrixData::F32(values) => Ok(values.clone()),
        _ => Err(anyhow!("compute returned a {} matrix", m.class())),
    }
}

fn load_config(path: &Path) -> Result<HogConfig> {
    ensure_file_exists(path, "config")?;
    read_json(path)
}

fn load_input_u8(path: &Path) -> Result<Image<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let data = luma.into_raw();

    Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing image from {}", path.display()))
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn write_csv(path: &Path, values: &[f32]) -> Result<()> {
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "index,value").context("writing csv header")?;
    for (i, v) in values.iter().enumerate() {
        writeln!(file, "{i},{v}").context("writing csv row")?;
    }
    Ok(())
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
