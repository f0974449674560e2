use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flipframe::{
    CompositorSettings, CropRect, Dimensions, DirectorySink, ExportJob, SidebarLayout,
};

#[derive(Parser, Debug)]
#[command(name = "flipframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an export job and write the resulting PNG.
    Export(ExportArgs),
    /// Crop a PNG using a rectangle drawn on a scaled-down display of it.
    Crop(CropArgs),
    /// Print the thumbnail strip geometry as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Export job JSON. Image paths in it are relative to its directory.
    #[arg(long)]
    job: PathBuf,

    /// Directory the download is written into.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Size the image was displayed at, as WxH.
    #[arg(long, value_parser = parse_dimensions)]
    displayed: Dimensions,

    /// Crop rectangle in displayed pixels, as x,y,w,h.
    #[arg(long, value_parser = parse_rect)]
    rect: CropRect,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Number of slots in the strip.
    #[arg(long)]
    slots: usize,

    /// Strip height in output pixels.
    #[arg(long)]
    height: f64,

    /// Smallest circle diameter. Defaults to the configured setting.
    #[arg(long)]
    min_diameter: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Crop(args) => cmd_crop(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let job = ExportJob::load(&args.job)
        .with_context(|| format!("load job '{}'", args.job.display()))?;
    let root = args
        .job
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut sink = DirectorySink::new(&args.out_dir);
    let receipt = flipframe::run_job(&job, &root, &mut sink).context("run export job")?;

    eprintln!(
        "wrote {} ({}x{})",
        sink.dir().join(&receipt.filename).display(),
        receipt.width,
        receipt.height
    );
    Ok(())
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    let image = flipframe::decode_image(&bytes)?;
    let cropped = flipframe::crop(&image, args.displayed, args.rect)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = flipframe::encode_png(&cropped)?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        cropped.width(),
        cropped.height()
    );
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let min_diameter = args
        .min_diameter
        .unwrap_or_else(|| CompositorSettings::from_env().thumbnail_min_diameter);
    let layout = SidebarLayout::compute(args.slots, args.height, min_diameter)?;
    let centers: Vec<f64> = (0..layout.slot_count).map(|i| layout.center_y(i)).collect();

    let out = serde_json::json!({
        "layout": layout,
        "center_y": centers,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn parse_dimensions(s: &str) -> Result<Dimensions, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|err| format!("bad number '{v}': {err}"))
    };
    Ok(Dimensions::new(parse(w)?, parse(h)?))
}

fn parse_rect(s: &str) -> Result<CropRect, String> {
    let parts = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|err| format!("bad number '{v}': {err}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[x, y, w, h] => Ok(CropRect::new(x, y, w, h)),
        _ => Err(format!("expected x,y,w,h, got '{s}'")),
    }
}
