use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "postertile", version)]
struct Cli {
    /// Enable debug logging (`RUST_LOG` overrides the level when set).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter an image, overlay tiles and export a timestamped PNG.
    Render(RenderArgs),
    /// Print a tile overlay as JSON.
    Tiles(TilesArgs),
    /// Print the default configuration as JSON.
    Defaults,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image (PNG or JPEG).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `output-YYYYMMDD-HHMMSS.png`.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Wheel notches applied before placing; negative zooms in.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    zoom: i32,

    /// Drag the image by `dx,dy` canvas pixels before placing.
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    offset: Option<(f64, f64)>,

    /// Write the unplaced preview (raw image, no tiles) instead of the final poster.
    #[arg(long)]
    preview: bool,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Parser, Debug)]
struct TilesArgs {
    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Parser, Debug)]
struct ParamArgs {
    /// JSON configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for grain and tile layout.
    #[arg(long)]
    seed: Option<u64>,

    /// Keep half the color instead of full grayscale.
    #[arg(long, conflicts_with = "grayscale")]
    color: bool,

    /// Full grayscale, overriding a config that turns it off.
    #[arg(long)]
    grayscale: bool,

    #[arg(long)]
    contrast: Option<f32>,

    #[arg(long)]
    grain: Option<u8>,

    /// Multiply color as `#rrggbb`.
    #[arg(long)]
    tint: Option<String>,

    #[arg(long)]
    tile_size: Option<u32>,

    #[arg(long)]
    density: Option<f64>,

    #[arg(long)]
    variation: Option<u32>,

    #[arg(long, conflicts_with = "no_clustering")]
    clustering: bool,

    /// Disable clustering, overriding a config that turns it on.
    #[arg(long)]
    no_clustering: bool,

    #[arg(long, value_enum)]
    shape: Option<ShapeChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeChoice {
    Square,
    Circle,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Tiles(args) => cmd_tiles(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_offset(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dy, got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn build_config(args: &ParamArgs) -> anyhow::Result<postertile::PosterConfig> {
    let mut cfg = match &args.config {
        Some(path) => postertile::PosterConfig::load(path)?,
        None => postertile::PosterConfig::default(),
    };

    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if args.color {
        cfg.filter.grayscale = false;
    }
    if args.grayscale {
        cfg.filter.grayscale = true;
    }
    if let Some(v) = args.contrast {
        cfg.filter.contrast = v;
    }
    if let Some(v) = args.grain {
        cfg.filter.grain = v;
    }
    if let Some(v) = &args.tint {
        cfg.filter.tint = postertile::Rgb8::from_hex(v)?;
    }
    if let Some(v) = args.tile_size {
        cfg.tiles.tile_size = v;
    }
    if let Some(v) = args.density {
        cfg.tiles.density = v;
    }
    if let Some(v) = args.variation {
        cfg.tiles.variation_percent = v;
    }
    if args.clustering {
        cfg.tiles.clustering = true;
    }
    if args.no_clustering {
        cfg.tiles.clustering = false;
    }
    if let Some(shape) = args.shape {
        cfg.tiles.shape = match shape {
            ShapeChoice::Square => postertile::TileShape::Square,
            ShapeChoice::Circle => postertile::TileShape::Circle,
        };
    }

    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.params)?;
    let mut session = postertile::PosterSession::new(&cfg)?;

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;
    session
        .load_image_bytes(&bytes)
        .with_context(|| format!("load image '{}'", args.in_path.display()))?;

    apply_viewport_moves(&mut session, args.zoom, args.offset)?;

    let path = if args.preview {
        let frame = session.render_preview()?;
        let path = args
            .out_dir
            .join(postertile::export_file_name(postertile::local_now()));
        postertile::write_png(&path, &frame)?;
        path
    } else {
        session.place()?;
        session.export(&args.out_dir, postertile::local_now())?
    };

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn apply_viewport_moves(
    session: &mut postertile::PosterSession,
    zoom: i32,
    offset: Option<(f64, f64)>,
) -> anyhow::Result<()> {
    let step = if zoom < 0 { -1.0 } else { 1.0 };
    for _ in 0..zoom.unsigned_abs() {
        session.zoom(step)?;
    }

    if let Some((dx, dy)) = offset {
        let Some(grab) = session.viewport().map(|vp| vp.bounds().center()) else {
            return Ok(());
        };
        if session.begin_drag(grab)? {
            session.drag_to(postertile::Point::new(grab.x + dx, grab.y + dy))?;
            session.end_drag()?;
        }
    }
    Ok(())
}

fn cmd_tiles(args: TilesArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.params)?;
    let mut rng = match cfg.seed {
        Some(seed) => postertile::seeded(seed),
        None => postertile::from_entropy(),
    };
    let overlay = postertile::generate_tiles(cfg.canvas, &cfg.tiles, &mut rng)?;
    print_json(&overlay)
}

fn cmd_defaults() -> anyhow::Result<()> {
    println!("{}", postertile::PosterConfig::default().to_json_pretty()?);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize JSON")?;
    println!("{out}");
    Ok(())
}
