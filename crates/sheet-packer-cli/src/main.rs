use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use sheet_packer_core::{
    BoundsRect, PackResult, PackerConfig, PackingAlgorithm, Rect, SpriteDefinition, SpritePacker,
};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "sheet-packer",
    about = "Pack sprite frames into power-of-two sheets",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a sprite list (JSON or YAML) and report the sheets
    Pack(PackArgs),
    /// Pack randomly generated sprites and print time + occupancy
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    /// YAML config file path (values in the file override the flags below)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Max sheet side (power of two)
    #[arg(long, default_value_t = 2048, help_heading = "Layout")]
    max_size: u32,
    /// Min sheet side (power of two)
    #[arg(long, default_value_t = 8, help_heading = "Layout")]
    min_size: u32,
    /// Only try square sheets
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    square: bool,
    /// Duplicate edge pixels on both sides of every seam
    #[arg(long, default_value_t = false, help_heading = "Layout")]
    two_side_margin: bool,
    /// Empty pixels between neighbouring sprites
    #[arg(long, default_value_t = 1, help_heading = "Layout")]
    margin: u32,
    /// Comma separated algorithms: basic,bl,baf,bssf,blsf,cp (default: all)
    #[arg(long, value_delimiter = ',', help_heading = "Algorithms")]
    algorithms: Vec<String>,
    /// Evaluate candidate sheets in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Algorithms")]
    parallel: bool,
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Sprite list: [{ name, frames: [[w, h], ...] }, ...]
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Write placements as JSON to this file
    #[arg(long, help_heading = "Input/Output")]
    json: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Input/Output")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Input/Output")]
    print_config_format: String,
    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Number of generated sprites
    #[arg(long, default_value_t = 200)]
    count: usize,
    /// Smallest generated side
    #[arg(long, default_value_t = 8)]
    min_side: u32,
    /// Largest generated side
    #[arg(long, default_value_t = 96)]
    max_side: u32,
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[command(flatten)]
    layout: LayoutArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(args: &PackArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.layout)?;

    if args.print_config {
        match args.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let sprites = load_sprites(&args.input)?;
    info!(count = sprites.len(), "loaded sprite list");

    let start = Instant::now();
    let result = SpritePacker::new(cfg).pack(&sprites);
    let dur = start.elapsed();

    if !result.success() {
        for e in &result.errors {
            error!("{e}");
        }
        bail!("packing failed with {} error(s)", result.errors.len());
    }

    for (i, sheet) in result.sheets.iter().enumerate() {
        println!(
            "sheet {i}: {}x{} {} frames={}",
            sheet.width(),
            sheet.height(),
            sheet.algorithm(),
            sheet.placed_count()
        );
    }
    println!("{} time={}", result.stats().summary(), fmt_dur(dur));

    if let Some(path) = &args.json {
        let dump = PlacementDump::from_result(&result);
        fs::write(path, serde_json::to_string_pretty(&dump)?)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote placements");
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    use rand::{Rng, SeedableRng};
    if b.min_side == 0 || b.min_side > b.max_side {
        bail!("invalid side range {}..={}", b.min_side, b.max_side);
    }
    let cfg = build_config(&b.layout)?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(b.seed);
    let sprites: Vec<Arc<SpriteDefinition>> = (0..b.count)
        .map(|i| {
            let w = rng.gen_range(b.min_side..=b.max_side);
            let h = rng.gen_range(b.min_side..=b.max_side);
            Arc::new(SpriteDefinition::from_sizes(format!("sprite_{i}"), &[(w, h)]))
        })
        .collect();

    let start = Instant::now();
    let result = SpritePacker::new(cfg).pack(&sprites).into_result()?;
    let dur = start.elapsed();
    let stats = result.stats();
    println!(
        "sheets={} occupancy={:.2}% time={}",
        stats.num_sheets,
        stats.occupancy * 100.0,
        fmt_dur(dur)
    );
    Ok(())
}

fn build_config(args: &LayoutArgs) -> anyhow::Result<PackerConfig> {
    let mut cfg = PackerConfig::builder()
        .max_texture_size(args.max_size)
        .min_texture_size(args.min_size)
        .only_square(args.square)
        .two_side_margin(args.two_side_margin)
        .margin(args.margin)
        .parallel(args.parallel)
        .build();
    if !args.algorithms.is_empty() {
        cfg.algorithms = parse_algorithms(&args.algorithms)?;
    }

    // Config file values win over flags
    if let Some(path) = &args.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        cfg = y.into_packer_config(cfg)?;
    }

    if cfg.parallel && !cfg!(feature = "parallel") {
        warn!("parallel requested but the `parallel` feature is off; evaluating sequentially");
    }
    cfg.validate()?;
    Ok(cfg)
}

fn parse_algorithms(names: &[String]) -> anyhow::Result<Vec<PackingAlgorithm>> {
    names
        .iter()
        .map(|n| {
            n.trim()
                .parse::<PackingAlgorithm>()
                .map_err(|_| anyhow::anyhow!("unknown algorithm '{n}'"))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct SpriteEntry {
    name: String,
    frames: Vec<(u32, u32)>,
}

fn load_sprites(path: &Path) -> anyhow::Result<Vec<Arc<SpriteDefinition>>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let entries: Vec<SpriteEntry> = if is_json {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    Ok(entries
        .into_iter()
        .map(|e| Arc::new(SpriteDefinition::from_sizes(e.name, &e.frames)))
        .collect())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Serialize)]
struct SheetDump {
    width: u32,
    height: u32,
    algorithm: PackingAlgorithm,
}

#[derive(Serialize)]
struct FrameDump {
    frame: usize,
    sheet: usize,
    sprite_rect: Rect,
    bounds: BoundsRect,
}

#[derive(Serialize)]
struct SpriteDump {
    name: String,
    sheets: Vec<usize>,
    frames: Vec<FrameDump>,
}

#[derive(Serialize)]
struct PlacementDump {
    sheets: Vec<SheetDump>,
    sprites: Vec<SpriteDump>,
}

impl PlacementDump {
    fn from_result(result: &PackResult) -> Self {
        let sheets = result
            .sheets
            .iter()
            .map(|s| SheetDump {
                width: s.width(),
                height: s.height(),
                algorithm: s.algorithm(),
            })
            .collect();
        let sprites = result
            .indexed_sprites
            .iter()
            .map(|data| SpriteDump {
                name: data.sprite.name.clone(),
                sheets: data.sheet_indices(),
                frames: data
                    .frame_to_sheet
                    .iter()
                    .zip(&data.frame_to_bounds)
                    .enumerate()
                    .map(|(frame, (&sheet, bounds))| FrameDump {
                        frame,
                        sheet,
                        sprite_rect: bounds.sprite_rect,
                        bounds: *bounds,
                    })
                    .collect(),
            })
            .collect();
        Self { sheets, sprites }
    }
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    max_texture_size: Option<u32>,
    min_texture_size: Option<u32>,
    only_square: Option<bool>,
    two_side_margin: Option<bool>,
    margin: Option<u32>,
    algorithms: Option<Vec<String>>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.max_texture_size {
            cfg.max_texture_size = v;
        }
        if let Some(v) = self.min_texture_size {
            cfg.min_texture_size = v;
        }
        if let Some(v) = self.only_square {
            cfg.only_square = v;
        }
        if let Some(v) = self.two_side_margin {
            cfg.two_side_margin = v;
        }
        if let Some(v) = self.margin {
            cfg.margin = v;
        }
        if let Some(v) = self.algorithms {
            cfg.algorithms = parse_algorithms(&v)?;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}
