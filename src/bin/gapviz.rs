use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gapviz::charts::{ChartData, ChartKind, Sizing, Surface};
use gapviz::geo::{FileSource, GeometrySource, HttpSource, StaticSource, WORLD_ATLAS_URL};
use gapviz::models::Size;
use gapviz::storage::{self, DataFormat};
use gapviz::{Host, Options, datasets, viz};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "gapviz",
    version,
    about = "Render growth-gap charts, packed bubbles and choropleth world maps"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount a chart, let it settle and export it (.svg or .png).
    Render(RenderArgs),
    /// Write the built-in sample data for a chart (.csv or .json).
    Sample(SampleArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartArg {
    Growth,
    Bubbles,
    Map,
}

impl From<ChartArg> for ChartKind {
    fn from(c: ChartArg) -> Self {
        match c {
            ChartArg::Growth => ChartKind::Growth,
            ChartArg::Bubbles => ChartKind::Bubbles,
            ChartArg::Map => ChartKind::WorldMap,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(long, value_enum, default_value_t = ChartArg::Growth)]
    chart: ChartArg,
    /// Output file; backend chosen by extension (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// Container width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,
    /// Container height in pixels (default: the chart's own sizing).
    #[arg(long)]
    height: Option<f64>,
    /// Options file (JSON, camelCase keys).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Data file (.csv or .json); the built-in sample is used if omitted.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Geometry for maps: a TopoJSON/GeoJSON file or an http(s) URL.
    #[arg(long, default_value = WORLD_ATLAS_URL)]
    geometry: String,
    /// Resize the container to this width before exporting.
    #[arg(long)]
    resize: Option<f64>,
    /// Maximum animation frames to run.
    #[arg(long, default_value_t = 600)]
    frames: usize,
    /// Seconds to wait for the geometry fetch.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
    /// TrueType font used for PNG text.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Print element counts of the final scene to stdout.
    #[arg(long, default_value_t = false)]
    summary: bool,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[arg(long, value_enum)]
    chart: ChartArg,
    #[arg(short, long)]
    out: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn geometry_source(spec: &str) -> Arc<dyn GeometrySource> {
    if spec.starts_with("http://") || spec.starts_with("https://") {
        Arc::new(HttpSource::new(spec))
    } else {
        Arc::new(FileSource::new(spec))
    }
}

fn load_data(kind: ChartKind, args: &RenderArgs) -> Result<ChartData> {
    let source: Arc<dyn GeometrySource> = if kind == ChartKind::WorldMap {
        geometry_source(&args.geometry)
    } else {
        Arc::new(StaticSource::default())
    };
    let Some(path) = args.data.as_ref() else {
        return Ok(datasets::sample(kind, source));
    };
    let ctx = || format!("failed to load {}", path.display());
    Ok(match kind {
        ChartKind::Growth => ChartData::Growth(storage::load_growth(path).with_context(ctx)?),
        ChartKind::Bubbles => ChartData::Bubbles(storage::load_bubbles(path).with_context(ctx)?),
        ChartKind::WorldMap => ChartData::WorldMap {
            scores: storage::load_scores(path).with_context(ctx)?,
            source,
        },
    })
}

fn surface_for(kind: ChartKind, width: f64, height: Option<f64>) -> Surface {
    match height {
        Some(h) => {
            let sizing = match kind {
                ChartKind::WorldMap => Sizing::Aspect { ratio: width / h },
                _ => Sizing::FillWidth { height: h },
            };
            Surface::new(Size::new(width, h), sizing)
        }
        None => Surface::for_chart(kind, width),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    if !(args.width.is_finite() && args.width > 0.0) {
        bail!("--width must be a positive number");
    }
    if let Some(h) = args.height
        && !(h.is_finite() && h > 0.0)
    {
        bail!("--height must be a positive number");
    }
    if let Some(font) = args.font.as_ref() {
        viz::register_font_file(font)
            .with_context(|| format!("failed to load font {}", font.display()))?;
    }
    let options = match args.config.as_ref() {
        Some(p) => Options::from_json_file(p)
            .with_context(|| format!("failed to read options {}", p.display()))?,
        None => Options::default(),
    };

    let kind = ChartKind::from(args.chart);
    let data = load_data(kind, &args)?;
    let surface = surface_for(kind, args.width, args.height);
    let mut host = Host::new(Size::new(args.width, surface.size().height));
    let handle = host.mount(surface, data, &options);

    if !host.settle(Duration::from_secs(args.timeout)) {
        eprintln!("Geometry did not arrive in {}s; exporting without it", args.timeout);
    }
    host.run_until_idle(args.frames);
    if let Some(w) = args.resize {
        host.resize(Size::new(w, host.viewport().height));
        host.run_until_idle(args.frames);
    }

    let Some(scene) = host.scene(handle) else {
        bail!("chart was unmounted before export");
    };
    viz::save(scene, &args.out)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    eprintln!("Wrote {} chart to {}", kind.name(), args.out.display());

    if args.summary {
        let size = scene.size();
        println!("chart={} size={}x{} nodes={}", kind.name(), size.width, size.height, scene.len());
        for class in [
            "tick", "line", "gap-area", "marker", "point-label", "legend", "bubble", "region",
            "tooltip",
        ] {
            let n = scene.count_class(class);
            if n > 0 {
                println!("{class}={n}");
            }
        }
    }
    host.unmount(handle);
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> Result<()> {
    let format = DataFormat::from_path(&args.out)?;
    let path = &args.out;
    match (ChartKind::from(args.chart), format) {
        (ChartKind::Growth, DataFormat::Csv) => {
            let d = datasets::growth_gap();
            let series: Vec<_> = std::iter::once(d.primary).chain(d.secondary).collect();
            storage::save_series_csv(&series, path)?;
        }
        (ChartKind::Growth, DataFormat::Json) => storage::save_json(&datasets::growth_gap(), path)?,
        (ChartKind::Bubbles, DataFormat::Csv) => {
            storage::save_bubbles_csv(&datasets::regional_readiness(), path)?
        }
        (ChartKind::Bubbles, DataFormat::Json) => {
            storage::save_json(&datasets::regional_readiness(), path)?
        }
        (ChartKind::WorldMap, DataFormat::Json) => {
            storage::save_json(&datasets::country_readiness(), path)?
        }
        (ChartKind::WorldMap, DataFormat::Csv) => {
            bail!("map scores are written as JSON; use a .json path")
        }
    }
    eprintln!("Saved sample data to {}", path.display());
    Ok(())
}
