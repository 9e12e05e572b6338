use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cellmap::{
    canvas::SvgCanvas,
    geometry::{Point, Viewport},
    grazing::FixedClock,
    hit::hit_test,
    layout::LayoutLoader,
    logger,
    snapshot::MapExporter,
    web::{self, ServeConfig},
    Geometry, InteractionController, LayoutParameters,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Settlement cell map renderer")]
struct Cli {
    /// Layout YAML file; the reference layout is used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); falls back to RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the map to SVG and dump its geometry as JSON
    Render {
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        /// Output directory
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Pointer position to render a hover highlight for
        #[arg(long, requires = "hover_y")]
        hover_x: Option<f64>,
        #[arg(long, requires = "hover_x")]
        hover_y: Option<f64>,
        /// Rotation minute to draw the paddocks at instead of the wall clock
        #[arg(long)]
        minute: Option<i64>,
    },
    /// Print the region under a point as JSON
    Hit {
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        x: f64,
        y: f64,
    },
    /// Serve the interactive map over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3000)]
        port: u16,
        /// Seconds between grazing rotation checks
        #[arg(long, default_value_t = 60)]
        rotation_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level.as_deref()).context("failed to initialise logging")?;

    let params = LayoutLoader::new(".").load_or_default(cli.config.as_deref())?;
    params.validate().context("invalid layout parameters")?;

    match cli.command {
        Command::Render {
            width,
            height,
            out,
            hover_x,
            hover_y,
            minute,
        } => render(params, Viewport::new(width, height), out, hover_x.zip(hover_y), minute),
        Command::Hit {
            width,
            height,
            x,
            y,
        } => {
            let geometry = Geometry::compute(&params, Viewport::new(width, height));
            let target = hit_test(&geometry, Point::new(x, y));
            println!("{}", serde_json::to_string_pretty(&target)?);
            Ok(())
        }
        Command::Serve {
            host,
            port,
            rotation_secs,
        } => {
            web::run(ServeConfig {
                params,
                host,
                port,
                rotation_interval: Duration::from_secs(rotation_secs.max(1)),
            })
            .await
        }
    }
}

fn render(
    params: LayoutParameters,
    viewport: Viewport,
    out: PathBuf,
    hover: Option<(f64, f64)>,
    minute: Option<i64>,
) -> Result<()> {
    let mut controller = InteractionController::new(params, viewport);
    if let Some(minute) = minute {
        controller = controller.with_clock(FixedClock(minute));
    }
    if let Some((x, y)) = hover {
        controller.pointer_move(x, y);
    }

    let mut canvas = SvgCanvas::new(viewport.width, viewport.height);
    let report = controller.render(&mut canvas);
    let svg = canvas.finish();

    let paths = MapExporter::new(&out)
        .write(&svg, controller.geometry())
        .with_context(|| format!("failed to export map to {}", out.display()))?;
    println!(
        "Rendered {} layers in {:.2} ms -> {} and {}",
        report.layers.len(),
        report.total_ms,
        paths.svg.display(),
        paths.json.display()
    );
    Ok(())
}
