use clap::{Parser, Subcommand};
use cli::{RigConfig, run_pick};
use capture::{Camera, FileGrabber};
use color_eyre::eyre::{Result, WrapErr};
use robot::{TcpTransport, UrScript};
use shape::{ShapeLabel, ShapePipeline, load_font, render_annotations};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the shapes in a single amplitude image
    Classify {
        /// Path to the amplitude image
        #[arg(short, long)]
        image: PathBuf,
        /// Shape to look for (ALL lists every shape)
        #[arg(short, long, default_value = "ALL")]
        target: ShapeLabel,
        /// Where to write the annotated mask
        #[arg(short, long, default_value = "detectedShape.png")]
        annotated: PathBuf,
        /// TrueType font for label text
        #[arg(long)]
        font: Option<PathBuf>,
        /// Also export the classified hulls as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Run a full pick from a rig configuration
    Pick {
        /// Path to the TOML or JSON rig configuration
        #[arg(short, long)]
        config: PathBuf,
        /// Plan and print the program without contacting the robot
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the rig configuration JSON schema
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Classify { image, target, annotated, font, geojson } => {
            classify(image, *target, annotated, font.as_deref(), geojson.as_deref())?;
        }
        Commands::Pick { config, dry_run } => {
            pick(config, *dry_run).await?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&RigConfig::schema())?);
        }
    }

    Ok(())
}

fn classify(
    image_path: &Path,
    target: ShapeLabel,
    annotated: &Path,
    font: Option<&Path>,
    geojson: Option<&Path>,
) -> Result<()> {
    let frame = image::open(image_path)
        .wrap_err_with(|| format!("Failed to open {}", image_path.display()))?
        .to_luma8();

    let pipeline = ShapePipeline::default();
    let mask = pipeline.preprocess(&frame)?;
    let report = pipeline.classify_mask(&mask, target)?;

    println!("Detected : {:?}", report.detected);
    println!("Contour : {:?}", report.contour().vertices);
    println!("Center : {:?}", report.center());
    println!("Angle : {:?}", report.angle());

    let font = font.map(load_font).transpose()?;
    render_annotations(&mask, &report, font.as_ref()).save(annotated)?;
    info!("Annotated image saved to: {:?}", annotated);

    if let Some(path) = geojson {
        report.save_geojson(path)?;
        info!("GeoJSON saved to: {:?}", path);
    }
    Ok(())
}

async fn pick(config_path: &Path, dry_run: bool) -> Result<()> {
    let config = RigConfig::from_file(config_path)
        .wrap_err_with(|| format!("Failed to load {}", config_path.display()))?;
    info!("Rig target: {}, calibration: {:?}", config.target, config.calibration);

    let grabber = FileGrabber::new(&config.frames.amplitude_path, &config.frames.distance_path);
    let mut camera = Camera::new(grabber, config.capture.clone());
    let transport = TcpTransport::new(config.transport.clone());

    let report = match run_pick(&config, &mut camera, (!dry_run).then_some(&transport)).await {
        Ok(report) => report,
        Err(e) => {
            error!("Pick run failed: {}", e);
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    if dry_run && !report.commands.is_empty() {
        println!("{}", UrScript::from_commands(&report.commands));
    }
    Ok(())
}
