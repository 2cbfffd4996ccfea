//! `textfit` CLI — find the font size at which text fits a box.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use textfit_core::{
    AttributedString, Color, FitConfig, FitEngine, Font, LinearTextSizing, SizeF, TextSizing,
    TextSizingExt,
};
use textfit_text::{CosmicSizingConfig, CosmicTextSizing};

#[derive(Parser)]
#[command(version, about = "Fit text into a box by shrinking its font")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the drawing font size for TEXT
    Fit(FitArgs),
    /// Print the default fit configuration as JSON
    Config,
}

#[derive(Args)]
struct FitArgs {
    /// Text to fit
    text: String,

    /// Available width
    #[arg(long)]
    width: f32,

    /// Available height
    #[arg(long)]
    height: f32,

    /// Base font size
    #[arg(long, default_value_t = 40.0)]
    font_size: f32,

    #[arg(long)]
    bold: bool,

    #[arg(long)]
    italic: bool,

    /// Smallest size the multi-line search may pick (overrides the config)
    #[arg(long)]
    min_size: Option<i32>,

    /// Single-line shrink ratio (overrides the config)
    #[arg(long)]
    shrink_ratio: Option<f32>,

    /// Let single-line text grow up to this size (requires --single-line)
    #[arg(long, requires = "single_line")]
    expand_to: Option<f32>,

    /// Keep the text on one line
    #[arg(long)]
    single_line: bool,

    /// JSON file with fit configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Measurement back end: "linear" (default) or "cosmic"
    #[arg(long, default_value = "linear", value_parser = parse_engine)]
    engine: EngineKind,

    /// Font family for the cosmic back end
    #[arg(long, default_value = "sans-serif")]
    family: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EngineKind {
    Linear,
    Cosmic,
}

fn parse_engine(s: &str) -> Result<EngineKind, String> {
    match s.to_lowercase().as_str() {
        "linear" => Ok(EngineKind::Linear),
        "cosmic" => Ok(EngineKind::Cosmic),
        _ => Err(format!(
            "unknown engine \"{s}\": expected \"linear\" or \"cosmic\""
        )),
    }
}

/// Loads the config file if given, then applies command-line overrides.
fn load_config(args: &FitArgs) -> Result<FitConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            FitConfig::from_json(&json)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => FitConfig::default(),
    };
    if let Some(min) = args.min_size {
        config = config.with_minimum_font_size(min);
    }
    if let Some(ratio) = args.shrink_ratio {
        config = config.with_shrink_ratio(ratio);
    }
    config.validate()?;
    Ok(config)
}

fn run_fit(args: &FitArgs, config: FitConfig, sizing: &dyn TextSizing) -> Result<()> {
    if !(args.width >= 0.0 && args.height >= 0.0) {
        bail!("available size must be non-negative, got {}x{}", args.width, args.height);
    }
    let available = SizeF::new(args.width, args.height);
    let font = Font::styled(args.font_size, args.bold, args.italic);
    let mut run = AttributedString::new(args.text.as_str(), font, Color::BLACK);
    let engine = FitEngine::new(sizing, config);

    let wrap_width = if args.single_line {
        engine.compute_single_line_drawing_font_size(&mut run, available, args.expand_to)?;
        None
    } else {
        engine.compute_drawing_font_size_with_config(&mut run, available)?;
        Some(available.width).filter(|w| *w > 0.0 && w.is_finite())
    };

    let size = run.drawing_font_size_or_base();
    let bounds = sizing.bounding_size(&run, true, wrap_width)?;
    let fits = available.contains(bounds);
    log::info!("{:?} at {size} in {}x{}: fits={fits}", args.text, args.width, args.height);

    if args.json {
        let report = serde_json::json!({
            "text": args.text,
            "base_font_size": args.font_size,
            "font_size": size,
            "shrunk": run.has_drawing_font_size(),
            "width": bounds.width,
            "height": bounds.height,
            "fits": fits,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("font size: {size}");
        println!("bounds:    {} x {}", bounds.width, bounds.height);
        if !fits {
            println!("warning: text overflows {} x {}", args.width, args.height);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Config => {
            println!("{}", FitConfig::default().to_json()?);
        }
        Command::Fit(args) => {
            let config = load_config(&args)?;
            log::debug!("fit config: {config:?}");
            match args.engine {
                EngineKind::Linear => run_fit(&args, config, &LinearTextSizing::default())?,
                EngineKind::Cosmic => {
                    let sizing = CosmicTextSizing::new(CosmicSizingConfig {
                        family: args.family.clone(),
                        ..Default::default()
                    });
                    if !sizing.has_fonts() {
                        bail!("no system fonts found; try --engine linear");
                    }
                    run_fit(&args, config, &sizing)?;
                }
            }
        }
    }
    Ok(())
}
