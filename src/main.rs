//! geojson-svg CLI
//!
//! Usage:
//!   geojson-svg [OPTIONS] [-i FILE] [-o FILE]
//!
//! Reads GeoJSON from a file (or stdin), projects it into a width x height
//! viewport and writes an SVG document (or bare path data) to a file (or
//! stdout). Set `RUST_LOG` to control log output.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};

use geojson_svg::{
    convert, renderer::assemble, AttributeSpec, CompactOptimizer, ConvertOptions, DocumentStyle,
    Extent, FitTo, MarkupOptimizer, OutputMode, Settings,
};

#[derive(Parser)]
#[command(name = "geojson-svg")]
#[command(about = "Convert GeoJSON into an SVG map")]
struct Cli {
    /// Input GeoJSON file (reads from stdin if not provided)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file (TOML); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the output SVG [default: 512]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=10000))]
    width: Option<u32>,

    /// Height of the output SVG [default: 250]
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..=10000))]
    height: Option<u32>,

    /// Top extent of the map [default: 90]
    #[arg(short, long, allow_negative_numbers = true)]
    top: Option<f64>,

    /// Bottom extent of the map [default: -90]
    #[arg(short, long, allow_negative_numbers = true)]
    bottom: Option<f64>,

    /// Left extent of the map [default: -180]
    #[arg(short, long, allow_negative_numbers = true)]
    left: Option<f64>,

    /// Right extent of the map [default: 180]
    #[arg(short, long, allow_negative_numbers = true)]
    right: Option<f64>,

    /// Stroke color (#rgb or #rrggbb) [default: #ffffff]
    #[arg(long, alias = "stroke")]
    stroke_color: Option<String>,

    /// Stroke width [default: 0.1]
    #[arg(long, alias = "weight")]
    stroke_weight: Option<f64>,

    /// Fill color (#rgb or #rrggbb) [default: #7c7c7c]
    #[arg(long, alias = "fill")]
    fill_color: Option<String>,

    /// Fit the map to width or height [default: height]
    #[arg(long, alias = "fit", value_enum)]
    fit_to: Option<FitTo>,

    /// Fractional digits kept in coordinates
    #[arg(long)]
    precision: Option<u32>,

    /// Render each part of a multi-geometry as its own element
    #[arg(long)]
    explode: bool,

    /// Render points as <circle> elements
    #[arg(long)]
    point_as_circle: bool,

    /// Point radius in pixels [default: 1]
    #[arg(long)]
    radius: Option<f64>,

    /// Emit SVG elements or bare path data [default: svg]
    #[arg(long, value_enum)]
    output_mode: Option<OutputMode>,

    /// Optimize the output SVG [default: true]
    #[arg(long, alias = "opt", action = clap::ArgAction::Set)]
    optimize: Option<bool>,

    /// Fractional digits kept by the optimizer [default: --precision, or 3]
    #[arg(long)]
    optimize_decimals: Option<u32>,

    /// Attribute to copy from feature properties: 'name', or 'name newName' to rename
    #[arg(short, long = "attribute", alias = "attributes")]
    attributes: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Load settings
    let settings = match &cli.config {
        Some(path) => match Settings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let style = document_style(&cli, &settings);
    let options = convert_options(&cli, &settings, &style);
    let optimize = cli.optimize.or(settings.output.optimize).unwrap_or(true);
    let optimizer = match cli.optimize_decimals.or(settings.output.optimize_decimals) {
        Some(digits) => CompactOptimizer::new(Some(digits)),
        None => CompactOptimizer::for_precision(options.precision),
    };

    // Read input
    let source = match &cli.input {
        Some(path) => {
            info!("Reading: {}", path.display());
            match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading file '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&source) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: input is not valid JSON: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = style.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    info!("Converting...");
    let conversion = match convert(&value, &options) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    for diagnostic in conversion.diagnostics() {
        warn!("{}", diagnostic);
    }

    let data = match options.output_mode {
        // One path per line keeps features apart
        OutputMode::Path => {
            let mut lines = conversion
                .fragments()
                .iter()
                .map(|f| f.markup.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            lines.push('\n');
            lines
        }
        OutputMode::Svg => {
            let svg = assemble(conversion.fragments(), &style);
            if optimize {
                match optimizer.optimize(&svg) {
                    Ok(optimized) => optimized,
                    Err(e) => {
                        eprintln!("Error optimizing SVG: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                svg
            }
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &data) {
                eprintln!("Failed to create '{}': {}", path.display(), e);
                std::process::exit(1);
            }
            info!("Saving {} chars to {}", data.len(), path.display());
            info!("Done. ({} KB)", data.len() / 1024);
        }
        None => print!("{}", data),
    }
}

fn document_style(cli: &Cli, settings: &Settings) -> DocumentStyle {
    let mut style = settings.document_style();
    if let Some(width) = cli.width {
        style.width = width as f64;
    }
    if let Some(height) = cli.height {
        style.height = height as f64;
    }
    if let Some(fill) = &cli.fill_color {
        style.fill = fill.clone();
    }
    if let Some(stroke) = &cli.stroke_color {
        style.stroke = stroke.clone();
    }
    if let Some(weight) = cli.stroke_weight {
        style.stroke_width = weight;
    }
    style
}

fn convert_options(cli: &Cli, settings: &Settings, style: &DocumentStyle) -> ConvertOptions {
    let base = settings.extent.unwrap_or_else(Extent::world);
    let extent = Extent::new(
        cli.left.unwrap_or(base.left),
        cli.right.unwrap_or(base.right),
        cli.bottom.unwrap_or(base.bottom),
        cli.top.unwrap_or(base.top),
    );

    // The viewport matches the document unless the settings say otherwise
    let viewport_from_flags = cli.width.is_some() || cli.height.is_some();
    let (vw, vh) = match settings.viewport {
        Some(v) if !viewport_from_flags => (v.width, v.height),
        _ => (style.width, style.height),
    };

    let output = &settings.output;
    let mut attributes = settings.attributes.clone();
    attributes.extend(cli.attributes.iter().map(|a| AttributeSpec::shorthand(a)));

    let mut options = ConvertOptions::new(extent)
        .with_viewport(vw, vh)
        .with_fit_to(cli.fit_to.or(output.fit_to).unwrap_or(FitTo::Height))
        .with_explode(cli.explode || output.explode.unwrap_or(false))
        .with_point_as_circle(cli.point_as_circle || output.point_as_circle.unwrap_or(false))
        .with_output_mode(cli.output_mode.or(output.mode).unwrap_or_default())
        .with_attributes(attributes);
    options.precision = cli.precision.or(output.precision);
    options.circle_radius = cli.radius.or(output.radius);
    options
}
