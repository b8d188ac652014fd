use clap::{Parser, ValueEnum};
use shapesketch::export::{OutputFormat, svg_to_pdf, svg_to_png};
use shapesketch::{
    ColorMode, OpenAiExtractor, RenderOptions, Resolver, Settings, ShapeExtractor, SketchTheme,
    render_outline,
};
use std::io::Write;
use std::path::PathBuf;

/// Sketch a 2D shape from a plain-English description
#[derive(Parser, Debug)]
#[command(name = "shapesketch")]
#[command(version)]
#[command(about = "Turn \"draw a rectangle 8 by 3\" into an SVG, PNG or PDF outline", long_about = None)]
struct Args {
    /// Shape description, e.g. "Create a 7-gon radius 3"
    #[arg(value_name = "PROMPT")]
    prompt: String,

    /// Output file path (extension picks .svg, .png or .pdf; "-" writes SVG to stdout)
    #[arg(short, long, value_name = "OUTPUT", default_value = "-")]
    output: PathBuf,

    /// Canvas width and height in pixels
    #[arg(long, default_value_t = 1000)]
    canvas_size: u32,

    /// Fraction of the canvas the largest dimension should cover
    #[arg(long, default_value_t = 0.80)]
    fill_ratio: f64,

    /// Extra zoom applied on top of the fill ratio
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Outline stroke width
    #[arg(long, default_value_t = 10)]
    stroke_width: u32,

    /// Draw a background grid
    #[arg(long)]
    grid: bool,

    /// Skip the OpenAI extraction step and use rule-based parsing only
    #[arg(long)]
    no_ai: bool,

    /// Stroke palette: auto follows the viewer's light/dark preference
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Built-in theme name or path to a theme file (TOML or YAML)
    #[arg(short, long, value_name = "THEME")]
    theme: Option<String>,

    /// Path to a settings file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Print the resolved shape spec as JSON to stderr
    #[arg(long)]
    show_spec: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Auto,
    Light,
    Dark,
}

impl From<ModeArg> for ColorMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => ColorMode::Auto,
            ModeArg::Light => ColorMode::Light,
            ModeArg::Dark => ColorMode::Dark,
        }
    }
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !(args.fill_ratio > 0.0 && args.fill_ratio <= 1.0) {
        return Err(format!("Invalid --fill-ratio value: {} (expected 0..1)", args.fill_ratio));
    }

    let to_stdout = args.output.to_str() == Some("-");
    let format = if to_stdout {
        OutputFormat::Svg
    } else {
        let ext = args
            .output
            .extension()
            .and_then(|e| e.to_str())
            .ok_or("Output file has no extension")?;
        OutputFormat::from_extension(ext)?
    };

    let theme = load_theme(args.theme.as_deref())?;
    let settings = load_settings(args.config.as_ref())?;

    let extractor: Option<Box<dyn ShapeExtractor>> = if args.no_ai {
        None
    } else {
        Some(Box::new(OpenAiExtractor::new(settings)))
    };
    let resolver = Resolver::new(extractor);
    let spec = resolver.resolve(&args.prompt, !args.no_ai);

    if args.show_spec {
        eprintln!("{}", spec.to_pretty_json());
    }

    // resvg and svg2pdf don't understand CSS variables.
    let color_mode = match (args.mode, format) {
        (Some(mode), _) => mode.into(),
        (None, OutputFormat::Svg) => ColorMode::Auto,
        (None, _) => ColorMode::Light,
    };

    let options = RenderOptions {
        canvas_size: args.canvas_size,
        fill_ratio: args.fill_ratio,
        zoom: args.zoom,
        stroke_width: args.stroke_width,
        show_grid: args.grid,
        color_mode,
        theme,
    };
    let svg = render_outline(&spec, &options)
        .map_err(|e| format!("I couldn't generate that shape. Error: {}", e))?;

    if to_stdout {
        std::io::stdout()
            .write_all(svg.as_bytes())
            .map_err(|e| format!("Failed to write SVG: {}", e))?;
        return Ok(());
    }

    match format {
        OutputFormat::Svg => {
            std::fs::write(&args.output, svg).map_err(|e| format!("Failed to write SVG: {}", e))?;
            eprintln!("SVG saved to: {}", args.output.display());
        }
        OutputFormat::Png => {
            let png_data = svg_to_png(&svg, args.png_scale)?;
            std::fs::write(&args.output, png_data)
                .map_err(|e| format!("Failed to write PNG: {}", e))?;
            eprintln!("PNG saved to: {}", args.output.display());
        }
        OutputFormat::Pdf => {
            let pdf_data = svg_to_pdf(&svg)?;
            std::fs::write(&args.output, pdf_data)
                .map_err(|e| format!("Failed to write PDF: {}", e))?;
            eprintln!("PDF saved to: {}", args.output.display());
        }
    }

    Ok(())
}

fn load_theme(theme: Option<&str>) -> Result<SketchTheme, String> {
    let Some(theme) = theme else {
        return Ok(SketchTheme::default());
    };

    let path = std::path::Path::new(theme);
    if !path.is_file() {
        return SketchTheme::from_builtin(theme);
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read theme file: {}", e))?;
    if let Ok(theme) = SketchTheme::from_toml(&content) {
        Ok(theme)
    } else if let Ok(theme) = SketchTheme::from_yaml(&content) {
        Ok(theme)
    } else {
        Err("Failed to parse theme file as TOML or YAML".to_string())
    }
}

fn load_settings(config: Option<&PathBuf>) -> Result<Settings, String> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let base = match config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read config file: {}", e))?;
            Settings::from_toml(&content).map_err(|e| e.to_string())?
        }
        None => Settings::default(),
    };

    base.with_lookup(|key| std::env::var(key).ok())
        .map_err(|e| e.to_string())
}
