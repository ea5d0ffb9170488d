// src/main.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use sketch2html::{
    build_prompt, get_html_from_gemini, Config, DesignSnapshot, Error, GridOverlay, HtmlRequest,
    PreviousPreview, PromptContext, Rasterizer, RenderOptions, SvgRasterizer,
};

#[derive(Parser)]
#[command(name = "sketch2html")]
#[command(about = "Turn a whiteboard SVG into an HTML prototype with Gemini", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a design to Gemini and print the generated HTML
    Generate {
        /// SVG snapshot of the whiteboard
        #[arg(long)]
        svg: PathBuf,

        /// Gemini API key (default: $GEMINI_API_KEY, then $GOOGLE_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Gemini model name (e.g., "gemini-1.5-pro")
        #[arg(long, short = 'm')]
        model: Option<String>,

        /// API base URL (default: $GEMINI_API_BASE or the public endpoint)
        #[arg(long)]
        api_base: Option<String>,

        /// Write the HTML to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,

        #[command(flatten)]
        context: ContextArgs,
    },
    /// Print the prompt that would be sent, without calling the model
    Prompt {
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Rasterize an SVG snapshot to PNG
    Rasterize {
        #[arg(long)]
        svg: PathBuf,

        /// PNG output file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the base64 payload instead of writing a file
        #[arg(long)]
        base64: bool,

        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Give up on SVG decoding after this many seconds
    #[arg(long, default_value_t = 10)]
    decode_timeout: u64,
}

impl RenderArgs {
    fn into_options(self) -> RenderOptions {
        RenderOptions {
            decode_timeout: Duration::from_secs(self.decode_timeout),
            ..RenderOptions::default()
        }
    }
}

#[derive(Args)]
struct ContextArgs {
    /// Text detected in the design
    #[arg(long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read detected text from a file
    #[arg(long)]
    text_file: Option<PathBuf>,

    #[arg(long, default_value = "light")]
    theme: String,

    /// Grid color; enables the grid section together with --grid-size
    #[arg(long, requires = "grid_size")]
    grid_color: Option<String>,

    /// Grid cell size in pixels
    #[arg(long, requires = "grid_color")]
    grid_size: Option<u32>,

    #[arg(long)]
    grid_labels: bool,

    /// HTML file from an earlier round; repeat for several
    #[arg(long = "previous")]
    previous: Vec<PathBuf>,
}

impl ContextArgs {
    fn into_context(self) -> Result<PromptContext> {
        let text = match (self.text, self.text_file) {
            (Some(text), _) => Some(text),
            (None, Some(path)) => Some(
                fs::read_to_string(&path)
                    .with_context(|| format!("reading text file {}", path.display()))?,
            ),
            (None, None) => None,
        };

        let grid = match (self.grid_color, self.grid_size) {
            (Some(color), Some(size)) => Some(GridOverlay {
                color,
                size,
                labels: self.grid_labels,
            }),
            _ => None,
        };

        let previous_previews = self
            .previous
            .iter()
            .map(|path| {
                fs::read_to_string(path)
                    .map(PreviousPreview::new)
                    .with_context(|| format!("reading previous design {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PromptContext {
            text,
            grid,
            theme: self.theme,
            previous_previews,
        })
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info")
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { svg, api_key, model, api_base, out, render, context } => {
            run_generate(svg, api_key, model, api_base, out, render, context)
        }
        Commands::Prompt { context } => {
            print!("{}", build_prompt(&context.into_context()?));
            Ok(())
        }
        Commands::Rasterize { svg, out, base64, render } => {
            run_rasterize(&svg, out, base64, render.into_options())
        }
    }
}

fn run_generate(
    svg: PathBuf,
    api_key: Option<String>,
    model: Option<String>,
    api_base: Option<String>,
    out: Option<PathBuf>,
    render: RenderArgs,
    context: ContextArgs,
) -> Result<()> {
    let api_key = get_api_key(api_key);

    let mut config = Config::default();
    if let Some(model) = model {
        config.gemini.model = model;
    }
    config.gemini.api_base = get_api_base(api_base);
    config.render = render.into_options();

    let snapshot = DesignSnapshot::from_path(&svg)
        .with_context(|| format!("loading {}", svg.display()))?;

    let request = HtmlRequest {
        image: &snapshot,
        api_key: &api_key,
        context: context.into_context()?,
    };

    info!("Generating HTML for {} with {}", svg.display(), config.gemini.model);

    let html = match get_html_from_gemini(&request, &config) {
        Ok(html) => html,
        Err(Error::MissingCredential) => {
            error!("No API key: pass --api-key or set GEMINI_API_KEY");
            return Err(Error::MissingCredential.into());
        }
        Err(e) => return Err(e).context("generating HTML"),
    };

    match out {
        Some(path) => {
            fs::write(&path, &html).with_context(|| format!("writing {}", path.display()))?;
            info!("HTML saved to: {}", path.display());
        }
        None => println!("{}", html),
    }

    Ok(())
}

fn run_rasterize(svg: &Path, out: Option<PathBuf>, base64: bool, options: RenderOptions) -> Result<()> {
    let snapshot = DesignSnapshot::from_path(svg)
        .with_context(|| format!("loading {}", svg.display()))?;
    let png = SvgRasterizer::new(options)
        .encode_to_raster(&snapshot)
        .context("rasterizing SVG")?;

    if base64 {
        println!("{}", general_purpose::STANDARD.encode(&png));
    }

    if let Some(path) = out {
        fs::write(&path, &png).with_context(|| format!("writing {}", path.display()))?;
        info!("PNG saved to: {}", path.display());
    } else if !base64 {
        anyhow::bail!("nothing to do: pass --out and/or --base64");
    }

    Ok(())
}

fn get_api_key(key_arg: Option<String>) -> String {
    pick_api_key(key_arg, non_empty_env)
}

/// A blank `--api-key` counts as absent and falls through to the environment.
fn pick_api_key(key_arg: Option<String>, env: impl Fn(&str) -> Option<String>) -> String {
    non_blank(key_arg)
        .or_else(|| env("GEMINI_API_KEY"))
        .or_else(|| env("GOOGLE_API_KEY"))
        .unwrap_or_default()
}

fn get_api_base(url_arg: Option<String>) -> String {
    url_arg
        .or_else(|| non_empty_env("GEMINI_API_BASE"))
        .unwrap_or_else(|| sketch2html::config::DEFAULT_API_BASE.to_string())
}

fn non_empty_env(name: &str) -> Option<String> {
    non_blank(std::env::var(name).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
