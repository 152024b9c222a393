use anyhow::{Context, Result};
use clap::Parser;
use slide_preview::{Color, Manifest, Pipeline, PreviewConfig, Viewport};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slide-preview")]
#[command(version, about = "Screenshot HTML slides and tile them into a labelled preview grid", long_about = None)]
struct Cli {
    /// HTML slides, in presentation order (overrides the manifest's list)
    #[arg(value_name = "SLIDE")]
    slides: Vec<PathBuf>,

    /// JSON manifest with `slides` and any setting
    #[arg(long, short, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Directory for slide-NN.png captures
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Composite output path (default preview-grid.png)
    #[arg(long, value_name = "PATH")]
    grid: Option<PathBuf>,

    /// Grid columns
    #[arg(long, short)]
    columns: Option<u32>,

    /// Viewport width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Gap between cells in pixels
    #[arg(long)]
    gap: Option<u32>,

    /// Label band height in pixels
    #[arg(long)]
    label_height: Option<u32>,

    /// Canvas background colour (#rrggbb)
    #[arg(long, value_name = "COLOR")]
    background: Option<Color>,

    /// Extra delay after each slide reports it rendered, in milliseconds
    #[arg(long, value_name = "MS")]
    settle_ms: Option<u64>,

    /// Navigation and render readiness timeout, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Chrome/Chromium binary (autodetected when omitted)
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,
}

impl Cli {
    fn into_run(self) -> Result<(PreviewConfig, Vec<PathBuf>)> {
        let (mut config, manifest_slides) = match &self.manifest {
            Some(path) => {
                let m = Manifest::load(path).with_context(|| format!("loading manifest {}", path.display()))?;
                (m.config, m.slides)
            }
            None => (PreviewConfig::default(), Vec::new()),
        };

        let viewport = Viewport {
            width: self.width.unwrap_or(config.viewport.width),
            height: self.height.unwrap_or(config.viewport.height),
        };
        config.viewport = viewport;
        if let Some(v) = self.out_dir {
            config.output_dir = v;
        }
        if let Some(v) = self.grid {
            config.grid_path = v;
        }
        if let Some(v) = self.columns {
            config.columns = v;
        }
        if let Some(v) = self.gap {
            config.gap = v;
        }
        if let Some(v) = self.label_height {
            config.label_height = v;
        }
        if let Some(v) = self.background {
            config.background = v;
        }
        if let Some(v) = self.settle_ms {
            config.settle_delay_ms = v;
        }
        if let Some(v) = self.timeout_ms {
            config.load_timeout_ms = v;
        }
        if self.chrome.is_some() {
            config.chrome_path = self.chrome;
        }

        let slides = if self.slides.is_empty() { manifest_slides } else { self.slides };
        Ok((config, slides))
    }
}

fn run(cli: Cli) -> Result<PathBuf> {
    let (config, slides) = cli.into_run()?;
    let mut pipeline = Pipeline::new(config, &slides)?;
    let report = pipeline.run()?;
    Ok(report.grid_path)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(grid) => println!("{}", grid.display()),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}
