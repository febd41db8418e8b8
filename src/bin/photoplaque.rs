use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "photoplaque", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the computed layout and preview plan as JSON.
    Layout(LayoutArgs),
    /// Render a composition to a local PNG.
    Render(RenderArgs),
    /// Capture a composition and generate its PDF through the generation service.
    Submit(SubmitArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Photo aspect ratio (width / height).
    #[arg(long, conflicts_with = "photo", required_unless_present = "photo")]
    aspect: Option<f64>,

    /// Read the aspect ratio from a photo instead.
    #[arg(long)]
    photo: Option<PathBuf>,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Variant the user has already chosen.
    #[arg(long, value_enum)]
    selected: Option<VariantChoice>,
}

#[derive(Parser, Debug)]
struct CompositionArgs {
    /// Photo to compose (.jpg, .jpeg or .png).
    #[arg(long)]
    photo: PathBuf,

    /// Overlay message (at most 25 characters).
    #[arg(long)]
    message: String,

    /// Viewport width used for the layout.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Variant to capture when two are offered.
    #[arg(long, value_enum)]
    variant: Option<VariantChoice>,

    /// Optional JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra fonts directory for the text overlay.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    composition: CompositionArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SubmitArgs {
    #[command(flatten)]
    composition: CompositionArgs,

    /// Base URL of the generation service.
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory the PDF is written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Locale of notifications (`en` or `fr`).
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantChoice {
    Primary,
    Secondary,
}

impl From<VariantChoice> for photoplaque::LayoutVariant {
    fn from(v: VariantChoice) -> Self {
        match v {
            VariantChoice::Primary => Self::Primary,
            VariantChoice::Secondary => Self::Secondary,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Render(args) => cmd_render(args).await,
        Command::Submit(args) => cmd_submit(args).await,
    }
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

fn load_config(
    path: Option<&PathBuf>,
    fonts_dir: Option<PathBuf>,
) -> anyhow::Result<photoplaque::PipelineConfig> {
    let mut cfg = match path {
        Some(p) => photoplaque::PipelineConfig::from_path(p)?,
        None => photoplaque::PipelineConfig::default(),
    }
    .with_env();
    if fonts_dir.is_some() {
        cfg.fonts_dir = fonts_dir;
    }
    Ok(cfg)
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let aspect = match (args.aspect, &args.photo) {
        (Some(a), _) => photoplaque::AspectRatio::new(a)?,
        (None, Some(path)) => {
            let photo = photoplaque::ImageAsset::load(path)?;
            let (w, h) = photo.natural_size()?;
            photoplaque::AspectRatio::from_natural(w, h)
                .context("photo reports an empty natural size")?
        }
        (None, None) => anyhow::bail!("either --aspect or --photo is required"),
    };
    let width = photoplaque::foundation::core::ViewportWidth::new(args.width)?.px();

    #[derive(serde::Serialize)]
    struct LayoutReport {
        aspect_ratio: f64,
        viewport_width: f64,
        layout: photoplaque::Layout,
        plan: photoplaque::PreviewPlan,
    }
    let report = LayoutReport {
        aspect_ratio: aspect.get(),
        viewport_width: width,
        layout: photoplaque::compute_dimensions(aspect, width),
        plan: photoplaque::PreviewPlan::new(aspect, width, args.selected.map(Into::into)),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Session prepared up to an open preview with the requested variant selected.
fn open_session(
    args: &CompositionArgs,
    cfg: &photoplaque::PipelineConfig,
    deps: photoplaque::SessionDeps,
) -> anyhow::Result<photoplaque::PlaqueSession> {
    let opts = photoplaque::PlaqueSessionOpts {
        viewport_width: args.width,
        ..photoplaque::PlaqueSessionOpts::default()
    };
    let mut session = photoplaque::PlaqueSession::new(cfg, opts, deps)?;
    session.select_files(std::slice::from_ref(&args.photo))?;
    session.set_message(&args.message)?;
    let plan = session.show_preview()?;
    match args.variant {
        Some(v) => session.select_variant(v.into())?,
        None if !plan.can_submit => session.select_variant(photoplaque::LayoutVariant::Primary)?,
        None => {}
    }
    Ok(session)
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(
        args.composition.config.as_ref(),
        args.composition.fonts_dir.clone(),
    )?;
    let deps = photoplaque::SessionDeps::from_config(&cfg, photoplaque::Theme::default())?;
    let renderer = Arc::clone(&deps.renderer);
    let session = open_session(&args.composition, &cfg, deps)?;

    let capture =
        photoplaque::CaptureService::new(renderer, photoplaque::CaptureOptions::default())?;
    let handle = session.board().select(session.state().selected_variant)?;
    let raster = capture.capture(session.board(), handle).await?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &raster.bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_submit(args: SubmitArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(
        args.composition.config.as_ref(),
        args.composition.fonts_dir.clone(),
    )?;
    if let Some(endpoint) = args.endpoint {
        cfg.base_url = endpoint;
    }
    if let Some(dir) = args.out_dir {
        cfg.download_dir = dir;
    }
    if let Some(locale) = args.locale {
        cfg.locale = locale;
    }
    cfg.validate()?;

    let deps = photoplaque::SessionDeps::from_config(&cfg, photoplaque::Theme::default())?;
    let mut session = open_session(&args.composition, &cfg, deps)?;
    let path = session.submit().await?;

    eprintln!("wrote {}", path.display());
    Ok(())
}
