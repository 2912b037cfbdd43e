use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pfpaint::api;
use pfpaint::assets::{AssetCategory, AssetLoader};
use pfpaint::models::{AppConfig, ExtractionMethod, FailurePolicy, Fid};
use pfpaint::server;
use pfpaint::services::{palette_from_image, ContentPipeline};

#[derive(Parser)]
#[command(name = "pfpaint")]
#[command(about = "Recolor SVG designs with a profile's avatar palette")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render a design directly to a PNG file
    Render {
        /// Design name from config.yaml
        #[arg(short, long)]
        design: String,

        /// Fetch the avatar of this profile
        #[arg(short, long, conflicts_with = "image")]
        fid: Option<String>,

        /// Take colors from a local image instead of a profile
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List configured designs
    Designs,
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract design templates
        #[arg(long)]
        designs: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pfpaint API",
        description = "Profile picture palette art: SVG designs recolored from avatars",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_list_designs,
        api::handle_design_image,
        api::handle_design_image_query,
    ),
    components(schemas(
        api::DesignSummary,
        api::ErrorResponse,
        ExtractionMethod,
        FailurePolicy,
    )),
    tags(
        (name = "Designs", description = "Design listing and rendering")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            design,
            fid,
            image,
            output,
        }) => run_render_command(&design, fid.as_deref(), image.as_deref(), &output).await,
        Some(Commands::Designs) => {
            run_designs_command();
            Ok(())
        }
        Some(Commands::Init {
            designs,
            config,
            all,
            force,
            list,
        }) => run_init_command(designs, config, all, force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pfpaint=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Load assets and config the same way the server does
fn load_assets() -> (Arc<AssetLoader>, Arc<AppConfig>) {
    let asset_loader = Arc::new(AssetLoader::from_env());

    // Seed if configured paths are empty
    if let Err(e) = asset_loader.seed_if_configured() {
        tracing::warn!(%e, "Failed to seed assets");
    }

    let config = Arc::new(AppConfig::load_from_assets(&asset_loader));
    (asset_loader, config)
}

/// Render a design directly to a PNG file (no server needed)
async fn run_render_command(
    design: &str,
    fid: Option<&str>,
    image: Option<&Path>,
    output: &Path,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let (asset_loader, config) = load_assets();
    let design_config = config
        .get_design(design)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Unknown design '{design}', see 'pfpaint designs'"))?;
    let pipeline = ContentPipeline::from_config(config, asset_loader)?;

    let png_bytes = match (fid, image) {
        (Some(raw), _) => {
            let fid: Fid = raw.parse()?;
            pipeline.generate(design, fid).await?
        }
        (None, Some(path)) => {
            let bytes = std::fs::read(path)?;
            let palette = palette_from_image(&bytes, &design_config)?;
            pipeline.render_with_palette(design, palette, None).await?
        }
        (None, None) => pipeline.render_defaults(design).await?,
    };

    // Write to file
    std::fs::write(output, &png_bytes)?;
    println!("Rendered {} ({} bytes)", output.display(), png_bytes.len());

    Ok(())
}

/// Print the configured designs
fn run_designs_command() {
    init_cli_tracing();

    let (_, config) = load_assets();
    if config.designs.is_empty() {
        println!("No designs configured.");
        return;
    }

    for summary in api::designs::design_summaries(&config) {
        println!(
            "{:<12} {}x{} grid, {}x{} px, {} slots{}",
            summary.name,
            summary.grid[0],
            summary.grid[1],
            summary.width,
            summary.height,
            summary.slots.len(),
            summary
                .description
                .map(|d| format!("  - {d}"))
                .unwrap_or_default()
        );
    }
}

/// Extract embedded assets to filesystem
fn run_init_command(
    designs: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Designs:");
        for f in AssetLoader::list_embedded(AssetCategory::Designs) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Determine which categories to extract
    let mut categories = Vec::new();
    if all || designs {
        categories.push(AssetCategory::Designs);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --designs, or --config");
        eprintln!("\nRun 'pfpaint init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let loader = AssetLoader::from_env();
    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let designs_dir = std::env::var("DESIGNS_DIR").ok();

    println!("pfpaint v{VERSION} - profile picture palette art\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  DESIGNS_DIR = {}",
        designs_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:  {config_source}");

    let loader = AssetLoader::new(designs_dir.clone().map(PathBuf::from), None);
    let design_count = loader.list_designs().len();
    let embedded_count = AssetLoader::list_embedded(AssetCategory::Designs).len();
    match designs_dir {
        Some(ref path) if Path::new(path).exists() => {
            println!("  Designs: {path} ({design_count} templates, {embedded_count} embedded)")
        }
        _ => println!("  Designs: embedded ({embedded_count} templates)"),
    }

    println!("\nCommands:");
    println!("  pfpaint serve     Start the HTTP server");
    println!("  pfpaint render    Render a design to PNG file");
    println!("  pfpaint designs   List configured designs");
    println!("  pfpaint init      Extract embedded assets");
    println!("\nRun 'pfpaint --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pfpaint=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(AssetLoader::from_env());

    // Log asset sources
    tracing::info!(
        designs = %asset_loader.designs_dir().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        config = %asset_loader.config_file().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    // Seed if configured paths are empty
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                designs = report.designs_seeded.len(),
                config = report.config_seeded,
                "Seeded empty directories with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    let app = server::build_router(state)
        // OpenAPI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "pfpaint server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
