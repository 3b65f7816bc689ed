use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixel_art::PixelArtProcessor;
use pixelai::api;
use pixelai::models::{AppConfig, GenerateRequest};
use pixelai::server;
use pixelai::services::{codec, SpriteService};

#[derive(Parser)]
#[command(name = "pixelai")]
#[command(about = "PixelAI - pixel-art sprites from cloud image generation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Generate one sprite and write it to a PNG file
    Generate {
        /// Text description of the sprite
        #[arg(short, long)]
        prompt: String,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Backend: "openai" or "stability"
        #[arg(long)]
        provider: Option<String>,

        /// Sprite width in pixels
        #[arg(long)]
        width: Option<i64>,

        /// Sprite height in pixels
        #[arg(long)]
        height: Option<i64>,

        /// Palette size (0 keeps all colors)
        #[arg(short, long)]
        colors: Option<i64>,

        /// Guide image for structure-guided generation
        #[arg(short, long)]
        guide: Option<PathBuf>,

        /// How much the guide may change (0.0 - 1.0)
        #[arg(short, long)]
        strength: Option<f32>,

        /// API key (defaults to OPENAI_API_KEY / STABILITY_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Turn an existing PNG into a sprite locally (no network)
    Pixelate {
        /// Input PNG file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, default_value_t = 64)]
        width: u32,

        #[arg(long, default_value_t = 64)]
        height: u32,

        /// Palette size (0 keeps all colors)
        #[arg(short, long, default_value_t = 16)]
        colors: u32,
    },
    /// Show the effective configuration
    Status,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PixelAI API",
        description = "Pixel-art sprites from cloud image generation",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_generate,
        api::handle_health,
        api::handle_models,
        api::handle_loras,
    ),
    components(schemas(
        GenerateRequest,
        api::GenerateResponse,
        api::SpriteImage,
        api::ErrorResponse,
        api::HealthResponse,
        api::ModelsResponse,
        api::LorasResponse,
    )),
    tags(
        (name = "Generation", description = "Sprite generation"),
        (name = "Status", description = "Health and compatibility endpoints")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate {
            prompt,
            output,
            provider,
            width,
            height,
            colors,
            guide,
            strength,
            api_key,
        }) => {
            init_cli_logging();
            let init_image = guide
                .as_deref()
                .map(|path| std::fs::read(path).map(|bytes| STANDARD.encode(bytes)))
                .transpose()?;
            let request = GenerateRequest {
                prompt: Some(prompt),
                api_key,
                ai_provider: provider,
                init_image,
                strength,
                pixel_width: width,
                pixel_height: height,
                colors,
            };
            run_generate_command(request, &output).await
        }
        Some(Commands::Pixelate {
            input,
            output,
            width,
            height,
            colors,
        }) => {
            init_cli_logging();
            run_pixelate_command(&input, &output, width, height, colors)
        }
        Some(Commands::Status) => {
            run_status_command();
            Ok(())
        }
        Some(Commands::Serve) | None => run_server().await,
    }
}

/// Minimal logging for CLI one-shots
fn init_cli_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelai=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Generate a sprite through the configured backend and save it
async fn run_generate_command(request: GenerateRequest, output: &Path) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let optimize = config.optimize_png;
    let service = SpriteService::new(Arc::new(config));

    let start = std::time::Instant::now();
    let sprite = tokio::task::spawn_blocking(move || {
        let request = service.validate(request)?;
        service.generate_sprite(&request)
    })
    .await??;

    let png = codec::encode_png(sprite.as_image(), optimize)?;
    std::fs::write(output, &png)?;

    println!(
        "Wrote {}x{} sprite ({} colors, {} bytes) to {} in {:.1}s",
        sprite.width(),
        sprite.height(),
        sprite.distinct_rgb_count(),
        png.len(),
        output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Pixelate a local PNG (no server or network needed)
fn run_pixelate_command(
    input: &Path,
    output: &Path,
    width: u32,
    height: u32,
    colors: u32,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;
    let image = codec::decode(&bytes)?;

    let sprite = PixelArtProcessor::new(width, height)
        .colors(colors)
        .process(&image)?;

    let png = codec::encode_png(sprite.as_image(), false)?;
    std::fs::write(output, &png)?;

    println!(
        "Pixelated {}x{} -> {}x{} ({} colors) into {}",
        image.width(),
        image.height(),
        sprite.width(),
        sprite.height(),
        sprite.distinct_rgb_count(),
        output.display()
    );
    Ok(())
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelai=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    tracing::info!(
        openai_key = config.openai.api_key.is_some(),
        stability_key = config.stability.api_key.is_some(),
        timeout_secs = config.request_timeout_secs,
        debug_dir = ?config.debug_dir,
        "Configuration loaded"
    );
    if config.openai.api_key.is_none() && config.stability.api_key.is_none() {
        tracing::warn!("No server-side API keys set; requests must send api_key");
    }

    let state = server::create_app_state(config);

    // Build router: start with shared API routes, add production-only routes
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "PixelAI server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let config = AppConfig::from_env();

    println!("PixelAI v{VERSION}");
    println!("Pixel-art sprites from cloud image generation\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!("  BIND_ADDR   = {}", config.bind_addr);

    println!("\nBackends:");
    let key_status = |key: Option<&pixelai::models::ApiKey>| {
        key.map(|k| k.masked())
            .unwrap_or_else(|| "(not set)".to_string())
    };
    println!(
        "  openai    {} @ {}  key: {}",
        config.openai.model,
        config.openai.base_url,
        key_status(config.openai.api_key.as_ref())
    );
    println!(
        "  stability {} @ {}  key: {}",
        config.stability.model,
        config.stability.base_url,
        key_status(config.stability.api_key.as_ref())
    );

    println!("\nSprites:");
    println!(
        "  defaults    {}x{}, {} colors",
        config.defaults.width, config.defaults.height, config.defaults.colors
    );
    println!("  max size    {}", config.max_sprite_size);
    println!("  timeout     {}s", config.request_timeout_secs);
    println!("  body limit  {} bytes", config.max_body_bytes);
    println!("  optimize    {}", config.optimize_png);
    println!(
        "  debug dir   {}",
        config
            .debug_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(disabled)".to_string())
    );
}
