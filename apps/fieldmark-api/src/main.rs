//! Fieldmark API Server - storage and export glue
//!
//! Provides REST endpoints for:
//! - Document upload and delivery (PDF, PNG, JPEG)
//! - Text-field CRUD in creation order
//! - First-page preview rasterization
//! - Fillable-PDF export

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;
mod models;
mod preview;
mod state;

use state::AppState;

/// Command-line arguments for the Fieldmark server
#[derive(Parser, Debug)]
#[command(name = "fieldmark-api")]
#[command(about = "Fieldmark server - place text fields on documents, export fillable PDFs")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "4000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory holding TrueType fonts for export embedding
    /// (Allura-Regular.ttf, DancingScript-Regular.ttf)
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Documents
        .route("/api/documents", post(handlers::upload_document))
        .route(
            "/api/documents/:id",
            get(handlers::get_document).delete(handlers::delete_document),
        )
        .route("/api/documents/:id/file", get(handlers::get_document_file))
        .route(
            "/api/documents/:id/preview",
            get(handlers::get_document_preview),
        )
        // Fields
        .route(
            "/api/documents/:id/fields",
            get(handlers::list_fields).post(handlers::create_field),
        )
        .route(
            "/api/fields/:id",
            patch(handlers::update_field).delete(handlers::delete_field),
        )
        // Export
        .route("/api/documents/:id/export", get(handlers::export_document))
        // Apply middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Fieldmark API on {}:{}", args.host, args.port);

    let state = Arc::new(AppState::new(args.fonts_dir.clone()));
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    if let Some(dir) = &args.fonts_dir {
        info!("Embedding fonts from {}", dir.display());
    }

    axum::serve(listener, app).await?;

    Ok(())
}
