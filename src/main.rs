//! CarDJ playlist aggregator server.

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardj::api::{AppState, handlers};
use cardj::crypto::hash_password;
use cardj::models::{NewPlatform, NewUser};
use cardj::storage::{self, StorageConfig};

/// Interval between session-store prune passes (24 hours).
const SESSION_PRUNE_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// CarDJ music playlist aggregator server.
#[derive(Parser)]
#[command(name = "cardj")]
#[command(about = "A music playlist aggregator server written in Rust")]
struct Cli {
    /// SQLite database file path (falls back to the DATABASE_URL
    /// environment variable; if neither is set, storage is in-memory)
    #[arg(short, long)]
    database_url: Option<String>,

    /// Server port
    #[arg(short, long, default_value = "5000")]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new user
    CreateUser {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },

    /// Add a music platform
    AddPlatform {
        /// Platform name
        #[arg(short, long)]
        name: String,

        /// Icon reference shown in the UI
        #[arg(short, long)]
        icon: String,

        /// API key for the platform's catalog API
        #[arg(short, long)]
        api_key: Option<String>,

        /// Register the platform without activating it
        #[arg(long)]
        inactive: bool,
    },

    /// List active platforms
    ListPlatforms,

    /// Start the server (default)
    Serve,
}

fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Auth endpoints
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/user", get(handlers::get_current_user))
        // Platform endpoints
        .route("/platforms", get(handlers::list_platforms))
        .route("/platforms/{id}", get(handlers::get_platform))
        .route(
            "/platforms/{id}/playlists",
            get(handlers::get_platform_playlists),
        )
        // Playlist endpoints
        .route("/playlists", get(handlers::list_playlists))
        .route("/playlists/{id}", get(handlers::get_playlist))
        .route("/playlists/{id}/tracks", get(handlers::get_playlist_tracks))
        .route("/me/playlists", get(handlers::get_my_playlists))
        // Track and recommendation endpoints
        .route("/tracks", get(handlers::list_tracks))
        .route("/tracks/{id}", get(handlers::get_track))
        .route("/recommendations", get(handlers::get_recommendations))
        // System endpoints
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardj=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Select the storage backend: persistent when a database is
    // configured and reachable, in-memory otherwise
    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok());
    let store = storage::connect(&StorageConfig::new(database_url));

    match cli.command {
        Some(Commands::CreateUser {
            username,
            email,
            password,
        }) => {
            let password_hash = match hash_password(&password) {
                Ok(hash) => hash,
                Err(e) => {
                    eprintln!("Failed to hash password: {}", e);
                    std::process::exit(1);
                }
            };

            match store.create_user(&NewUser {
                username,
                email,
                password_hash,
            }) {
                Ok(user) => {
                    println!("Created user '{}' (id: {})", user.username, user.id);
                }
                Err(e) => {
                    eprintln!("Failed to create user: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::AddPlatform {
            name,
            icon,
            api_key,
            inactive,
        }) => {
            match store.create_platform(&NewPlatform {
                name,
                icon,
                api_key,
                active: !inactive,
            }) {
                Ok(platform) => {
                    println!("Added platform '{}' (id: {})", platform.name, platform.id);
                }
                Err(e) => {
                    eprintln!("Failed to add platform: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::ListPlatforms) => match store.get_platforms() {
            Ok(platforms) => {
                if platforms.is_empty() {
                    println!("No active platforms. Add one with:");
                    println!("  cardj add-platform --name Spotify --icon ri-spotify-line");
                } else {
                    println!("Active platforms:");
                    for platform in platforms {
                        println!("  [{}] {} ({})", platform.id, platform.name, platform.icon);
                    }
                }
            }
            Err(e) => {
                eprintln!("Failed to list platforms: {}", e);
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => {
            run_server(store, cli.port).await;
        }
    }
}

async fn run_server(store: std::sync::Arc<dyn storage::Storage>, port: u16) {
    let state = AppState::new(store.clone());
    let app = create_router(state);

    // Prune expired sessions on a fixed interval
    let sessions = store.session_store();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(SESSION_PRUNE_INTERVAL_SECS));
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            match sessions.prune_expired() {
                Ok(0) => {}
                Ok(n) => tracing::debug!("Pruned {} expired sessions", n),
                Err(e) => tracing::warn!("Session prune failed: {}", e),
            }
        }
    });

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            tracing::error!("Is another process already using port {}?", port);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "CarDJ server listening on {}",
        listener
            .local_addr()
            .expect("listener should have local addr")
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
