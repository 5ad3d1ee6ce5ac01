mod api;
mod auth;
mod commands;
mod config;
mod db;
mod models;
mod permissions;
mod raw_sql;
mod schema;
mod shopping_list;
mod telemetry;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use axum::extract::FromRef;
use axum::Router;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::normalize_path::NormalizePath;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub config: Arc<Config>,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram recipe API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Print the OpenAPI document as JSON and exit
    Openapi,
    /// Create a staff superuser
    CreateSuperuser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "Admin")]
        first_name: String,
        #[arg(long, default_value = "Admin")]
        last_name: String,
    },
    /// Bulk-import ingredients from a JSON file of {name, measurement_unit} objects
    LoadIngredients {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve);

    if let Commands::Openapi = command {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    telemetry::init()?;

    let config = Config::load()?;
    let pool = db::create_pool(&config.database_url)?;

    match command {
        Commands::Serve => serve(config, pool).await,
        Commands::Openapi => Ok(()),
        Commands::CreateSuperuser {
            email,
            username,
            password,
            first_name,
            last_name,
        } => {
            let id = commands::create_superuser(
                &pool,
                commands::SuperuserArgs {
                    email,
                    username,
                    password,
                    first_name,
                    last_name,
                },
            )?;
            println!("Created superuser {id}");
            Ok(())
        }
        Commands::LoadIngredients { path } => {
            let inserted = commands::load_ingredients(&pool, &path)?;
            println!("Loaded {inserted} new ingredients from {}", path.display());
            Ok(())
        }
    }
}

async fn serve(config: Config, pool: db::DbPool) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr;
    let state = AppState {
        pool: Arc::new(pool),
        config: Arc::new(config),
    };

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    // API routes answer with and without a trailing slash. Swagger UI stays
    // outside the normalization since it redirects to its own slashed path.
    let api = telemetry::with_http_tracing(api::router().with_state(state));
    let app = Router::new()
        .merge(swagger_ui)
        .fallback_service(NormalizePath::trim_trailing_slash(api));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI available at http://{bind_addr}/swagger-ui/");
    tracing::info!("OpenAPI spec available at http://{bind_addr}/api-docs/openapi.json");

    axum::serve(listener, app).await?;

    Ok(())
}
