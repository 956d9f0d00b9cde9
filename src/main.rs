mod config;
mod error;
mod google;
mod handlers;
mod ledger;
mod middleware;
mod models;
mod openapi;
mod startup;
mod store;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use google::{CalendarClient, OAuthClient, PendingEvents, TokenGrants};
use ledger::LeaveLedger;
use store::EmployeeStore;

pub struct AppState {
    pub ledger: LeaveLedger,
    pub oauth: OAuthClient,
    pub calendar: CalendarClient,
    pub pending: PendingEvents,
    pub grants: TokenGrants,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with conditional JSON/text output
    let use_json = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,leavedesk_axum=debug,tower_http=debug".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    if !config.employees_csv.exists() {
        tracing::warn!(
            path = %config.employees_csv.display(),
            "employee roster file does not exist yet; reads will fail until it is created"
        );
    }

    let store = EmployeeStore::new(config.employees_csv.clone());

    let state = Arc::new(AppState {
        ledger: LeaveLedger::new(store),
        oauth: OAuthClient::new(&config),
        calendar: CalendarClient::new(),
        pending: PendingEvents::new(),
        grants: TokenGrants::new(),
    });

    let app = startup::build_router(state);

    let listener = TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
