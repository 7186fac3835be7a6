// storefront/src/main.rs

use storefront::config::{AppConfig, LogFormat, StoreBackend};
use storefront::services::MockPaymentProvider;
use storefront::state::AppState;
use storefront::store::{MemoryStore, PgStore, Store};
use storefront::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);
  tracing::info!("Starting storefront server...");

  let store: Arc<dyn Store> = match &app_config.store_backend {
    StoreBackend::Postgres {
      database_url,
      max_connections,
    } => {
      let store = PgStore::connect(database_url, *max_connections)
        .await
        .context("Failed to connect to the database")?;
      if app_config.run_migrations {
        store.migrate().await.context("Failed to run database migrations")?;
      }
      Arc::new(store)
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on shutdown.");
      Arc::new(MemoryStore::new())
    }
  };

  let payments = Arc::new(MockPaymentProvider::new(app_config.mock_payment_account_id.clone()));
  let server_address = app_config.bind_address();
  let app_state = AppState::new(app_config, store, payments);

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await?;
  Ok(())
}
