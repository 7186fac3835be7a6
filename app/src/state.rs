// storefront/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::services::payments::PaymentProvider;
use crate::store::Store;
use flowline::Flowline;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub flows: Arc<Flowline<AppError>>,
  pub payments: Arc<dyn PaymentProvider>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wires the collaborators together and registers every pipeline.
  pub fn new(config: AppConfig, store: Arc<dyn Store>, payments: Arc<dyn PaymentProvider>) -> Self {
    let flows = Arc::new(Flowline::<AppError>::new());
    pipelines::register_all_pipelines(&flows);
    Self {
      store,
      flows,
      payments,
      config: Arc::new(config),
    }
  }
}
