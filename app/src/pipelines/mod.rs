// storefront/src/pipelines/mod.rs

//! Defines and registers every pipeline of the order core.

use crate::errors::{AppError, Result as AppResult};
use flowline::{ContextData, Flowline, PipelineResult};

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod common_steps;
pub mod contexts;
pub mod payment_pipeline;

/// Registers all pipelines with the registry. Called once at startup.
pub fn register_all_pipelines(registry: &Flowline<AppError>) {
  tracing::info!("Registering pipelines...");
  cart_pipeline::register_cart_pipelines(registry);
  checkout_pipeline::register_checkout_pipeline(registry);
  payment_pipeline::register_payment_pipeline(registry);
  tracing::info!("All application pipelines registered.");
}

/// Runs the pipeline registered for `T`. None of the core pipelines stop
/// early, so a stopped run is reported as an error.
pub async fn run_to_completion<T>(registry: &Flowline<AppError>, ctx_data: ContextData<T>) -> AppResult<()>
where
  T: Send + Sync + 'static,
{
  match registry.run(ctx_data).await? {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => {
      tracing::warn!(context = std::any::type_name::<T>(), "Pipeline was stopped by a handler.");
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}
