// flowline/src/registry.rs

//! `Flowline<E>`: a registry of pipelines keyed by their context type.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::FlowlineError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

/// Type-erased runner so pipelines over different context types can share one map.
#[async_trait]
trait ErasedRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct TypedRunner<TData, HandlerErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerErr>>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> ErasedRunner<AppErr> for TypedRunner<TData, HandlerErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<FlowlineError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        return Err(AppErr::from(FlowlineError::Internal(format!(
          "context type mismatch in registry dispatch, expected {}",
          std::any::type_name::<ContextData<TData>>()
        ))));
      }
    };
    self.pipeline.run(ctx_data).await.map_err(AppErr::from)
  }
}

/// Registry of pipelines. `AppErr` is what [`Flowline::run`] returns; it must
/// absorb both the pipelines' handler errors and engine errors.
pub struct Flowline<AppErr = FlowlineError>
where
  AppErr: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn ErasedRunner<AppErr>>>>,
  _app_err: PhantomData<fn() -> AppErr>,
}

impl<AppErr> Flowline<AppErr>
where
  AppErr: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
      _app_err: PhantomData,
    }
  }

  /// Registers `pipeline` as the pipeline for context type `TData`,
  /// replacing any previous registration for that type.
  pub fn register_pipeline<TData, HandlerErr>(&self, pipeline: Pipeline<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(
      Level::DEBUG,
      context = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let runner: Arc<dyn ErasedRunner<AppErr>> = Arc::new(TypedRunner { pipeline: Arc::new(pipeline) });
    self.registry.write().insert(TypeId::of::<TData>(), runner);
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.registry.read().get(&TypeId::of::<TData>()).cloned();
    let Some(runner) = runner else {
      let type_name = std::any::type_name::<TData>();
      event!(Level::ERROR, context = %type_name, "No pipeline registered.");
      return Err(AppErr::from(FlowlineError::ConfigurationError {
        step_name: "Flowline::run".to_string(),
        message: format!("No pipeline registered for context type {}", type_name),
      }));
    };
    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<AppErr> Default for Flowline<AppErr>
where
  AppErr: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
