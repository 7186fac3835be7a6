// flowline/src/pipeline/hooks.rs

//! Registration of `before`, `on` and `after` hooks.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::FlowlineError;
use crate::pipeline::definition::Pipeline;
use std::future::Future;

#[derive(Clone, Copy)]
enum Phase {
  Before,
  On,
  After,
}

fn boxed<TData, Err, F, HandlerErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
  HandlerErr: Into<Err> + Send + Sync + 'static,
{
  let handler: Handler<TData, Err> = Box::new(move |ctx_data| {
    let fut = handler_fn(ctx_data);
    Box::pin(async move { fut.await.map_err(Into::into) })
  });
  handler
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  fn push_hook(&mut self, phase: Phase, step_name: &str, handler: Handler<TData, Err>) {
    self.expect_step(step_name);
    let hooks = match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    };
    hooks.entry(step_name.to_string()).or_default().push(handler);
  }

  /// Registers a hook that runs before the step's `on` hooks.
  ///
  /// The handler may fail with any error type convertible into the
  /// pipeline's `Err`.
  pub fn before<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_hook(Phase::Before, step_name, boxed(handler_fn));
  }

  /// Registers the main hook of a step.
  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_hook(Phase::On, step_name, boxed(handler_fn));
  }

  /// Registers a hook that runs after the step's `on` hooks.
  pub fn after<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.push_hook(Phase::After, step_name, boxed(handler_fn));
  }
}
