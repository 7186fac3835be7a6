// flowline/src/core/context.rs

//! The boxed handler type every pipeline hook is stored as.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// Type alias for a pipeline step handler.
///
/// A handler takes a clone of the run's `ContextData<TData>` and returns a
/// boxed future resolving to `Result<PipelineControl, Err>`.
///
/// Handlers must drop every lock guard obtained from the `ContextData`
/// before their first `.await`; the guards are blocking and `!Send`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
