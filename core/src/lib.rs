// flowline/src/lib.rs

//! Flowline: a small asynchronous step-pipeline engine.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step carries
//! `before`, `on` and `after` hooks that receive a shared [`ContextData`]
//! handle to the run's state and return a [`PipelineControl`] or an error.
//! The first error ends the run and is handed back to the caller unchanged,
//! which makes a pipeline a natural home for ordered validation chains:
//! each step checks one rule and the earliest failing rule wins.
//!
//! Pipelines are registered in a [`Flowline`] registry keyed by their context
//! type, so callers only need to build a context and ask the registry to run it.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowlineError, FlowlineResult};

pub use crate::registry::Flowline;
