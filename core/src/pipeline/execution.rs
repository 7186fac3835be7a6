// flowline/src/pipeline/execution.rs

//! `Pipeline::run()`: executes the steps of a pipeline in order.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::error::FlowlineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, info_span, instrument, Instrument, Level};

/// What a single phase (before/on/after) of a step decided.
enum PhaseOutcome {
  Continue,
  Stopped,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Returns `Ok(Completed)` when all steps ran or were skipped, `Ok(Stopped)`
  /// when a handler returned `PipelineControl::Stop`, and the first handler
  /// error otherwise. A non-optional step without any handler fails with
  /// `FlowlineError::HandlerMissing` converted into `Err`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let phases = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];

      if phases.iter().all(|(_, hooks)| hooks.map_or(true, |v| v.is_empty())) {
        if step_def.optional {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step = step_name, "Non-optional step has no handlers.");
        return Err(Err::from(FlowlineError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let step_span = info_span!("pipeline_step", step = step_name, step_index = step_idx);
      for (phase_name, hooks) in phases {
        let Some(hooks) = hooks else { continue };
        let outcome = run_phase(hooks, &ctx_data, phase_name)
          .instrument(step_span.clone())
          .await?;
        if let PhaseOutcome::Stopped = outcome {
          event!(Level::INFO, step = step_name, phase = phase_name, "Pipeline stopped by a handler.");
          return Ok(PipelineResult::Stopped);
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}

async fn run_phase<TData, Err>(
  hooks: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
  phase_name: &'static str,
) -> Result<PhaseOutcome, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in hooks.iter().enumerate() {
    match handler_fn(ctx_data.clone()).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => return Ok(PhaseOutcome::Stopped),
      Err(e) => {
        event!(Level::WARN, phase = phase_name, handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PhaseOutcome::Continue)
}
