// flowline/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct and its structural editing methods.

use crate::core::context::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::FlowlineError;
use std::collections::HashMap;

/// An ordered list of named steps over the run state `TData`.
///
/// Handlers return `Result<_, Err>`. `Err` must be constructible from
/// [`FlowlineError`] so that engine-level failures (a mandatory step without
/// handlers, say) surface through the same error type as business failures.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowlineError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(name, optional, skip_if)` triples, in run order.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Step names in run order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn has_step(&self, step_name: &str) -> bool {
    self.position(step_name).is_some()
  }

  fn position(&self, step_name: &str) -> Option<usize> {
    self.steps.iter().position(|s| s.name == step_name)
  }

  /// Index of an existing step. Panics on unknown names: a typo in a step
  /// name is a wiring bug, not a runtime condition.
  pub(crate) fn expect_step(&self, step_name: &str) -> usize {
    match self.position(step_name) {
      Some(idx) => idx,
      None => panic!("flowline setup error: step '{}' not found in pipeline definition", step_name),
    }
  }

  fn expect_no_step(&self, step_name: &str) {
    if self.has_step(step_name) {
      panic!("flowline setup error: step '{}' already exists in pipeline definition", step_name);
    }
  }

  pub fn insert_before_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.expect_step(existing_step_name);
    let name: String = new_step_name.into();
    self.expect_no_step(&name);
    self.steps.insert(idx, StepDef { name, optional, skip_if });
  }

  pub fn insert_after_step<S: Into<String>>(
    &mut self,
    existing_step_name: &str,
    new_step_name: S,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) {
    let idx = self.expect_step(existing_step_name);
    let name: String = new_step_name.into();
    self.expect_no_step(&name);
    self.steps.insert(idx + 1, StepDef { name, optional, skip_if });
  }

  /// Removes a step and every hook registered for it. Unknown names are a no-op.
  pub fn remove_step(&mut self, step_name: &str) {
    if let Some(idx) = self.position(step_name) {
      self.steps.remove(idx);
      self.before.remove(step_name);
      self.on.remove(step_name);
      self.after.remove(step_name);
    }
  }

  pub fn set_optional(&mut self, step_name: &str, optional: bool) {
    let idx = self.expect_step(step_name);
    self.steps[idx].optional = optional;
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    let idx = self.expect_step(step_name);
    self.steps[idx].skip_if = skip_if;
  }
}
