// flowline/tests/registry_tests.rs
mod common;

use common::*;
use flowline::{ContextData, Flowline, FlowlineError, Pipeline, PipelineControl, PipelineResult};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextAlpha {
  val: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct RegistryContextBeta {
  num: i32,
}

#[tokio::test]
async fn test_registry_run_correct_pipeline() {
  setup_tracing();
  let registry = Flowline::<TestError>::new();

  let mut p_alpha = Pipeline::<RegistryContextAlpha, TestError>::new(&[("alpha_task", false, None)]);
  p_alpha.on("alpha_task", |ctx: ContextData<RegistryContextAlpha>| {
    Box::pin(async move {
      ctx.write().val = "alpha_processed".to_string();
      Ok::<PipelineControl, FlowlineError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(p_alpha);

  let mut p_beta = Pipeline::<RegistryContextBeta, TestError>::new(&[("beta_task", false, None)]);
  p_beta.on("beta_task", |ctx: ContextData<RegistryContextBeta>| {
    Box::pin(async move {
      ctx.write().num = 100;
      Ok::<PipelineControl, FlowlineError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(p_beta);

  assert!(registry.is_registered::<RegistryContextAlpha>());
  assert!(registry.is_registered::<RegistryContextBeta>());

  let ctx_alpha = ContextData::new(RegistryContextAlpha::default());
  assert_eq!(registry.run(ctx_alpha.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx_alpha.read().val, "alpha_processed");

  let ctx_beta = ContextData::new(RegistryContextBeta::default());
  assert_eq!(registry.run(ctx_beta.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx_beta.read().num, 100);
}

#[tokio::test]
async fn test_registry_pipeline_not_found() {
  setup_tracing();
  let registry = Flowline::<TestError>::new();

  #[derive(Clone, Debug, Default)]
  struct UnregisteredContext;

  let result = registry.run(ContextData::new(UnregisteredContext)).await;
  match result {
    Err(TestError::Flowline(s)) => {
      assert!(s.contains("ConfigurationError"));
      assert!(s.contains("No pipeline registered"));
      assert!(s.contains("UnregisteredContext"));
    }
    other => panic!("Expected ConfigurationError for unregistered pipeline, got {:?}", other),
  }
}

#[tokio::test]
async fn test_registry_pipeline_itself_errors() {
  setup_tracing();
  let registry = Flowline::<TestError>::new();

  let mut p_alpha = Pipeline::<RegistryContextAlpha, TestError>::new(&[("alpha_fail", false, None)]);
  p_alpha.on("alpha_fail", |_ctx: ContextData<RegistryContextAlpha>| {
    Box::pin(async move { Err(TestError::Handler("Alpha pipeline failed".to_string())) })
  });
  registry.register_pipeline(p_alpha);

  let result = registry.run(ContextData::new(RegistryContextAlpha::default())).await;
  assert_eq!(result.unwrap_err(), TestError::Handler("Alpha pipeline failed".to_string()));
}

#[tokio::test]
async fn test_registry_replaces_previous_registration() {
  setup_tracing();
  let registry = Flowline::<TestError>::new();

  let mut first = Pipeline::<RegistryContextBeta, TestError>::new(&[("set", false, None)]);
  first.on("set", |ctx: ContextData<RegistryContextBeta>| {
    Box::pin(async move {
      ctx.write().num = 1;
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(first);

  let mut second = Pipeline::<RegistryContextBeta, TestError>::new(&[("set", false, None)]);
  second.on("set", |ctx: ContextData<RegistryContextBeta>| {
    Box::pin(async move {
      ctx.write().num = 2;
      Ok::<_, TestError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(second);

  let ctx = ContextData::new(RegistryContextBeta::default());
  registry.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().num, 2);
}

#[tokio::test]
async fn test_registry_with_flowline_error_default() {
  setup_tracing();
  let registry: Flowline = Flowline::default();

  #[derive(Clone, Debug, Default)]
  struct SimpleCtx {
    count: i32,
  }

  let mut pipeline = Pipeline::<SimpleCtx, FlowlineError>::new(&[("task", false, None)]);
  pipeline.on("task", |ctx: ContextData<SimpleCtx>| {
    Box::pin(async move {
      ctx.write().count = 1;
      Ok::<PipelineControl, FlowlineError>(PipelineControl::Continue)
    })
  });
  registry.register_pipeline(pipeline);

  let ctx = ContextData::new(SimpleCtx::default());
  assert!(registry.run(ctx.clone()).await.is_ok());
  assert_eq!(ctx.read().count, 1);
}
