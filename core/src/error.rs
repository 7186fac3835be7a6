// flowline/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowlineError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Error in handler or external operation. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Configuration error for '{step_name}': {message}")]
  ConfigurationError { step_name: String, message: String },

  #[error("Internal flowline error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for FlowlineError {
  fn from(err: AnyhowError) -> Self {
    FlowlineError::HandlerError { source: err }
  }
}

pub type FlowlineResult<T, E = FlowlineError> = std::result::Result<T, E>;
