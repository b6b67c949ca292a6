use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The model output did not match the response schema
    #[error("Could not parse model response: {0}")]
    ResponseParse(String),

    /// The model answered with an `error` action instead of text
    #[error("Model reported an error: {0}")]
    ModelError(String),

    #[error("Turn limit exceeded: the model was still requesting tools after {0} rounds")]
    TurnLimitExceeded(usize),

    #[error("Provider request failed: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
