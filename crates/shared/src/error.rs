use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure envelope the service returns alongside `sucesso: false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceFailure {
    pub sucesso: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
}

impl ServiceFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            sucesso: false,
            mensagem: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("draw number {0} is outside the drawable range")]
    NumberOutOfRange(i64),
    #[error("draw number '{0}' is not numeric")]
    NotNumeric(String),
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
}
