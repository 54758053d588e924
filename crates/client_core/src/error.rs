//! Failure taxonomy shared by the validator, transport and orchestrator.

use std::fmt;

use thiserror::Error;

use crate::orchestrator::Operation;

/// Input field a submission left blank or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Numbers,
    Team,
    DrawId,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Numbers => "números",
            Field::Team => "time do coração",
            Field::DrawId => "número do concurso",
        })
    }
}

/// Rejected before any request leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor, preencha o campo {0}.")]
    MissingField(Field),
    #[error("Digite entre 10 e 15 números válidos separados por vírgula ({count} informados).")]
    InvalidCount { count: usize },
    #[error("O número {number} está fora do intervalo de 1 a 80.")]
    OutOfRange { number: i64 },
    #[error("Informe ao menos um jogo.")]
    InvalidGames,
}

/// The request never produced a usable service reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("falha de rede: {0}")]
    Network(String),
    #[error("o serviço respondeu com status HTTP {0}")]
    Status(u16),
    #[error("resposta malformada: {0}")]
    Malformed(String),
    #[error("resposta sem indicador de sucesso")]
    MissingSuccessFlag,
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            TransportError::Malformed(value.to_string())
        } else if let Some(status) = value.status() {
            TransportError::Status(status.as_u16())
        } else {
            TransportError::Network(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// `sucesso: false`; the message is whatever the service attached.
    #[error("{}", message.as_deref().unwrap_or("o serviço reportou uma falha"))]
    Service { message: Option<String> },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{0} já está em andamento")]
    Busy(Operation),
}

impl OperationError {
    pub fn service(message: Option<String>) -> Self {
        OperationError::Service {
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Text to show in the operation's region. `None` means the failure
    /// carried nothing worth showing and the region's fallback applies.
    pub fn reason(&self) -> Option<String> {
        match self {
            OperationError::Validation(error) => Some(error.to_string()),
            OperationError::Service { message } => message.clone(),
            OperationError::Transport(_) | OperationError::Busy(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, OperationError::Transport(_))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, OperationError::Service { .. })
    }
}
