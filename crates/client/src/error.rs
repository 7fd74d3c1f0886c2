//! Client errors.
//!
//! Every variant renders a message that can be shown to the user as-is.

use domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status
    #[error("{}", api_message(.status, .message))]
    Api { status: u16, message: Option<String> },

    #[error("No se pudo conectar con el servidor: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Respuesta inesperada del servidor: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No has iniciado sesión")]
    NotAuthenticated,

    #[error("El carrito está vacío")]
    EmptyCart,

    #[error("No se obtuvo la URL de pago.")]
    MissingCheckoutUrl,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Error de almacenamiento: {0}")]
    Storage(String),
}

fn api_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("El servidor respondió con estado {}", status),
    }
}

impl ClientError {
    pub fn storage(msg: impl Into<String>) -> Self {
        ClientError::Storage(msg.into())
    }

    /// HTTP status of a backend rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message surfaced to the user: the server's own message when it sent
    /// one, otherwise `fallback` for remote failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Api { message: None, .. }
            | ClientError::Transport(_)
            | ClientError::Decode(_) => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
