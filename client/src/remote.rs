use rusoto_core::RusotoError;
use std::fmt;
use thiserror::Error;
use tracing::error;

/// Falla de una llamada a S3 o EMR.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// El request llegó al servicio pero fue rechazado.
    #[error("{operation} was rejected by the service: {message}")]
    Service {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// No se pudo hablar con el servicio (red, DNS, TLS, respuesta ilegible).
    #[error("{operation} could not communicate with the service: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} could not load AWS credentials: {message}")]
    Credentials {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} request is invalid: {message}")]
    InvalidRequest {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} response did not include {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },
}

impl RemoteError {
    pub fn from_rusoto<E: fmt::Display>(operation: &'static str, err: RusotoError<E>) -> Self {
        match err {
            RusotoError::Service(e) => RemoteError::Service {
                operation,
                status: None,
                message: e.to_string(),
            },
            RusotoError::Unknown(resp) => RemoteError::Service {
                operation,
                status: Some(resp.status.as_u16()),
                message: resp.body_as_str().to_string(),
            },
            RusotoError::HttpDispatch(e) => RemoteError::Transport {
                operation,
                message: e.to_string(),
            },
            RusotoError::ParseError(msg) => RemoteError::Transport {
                operation,
                message: format!("unparseable response: {}", msg),
            },
            RusotoError::Blocking => RemoteError::Transport {
                operation,
                message: "blocking call failed".to_string(),
            },
            RusotoError::Credentials(e) => RemoteError::Credentials {
                operation,
                message: e.to_string(),
            },
            RusotoError::Validation(msg) => RemoteError::InvalidRequest {
                operation,
                message: msg,
            },
        }
    }

    #[cfg(test)]
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteError::Service { operation, .. }
            | RemoteError::Transport { operation, .. }
            | RemoteError::Credentials { operation, .. }
            | RemoteError::InvalidRequest { operation, .. }
            | RemoteError::MissingField { operation, .. } => *operation,
        }
    }

    /// Deja en el log todos los datos que expone el transporte y devuelve el
    /// error para seguir propagándolo.
    pub fn logged(self) -> Self {
        match &self {
            RemoteError::Service {
                operation,
                status,
                message,
            } => error!(
                operation,
                status = ?status,
                "el servicio rechazó el request: {}",
                message
            ),
            RemoteError::Transport { operation, message } => error!(
                operation,
                "no se pudo comunicar con el servicio (red o respuesta inválida): {}", message
            ),
            RemoteError::Credentials { operation, message } => {
                error!(operation, "no se pudieron cargar las credenciales: {}", message)
            }
            RemoteError::InvalidRequest { operation, message } => {
                error!(operation, "request inválido: {}", message)
            }
            RemoteError::MissingField { operation, field } => {
                error!(operation, field, "falta un campo en la respuesta")
            }
        }
        self
    }
}
