// Error taxonomy shared by the HTTP adapter, services, hooks and forms

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

// Server-side validation errors keyed by the server's field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

// Request-time errors. Clone is required because one in-flight result is
// handed to every waiter sharing the same query key.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Unknown { status: u16, message: String },

    // Envelope came back without the field the caller needed
    #[error("{0}")]
    MissingData(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Other error: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Server,
    Network,
    Unknown,
}

impl ErrorKind {
    // Toast template shown for each class of failure
    pub fn toast_message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Certains champs sont invalides. Veuillez vérifier le formulaire.",
            ErrorKind::Unauthorized => "Votre session a expiré. Veuillez vous reconnecter.",
            ErrorKind::Forbidden => "Vous n'avez pas les droits nécessaires pour cette action.",
            ErrorKind::NotFound => "La ressource demandée est introuvable.",
            ErrorKind::Server => "Une erreur serveur est survenue. Veuillez réessayer plus tard.",
            ErrorKind::Network => "Impossible de joindre le serveur. Vérifiez votre connexion.",
            ErrorKind::Unknown => "Une erreur inattendue est survenue.",
        }
    }
}

impl ApiError {
    // Build an error from a non-2xx response: `message` and `errors` are read
    // from the body when present.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| default_message(status).to_string());

        match status {
            422 => ApiError::Validation {
                message,
                errors: parse_field_errors(body.get("errors")),
            },
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Unknown { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Unknown { .. }
            | ApiError::MissingData(_)
            | ApiError::Json(_)
            | ApiError::Other(_) => ErrorKind::Unknown,
        }
    }

    // HTTP status carried by the error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation { .. } => Some(422),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Server { status, .. } | ApiError::Unknown { status, .. } => Some(*status),
            ApiError::Network(_)
            | ApiError::MissingData(_)
            | ApiError::Json(_)
            | ApiError::Other(_) => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    // The message as the backend (or transport) gave it, without the class prefix
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. }
            | ApiError::Server { message, .. }
            | ApiError::Unknown { message, .. } => message,
            ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::Network(message)
            | ApiError::MissingData(message)
            | ApiError::Json(message)
            | ApiError::Other(message) => message,
        }
    }

    // Message for a toast: the backend's own text for validation failures
    // and missing data, the class template otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { message, .. } | ApiError::MissingData(message) => {
                message.clone()
            }
            other => other.kind().toast_message().to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Json(err.to_string())
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        401 => "Unauthenticated",
        403 => "Forbidden",
        404 => "Not found",
        422 => "The given data was invalid",
        500..=599 => "Internal server error",
        _ => "Unexpected response",
    }
}

// Laravel sends `{field: [messages]}`; a bare string per field is accepted too.
fn parse_field_errors(errors: Option<&Value>) -> FieldErrors {
    let mut parsed = FieldErrors::new();
    let Some(Value::Object(map)) = errors else {
        return parsed;
    };

    for (field, messages) in map {
        let list: Vec<String> = match messages {
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Value::String(single) => vec![single.clone()],
            _ => continue,
        };
        if !list.is_empty() {
            parsed.insert(field.clone(), list);
        }
    }
    parsed
}
