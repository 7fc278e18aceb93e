//! Error types shared by the API client, resource managers and commands.

use crate::api::version::ApiVersion;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message} (HTTP 400)")]
    BadRequest { message: String },

    #[error("{message} (HTTP 401)")]
    Unauthorized { message: String },

    #[error("{message} (HTTP 403)")]
    Forbidden { message: String },

    #[error("{message} (HTTP 404)")]
    NotFound { message: String },

    /// Any other non-success status, message kept as the server sent it.
    #[error("{message} (HTTP {status})")]
    ServerError { status: u16, message: String },

    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{}", resolution_message(.kind, .name_or_id, .matches))]
    AmbiguousOrNotFoundResource {
        kind: String,
        name_or_id: String,
        matches: usize,
    },

    #[error(
        "{} requires API version >= {required} (negotiated version is {current})",
        .params.join(", ")
    )]
    UnsupportedByVersion {
        params: Vec<String>,
        required: ApiVersion,
        current: ApiVersion,
    },

    #[error("{0}")]
    Command(String),
}

impl ApiError {
    /// Build the error for a non-success HTTP status
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => ApiError::BadRequest { message },
            401 => ApiError::Unauthorized { message },
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound { message },
            _ => ApiError::ServerError { status, message },
        }
    }

    pub fn command(message: impl Into<String>) -> Self {
        ApiError::Command(message.into())
    }

    /// True for a lookup miss that should fall back to a name search
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            ApiError::NotFound { .. } | ApiError::BadRequest { .. }
        )
    }
}

fn resolution_message(kind: &str, name_or_id: &str, matches: &usize) -> String {
    if *matches == 0 {
        format!("No {} with a name or ID of '{}' exists.", kind, name_or_id)
    } else {
        format!(
            "More than one {} exists with the name '{}'.",
            kind, name_or_id
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
