use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    MissingCredentials(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Processing error: {0}")]
    Process(#[from] pixel_art::PixelArtError),

    #[error("Encoding error: {0}")]
    Codec(#[from] CodecError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure talking to an image generation backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API error ({status}): {message}")]
    Http {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned an unexpected response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} needs a guide image")]
    MissingGuide { provider: &'static str },

    #[error("{provider} returned an undecodable image: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: CodecError,
    },
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("PNG encode error: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Provider(ProviderError::MissingGuide { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_)
            | ApiError::Process(_)
            | ApiError::Codec(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}
