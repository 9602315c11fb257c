use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

use crate::lookthrough::LookThroughError;
use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unprocessable document: {0}")]
    UnprocessableDocument(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnprocessableDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::UnprocessableDocument(msg) => msg.clone(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error: message })
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::EmptyBasketId | RegistryError::EmptyDocument => {
                ApiError::BadRequest(err.to_string())
            }
            RegistryError::Holdings(inner) => {
                tracing::warn!("Rejected holdings document: {}", inner);
                ApiError::UnprocessableDocument(inner.to_string())
            }
        }
    }
}

impl From<LookThroughError> for ApiError {
    fn from(err: LookThroughError) -> Self {
        match err {
            LookThroughError::UnknownBasket(_) => ApiError::NotFound(err.to_string()),
            LookThroughError::NonFiniteTotal => ApiError::BadRequest(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holdings::HoldingsError;

    #[test]
    fn test_core_errors_map_to_client_statuses() {
        let cases = [
            (ApiError::from(RegistryError::EmptyDocument), StatusCode::BAD_REQUEST),
            (ApiError::from(RegistryError::EmptyBasketId), StatusCode::BAD_REQUEST),
            (
                ApiError::from(RegistryError::Holdings(HoldingsError::MalformedDocument(
                    "no header".to_string(),
                ))),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(LookThroughError::UnknownBasket("QQQ".to_string())),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::from(LookThroughError::NonFiniteTotal), StatusCode::BAD_REQUEST),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err);
            assert_eq!(err.error_response().status(), status);
        }
    }
}
