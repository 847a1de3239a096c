use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;

use crate::provider::ProviderError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    Persistence(#[from] StoreError),

    #[error("{0}")]
    Validation(String),
}

/// Every failure is answered with 400, whether the caller, the provider or
/// the store is at fault.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request failed: {self:?}");

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
