use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("SMTP delivery failed: {0}")]
    Delivery(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RelayError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            // the wire error stays generic; the detail goes to the log
            RelayError::Delivery(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to send email".to_string(),
            ),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
