use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::plans::PlanError;

/// Uniform success envelope: `{ success: true, data, count? }`. The count
/// is only present on list responses.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
        }
    }

    pub fn with_count(data: T, count: usize) -> Self {
        Self {
            success: true,
            data,
            count: Some(count),
        }
    }
}

/// Uniform failure envelope: `{ success: false, error }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

impl IntoResponse for PlanError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Don't leak internal error detail to client
            PlanError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn success_envelope_omits_count_unless_set() {
        let body = serde_json::to_value(SuccessResponse::new("payload")).unwrap();
        assert_eq!(body, serde_json::json!({ "success": true, "data": "payload" }));

        let body = serde_json::to_value(SuccessResponse::with_count(vec![1, 2], 2)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "success": true, "data": [1, 2], "count": 2 })
        );
    }

    #[tokio::test]
    async fn not_found_maps_to_404_envelope() {
        let response = PlanError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["error"], serde_json::json!("Plan not found"));
    }

    #[tokio::test]
    async fn internal_error_detail_is_not_exposed() {
        let err = PlanError::Internal(anyhow::anyhow!("connection reset by postgres"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], serde_json::json!("Internal server error"));
    }

    #[tokio::test]
    async fn validation_error_keeps_its_message() {
        let err = PlanError::Validation("Name and price are required".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], serde_json::json!("Name and price are required"));
    }
}
