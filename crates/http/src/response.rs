//! Success envelope shared by every JSON endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

const STATUS_SUCCESS: &str = "success";

/// `{status: "success", message?, data?}`
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Envelope paired with the status code it is sent with.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    code: StatusCode,
    envelope: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 carrying only data
    pub fn data(data: T) -> Self {
        Self {
            code: StatusCode::OK,
            envelope: Envelope {
                status: STATUS_SUCCESS,
                message: None,
                data: Some(data),
            },
        }
    }

    /// 201 carrying a message and data
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            code: StatusCode::CREATED,
            envelope: Envelope {
                status: STATUS_SUCCESS,
                message: Some(message.into()),
                data: Some(data),
            },
        }
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK,
            envelope: Envelope {
                status: STATUS_SUCCESS,
                message: Some(message.into()),
                data: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self.envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn render<T: Serialize>(response: ApiResponse<T>) -> (StatusCode, serde_json::Value) {
        let response = response.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn message_only_omits_data() {
        let (status, body) = render(ApiResponse::message("done")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "message": "done"}));
    }

    #[tokio::test]
    async fn created_carries_both() {
        let (status, body) = render(ApiResponse::created("made", json!({"id": 1}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"status": "success", "message": "made", "data": {"id": 1}})
        );
    }
}
