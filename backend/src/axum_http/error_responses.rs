use std::collections::BTreeMap;

use axum::{
    Json, async_trait,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{error, warn};

use crate::usecases::errors::UseCaseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for UseCaseError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, fields) = match self {
            UseCaseError::Validation(fields) => ("validation failed".to_string(), Some(fields)),
            UseCaseError::Internal(err) => {
                // Don't leak internal error detail to client
                error!(error = ?err, "http: internal error");
                ("Internal server error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        if status.is_client_error() {
            warn!(status = status.as_u16(), message = %message, "http: request rejected");
        }

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// `Json` with malformed bodies reported as 400 in the common error shape.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> Response {
    let status = StatusCode::BAD_REQUEST;
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message: rejection.body_text(),
        fields: None,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("email1".to_string(), vec!["email1 is required".to_string()]);

        let response = UseCaseError::Validation(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], 400);
        assert_eq!(json["fields"]["email1"][0], "email1 is required");
    }

    #[tokio::test]
    async fn internal_error_is_not_leaked() {
        let response =
            UseCaseError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Internal server error");
        assert!(json.get("fields").is_none());
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let response = UseCaseError::NotFound("company").into_response();
        let json = body_json(response).await;
        assert_eq!(json["code"], 404);
        assert_eq!(json["message"], "company not found");
    }
}
