use actix_web::{error::BlockingError, http::StatusCode, web, HttpResponse, ResponseError};
use directory::directory::{request_manager::RequestManagerError, table::table::ApplyErrors};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Activity not found")]
    ActivityNotFound,

    #[error("Participant not found in this activity")]
    ParticipantNotFound,

    #[error("Not Found")]
    NotFound,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Activity directory is unavailable")]
    DirectoryUnavailable,

    /// The directory still holds the request, a signup or unregister may be committed after this
    #[error("Activity directory timed out, the request may still have been applied")]
    DirectoryTimeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error body, `detail` is what the frontend shows to the user
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ActivityNotFound | ApiError::ParticipantNotFound | ApiError::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DirectoryUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DirectoryTimeout | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}

impl From<RequestManagerError> for ApiError {
    fn from(error: RequestManagerError) -> Self {
        match error {
            RequestManagerError::TransactionRollback(ApplyErrors::ActivityDoesNotExist(_)) => {
                ApiError::ActivityNotFound
            }
            RequestManagerError::TransactionRollback(ApplyErrors::ParticipantNotRegistered(
                _,
                _,
            )) => ApiError::ParticipantNotFound,
            RequestManagerError::DirectoryUnavailable => ApiError::DirectoryUnavailable,
            RequestManagerError::DirectoryTimeout => {
                log::error!("Directory request timed out");
                ApiError::DirectoryTimeout
            }
        }
    }
}

impl From<BlockingError> for ApiError {
    fn from(error: BlockingError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

/// A missing `email` parameter is reported as 422 with a `detail` body instead of actix's plain 400
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::InvalidQuery(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use directory::consts::consts::{ActivityName, Email};

    #[test]
    fn missing_activity_maps_to_404() {
        let error: ApiError = RequestManagerError::TransactionRollback(
            ApplyErrors::ActivityDoesNotExist(ActivityName::from("Knitting")),
        )
        .into();

        assert!(matches!(error, ApiError::ActivityNotFound));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_participant_maps_to_404() {
        let error: ApiError =
            RequestManagerError::TransactionRollback(ApplyErrors::ParticipantNotRegistered(
                ActivityName::from("Chess Club"),
                Email::from("noone@nowhere.edu"),
            ))
            .into();

        assert!(matches!(error, ApiError::ParticipantNotFound));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn worker_failures_are_server_errors() {
        let timeout: ApiError = RequestManagerError::DirectoryTimeout.into();
        let unavailable: ApiError = RequestManagerError::DirectoryUnavailable.into();

        assert_eq!(timeout.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn timeout_body_warns_the_request_may_have_been_applied() {
        let error: ApiError = RequestManagerError::DirectoryTimeout.into();

        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            json["detail"],
            "Activity directory timed out, the request may still have been applied"
        );
    }

    #[actix_web::test]
    async fn error_body_has_detail() {
        let response = ApiError::ActivityNotFound.error_response();

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, serde_json::json!({ "detail": "Activity not found" }));
    }
}
