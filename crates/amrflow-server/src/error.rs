use amrflow_core::AmrError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<AmrError>() {
            match e {
                AmrError::TaskNotFound(_)
                | AmrError::InstanceNotFound(_)
                | AmrError::PresetNotFound(_) => StatusCode::NOT_FOUND,
                AmrError::ValidationFailed { .. } | AmrError::EmptyWorkflow => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AmrError::UnknownActionType(_)
                | AmrError::IndexOutOfRange { .. }
                | AmrError::DuplicateActionId(_) => StatusCode::BAD_REQUEST,
                AmrError::Service { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amrflow_core::types::ActionType;

    #[test]
    fn task_not_found_maps_to_404() {
        let err = AppError(AmrError::TaskNotFound("t1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn instance_not_found_maps_to_404() {
        let err = AppError(AmrError::InstanceNotFound("i1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_failed_maps_to_422() {
        let err = AppError(
            AmrError::ValidationFailed {
                action_type: ActionType::Move,
                missing: vec!["location".into()],
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn empty_workflow_maps_to_422() {
        let err = AppError(AmrError::EmptyWorkflow.into());
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unknown_action_type_maps_to_400() {
        let err = AppError(AmrError::UnknownActionType("TELEPORT".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_action_id_maps_to_400() {
        let err = AppError(AmrError::DuplicateActionId("action-1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_errors_map_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_body_is_json_error_object() {
        let err = AppError(AmrError::TaskNotFound("t1".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
