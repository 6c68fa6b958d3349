use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use serde::Serialize;

use crate::{error::AppError, forum::error::ForumError};

// We define our own `Json` extractor that customizes the error from `axum::Json`
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            // a malformed body is a validation failure like any other bad payload
            Err(rejection) => Err(ForumError::Validation(rejection.body_text()).into()),
        }
    }
}

/// The envelope every successful response is wrapped in.
#[derive(Serialize, Debug)]
pub struct Success<T> {
    status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

pub fn success<T: Serialize>(data: T) -> axum::Json<Success<T>> {
    axum::Json(Success {
        status: "success",
        data: Some(data),
    })
}

pub fn success_empty() -> axum::Json<Success<()>> {
    axum::Json(Success {
        status: "success",
        data: None,
    })
}
