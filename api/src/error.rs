use std::collections::HashMap;

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;

use crate::{forum::error::ForumError, identity::AuthenticationError};

/// Errors that know which HTTP status they should be answered with.
pub trait ApiRequestError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    fn code(&self) -> &'static str;
}

impl ApiRequestError for ForumError {
    fn status_code(&self) -> StatusCode {
        match self {
            ForumError::NotFound { .. } => StatusCode::NOT_FOUND,
            ForumError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ForumError::Validation(_) => StatusCode::BAD_REQUEST,
            ForumError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ForumError::NotFound { .. } => "NOT_FOUND",
            ForumError::Forbidden { .. } => "FORBIDDEN",
            ForumError::Validation(_) => "VALIDATION_ERR",
            ForumError::Storage(_) => "DATABASE_ERR",
        }
    }
}

#[derive(Debug)]
pub enum ServerError {
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

impl Serialize for ServerError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            ServerError::Storage(e) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("message", &e.to_string())?;
                map.end()
            }
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    ServerError {
        error: ServerError,

        #[cfg(debug_assertions)]
        backtrace: backtrace::Backtrace,
    },
    Request {
        code: &'static str,
        msg: String,
        status: StatusCode,
    },
}

#[derive(Serialize)]
struct ErrorResponse {
    code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<String>,

    #[cfg(debug_assertions)]
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_info: Option<HashMap<&'static str, Value>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, error_response) = match self {
            AppError::ServerError {
                error,
                #[cfg(debug_assertions)]
                backtrace,
            } => {
                tracing::error!(?error, "request failed with a server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    #[cfg(debug_assertions)]
                    ErrorResponse {
                        code: "DATABASE_ERR".into(),
                        msg: Some("Database error".into()),
                        debug_info: Some(HashMap::from([
                            (
                                "backtrace",
                                serde_json::to_value(filter_backtrace(&backtrace))
                                    .unwrap_or_default(),
                            ),
                            (
                                "error",
                                serde_json::to_value(&error).unwrap_or_default(),
                            ),
                        ])),
                    },
                    #[cfg(not(debug_assertions))]
                    ErrorResponse {
                        code: "SERVER_ERR".into(),
                        msg: Some("Internal server error".into()),
                    },
                )
            }
            AppError::Request { code, msg, status } => (
                status,
                ErrorResponse {
                    code: code.into(),
                    msg: Some(msg),
                    #[cfg(debug_assertions)]
                    debug_info: None,
                },
            ),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl AppError {
    fn from_request_error(e: &impl ApiRequestError) -> Self {
        AppError::Request {
            code: e.code(),
            msg: e.to_string(),
            status: e.status_code(),
        }
    }
}

impl From<ForumError> for AppError {
    fn from(e: ForumError) -> Self {
        match e {
            ForumError::Storage(error) => AppError::ServerError {
                error: ServerError::Storage(error),

                #[cfg(debug_assertions)]
                backtrace: backtrace::Backtrace::new(),
            },
            e => AppError::from_request_error(&e),
        }
    }
}

impl From<AuthenticationError> for AppError {
    fn from(e: AuthenticationError) -> Self {
        AppError::from_request_error(&e)
    }
}

#[cfg(debug_assertions)]
#[derive(Serialize, Debug)]
struct FrameInfo {
    name: String,
    loc: String,
}

#[cfg(debug_assertions)]
fn filter_backtrace(backtrace: &backtrace::Backtrace) -> Vec<FrameInfo> {
    const MODULE_PREFIX: &str = "forum_api::";
    let mut frames_info: Vec<FrameInfo> = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            if let (Some(name), Some(filename), Some(lineno)) = (
                symbol.name().map(|n| n.to_string()),
                symbol.filename().map(|f| f.to_owned()),
                symbol.lineno(),
            ) {
                if name.contains(MODULE_PREFIX) {
                    frames_info.push(FrameInfo {
                        name,
                        loc: format!("{}:{}", filename.display(), lineno),
                    });
                }
            }
        }
    }

    frames_info
}
