//! JSON reply for notification requests.
//!
//! The semantic status lives in `status.code`; the HTTP status is always
//! 200. Existing clients read the body code, so the two are not aligned.

use {
    axum::{
        Json,
        http::{Method, StatusCode},
        response::{IntoResponse, Response},
    },
    serde::Serialize,
};

use crate::resolver::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBody {
    pub status: Status,
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub code: u16,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Meta {
    /// The address's stored channel list; `null` when nothing was resolved.
    pub handlers: Option<Vec<String>>,
}

impl ResponseBody {
    /// Channels were launched for the address.
    pub fn ok(method: &Method, path: &str, handlers: Vec<String>) -> Self {
        Self {
            status: Status {
                code: StatusCode::OK.as_u16(),
                message: format!("{method}: {path}"),
            },
            meta: Meta {
                handlers: Some(handlers),
            },
        }
    }

    pub fn forbidden(path: &str) -> Self {
        Self {
            status: Status {
                code: StatusCode::FORBIDDEN.as_u16(),
                message: path.to_string(),
            },
            meta: Meta::default(),
        }
    }

    pub fn not_found(method: &Method, path: &str) -> Self {
        Self {
            status: Status {
                code: StatusCode::NOT_FOUND.as_u16(),
                message: format!("{method}: {path}"),
            },
            meta: Meta::default(),
        }
    }

    /// Wrong method and unknown address look the same to the caller.
    pub fn from_error(err: &ResolveError, method: &Method, path: &str) -> Self {
        match err {
            ResolveError::MissingAddress => Self::forbidden(path),
            ResolveError::MethodNotAllowed { .. } | ResolveError::NotFound { .. } => {
                Self::not_found(method, path)
            },
        }
    }
}

impl IntoResponse for ResponseBody {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
