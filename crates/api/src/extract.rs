//! Request extractors whose rejections render as [`AppError`] bodies.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` whose malformed-body rejections (bad JSON, unknown enum
/// variants such as a role of `"superuser"`, missing fields) become
/// `400 BAD_REQUEST` with the usual `{ error, code }` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
