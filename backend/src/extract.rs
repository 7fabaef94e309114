//! Request extractors whose rejections are reported as [`AppError`]
//!
//! Axum's stock `Json`, `Path` and `Query` reject with plain-text bodies and,
//! for JSON, a 422 status. These wrappers keep every failure in the API's
//! JSON error shape with a 400 status.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
