//! Body and query extractors whose rejections use the `AppError` envelope.
//!
//! `axum::Json` and `axum::extract::Query` answer undecodable input with a
//! plain-text 4xx. These wrappers route the rejection through `AppError`, so a
//! missing or unknown field comes back as a 400 `validation_failed`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
