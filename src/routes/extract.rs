//! Request extractors that report failures through the JSON error envelope.

use axum::extract::{FromRequestParts, Query};

use crate::errors::AppError;

/// Query string extractor; malformed values become `400 VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ValidQuery<T>(pub T);
