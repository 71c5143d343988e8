//! CurrentUser extractor
//!
//! Reads the user placed in request extensions by [`super::identify`].

use axum::{extract::FromRequestParts, http::request::Parts};

use super::CurrentUser;
use crate::utils::AppError;

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::not_authenticated)
    }
}
