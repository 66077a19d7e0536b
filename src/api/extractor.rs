//! Defines the extractors used by the websocket route.

use super::AppState;
use crate::core::Error;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{header::ORIGIN, request::Parts},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

/// Extracts the Path parameters from request url.
///
/// Validate the values of Path parameters.
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(data) = Path::<T>::from_request_parts(parts, state).await?;
        data.validate()?;
        Ok(ValidPath(data))
    }
}

/// Extractor used to check the `Origin` header against the allow-list.
pub struct OriginGuard;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OriginGuard {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let origin = parts
            .headers
            .get(ORIGIN)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        if state.config.allows_origin(origin) {
            Ok(OriginGuard)
        } else {
            tracing::debug!("reject upgrade from origin `{}`", origin);
            Err(Error::Forbidden)
        }
    }
}
