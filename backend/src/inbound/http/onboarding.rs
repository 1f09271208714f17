//! Onboarding API handler.
//!
//! ```text
//! POST /api/v1/onboarding
//! ```
//!
//! Resolves the session's external identity to an internal account and
//! ensures the account owns its watchlist. The resulting ids are written to
//! the session so watchlist handlers need no further lookups.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Response body for `POST /api/v1/onboarding`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponseBody {
    /// Always `true`; failures surface through the error envelope.
    pub success: bool,
}

/// Complete onboarding for the authenticated identity.
///
/// Idempotent: repeating the call resolves the same account and watchlist.
#[utoipa::path(
    post,
    path = "/api/v1/onboarding",
    responses(
        (status = 200, description = "Onboarding complete", body = OnboardingResponseBody),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "A backing service is unavailable", body = Error)
    ),
    tags = ["onboarding"],
    operation_id = "completeOnboarding",
    security(("SessionCookie" = []))
)]
#[post("/onboarding")]
pub async fn complete_onboarding(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OnboardingResponseBody>> {
    let authenticated = session.require_identity()?;
    let outcome = state
        .onboarding
        .complete_onboarding(&authenticated.identity, &authenticated.suggested_username)
        .await?;
    session.persist_onboarding(&outcome)?;
    Ok(web::Json(OnboardingResponseBody { success: true }))
}

#[cfg(test)]
#[path = "onboarding_tests.rs"]
mod tests;
