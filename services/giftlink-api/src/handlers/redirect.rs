//! Single-use redirect handler

use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, LOCATION, PRAGMA};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::{ApiError, ApiResult};
use crate::extractors::CallerSession;
use crate::state::AppState;

/// GET /api/v1/gift-links/redeem
///
/// Redeems the session's pending gift link and answers with a 302 to it.
/// The capability is cleared before the redirect is issued, so refreshing
/// the location lands on `HANDOFF_MISSING` rather than a second redirect.
#[instrument(skip(state), fields(session_id = %session.session_id))]
pub async fn redeem_redirect(
    State(state): State<AppState>,
    session: CallerSession,
) -> ApiResult<Response> {
    let url = match state.service.redeem(session.session_id).await {
        Ok(url) => {
            metrics::counter!("handoff_redeems_total", "result" => "ok").increment(1);
            url
        }
        Err(err) => {
            metrics::counter!("handoff_redeems_total", "result" => err.error_code()).increment(1);
            return Err(ApiError::Core(err));
        }
    };

    // Intermediaries must not cache or replay the one-shot location.
    let response = (
        StatusCode::FOUND,
        [
            (LOCATION, url.as_str().to_string()),
            (CACHE_CONTROL, "no-cache, no-store, must-revalidate".to_string()),
            (PRAGMA, "no-cache".to_string()),
        ],
    )
        .into_response();

    Ok(response)
}
