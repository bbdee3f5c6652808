//! Entitlement status handler

use axum::extract::State;
use axum::Json;
use tracing::instrument;

use giftlink_types::EntitlementStatus;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/v1/entitlement
///
/// Read-side status for the caller: which tier would cover the next
/// generation and how much of it remains. Consumes nothing.
#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_entitlement(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<EntitlementStatus>> {
    let status = state.service.entitlement(user.user_id).await;
    Ok(Json(status))
}
