//! Gift-link generation handler

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use giftlink_types::TemplateKind;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AuthUser, CallerSession};
use crate::state::AppState;

/// Maximum accepted share-link length (must match the validation tests)
const MAX_SHARE_LINK_LEN: usize = 2048;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// The share link to convert
    pub share_link: String,
    /// Which template to compose; defaults to the standard gift link
    #[serde(default)]
    pub template: TemplateKind,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// Tier the generation was charged against
    pub tier: String,
    /// Extracted product identifier, for display
    pub product_id: String,
    /// Template that was composed
    pub template: String,
    /// Endpoint that performs the single-use redirect
    pub redeem_path: &'static str,
}

/// POST /api/v1/gift-links
///
/// Spends one unit of entitlement, resolves and composes the gift link, and
/// parks it behind the session's handoff. The link itself is never in the
/// response body; the caller follows `redeem_path` to use it.
#[instrument(skip(state, req), fields(user_id = %user.user_id, template = %req.template))]
pub async fn generate_gift_link(
    State(state): State<AppState>,
    user: AuthUser,
    session: CallerSession,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let share_link = req.share_link.trim();
    if share_link.is_empty() {
        return Err(ApiError::BadRequest("share_link cannot be empty".into()));
    }
    if share_link.len() > MAX_SHARE_LINK_LEN {
        return Err(ApiError::BadRequest("share_link too long".into()));
    }

    let generated = state
        .service
        .generate(user.user_id, session.session_id, share_link, req.template)
        .await?;

    let tier = generated.tier.to_string();
    metrics::counter!("gift_links_generated_total", "tier" => tier.clone()).increment(1);

    Ok(Json(GenerateResponse {
        tier,
        product_id: generated.product_id,
        template: generated.template.to_string(),
        redeem_path: "/api/v1/gift-links/redeem",
    }))
}
