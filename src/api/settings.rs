//! Site settings endpoints.

use axum::{extract::State, Json};

use super::{require, success, ApiResult};
use crate::models::SiteSettings;
use crate::AppState;

/// GET /api/settings - Current settings, defaults if never saved.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<SiteSettings> {
    success(state.store.get_settings().await?)
}

/// PUT /api/admin/settings - Replace the settings object.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<SiteSettings>,
) -> ApiResult<SiteSettings> {
    require(&settings.site_name, "Site name")?;

    state.store.set_settings(&settings).await?;
    success(settings)
}
