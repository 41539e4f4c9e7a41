//! Leadership endpoints, keyed by cabinet year.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{require, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CabinetTerm, LeadershipBook, LeadershipMember};
use crate::AppState;

/// GET /api/leadership - All cabinet years.
pub async fn get_leadership(State(state): State<AppState>) -> ApiResult<LeadershipBook> {
    success(state.store.get_leadership().await?)
}

/// GET /api/leadership/:year - One cabinet year.
pub async fn get_term(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> ApiResult<CabinetTerm> {
    let mut book = state.store.get_leadership().await?;
    match book.remove(&year) {
        Some(term) => success(term),
        None => Err(AppError::NotFound(format!("Cabinet year {} not found", year))),
    }
}

/// PUT /api/admin/leadership - Replace every cabinet year at once.
pub async fn replace_leadership(
    State(state): State<AppState>,
    Json(book): Json<LeadershipBook>,
) -> ApiResult<LeadershipBook> {
    state.store.set_leadership(&book).await?;
    success(book)
}

/// PUT /api/admin/leadership/:year/president
pub async fn set_president(
    State(state): State<AppState>,
    Path(year): Path<String>,
    Json(member): Json<LeadershipMember>,
) -> ApiResult<LeadershipMember> {
    require(&member.name, "Name")?;

    let president = state.store.set_president(&year, member).await?;
    tracing::info!("Set president for {}", year);
    success(president)
}

/// DELETE /api/admin/leadership/:year/president
pub async fn clear_president(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> ApiResult<()> {
    state.store.clear_president(&year).await?;
    success(())
}

/// POST /api/admin/leadership/:year/executives
pub async fn add_executive(
    State(state): State<AppState>,
    Path(year): Path<String>,
    Json(member): Json<LeadershipMember>,
) -> ApiResult<LeadershipMember> {
    require(&member.name, "Name")?;
    require(&member.position, "Position")?;

    success(state.store.add_executive(&year, member).await?)
}

/// PUT /api/admin/leadership/:year/executives/:id
pub async fn update_executive(
    State(state): State<AppState>,
    Path((year, id)): Path<(String, i64)>,
    Json(mut member): Json<LeadershipMember>,
) -> ApiResult<LeadershipMember> {
    require(&member.name, "Name")?;
    require(&member.position, "Position")?;

    member.id = id;
    state.store.update_executive(&year, member.clone()).await?;
    success(member)
}

/// DELETE /api/admin/leadership/:year/executives/:id
pub async fn delete_executive(
    State(state): State<AppState>,
    Path((year, id)): Path<(String, i64)>,
) -> ApiResult<()> {
    state.store.delete_executive(&year, id).await?;
    success(())
}

/// DELETE /api/admin/leadership/:year - Drop a cabinet year.
pub async fn delete_term(State(state): State<AppState>, Path(year): Path<String>) -> ApiResult<()> {
    state.store.delete_term(&year).await?;
    tracing::info!("Deleted cabinet year {}", year);
    success(())
}
