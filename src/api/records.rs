//! Endpoints shared by the flat collections (projects, sessions, events,
//! announcements, partners, messages).

use axum::{
    extract::{Path, State},
    Json,
};

use super::{require, success, ApiResult};
use crate::models::Record;
use crate::AppState;

/// GET /api/{collection} - List a collection.
pub async fn list_records<T: Record>(State(state): State<AppState>) -> ApiResult<Vec<T>> {
    success(state.store.get_all::<T>().await?)
}

/// PUT /api/admin/{collection} - Replace the whole collection as given.
pub async fn replace_records<T: Record>(
    State(state): State<AppState>,
    Json(records): Json<Vec<T>>,
) -> ApiResult<Vec<T>> {
    for record in &records {
        require(record.title(), T::LABEL)?;
    }

    state.store.set_all(&records).await?;
    tracing::info!("Replaced {} collection ({} records)", T::LABEL, records.len());
    success(records)
}

/// POST /api/admin/{collection} - Add a record under a new id.
pub async fn create_record<T: Record>(
    State(state): State<AppState>,
    Json(record): Json<T>,
) -> ApiResult<T> {
    require(record.title(), T::LABEL)?;

    let created = state.store.add(record).await?;
    tracing::info!("Created {} {}", T::LABEL, created.id());
    success(created)
}

/// PUT /api/admin/{collection}/:id - Replace a record. Unknown ids change nothing.
pub async fn update_record<T: Record>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut record): Json<T>,
) -> ApiResult<T> {
    require(record.title(), T::LABEL)?;

    record.set_id(id);
    state.store.update(record.clone()).await?;
    success(record)
}

/// DELETE /api/admin/{collection}/:id - Remove a record.
pub async fn delete_record<T: Record>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.store.delete::<T>(id).await?;
    tracing::info!("Deleted {} {}", T::LABEL, id);
    success(())
}
