use axum::extract::{rejection::JsonRejection, Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::database::Item;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedItem {
    #[serde(rename = "_id")]
    pub id: String,
}

/// POST /items/add - store a new item under a server-assigned identifier
pub async fn items_add_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<Item>, JsonRejection>,
) -> ApiResult<CreatedItem> {
    let Json(item) = payload?;

    let id = state.catalog.create(item).await?;
    tracing::info!(item_id = %id, by = %auth_user.username, "item created");

    Ok(ApiResponse::created(CreatedItem { id }))
}

/// PUT /items/update - replace all fields of the item named by `_id`
pub async fn items_update_put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<Item>, JsonRejection>,
) -> ApiResult<()> {
    let Json(item) = payload?;
    let id = item.id.clone().unwrap_or_default();

    state.catalog.update(item).await?;
    tracing::info!(item_id = %id, by = %auth_user.username, "item updated");

    Ok(ApiResponse::empty(StatusCode::OK))
}

/// DELETE /items/:id
pub async fn item_delete(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    if id.is_empty() {
        return Err(ApiError::bad_request("Missing id parameter"));
    }

    state.catalog.delete(&id).await?;
    tracing::info!(item_id = %id, by = %auth_user.username, "item deleted");

    Ok(ApiResponse::empty(StatusCode::OK))
}
