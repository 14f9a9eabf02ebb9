use axum::extract::{rejection::QueryRejection, Path, Query, State};
use serde::Deserialize;

use crate::api::{PageRequest, PageResult};
use crate::database::Item;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Raw pagination query. Values stay strings so parse failures surface as 400s.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /items - one page of the catalog plus the total item count
pub async fn items_get(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<PageResult<Item>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let request = PageRequest::parse(query.page.as_deref(), query.limit.as_deref())?;

    let page = state.catalog.list(request).await?;
    Ok(ApiResponse::success(page))
}

/// GET /item/:id - a single item
pub async fn item_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Item> {
    if id.is_empty() {
        return Err(ApiError::bad_request("Missing id parameter"));
    }

    let item = state.catalog.get_one(&id).await?;
    Ok(ApiResponse::success(item))
}
