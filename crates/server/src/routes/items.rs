use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{errors::JsonApiError, routes::ServerState};

/// Body for create and update: everything except the store-assigned id and
/// the toggle-only `processed` flag.
#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub name: String,
}

#[utoipa::path(
    get, path = "/api/items", tag = "items",
    responses(
        (status = 200, description = "All items in creation order"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<models::item::Model>>, JsonApiError> {
    match state.items.get_all_items().await {
        Ok(list) => {
            info!(count = list.len(), "list items");
            Ok(Json(list))
        }
        Err(e) => {
            error!(err = %e, "list items failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/api/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<models::item::Model>, StatusCode> {
    match state.items.get_item_by_id(id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[utoipa::path(
    get, path = "/api/items/search", tag = "items",
    params(SearchQuery),
    responses(
        (status = 200, description = "Items whose name contains the fragment, case-insensitive"),
        (status = 500, description = "Search Failed")
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<models::item::Model>>, JsonApiError> {
    match state.items.search_items_by_name(&q.name).await {
        Ok(list) => {
            info!(fragment = %q.name, count = list.len(), "search items");
            Ok(Json(list))
        }
        Err(e) => {
            error!(err = %e, "search items failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Search Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    post, path = "/api/items", tag = "items",
    request_body = crate::openapi::ItemInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<ItemInput>,
) -> Result<(StatusCode, Json<models::item::Model>), JsonApiError> {
    match state.items.create_item(&input.name, input.description.as_deref()).await {
        Ok(m) => Ok((StatusCode::CREATED, Json(m))),
        Err(e) => {
            error!(err = %e, "create item failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    put, path = "/api/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    request_body = crate::openapi::ItemInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(input): Json<ItemInput>,
) -> Result<Json<models::item::Model>, JsonApiError> {
    match state.items.update_item(id, &input.name, input.description.as_deref()).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", None)),
        Err(e) => {
            error!(err = %e, "update item failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Update Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    delete, path = "/api/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> StatusCode {
    match state.items.delete_item(id).await {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete item failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[utoipa::path(
    get, path = "/api/items/count", tag = "items",
    responses(
        (status = 200, description = "Number of live items"),
        (status = 500, description = "Count Failed")
    )
)]
pub async fn count(State(state): State<ServerState>) -> Result<Json<u64>, JsonApiError> {
    match state.items.count_items().await {
        Ok(n) => Ok(Json(n)),
        Err(e) => {
            error!(err = %e, "count items failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Count Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    get, path = "/api/items/{id}/exists", tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Whether an item with this id exists"),
        (status = 500, description = "Exists Failed")
    )
)]
pub async fn exists(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<bool>, JsonApiError> {
    match state.items.exists_by_id(id).await {
        Ok(found) => Ok(Json(found)),
        Err(e) => {
            error!(err = %e, "exists check failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Exists Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(
    post, path = "/api/items/{id}/toggle-processed", tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item with the processed flag flipped"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Toggle Failed")
    )
)]
pub async fn toggle_processed(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<models::item::Model>, JsonApiError> {
    match state.items.toggle_processed(id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", None)),
        Err(e) => {
            error!(err = %e, "toggle item failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Toggle Failed", Some(e.to_string())))
        }
    }
}
