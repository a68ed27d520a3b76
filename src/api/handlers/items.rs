//! Item CRUD handlers: list, create, get, update, delete.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ItemListResponse, ItemMutationResponse};
use crate::app_state::AppState;
use crate::domain::{Item, ItemFields};
use crate::error::{ApiError, ErrorResponse};

/// `GET /items` — List all items.
#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    summary = "List items",
    description = "Returns every stored item in insertion order together with the item count.",
    responses(
        (status = 200, description = "All items", body = ItemListResponse),
    )
)]
pub async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    let items = state.items.list().await;
    Json(ItemListResponse {
        count: items.len(),
        items,
    })
}

/// `POST /items` — Create an item.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] if the body is not a valid item.
#[utoipa::path(
    post,
    path = "/items",
    tag = "Items",
    summary = "Create an item",
    description = "Stores a new item. The id is the current item count plus one.",
    request_body = ItemFields,
    responses(
        (status = 201, description = "Item created", body = ItemMutationResponse),
        (status = 422, description = "Malformed item", body = ErrorResponse),
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<ItemFields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(fields) = payload?;
    let item = state.items.create(fields).await;
    Ok((StatusCode::CREATED, Json(ItemMutationResponse::created(item))))
}

/// `GET /items/{id}` — Get one item.
///
/// # Errors
///
/// Returns [`ApiError::ItemNotFound`] if no item has this id, or
/// [`ApiError::InvalidRequest`] if the id is not a number.
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "Items",
    summary = "Get an item",
    params(
        ("id" = u64, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Non-numeric id", body = ErrorResponse),
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Item>, ApiError> {
    let Path(id) = id?;
    state.items.get(id).await.map(Json)
}

/// `PUT /items/{id}` — Replace an item's fields.
///
/// # Errors
///
/// Returns [`ApiError::ItemNotFound`] if no item has this id, or
/// [`ApiError::InvalidRequest`] if the id is not a number or the body is
/// not a valid item.
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "Items",
    summary = "Update an item",
    description = "Replaces name, description, price and quantity. Keeps id and created_at and sets updated_at.",
    params(
        ("id" = u64, Path, description = "Item id"),
    ),
    request_body = ItemFields,
    responses(
        (status = 200, description = "Item updated", body = ItemMutationResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Malformed item or non-numeric id", body = ErrorResponse),
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<ItemFields>, JsonRejection>,
) -> Result<Json<ItemMutationResponse>, ApiError> {
    let Path(id) = id?;
    let Json(fields) = payload?;
    let item = state.items.update(id, fields).await?;
    Ok(Json(ItemMutationResponse::updated(item)))
}

/// `DELETE /items/{id}` — Remove an item.
///
/// # Errors
///
/// Returns [`ApiError::ItemNotFound`] if no item has this id, or
/// [`ApiError::InvalidRequest`] if the id is not a number.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "Items",
    summary = "Delete an item",
    params(
        ("id" = u64, Path, description = "Item id"),
    ),
    responses(
        (status = 200, description = "Item deleted", body = ItemMutationResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Non-numeric id", body = ErrorResponse),
    )
)]
pub async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ItemMutationResponse>, ApiError> {
    let Path(id) = id?;
    let item = state.items.delete(id).await?;
    Ok(Json(ItemMutationResponse::deleted(item)))
}

/// Item management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
