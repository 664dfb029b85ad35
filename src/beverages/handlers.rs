use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::{AdminUser, AuthUser},
    error::AppError,
    extract::AppJson,
    state::AppState,
};

use super::dto::CreateBeverageRequest;
use super::repo_types::{Beverage, BeverageChanges};
use super::services::{create_beverage, list_beverages, update_beverage};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/beverages", get(list))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/beverages", post(create))
        .route("/admin/beverages/:id", patch(update))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Beverage>>, AppError> {
    Ok(Json(list_beverages(&state.db).await?))
}

#[instrument(skip(state, admin, payload), fields(actor_id = admin.0.id))]
pub async fn create(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(payload): AppJson<CreateBeverageRequest>,
) -> Result<(StatusCode, Json<Beverage>), AppError> {
    let beverage =
        create_beverage(&state.db, &payload.name, payload.price, payload.stock).await?;
    Ok((StatusCode::CREATED, Json(beverage)))
}

#[instrument(skip(state, admin, changes), fields(actor_id = admin.0.id))]
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    AppJson(changes): AppJson<BeverageChanges>,
) -> Result<Json<Beverage>, AppError> {
    let beverage = update_beverage(&state.db, admin.0.id, id, changes).await?;
    Ok(Json(beverage))
}
