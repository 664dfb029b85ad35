use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::jwt::{AdminUser, AuthUser},
    error::AppError,
    extract::AppJson,
    state::AppState,
};

use super::dto::DepositRequest;
use super::repo_types::Transaction;
use super::services::{
    confirm_transaction, pending_transactions, purchase, request_deposit, transactions_for_user,
    Purchase,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/beverages/:id/purchase", post(buy))
        .route("/deposits", post(deposit))
        .route("/transactions", get(history))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/transactions/pending", get(pending))
        .route("/admin/transactions/:id/confirm", post(confirm))
}

#[instrument(skip(state))]
pub async fn buy(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(beverage_id): Path<i64>,
) -> Result<(StatusCode, Json<Purchase>), AppError> {
    let bought = purchase(&state.db, user_id, beverage_id).await?;
    Ok((StatusCode::CREATED, Json(bought)))
}

#[instrument(skip(state, payload))]
pub async fn deposit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<DepositRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = request_deposit(&state.db, user_id, payload.amount).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(transactions_for_user(&state.db, user_id).await?))
}

#[instrument(skip(state, admin), fields(actor_id = admin.0.id))]
pub async fn pending(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(pending_transactions(&state.db).await?))
}

#[instrument(skip(state, admin), fields(actor_id = admin.0.id))]
pub async fn confirm(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(confirm_transaction(&state.db, id).await?))
}
