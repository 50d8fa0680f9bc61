//! Route definitions and handlers.
//!
//! Handlers authenticate the caller, delegate to the ledger with the server
//! clock as `now`, and project the result. All business decisions live in
//! `miner-ledger`; this layer only shapes requests and responses.

use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use miner_core::Amount;
use miner_ledger::{
    AdWatch, BonusOutcome, DepositOutcome, MiningStatus, UserRecord, WithdrawalReceipt,
    WithdrawalRecord,
};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState, Identity};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/accounts", post(create_account))
        .route("/v1/users/:id", get(get_profile))
        .route("/v1/users/:id/settle", post(settle))
        .route("/v1/users/:id/ads/watch", post(watch_ad))
        .route("/v1/users/:id/referral", post(apply_referral))
        .route("/v1/users/:id/referral/bonus", post(check_referral_bonus))
        .route("/v1/users/:id/deposits", post(deposit_boost))
        .route("/v1/users/:id/withdrawals", post(request_withdrawal))
        .route("/v1/users/:id/withdrawals", get(list_withdrawals))
        .route("/v1/admin/withdrawals", get(admin_list_withdrawals))
        .route("/v1/admin/withdrawals/:wid/settle", post(admin_settle))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    id: String,
    email: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct CreateAccountResponse {
    referral_code: String,
    user: UserRecord,
}

async fn create_account(
    State(state): State<AppState>,
    identity: Identity,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, ApiError> {
    identity.authorize_user(&req.id)?;
    let user = state
        .ledger
        .create_account(&req.id, &req.email, &req.name, Utc::now())
        .await?;
    miner_metrics::record_account_created();
    Ok(Json(CreateAccountResponse {
        referral_code: user.referral_code.clone(),
        user,
    }))
}

async fn get_profile(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<UserRecord>, ApiError> {
    identity.authorize_user(&id)?;
    Ok(Json(state.ledger.get_profile(&id).await?))
}

async fn settle(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<MiningStatus>, ApiError> {
    identity.authorize_user(&id)?;
    let status = state.ledger.settle_and_report(&id, Utc::now()).await?;
    miner_metrics::record_settle();
    Ok(Json(status))
}

async fn watch_ad(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<AdWatch>, ApiError> {
    identity.authorize_user(&id)?;
    let out = state.ledger.watch_ad(&id, Utc::now()).await?;
    miner_metrics::record_ad_boost();
    Ok(Json(out))
}

#[derive(Debug, Deserialize)]
struct ApplyReferralRequest {
    code: String,
}

async fn apply_referral(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(req): Json<ApplyReferralRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    identity.authorize_user(&id)?;
    state
        .ledger
        .apply_referral_code(&id, &req.code, Utc::now())
        .await?;
    miner_metrics::record_referral_linked();
    Ok(Json(serde_json::json!({ "applied": true })))
}

async fn check_referral_bonus(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<BonusOutcome>, ApiError> {
    identity.authorize_user(&id)?;
    let outcome = state
        .ledger
        .check_and_grant_mining_bonus(&id, Utc::now())
        .await?;
    if outcome.granted {
        miner_metrics::record_referral_bonus();
    }
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
struct DepositRequest {
    /// Deposit amount in micro-units.
    amount: Amount,
}

async fn deposit_boost(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<DepositOutcome>, ApiError> {
    identity.authorize_user(&id)?;
    let out = state
        .ledger
        .deposit_boost(&id, req.amount, Utc::now())
        .await?;
    miner_metrics::record_deposit_boost();
    Ok(Json(out))
}

#[derive(Debug, Deserialize)]
struct WithdrawalRequestBody {
    /// Withdrawal amount in micro-units.
    amount: Amount,
    payout_destination: String,
    payee_name: String,
}

async fn request_withdrawal(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(req): Json<WithdrawalRequestBody>,
) -> Result<Json<WithdrawalReceipt>, ApiError> {
    identity.authorize_user(&id)?;
    let receipt = state
        .ledger
        .request_withdrawal(
            &id,
            req.amount,
            &req.payout_destination,
            &req.payee_name,
            Utc::now(),
        )
        .await?;
    miner_metrics::record_withdrawal_requested();
    Ok(Json(receipt))
}

async fn list_withdrawals(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Vec<WithdrawalRecord>>, ApiError> {
    identity.authorize_user(&id)?;
    Ok(Json(state.ledger.list_withdrawals(&id).await?))
}

async fn admin_list_withdrawals(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<WithdrawalRecord>>, ApiError> {
    Ok(Json(state.ledger.admin_list_all(identity.capability).await?))
}

async fn admin_settle(
    State(state): State<AppState>,
    identity: Identity,
    Path(wid): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .ledger
        .admin_settle_withdrawal(identity.capability, &wid, Utc::now())
        .await?;
    miner_metrics::record_withdrawal_settled();
    Ok(Json(serde_json::json!({ "settled": true })))
}
