use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Transaction, TransactionType};
use crate::error::AppError;
use crate::use_cases::{DepositInput, TransferInput, WithdrawInput};
use crate::validation::{
    validate_account_number, validate_distinct_accounts, validate_positive_amount, ValidationError,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositRequest {
    pub receiver_account_number: i64,
    pub amount: BigDecimal,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WithdrawRequest {
    pub source_account_number: i64,
    pub amount: BigDecimal,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferRequest {
    pub source_account_number: i64,
    pub receiver_account_number: i64,
    pub amount: BigDecimal,
}

impl TryFrom<DepositRequest> for DepositInput {
    type Error = ValidationError;

    fn try_from(req: DepositRequest) -> Result<Self, Self::Error> {
        validate_account_number("receiver_account_number", req.receiver_account_number)?;
        validate_positive_amount(&req.amount)?;
        Ok(DepositInput {
            receiver_account_number: req.receiver_account_number,
            amount: req.amount,
        })
    }
}

impl TryFrom<WithdrawRequest> for WithdrawInput {
    type Error = ValidationError;

    fn try_from(req: WithdrawRequest) -> Result<Self, Self::Error> {
        validate_account_number("source_account_number", req.source_account_number)?;
        validate_positive_amount(&req.amount)?;
        Ok(WithdrawInput {
            source_account_number: req.source_account_number,
            amount: req.amount,
        })
    }
}

impl TryFrom<TransferRequest> for TransferInput {
    type Error = ValidationError;

    fn try_from(req: TransferRequest) -> Result<Self, Self::Error> {
        validate_account_number("source_account_number", req.source_account_number)?;
        validate_account_number("receiver_account_number", req.receiver_account_number)?;
        validate_distinct_accounts(req.source_account_number, req.receiver_account_number)?;
        validate_positive_amount(&req.amount)?;
        Ok(TransferInput {
            source_account_number: req.source_account_number,
            receiver_account_number: req.receiver_account_number,
            amount: req.amount,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: BigDecimal,
    pub source_account: Option<Uuid>,
    pub receiver_account: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            transaction_type: tx.transaction_type(),
            amount: tx.amount.clone(),
            source_account: tx.source_account(),
            receiver_account: tx.receiver_account(),
            created_at: tx.created_at,
        }
    }
}

fn created(tx: Transaction) -> impl IntoResponse {
    (StatusCode::CREATED, Json(TransactionResponse::from(&tx)))
}

pub async fn deposit(
    State(state): State<AppState>,
    payload: Result<Json<DepositRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let tx = state.engine.deposit(payload.try_into()?).await?;

    Ok(created(tx))
}

pub async fn withdraw(
    State(state): State<AppState>,
    payload: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let tx = state.engine.withdraw(payload.try_into()?).await?;

    Ok(created(tx))
}

pub async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let tx = state.engine.transfer(payload.try_into()?).await?;

    Ok(created(tx))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .transactions
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

    Ok(Json(TransactionResponse::from(&tx)))
}
