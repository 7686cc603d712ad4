use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{AccountChanges, NewAccount};
use crate::error::AppError;
use crate::handlers::transactions::TransactionResponse;
use crate::validation::{
    validate_account_name, validate_account_number, validate_non_negative, ValidationError,
};
use crate::AppState;

/// Body for creating or updating an account. `balance` is accepted but never
/// used: accounts open at zero and only move through transactions.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountPayload {
    pub name: String,
    pub number: i64,
    #[serde(default)]
    pub special_limit: Option<BigDecimal>,
    #[serde(default)]
    #[allow(dead_code)]
    balance: Option<BigDecimal>,
}

impl AccountPayload {
    fn validated(self) -> Result<(String, i64, BigDecimal), ValidationError> {
        let name = validate_account_name(&self.name)?;
        validate_account_number("number", self.number)?;
        let special_limit = self.special_limit.unwrap_or_else(|| BigDecimal::from(0));
        validate_non_negative("special_limit", &special_limit)?;
        Ok((name, self.number, special_limit))
    }
}

impl TryFrom<AccountPayload> for NewAccount {
    type Error = ValidationError;

    fn try_from(payload: AccountPayload) -> Result<Self, Self::Error> {
        let (name, number, special_limit) = payload.validated()?;
        Ok(NewAccount {
            name,
            number,
            special_limit,
        })
    }
}

impl TryFrom<AccountPayload> for AccountChanges {
    type Error = ValidationError;

    fn try_from(payload: AccountPayload) -> Result<Self, Self::Error> {
        let (name, number, special_limit) = payload.validated()?;
        Ok(AccountChanges {
            name,
            number,
            special_limit,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    const DEFAULT_LIMIT: i64 = 20;
    const MAX_LIMIT: i64 = 100;

    fn bounds(&self) -> (i64, i64) {
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let account = state.accounts.create(payload.try_into()?).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_accounts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let accounts = state.accounts.list_all().await?;
    Ok(Json(accounts))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(number): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .accounts
        .get_by_number(number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", number)))?;

    Ok(Json(account))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<AccountPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let account = state.accounts.update(id, payload.try_into()?).await?;

    Ok(Json(account))
}

pub async fn list_account_transactions(
    State(state): State<AppState>,
    Path(number): Path<i64>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let account = state
        .accounts
        .get_by_number(number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account {} not found", number)))?;

    let (limit, offset) = pagination.bounds();
    let transactions = state
        .transactions
        .list_for_account(account.id, limit, offset)
        .await?;

    Ok(Json(
        transactions
            .iter()
            .map(TransactionResponse::from)
            .collect::<Vec<_>>(),
    ))
}
