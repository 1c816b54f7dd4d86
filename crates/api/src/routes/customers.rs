//! Customer API handlers.
//!
//! Request and response bodies are [`CustomerPayload`] JSON. Lookups that
//! find nothing answer `200` with `null`.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::CustomerPayload;
use crate::services::customers::CustomerService;
use crate::state::AppState;

/// Query string for `GET /customers/by-shared-key`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedKeyQuery {
    pub shared_key: Option<String>,
}

/// Query string for `GET /customers/by-email`.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// List every customer.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CustomerPayload>>> {
    let customers = CustomerService::new(state.store()).list_all().await?;
    Ok(Json(customers.into_iter().map(CustomerPayload::from).collect()))
}

/// Look up a customer by shared key.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if `sharedKey` is missing.
pub async fn by_shared_key(
    State(state): State<AppState>,
    Query(query): Query<SharedKeyQuery>,
) -> Result<Json<Option<CustomerPayload>>> {
    let key = query
        .shared_key
        .ok_or_else(|| AppError::BadRequest("sharedKey is required".to_string()))?;

    let customer = CustomerService::new(state.store())
        .find_by_shared_key(&key)
        .await?;
    Ok(Json(customer.map(CustomerPayload::from)))
}

/// Look up a customer by email.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if `email` is missing.
pub async fn by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Option<CustomerPayload>>> {
    let email = query
        .email
        .ok_or_else(|| AppError::BadRequest("email is required".to_string()))?;

    let customer = CustomerService::new(state.store())
        .find_by_email(&email)
        .await?;
    Ok(Json(customer.map(CustomerPayload::from)))
}

/// Create a customer.
///
/// # Errors
///
/// Returns a conflict if validation or a uniqueness rule fails.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CustomerPayload>,
) -> Result<(StatusCode, Json<CustomerPayload>)> {
    let customer = CustomerService::new(state.store()).create(&body).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Replace every field of an existing customer. The body carries the `id`.
///
/// # Errors
///
/// Returns a conflict if validation or a uniqueness rule fails, or if the
/// customer does not exist.
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<CustomerPayload>,
) -> Result<Json<CustomerPayload>> {
    let customer = CustomerService::new(state.store()).update(&body).await?;
    Ok(Json(customer.into()))
}
