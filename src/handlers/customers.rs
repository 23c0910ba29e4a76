// handlers/customers.rs - /customers and /customers/:id

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::{parse_id, today};
use crate::database::{models::Customer, DatabaseError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Created};
use crate::state::AppState;
use crate::validation::validate_customer;

/**
 * POST /customers - Validate and insert a customer
 *
 * Expected Input:
 * ```json
 * {
 *   "name": "Maria da Silva",
 *   "ident_document": "111.444.777-35",
 *   "birth_date": "1990-04-12",
 *   "street_name": "Rua das Flores",
 *   "house_number": "120",
 *   "complements": "Apto 12",
 *   "district": "Centro",
 *   "municipality": "Franca",
 *   "state": "SP",
 *   "phone": "(16) 99999-0000",
 *   "email": "maria@example.com"
 * }
 * ```
 */
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Created, ApiError> {
    let customer = validate_customer(&body, today())?;
    let id = state.store.insert_customer(&customer).await?;

    tracing::info!("Created customer {}", id);
    Ok(Created::at(format!("/customers/{}", id)))
}

/// GET /customers - all customers ordered by name
pub async fn retrieve_all(State(state): State<AppState>) -> ApiResult<Vec<Customer>> {
    let customers = state.store.list_customers().await?;
    Ok(ApiResponse::success(customers))
}

pub async fn retrieve_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Customer> {
    let id = parse_id(&id, "customer")?;

    match state.store.find_customer(id).await? {
        Some(customer) => Ok(ApiResponse::success(customer)),
        None => Err(DatabaseError::not_found("customer", id).into()),
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<()> {
    let id = parse_id(&id, "customer")?;
    let customer = validate_customer(&body, today())?;
    state.store.update_customer(id, &customer).await?;

    tracing::info!("Updated customer {}", id);
    Ok(ApiResponse::no_content())
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, "customer")?;
    state.store.delete_customer(id).await?;

    tracing::info!("Deleted customer {}", id);
    Ok(ApiResponse::no_content())
}
