// handlers/cars.rs - /cars and /cars/:id

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::{parse_id, today};
use crate::database::{models::Car, DatabaseError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Created};
use crate::state::AppState;
use crate::validation::validate_car;

/**
 * POST /cars - Validate and insert a car
 *
 * Expected Input:
 * ```json
 * {
 *   "brand": "Fiat",
 *   "model": "Uno",
 *   "color": "prata",
 *   "year_manufacture": 2015,
 *   "imported": false,
 *   "plates": "ABC-1D23",
 *   "selling_date": "2023-05-02",
 *   "selling_price": "25990.00"
 * }
 * ```
 *
 * 201 with a `Location: /cars/:id` header, or 422 listing every invalid field.
 */
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Created, ApiError> {
    let car = validate_car(&body, today())?;
    let id = state.store.insert_car(&car).await?;

    tracing::info!("Created car {} ({} {})", id, car.brand, car.model);
    Ok(Created::at(format!("/cars/{}", id)))
}

/// GET /cars - all cars ordered by brand
pub async fn retrieve_all(State(state): State<AppState>) -> ApiResult<Vec<Car>> {
    let cars = state.store.list_cars().await?;
    Ok(ApiResponse::success(cars))
}

/// GET /cars/:id
pub async fn retrieve_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Car> {
    let id = parse_id(&id, "car")?;

    match state.store.find_car(id).await? {
        Some(car) => Ok(ApiResponse::success(car)),
        None => Err(DatabaseError::not_found("car", id).into()),
    }
}

/// PUT /cars/:id - full replacement, same rules as create
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<()> {
    let id = parse_id(&id, "car")?;
    let car = validate_car(&body, today())?;
    state.store.update_car(id, &car).await?;

    tracing::info!("Updated car {}", id);
    Ok(ApiResponse::no_content())
}

/// DELETE /cars/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let id = parse_id(&id, "car")?;
    state.store.delete_car(id).await?;

    tracing::info!("Deleted car {}", id);
    Ok(ApiResponse::no_content())
}
