//! HTTP handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::{info, instrument};

use crate::dto::{ConvertRequest, ConvertResponse, GetRatesRequest, GetRatesResponse};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::router::AppState;

/// POST /get_exchange_rates
#[instrument(skip_all, fields(country = ?request.country))]
pub async fn get_exchange_rates(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<GetRatesRequest>,
) -> Result<Json<GetRatesResponse>, ApiError> {
    let table = state.repository.get_rates(request.country.as_ref()).await?;

    info!(date_loaded = %table.date_loaded, currencies = table.rates.len(), "Rates served");
    Ok(Json(GetRatesResponse {
        rates: table.rates.clone(),
    }))
}

/// POST /convert
#[instrument(skip_all, fields(
    country = ?request.country,
    source = %request.source_currency,
    target = %request.target_currency,
    amount = request.amount
))]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<ConvertRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let request = request.into_exchange_rate_request(&state.default_cb);
    let rate = state.repository.get_exchange_rate(&request).await?;

    Ok(Json(ConvertResponse {
        amount: rate.rate_target_to_base,
    }))
}
