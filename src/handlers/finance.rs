use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::error::{AppError, AppResult};
use crate::services::FinanceElementView;
use crate::state::AppState;
use crate::store::LedgerSource;

#[derive(Debug, Deserialize)]
pub struct DetailsParams {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub years: Vec<i32>,
    pub changed: Vec<i32>,
}

pub async fn years(State(state): State<AppState>) -> Json<YearsResponse> {
    Json(YearsResponse {
        years: state.ledger.years(),
    })
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DetailsParams>,
) -> AppResult<Json<FinanceElementView>> {
    let year = match params.year {
        Some(year) => year,
        None => state
            .ledger
            .years()
            .last()
            .copied()
            .ok_or_else(|| AppError::Validation("No ledger data loaded".into()))?,
    };

    let view = state
        .explorer()
        .element(&id, year)
        .ok_or_else(|| AppError::NotFound(format!("Unknown category '{}'", id)))?;

    Ok(Json(view))
}

pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let changed = state.reload_ledger()?;
    tracing::info!(changed = changed.len(), "Ledger reloaded");
    Ok(Json(ReloadResponse {
        years: state.ledger.years(),
        changed,
    }))
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
