// rest/routes/habit.rs — Habit endpoints.
//
// Wire field names are camelCase (`startDate`, `dates`) to stay
// compatible with existing clients of the original service.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::HabitError;
use crate::rest::error::ApiError;
use crate::AppContext;

#[derive(Deserialize)]
pub struct DateEntry {
    pub date: String,
}

/// Body of POST / DELETE: `{"dates": [{"date": "YYYY-MM-DD"}, ...]}`.
#[derive(Deserialize)]
pub struct DateListRequest {
    pub dates: Vec<DateEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub start_date: String,
    pub count: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakQuery {
    pub start_date: String,
}

/// GET /habit/meditation?startDate=YYYY-MM-DD&count=N
pub async fn get_history(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    // The core takes any count; the sanity bound lives at this boundary.
    if query.count > ctx.config.max_history_days {
        return Err(ApiError(HabitError::InvalidRange(format!(
            "count {} exceeds the limit of {} days",
            query.count, ctx.config.max_history_days
        ))));
    }

    info!(start_date = %query.start_date, count = query.count, "history requested");
    let history = ctx.habit.history(&query.start_date, query.count).await?;
    Ok(Json(json!({ "history": history })))
}

/// POST /habit/meditation — 201 when anything new was recorded, 200 when
/// every date was already present.
pub async fn add_dates(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<DateListRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let dates: Vec<String> = body.dates.into_iter().map(|e| e.date).collect();
    let added = ctx.habit.add_dates(&dates).await?;
    info!(requested = dates.len(), added, "dates recorded");

    let status = if added > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(json!({ "added": added }))))
}

/// DELETE /habit/meditation
pub async fn delete_dates(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<DateListRequest>,
) -> Result<Json<Value>, ApiError> {
    let dates: Vec<String> = body.dates.into_iter().map(|e| e.date).collect();
    let deleted = ctx.habit.delete_dates(&dates).await?;
    info!(requested = dates.len(), deleted, "dates removed");
    Ok(Json(json!({ "deleted": deleted })))
}

/// GET /habit/meditation/streak?startDate=YYYY-MM-DD
pub async fn get_streak(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<StreakQuery>,
) -> Result<Json<Value>, ApiError> {
    info!(start_date = %query.start_date, "streak requested");
    let streak = ctx.habit.streak(&query.start_date).await?;
    Ok(Json(json!({ "streak": streak })))
}
