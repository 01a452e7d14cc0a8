use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::predict::{predict_passes, Observer, Pass};
use crate::tle::SatelliteInfo;
use crate::web::api::error::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PassesQuery {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub min_elevation: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PassesResponse {
    pub satellite: SatelliteInfo,
    pub station: Observer,
    pub passes: Vec<Pass>,
}

#[utoipa::path(
    get,
    path = "/api/passes",
    tag = "passes",
    params(
        ("count" = Option<usize>, Query, description = "Number of passes (default from config)"),
        ("min_elevation" = Option<f64>, Query, description = "Minimum peak elevation (degrees)"),
        ("start" = Option<String>, Query, description = "Search start (RFC3339, default now)")
    ),
    responses(
        (status = 200, description = "Next passes", body = PassesResponse),
        (status = 400, description = "Invalid parameters", body = crate::web::api::error::ErrorResponse),
        (status = 404, description = "Not enough passes within the search span", body = crate::web::api::error::ErrorResponse),
        (status = 422, description = "Start outside the TLE validity window", body = crate::web::api::error::ErrorResponse)
    )
)]
pub async fn list_passes(
    State(state): State<AppState>,
    Query(query): Query<PassesQuery>,
) -> ApiResult<impl IntoResponse> {
    let config = state
        .config
        .search_config(query.count, query.min_elevation)?;
    let start = query.start.unwrap_or_else(Utc::now);

    let provider = state.provider.clone();
    let passes = tokio::task::spawn_blocking(move || predict_passes(provider, start, config))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        StatusCode::OK,
        Json(PassesResponse {
            satellite: state.provider.info().clone(),
            station: *state.provider.observer(),
            passes,
        }),
    ))
}

pub(crate) fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(s) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(serde::de::Error::custom)
}
