use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ephemeris::SunPosition;
use crate::predict::{ElevationSample, GeometryProvider};
use crate::tle::SatelliteInfo;
use crate::web::api::error::ApiResult;
use crate::web::api::passes::deserialize_optional_datetime;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PositionQuery {
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionResponse {
    pub satellite: SatelliteInfo,
    pub sample: ElevationSample,
    pub sun: SunPosition,
}

#[utoipa::path(
    get,
    path = "/api/position",
    tag = "position",
    params(
        ("at" = Option<String>, Query, description = "Instant (RFC3339, default now)")
    ),
    responses(
        (status = 200, description = "Look angles of the satellite and the sun", body = PositionResponse),
        (status = 422, description = "Instant outside the TLE validity window", body = crate::web::api::error::ErrorResponse)
    )
)]
pub async fn current_position(
    State(state): State<AppState>,
    Query(query): Query<PositionQuery>,
) -> ApiResult<impl IntoResponse> {
    let at = query.at.unwrap_or_else(Utc::now);
    let sample = state.provider.position_at(at)?;
    let sun = state.provider.sun_position_at(at);

    Ok((
        StatusCode::OK,
        Json(PositionResponse {
            satellite: state.provider.info().clone(),
            sample,
            sun,
        }),
    ))
}
