use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::passes::{PassesQuery, PassesResponse};
use super::api::position::{PositionQuery, PositionResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::passes::list_passes,
        super::api::position::current_position,
    ),
    components(
        schemas(
            PassesQuery,
            PassesResponse,
            PositionQuery,
            PositionResponse,
            ErrorResponse,
            crate::predict::Pass,
            crate::predict::Visibility,
            crate::predict::ElevationSample,
            crate::predict::Observer,
            crate::ephemeris::SunPosition,
            crate::tle::SatelliteInfo,
        )
    ),
    info(
        title = "Passcast API",
        description = "Satellite pass prediction with visibility classification",
        version = "0.1.0"
    ),
    tags(
        (name = "passes", description = "Upcoming passes over the station"),
        (name = "position", description = "Instantaneous look angles")
    )
)]
pub struct ApiDoc;
