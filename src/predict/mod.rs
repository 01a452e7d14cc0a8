pub mod assembler;
mod error;
pub mod events;
mod geometry;
mod observer;
pub mod search;
#[cfg(test)]
pub(crate) mod testing;
mod types;
pub mod visibility;

pub use error::PredictError;
pub use geometry::GeometryProvider;
pub use observer::Observer;
pub use search::{predict_passes, PassSearch, SearchConfig};
pub use types::{ElevationSample, Pass, PassEvent, Visibility};
