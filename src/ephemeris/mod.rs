pub mod frames;
mod sgp4_provider;
mod sun;

pub use sgp4_provider::{Sgp4Provider, DEFAULT_VALIDITY};
pub use sun::{sun_position, SunPosition};
