use std::sync::Arc;

use crate::config::Config;
use crate::ephemeris::Sgp4Provider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<Sgp4Provider>,
}
