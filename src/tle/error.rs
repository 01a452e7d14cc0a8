use thiserror::Error;

#[derive(Debug, Error)]
pub enum TleError {
    #[error("TLE file not found: {0}")]
    FileNotFound(String),
    #[error("TLE file error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("satellite '{name}' not found in {origin}")]
    SatelliteNotFound { name: String, origin: String },
    #[error("TLE download failed: {0}")]
    Download(#[from] reqwest::Error),
}
