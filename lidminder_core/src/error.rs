use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing accelerometer")]
    MissingAccelerometer,
    #[error("missing indicator")]
    MissingIndicator,
    #[error("missing sounder")]
    MissingSounder,
    #[error("missing button pad")]
    MissingButtons,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
