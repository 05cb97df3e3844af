use thiserror::Error;

/// Failures of the plane, city and cargo operations
#[derive(Debug, Error)]
pub enum LogisticsError {
    #[error("Plane {0} does not exist")]
    PlaneNotFound(String),
    #[error("City {0} does not exist")]
    CityNotFound(String),
    #[error("Cargo {0} does not exist")]
    CargoNotFound(String),
    #[error("Location {0} does not exist")]
    LocationNotFound(String),
    #[error("Invalid location value passed: {0}")]
    InvalidLocation(String),
    #[error("Invalid heading value passed: {0}")]
    InvalidHeading(String),
    #[error("limit needs to be an integer: {0}")]
    InvalidLimit(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl LogisticsError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LogisticsError::PlaneNotFound(_)
                | LogisticsError::CityNotFound(_)
                | LogisticsError::CargoNotFound(_)
                | LogisticsError::LocationNotFound(_)
        )
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            LogisticsError::InvalidLocation(_)
                | LogisticsError::InvalidHeading(_)
                | LogisticsError::InvalidLimit(_)
        )
    }
}

pub type LogisticsResult<T> = Result<T, LogisticsError>;
