use thiserror::Error;
use uuid::Uuid;

use crate::modules::lakes::core::bitset::BitsetError;
use crate::modules::lakes::errors::LakesError;
use crate::shared::core::errors::AppError;
use crate::shared::infrastructure::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum SimulationsError {
    #[error("Simulation not found.")]
    SimulationNotFound(Uuid),

    #[error("Subdivision not found.")]
    SubdivisionNotFound(Uuid),

    #[error("Simulation run not found.")]
    RunNotFound(Uuid),

    #[error("This simulation belongs to another user.")]
    Forbidden,

    #[error("Name must be between 1 and 255 characters.")]
    InvalidName,

    #[error("Simulation is finalized.")]
    SimulationFinalized,

    #[error("A simulation holds at most 100 subdivisions.")]
    MaxSubdivisionsExceeded,

    #[error("The simulation dataset version cannot change.")]
    DatasetVersionImmutable,

    #[error("Invalid subdivision attributes: {0}")]
    InvalidAttributes(String),

    #[error("Simulation was modified concurrently, reload and retry.")]
    ConcurrentModification,

    #[error(transparent)]
    Lakes(#[from] LakesError),

    #[error(transparent)]
    Bitset(#[from] BitsetError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SimulationsError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::VersionMismatch { .. } => SimulationsError::ConcurrentModification,
            other => SimulationsError::Repository(other),
        }
    }
}

impl SimulationsError {
    pub fn code(&self) -> &'static str {
        match self {
            SimulationsError::SimulationNotFound(_) => "SIMULATION_NOT_FOUND",
            SimulationsError::SubdivisionNotFound(_) => "SUBDIVISION_NOT_FOUND",
            SimulationsError::RunNotFound(_) => "RUN_NOT_FOUND",
            SimulationsError::Forbidden => "FORBIDDEN",
            SimulationsError::InvalidName => "INVALID_NAME",
            SimulationsError::SimulationFinalized => "SIMULATION_FINALIZED",
            SimulationsError::MaxSubdivisionsExceeded => "MAX_SUBDIVISIONS_EXCEEDED",
            SimulationsError::DatasetVersionImmutable => "DATASET_VERSION_IMMUTABLE",
            SimulationsError::InvalidAttributes(_) => "INVALID_ATTRIBUTES",
            SimulationsError::ConcurrentModification => "CONCURRENT_MODIFICATION",
            SimulationsError::Lakes(e) => e.code(),
            SimulationsError::Bitset(_) => "BITSET_ERROR",
            SimulationsError::Repository(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<SimulationsError> for AppError {
    fn from(error: SimulationsError) -> Self {
        let code = error.code();
        match error {
            SimulationsError::Lakes(e) => AppError::from(e),
            SimulationsError::SimulationNotFound(_)
            | SimulationsError::SubdivisionNotFound(_)
            | SimulationsError::RunNotFound(_) => AppError::not_found(code, error.to_string()),
            SimulationsError::Forbidden => AppError::forbidden(code, error.to_string()),
            SimulationsError::InvalidName => AppError::unprocessable(code, error.to_string()),
            SimulationsError::SimulationFinalized
            | SimulationsError::MaxSubdivisionsExceeded
            | SimulationsError::ConcurrentModification => AppError::conflict(code, error.to_string()),
            SimulationsError::DatasetVersionImmutable | SimulationsError::InvalidAttributes(_) => {
                AppError::bad_request(code, error.to_string())
            }
            SimulationsError::Bitset(_) | SimulationsError::Repository(_) => {
                AppError::internal(code, error.to_string())
            }
        }
    }
}
