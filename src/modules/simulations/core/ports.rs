use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::simulations::core::simulation::{Simulation, SimulationRun, Subdivision};
use crate::shared::infrastructure::repository::RepositoryError;

/// Subdivision write that travels with a simulation update.
#[derive(Debug, Clone, PartialEq)]
pub enum SubdivisionChange {
    Unchanged,
    Added(Subdivision),
    Removed(Uuid),
}

#[async_trait]
pub trait SimulationRepository: Send + Sync {
    async fn insert(&self, simulation: Simulation) -> Result<(), RepositoryError>;
    async fn get(&self, simulation_id: Uuid) -> Result<Option<Simulation>, RepositoryError>;
    /// Newest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        lake_id: Option<Uuid>,
    ) -> Result<Vec<Simulation>, RepositoryError>;
    /// Oldest first.
    async fn subdivisions(&self, simulation_id: Uuid) -> Result<Vec<Subdivision>, RepositoryError>;

    /// Stores `simulation` and applies `change` atomically, but only while the
    /// stored version still equals `expected_version`. Otherwise fails with
    /// `RepositoryError::VersionMismatch`.
    async fn save(
        &self,
        simulation: &Simulation,
        expected_version: i64,
        change: SubdivisionChange,
    ) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait SimulationRunRepository: Send + Sync {
    async fn insert_run(&self, run: SimulationRun) -> Result<(), RepositoryError>;
    async fn get_run(&self, run_id: Uuid) -> Result<Option<SimulationRun>, RepositoryError>;
}
