use chrono::Utc;
use uuid::Uuid;

use crate::modules::simulations::core::ports::SubdivisionChange;
use crate::modules::simulations::core::simulation::{Simulation, SimulationStatus};
use crate::modules::simulations::errors::SimulationsError;
use crate::modules::simulations::service::SimulationsService;

impl SimulationsService {
    pub async fn finalize(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Simulation, SimulationsError> {
        self.set_status(simulation_id, user_id, SimulationStatus::Finalized)
            .await
    }

    pub async fn unfinalize(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Simulation, SimulationsError> {
        self.set_status(simulation_id, user_id, SimulationStatus::Draft)
            .await
    }

    /// Setting the status a simulation already has is a no-op and keeps
    /// its version.
    async fn set_status(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
        status: SimulationStatus,
    ) -> Result<Simulation, SimulationsError> {
        let simulation = self.owned(simulation_id, user_id).await?;
        if simulation.status == status {
            return Ok(simulation);
        }

        let next = simulation.with_status(status, Utc::now());
        self.simulations
            .save(&next, simulation.version, SubdivisionChange::Unchanged)
            .await?;
        tracing::info!(%simulation_id, status = status.as_str(), "simulation status changed");
        Ok(next)
    }
}
