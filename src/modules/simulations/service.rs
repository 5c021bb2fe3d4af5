use std::sync::Arc;

use uuid::Uuid;

use crate::modules::lakes::service::LakesService;
use crate::modules::simulations::core::ports::{SimulationRepository, SimulationRunRepository};
use crate::modules::simulations::core::simulation::{Simulation, ensure_owner};
use crate::modules::simulations::errors::SimulationsError;

/// Simulation editing and runs. Each use case adds its own `impl` block.
pub struct SimulationsService {
    pub(crate) simulations: Arc<dyn SimulationRepository>,
    pub(crate) runs: Arc<dyn SimulationRunRepository>,
    pub(crate) lakes: Arc<LakesService>,
}

impl SimulationsService {
    pub fn new(
        simulations: Arc<dyn SimulationRepository>,
        runs: Arc<dyn SimulationRunRepository>,
        lakes: Arc<LakesService>,
    ) -> Self {
        Self {
            simulations,
            runs,
            lakes,
        }
    }

    /// Loads a simulation the caller owns.
    pub(crate) async fn owned(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
    ) -> Result<Simulation, SimulationsError> {
        let simulation = self
            .simulations
            .get(simulation_id)
            .await?
            .ok_or(SimulationsError::SimulationNotFound(simulation_id))?;
        ensure_owner(&simulation, user_id)?;
        Ok(simulation)
    }
}
