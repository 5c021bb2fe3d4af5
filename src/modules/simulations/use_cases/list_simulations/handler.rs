use uuid::Uuid;

use crate::modules::simulations::core::simulation::Simulation;
use crate::modules::simulations::errors::SimulationsError;
use crate::modules::simulations::service::SimulationsService;

impl SimulationsService {
    /// The caller's simulations, newest first, optionally for one lake.
    pub async fn list_simulations(
        &self,
        user_id: Uuid,
        lake_id: Option<Uuid>,
    ) -> Result<Vec<Simulation>, SimulationsError> {
        Ok(self.simulations.list_for_user(user_id, lake_id).await?)
    }
}
