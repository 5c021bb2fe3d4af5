use chrono::Utc;
use uuid::Uuid;

use crate::modules::lakes::core::bitset::{BIT_ORDER, CELL_ORDER, ENCODING};
use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::simulations::core::simulation::{Simulation, SimulationStatus, decide_name};
use crate::modules::simulations::errors::SimulationsError;
use crate::modules::simulations::service::SimulationsService;

impl SimulationsService {
    /// Starts an empty DRAFT simulation bound to one dataset version of a lake.
    pub async fn create_simulation(
        &self,
        user_id: Uuid,
        lake_id: Uuid,
        name: &str,
        dataset_version_id: Option<Uuid>,
    ) -> Result<Simulation, SimulationsError> {
        let name = decide_name(name)?;
        let lake = self.lakes.lake(lake_id).await?;
        let grid = GridSpec::from_lake(&lake)?;
        let dataset = self
            .lakes
            .resolve_dataset_version(lake_id, dataset_version_id)
            .await?;

        let now = Utc::now();
        let simulation = Simulation {
            id: Uuid::now_v7(),
            user_id,
            lake_id,
            dataset_version_id: dataset.id,
            name,
            status: SimulationStatus::Draft,
            rows: grid.rows,
            cols: grid.cols,
            encoding: ENCODING.into(),
            bit_order: BIT_ORDER.into(),
            cell_order: CELL_ORDER.into(),
            occupied_bitset_base64: None,
            subdivision_count: 0,
            total_selected_cells: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.simulations.insert(simulation.clone()).await?;
        tracing::info!(simulation_id = %simulation.id, %lake_id, %user_id, "simulation created");
        Ok(simulation)
    }
}
