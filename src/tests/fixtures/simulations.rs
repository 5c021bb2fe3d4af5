use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::modules::lakes::adapters::outbound::in_memory::InMemoryLakeCatalog;
use crate::modules::lakes::core::bitset::{BIT_ORDER, CELL_ORDER, CellMask, ENCODING, STORAGE_LEVEL};
use crate::modules::simulations::adapters::outbound::in_memory::InMemorySimulations;
use crate::modules::simulations::core::simulation::{Simulation, SimulationStatus, Subdivision};
use crate::modules::simulations::service::SimulationsService;
use crate::shared::infrastructure::object_store::in_memory::InMemoryObjectStore;
use crate::tests::fixtures::lakes::make_lakes_service;

pub struct SimulationsFixture {
    pub service: SimulationsService,
    pub repository: Arc<InMemorySimulations>,
    pub catalog: Arc<InMemoryLakeCatalog>,
    pub store: Arc<InMemoryObjectStore>,
}

pub fn make_simulations_service() -> SimulationsFixture {
    let (lakes, catalog, store) = make_lakes_service();
    let repository = Arc::new(InMemorySimulations::new());
    let service = SimulationsService::new(repository.clone(), repository.clone(), Arc::new(lakes));
    SimulationsFixture {
        service,
        repository,
        catalog,
        store,
    }
}

/// An empty draft that is not tied to a seeded lake.
pub fn make_simulation(user_id: Uuid, rows: u32, cols: u32) -> Simulation {
    let now = Utc::now();
    Simulation {
        id: Uuid::now_v7(),
        user_id,
        lake_id: Uuid::now_v7(),
        dataset_version_id: Uuid::now_v7(),
        name: "Fixture simulation".into(),
        status: SimulationStatus::Draft,
        rows,
        cols,
        encoding: ENCODING.into(),
        bit_order: BIT_ORDER.into(),
        cell_order: CELL_ORDER.into(),
        occupied_bitset_base64: None,
        subdivision_count: 0,
        total_selected_cells: 0,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_subdivision(simulation_id: Uuid, selection: &CellMask) -> Subdivision {
    Subdivision {
        id: Uuid::now_v7(),
        simulation_id,
        geometry: json!({"type": "Polygon", "coordinates": []}),
        geometry_crs: "EPSG:3857".into(),
        all_touched: false,
        selection_bitset_base64: selection.encode(STORAGE_LEVEL).unwrap(),
        selected_cells: selection.count() as u64,
        inhabitants: 0,
        impact_factor: 0.0,
        created_at: Utc::now(),
    }
}
