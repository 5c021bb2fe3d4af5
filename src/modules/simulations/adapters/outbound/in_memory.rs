use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::simulations::core::ports::{
    SimulationRepository, SimulationRunRepository, SubdivisionChange,
};
use crate::modules::simulations::core::simulation::{Simulation, SimulationRun, Subdivision};
use crate::shared::infrastructure::repository::{RepositoryError, offline};

#[derive(Default)]
struct Tables {
    simulations: HashMap<Uuid, Simulation>,
    subdivisions: Vec<Subdivision>,
    runs: HashMap<Uuid, SimulationRun>,
}

/// Simulations, subdivisions and runs kept in process memory. One lock
/// covers all tables so `save` is atomic.
#[derive(Default)]
pub struct InMemorySimulations {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl InMemorySimulations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(offline());
        }
        Ok(())
    }
}

#[async_trait]
impl SimulationRepository for InMemorySimulations {
    async fn insert(&self, simulation: Simulation) -> Result<(), RepositoryError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        if tables.simulations.contains_key(&simulation.id) {
            return Err(RepositoryError::Duplicate(simulation.id.to_string()));
        }
        tables.simulations.insert(simulation.id, simulation);
        Ok(())
    }

    async fn get(&self, simulation_id: Uuid) -> Result<Option<Simulation>, RepositoryError> {
        self.check_online()?;
        Ok(self.tables.read().await.simulations.get(&simulation_id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        lake_id: Option<Uuid>,
    ) -> Result<Vec<Simulation>, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut simulations: Vec<Simulation> = tables
            .simulations
            .values()
            .filter(|s| s.user_id == user_id && lake_id.is_none_or(|id| s.lake_id == id))
            .cloned()
            .collect();
        simulations.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(simulations)
    }

    async fn subdivisions(&self, simulation_id: Uuid) -> Result<Vec<Subdivision>, RepositoryError> {
        self.check_online()?;
        Ok(self
            .tables
            .read()
            .await
            .subdivisions
            .iter()
            .filter(|s| s.simulation_id == simulation_id)
            .cloned()
            .collect())
    }

    async fn save(
        &self,
        simulation: &Simulation,
        expected_version: i64,
        change: SubdivisionChange,
    ) -> Result<(), RepositoryError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let actual = tables
            .simulations
            .get(&simulation.id)
            .map(|s| s.version)
            .ok_or_else(|| RepositoryError::Backend(format!("simulation {} missing", simulation.id)))?;
        if actual != expected_version {
            return Err(RepositoryError::VersionMismatch {
                expected: expected_version,
                actual,
            });
        }

        match change {
            SubdivisionChange::Unchanged => {}
            SubdivisionChange::Added(subdivision) => tables.subdivisions.push(subdivision),
            SubdivisionChange::Removed(id) => tables.subdivisions.retain(|s| s.id != id),
        }
        tables.simulations.insert(simulation.id, simulation.clone());
        Ok(())
    }
}

#[async_trait]
impl SimulationRunRepository for InMemorySimulations {
    async fn insert_run(&self, run: SimulationRun) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.tables.write().await.runs.insert(run.id, run);
        Ok(())
    }

    async fn get_run(&self, run_id: Uuid) -> Result<Option<SimulationRun>, RepositoryError> {
        self.check_online()?;
        Ok(self.tables.read().await.runs.get(&run_id).cloned())
    }
}
