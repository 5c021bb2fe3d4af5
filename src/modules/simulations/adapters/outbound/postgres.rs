use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::modules::simulations::core::ports::{
    SimulationRepository, SimulationRunRepository, SubdivisionChange,
};
use crate::modules::simulations::core::simulation::{
    RunStatus, Simulation, SimulationRun, SimulationStatus, Subdivision,
};
use crate::shared::infrastructure::repository::RepositoryError;

const SIMULATION_COLUMNS: &str = "id, user_id, lake_id, dataset_version_id, name, status, rows, \
                                  cols, encoding, bit_order, cell_order, occupied_bitset_base64, \
                                  subdivision_count, total_selected_cells, version, created_at, \
                                  updated_at";
const SUBDIVISION_COLUMNS: &str = "id, simulation_id, geometry, geometry_crs, all_touched, \
                                   selection_bitset_base64, selected_cells, inhabitants, \
                                   impact_factor, created_at";
const RUN_COLUMNS: &str = "id, simulation_id, user_id, status, subdivision_count, \
                           total_selected_cells, total_inhabitants, weighted_impact, created_at";

fn corrupt(what: &str) -> RepositoryError {
    RepositoryError::Backend(format!("corrupt row: {what}"))
}

#[derive(FromRow)]
struct SimulationRow {
    id: Uuid,
    user_id: Uuid,
    lake_id: Uuid,
    dataset_version_id: Uuid,
    name: String,
    status: String,
    rows: i32,
    cols: i32,
    encoding: String,
    bit_order: String,
    cell_order: String,
    occupied_bitset_base64: Option<String>,
    subdivision_count: i32,
    total_selected_cells: i64,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SimulationRow> for Simulation {
    type Error = RepositoryError;

    fn try_from(row: SimulationRow) -> Result<Self, RepositoryError> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            lake_id: row.lake_id,
            dataset_version_id: row.dataset_version_id,
            name: row.name,
            status: SimulationStatus::parse(&row.status).ok_or_else(|| corrupt("status"))?,
            rows: u32::try_from(row.rows).map_err(|_| corrupt("rows"))?,
            cols: u32::try_from(row.cols).map_err(|_| corrupt("cols"))?,
            encoding: row.encoding,
            bit_order: row.bit_order,
            cell_order: row.cell_order,
            occupied_bitset_base64: row.occupied_bitset_base64,
            subdivision_count: u32::try_from(row.subdivision_count)
                .map_err(|_| corrupt("subdivision_count"))?,
            total_selected_cells: u64::try_from(row.total_selected_cells)
                .map_err(|_| corrupt("total_selected_cells"))?,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct SubdivisionRow {
    id: Uuid,
    simulation_id: Uuid,
    geometry: Value,
    geometry_crs: String,
    all_touched: bool,
    selection_bitset_base64: String,
    selected_cells: i64,
    inhabitants: i64,
    impact_factor: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubdivisionRow> for Subdivision {
    type Error = RepositoryError;

    fn try_from(row: SubdivisionRow) -> Result<Self, RepositoryError> {
        Ok(Self {
            id: row.id,
            simulation_id: row.simulation_id,
            geometry: row.geometry,
            geometry_crs: row.geometry_crs,
            all_touched: row.all_touched,
            selection_bitset_base64: row.selection_bitset_base64,
            selected_cells: u64::try_from(row.selected_cells)
                .map_err(|_| corrupt("selected_cells"))?,
            inhabitants: row.inhabitants,
            impact_factor: row.impact_factor,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct RunRow {
    id: Uuid,
    simulation_id: Uuid,
    user_id: Uuid,
    status: String,
    subdivision_count: i32,
    total_selected_cells: i64,
    total_inhabitants: i64,
    weighted_impact: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<RunRow> for SimulationRun {
    type Error = RepositoryError;

    fn try_from(row: RunRow) -> Result<Self, RepositoryError> {
        Ok(Self {
            id: row.id,
            simulation_id: row.simulation_id,
            user_id: row.user_id,
            status: RunStatus::parse(&row.status).ok_or_else(|| corrupt("run status"))?,
            subdivision_count: u32::try_from(row.subdivision_count)
                .map_err(|_| corrupt("subdivision_count"))?,
            total_selected_cells: u64::try_from(row.total_selected_cells)
                .map_err(|_| corrupt("total_selected_cells"))?,
            total_inhabitants: row.total_inhabitants,
            weighted_impact: row.weighted_impact,
            created_at: row.created_at,
        })
    }
}

pub struct PostgresSimulations {
    pool: PgPool,
}

impl PostgresSimulations {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SimulationRepository for PostgresSimulations {
    async fn insert(&self, simulation: Simulation) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT INTO simulations ({SIMULATION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"
        ))
        .bind(simulation.id)
        .bind(simulation.user_id)
        .bind(simulation.lake_id)
        .bind(simulation.dataset_version_id)
        .bind(&simulation.name)
        .bind(simulation.status.as_str())
        .bind(simulation.rows as i32)
        .bind(simulation.cols as i32)
        .bind(&simulation.encoding)
        .bind(&simulation.bit_order)
        .bind(&simulation.cell_order)
        .bind(&simulation.occupied_bitset_base64)
        .bind(simulation.subdivision_count as i32)
        .bind(simulation.total_selected_cells as i64)
        .bind(simulation.version)
        .bind(simulation.created_at)
        .bind(simulation.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, simulation_id: Uuid) -> Result<Option<Simulation>, RepositoryError> {
        let row = sqlx::query_as::<_, SimulationRow>(&format!(
            "SELECT {SIMULATION_COLUMNS} FROM simulations WHERE id = $1"
        ))
        .bind(simulation_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Simulation::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        lake_id: Option<Uuid>,
    ) -> Result<Vec<Simulation>, RepositoryError> {
        let rows = sqlx::query_as::<_, SimulationRow>(&format!(
            "SELECT {SIMULATION_COLUMNS} FROM simulations \
             WHERE user_id = $1 AND ($2::uuid IS NULL OR lake_id = $2) \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .bind(lake_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Simulation::try_from).collect()
    }

    async fn subdivisions(&self, simulation_id: Uuid) -> Result<Vec<Subdivision>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubdivisionRow>(&format!(
            "SELECT {SUBDIVISION_COLUMNS} FROM subdivisions \
             WHERE simulation_id = $1 ORDER BY created_at ASC, id ASC"
        ))
        .bind(simulation_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Subdivision::try_from).collect()
    }

    async fn save(
        &self,
        simulation: &Simulation,
        expected_version: i64,
        change: SubdivisionChange,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE simulations SET status = $3, occupied_bitset_base64 = $4, \
             subdivision_count = $5, total_selected_cells = $6, version = $7, updated_at = $8 \
             WHERE id = $1 AND version = $2",
        )
        .bind(simulation.id)
        .bind(expected_version)
        .bind(simulation.status.as_str())
        .bind(&simulation.occupied_bitset_base64)
        .bind(simulation.subdivision_count as i32)
        .bind(simulation.total_selected_cells as i64)
        .bind(simulation.version)
        .bind(simulation.updated_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let actual: Option<i64> =
                sqlx::query_scalar("SELECT version FROM simulations WHERE id = $1")
                    .bind(simulation.id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match actual {
                Some(actual) => RepositoryError::VersionMismatch {
                    expected: expected_version,
                    actual,
                },
                None => RepositoryError::Backend(format!("simulation {} missing", simulation.id)),
            });
        }

        match change {
            SubdivisionChange::Unchanged => {}
            SubdivisionChange::Added(subdivision) => {
                sqlx::query(&format!(
                    "INSERT INTO subdivisions ({SUBDIVISION_COLUMNS}) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
                ))
                .bind(subdivision.id)
                .bind(subdivision.simulation_id)
                .bind(&subdivision.geometry)
                .bind(&subdivision.geometry_crs)
                .bind(subdivision.all_touched)
                .bind(&subdivision.selection_bitset_base64)
                .bind(subdivision.selected_cells as i64)
                .bind(subdivision.inhabitants)
                .bind(subdivision.impact_factor)
                .bind(subdivision.created_at)
                .execute(&mut *tx)
                .await?;
            }
            SubdivisionChange::Removed(id) => {
                sqlx::query("DELETE FROM subdivisions WHERE id = $1 AND simulation_id = $2")
                    .bind(id)
                    .bind(simulation.id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl SimulationRunRepository for PostgresSimulations {
    async fn insert_run(&self, run: SimulationRun) -> Result<(), RepositoryError> {
        sqlx::query(&format!(
            "INSERT INTO simulation_runs ({RUN_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        ))
        .bind(run.id)
        .bind(run.simulation_id)
        .bind(run.user_id)
        .bind(run.status.as_str())
        .bind(run.subdivision_count as i32)
        .bind(run.total_selected_cells as i64)
        .bind(run.total_inhabitants)
        .bind(run.weighted_impact)
        .bind(run.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_run(&self, run_id: Uuid) -> Result<Option<SimulationRun>, RepositoryError> {
        let row = sqlx::query_as::<_, RunRow>(&format!(
            "SELECT {RUN_COLUMNS} FROM simulation_runs WHERE id = $1"
        ))
        .bind(run_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(SimulationRun::try_from).transpose()
    }
}
