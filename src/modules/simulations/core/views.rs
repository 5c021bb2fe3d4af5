use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::modules::lakes::core::views::{BlockedBreakdown, GeometryIssue};
use crate::modules::simulations::core::simulation::{Simulation, SimulationStatus, Subdivision};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationSummary {
    pub id: Uuid,
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub name: String,
    pub status: SimulationStatus,
    pub rows: u32,
    pub cols: u32,
    pub encoding: String,
    pub bit_order: String,
    pub cell_order: String,
    pub occupied_bitset_base64: Option<String>,
    pub subdivision_count: u32,
    pub total_selected_cells: u64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Simulation> for SimulationSummary {
    fn from(s: Simulation) -> Self {
        Self {
            id: s.id,
            lake_id: s.lake_id,
            dataset_version_id: s.dataset_version_id,
            name: s.name,
            status: s.status,
            rows: s.rows,
            cols: s.cols,
            encoding: s.encoding,
            bit_order: s.bit_order,
            cell_order: s.cell_order,
            occupied_bitset_base64: s.occupied_bitset_base64,
            subdivision_count: s.subdivision_count,
            total_selected_cells: s.total_selected_cells,
            version: s.version,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationDetail {
    #[serde(flatten)]
    pub summary: SimulationSummary,
    pub subdivisions: Vec<Subdivision>,
}

/// Outcome of checking a subdivision before it is stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubdivisionValidation {
    pub ok: bool,
    pub simulation_id: Uuid,
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub rows: u32,
    pub cols: u32,
    pub selected_cells: usize,
    pub blocked_cells: usize,
    pub blocked_breakdown: BlockedBreakdown,
    pub overlap_cells: usize,
    pub selection_bitset_base64: Option<String>,
    pub errors: Vec<GeometryIssue>,
}

impl SubdivisionValidation {
    /// Envelope code for a rejected subdivision.
    pub fn rejection_code(&self) -> &str {
        match self.errors.first().map(|e| e.code.as_str()) {
            Some("INTERSECTS_WATER" | "INTERSECTS_INHABITANTS") => "INVALID_SELECTION",
            Some(code) => code,
            None => "INVALID_SELECTION",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubdivisionAdded {
    pub subdivision: Subdivision,
    pub simulation: SimulationSummary,
}
