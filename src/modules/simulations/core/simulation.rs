// Simulations: disjoint subdivisions drawn over one lake dataset version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::modules::lakes::core::bitset::{
    BitsetError, CellMask, STORAGE_LEVEL, decode_packed, encode_packed, packed_len, packed_or,
};
use crate::modules::lakes::core::selection::{DEFAULT_GEOMETRY_CRS, SelectionInput};
use crate::modules::simulations::errors::SimulationsError;

pub const MAX_SUBDIVISIONS: u32 = 100;
pub const MAX_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SimulationStatus {
    Draft,
    Finalized,
}

impl SimulationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationStatus::Draft => "DRAFT",
            SimulationStatus::Finalized => "FINALIZED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "DRAFT" => Some(SimulationStatus::Draft),
            "FINALIZED" => Some(SimulationStatus::Finalized),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub name: String,
    pub status: SimulationStatus,
    pub rows: u32,
    pub cols: u32,
    pub encoding: String,
    pub bit_order: String,
    pub cell_order: String,
    /// OR of every subdivision bitset, `None` while there are none.
    pub occupied_bitset_base64: Option<String>,
    pub subdivision_count: u32,
    pub total_selected_cells: u64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subdivision {
    pub id: Uuid,
    pub simulation_id: Uuid,
    pub geometry: Value,
    pub geometry_crs: String,
    pub all_touched: bool,
    pub selection_bitset_base64: String,
    pub selected_cells: u64,
    pub inhabitants: i64,
    pub impact_factor: f64,
    pub created_at: DateTime<Utc>,
}

fn default_geometry_crs() -> String {
    DEFAULT_GEOMETRY_CRS.to_string()
}

/// A drawn subdivision plus the attributes the runs aggregate.
#[derive(Debug, Clone, Deserialize)]
pub struct SubdivisionInput {
    pub dataset_version_id: Option<Uuid>,
    pub geometry: Value,
    #[serde(default = "default_geometry_crs")]
    pub geometry_crs: String,
    #[serde(default)]
    pub all_touched: bool,
    #[serde(default)]
    pub inhabitants: i64,
    #[serde(default)]
    pub impact_factor: f64,
}

impl SubdivisionInput {
    /// Selection against the simulation's own dataset version.
    pub fn selection(&self, dataset_version_id: Uuid) -> SelectionInput {
        SelectionInput {
            dataset_version_id: Some(dataset_version_id),
            geometry: self.geometry.clone(),
            geometry_crs: self.geometry_crs.clone(),
            all_touched: self.all_touched,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Completed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "COMPLETED" => Some(RunStatus::Completed),
            _ => None,
        }
    }
}

/// Frozen aggregates of a simulation at the time it was run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    pub id: Uuid,
    pub simulation_id: Uuid,
    pub user_id: Uuid,
    pub status: RunStatus,
    pub subdivision_count: u32,
    pub total_selected_cells: u64,
    pub total_inhabitants: i64,
    pub weighted_impact: f64,
    pub created_at: DateTime<Utc>,
}

pub fn decide_name(raw: &str) -> Result<String, SimulationsError> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
        return Err(SimulationsError::InvalidName);
    }
    Ok(name.to_string())
}

pub fn ensure_owner(simulation: &Simulation, user_id: Uuid) -> Result<(), SimulationsError> {
    if simulation.user_id != user_id {
        return Err(SimulationsError::Forbidden);
    }
    Ok(())
}

/// A requested dataset must match the simulation's, which never changes.
pub fn ensure_dataset(
    simulation: &Simulation,
    requested: Option<Uuid>,
) -> Result<(), SimulationsError> {
    match requested {
        Some(id) if id != simulation.dataset_version_id => {
            Err(SimulationsError::DatasetVersionImmutable)
        }
        _ => Ok(()),
    }
}

pub fn decide_add(simulation: &Simulation, requested: Option<Uuid>) -> Result<(), SimulationsError> {
    if simulation.status == SimulationStatus::Finalized {
        return Err(SimulationsError::SimulationFinalized);
    }
    if simulation.subdivision_count >= MAX_SUBDIVISIONS {
        return Err(SimulationsError::MaxSubdivisionsExceeded);
    }
    ensure_dataset(simulation, requested)
}

pub fn validate_attributes(inhabitants: i64, impact_factor: f64) -> Result<(), SimulationsError> {
    if inhabitants < 0 {
        return Err(SimulationsError::InvalidAttributes(
            "inhabitants must be zero or positive".into(),
        ));
    }
    if !(0.0..=1.0).contains(&impact_factor) {
        return Err(SimulationsError::InvalidAttributes(
            "impact_factor must be between 0 and 1".into(),
        ));
    }
    Ok(())
}

impl Simulation {
    pub fn occupied(&self) -> Result<CellMask, BitsetError> {
        match &self.occupied_bitset_base64 {
            Some(encoded) => CellMask::decode(self.rows, self.cols, encoded),
            None => Ok(CellMask::empty(self.rows, self.cols)),
        }
    }

    /// Next state after a new subdivision. The caller has already checked
    /// that it does not overlap the occupied cells.
    pub fn with_subdivision(
        &self,
        selection: &CellMask,
        now: DateTime<Utc>,
    ) -> Result<Simulation, BitsetError> {
        let occupied = match &self.occupied_bitset_base64 {
            Some(encoded) => packed_or(&decode_packed(encoded)?, &selection.to_packed())?,
            None => selection.to_packed(),
        };
        Ok(Simulation {
            occupied_bitset_base64: Some(encode_packed(&occupied, STORAGE_LEVEL)?),
            subdivision_count: self.subdivision_count + 1,
            total_selected_cells: self.total_selected_cells + selection.count() as u64,
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        })
    }

    /// Rebuilds the union and counters from the subdivisions left after a
    /// removal. A finalized simulation goes back to draft.
    pub fn recomputed(
        &self,
        remaining: &[Subdivision],
        now: DateTime<Utc>,
    ) -> Result<Simulation, BitsetError> {
        let mut union: Option<Vec<u8>> = None;
        for subdivision in remaining {
            let bytes = decode_packed(&subdivision.selection_bitset_base64)?;
            if bytes.len() != packed_len(self.rows, self.cols) {
                return Err(BitsetError::LengthMismatch {
                    expected: packed_len(self.rows, self.cols),
                    actual: bytes.len(),
                });
            }
            union = Some(match union {
                Some(acc) => packed_or(&acc, &bytes)?,
                None => bytes,
            });
        }
        let occupied_bitset_base64 = match union {
            Some(bytes) => Some(encode_packed(&bytes, STORAGE_LEVEL)?),
            None => None,
        };
        Ok(Simulation {
            status: SimulationStatus::Draft,
            occupied_bitset_base64,
            subdivision_count: remaining.len() as u32,
            total_selected_cells: remaining.iter().map(|s| s.selected_cells).sum(),
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        })
    }

    pub fn with_status(&self, status: SimulationStatus, now: DateTime<Utc>) -> Simulation {
        Simulation {
            status,
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn run(
        &self,
        subdivisions: &[Subdivision],
        now: DateTime<Utc>,
    ) -> Result<SimulationRun, SimulationsError> {
        let total_inhabitants = subdivisions
            .iter()
            .try_fold(0i64, |total, s| total.checked_add(s.inhabitants))
            .ok_or_else(|| {
                SimulationsError::InvalidAttributes("total inhabitants is out of range".into())
            })?;
        Ok(SimulationRun {
            id: Uuid::now_v7(),
            simulation_id: self.id,
            user_id: self.user_id,
            status: RunStatus::Completed,
            subdivision_count: self.subdivision_count,
            total_selected_cells: self.total_selected_cells,
            total_inhabitants,
            weighted_impact: subdivisions
                .iter()
                .map(|s| s.inhabitants as f64 * s.impact_factor)
                .sum(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod simulation_tests {
    use super::*;
    use crate::tests::fixtures::simulations::{make_simulation, make_subdivision};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("  Plan A ", Ok("Plan A".to_string()))]
    #[case("", Err(()))]
    #[case("   ", Err(()))]
    fn names_should_be_trimmed_and_non_empty(
        #[case] raw: &str,
        #[case] expected: Result<String, ()>,
    ) {
        assert_eq!(decide_name(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    fn names_should_be_at_most_255_characters() {
        assert!(decide_name(&"a".repeat(255)).is_ok());
        assert!(matches!(
            decide_name(&"a".repeat(256)),
            Err(SimulationsError::InvalidName)
        ));
    }

    #[rstest]
    fn adding_should_respect_status_capacity_and_dataset() {
        let mut simulation = make_simulation(Uuid::now_v7(), 3, 3);
        assert!(decide_add(&simulation, None).is_ok());
        assert!(decide_add(&simulation, Some(simulation.dataset_version_id)).is_ok());
        assert!(matches!(
            decide_add(&simulation, Some(Uuid::now_v7())),
            Err(SimulationsError::DatasetVersionImmutable)
        ));

        simulation.subdivision_count = MAX_SUBDIVISIONS;
        assert!(matches!(
            decide_add(&simulation, None),
            Err(SimulationsError::MaxSubdivisionsExceeded)
        ));

        simulation.status = SimulationStatus::Finalized;
        assert!(matches!(
            decide_add(&simulation, None),
            Err(SimulationsError::SimulationFinalized)
        ));
    }

    #[rstest]
    #[case(0, 0.0, true)]
    #[case(10, 1.0, true)]
    #[case(-1, 0.5, false)]
    #[case(5, 1.5, false)]
    #[case(5, f64::NAN, false)]
    fn attributes_should_be_bounded(#[case] inhabitants: i64, #[case] factor: f64, #[case] ok: bool) {
        assert_eq!(validate_attributes(inhabitants, factor).is_ok(), ok);
    }

    #[rstest]
    fn with_subdivision_should_union_and_count() {
        let simulation = make_simulation(Uuid::now_v7(), 2, 2);
        let first = CellMask::from_fn(2, 2, |r, _| r == 0);
        let second = CellMask::from_fn(2, 2, |r, c| r == 1 && c == 1);

        let once = simulation.with_subdivision(&first, Utc::now()).unwrap();
        let twice = once.with_subdivision(&second, Utc::now()).unwrap();

        assert_eq!(twice.subdivision_count, 2);
        assert_eq!(twice.total_selected_cells, 3);
        assert_eq!(twice.version, simulation.version + 2);
        let occupied = twice.occupied().unwrap();
        assert_eq!(occupied.count(), 3);
        assert!(!occupied.get(1, 0));
    }

    #[rstest]
    fn recomputed_should_rebuild_from_the_remaining_subdivisions() {
        let mut simulation = make_simulation(Uuid::now_v7(), 2, 2);
        simulation.status = SimulationStatus::Finalized;
        let kept = make_subdivision(simulation.id, &CellMask::from_fn(2, 2, |r, c| r == 0 && c == 0));

        let next = simulation.recomputed(&[kept], Utc::now()).unwrap();
        assert_eq!(next.status, SimulationStatus::Draft);
        assert_eq!(next.subdivision_count, 1);
        assert_eq!(next.total_selected_cells, 1);
        assert_eq!(next.occupied().unwrap().count(), 1);

        let cleared = next.recomputed(&[], Utc::now()).unwrap();
        assert_eq!(cleared.occupied_bitset_base64, None);
        assert_eq!(cleared.total_selected_cells, 0);
    }

    #[rstest]
    fn runs_should_weight_inhabitants_by_impact() {
        let simulation = make_simulation(Uuid::now_v7(), 2, 2);
        let mut a = make_subdivision(simulation.id, &CellMask::from_fn(2, 2, |r, _| r == 0));
        a.inhabitants = 100;
        a.impact_factor = 0.5;
        let mut b = make_subdivision(simulation.id, &CellMask::from_fn(2, 2, |r, _| r == 1));
        b.inhabitants = 10;
        b.impact_factor = 1.0;

        let run = simulation.run(&[a, b], Utc::now()).unwrap();
        assert_eq!(run.total_inhabitants, 110);
        assert!((run.weighted_impact - 60.0).abs() < 1e-9);
        assert_eq!(run.status, RunStatus::Completed);
    }

    #[rstest]
    fn a_run_whose_inhabitants_do_not_fit_should_be_rejected() {
        let simulation = make_simulation(Uuid::now_v7(), 2, 2);
        let mut a = make_subdivision(simulation.id, &CellMask::from_fn(2, 2, |r, _| r == 0));
        a.inhabitants = i64::MAX;
        let mut b = make_subdivision(simulation.id, &CellMask::from_fn(2, 2, |r, _| r == 1));
        b.inhabitants = 1;

        let error = simulation.run(&[a, b], Utc::now()).unwrap_err();
        assert_eq!(error.code(), "INVALID_ATTRIBUTES");
    }

    #[rstest]
    fn statuses_should_use_uppercase_names() {
        assert_eq!(serde_json::to_value(SimulationStatus::Draft).unwrap(), json!("DRAFT"));
        assert_eq!(SimulationStatus::parse("FINALIZED"), Some(SimulationStatus::Finalized));
        assert_eq!(SimulationStatus::parse("draft"), None);
    }

    #[rstest]
    fn subdivision_input_should_default_to_wgs84_and_no_attributes() {
        let input: SubdivisionInput = serde_json::from_value(json!({
            "geometry": {"type": "Point", "coordinates": [0, 0]}
        }))
        .unwrap();
        assert_eq!(input.geometry_crs, "EPSG:4326");
        assert!(!input.all_touched);
        assert_eq!(input.inhabitants, 0);
        assert_eq!(input.impact_factor, 0.0);

        let dataset_version_id = Uuid::now_v7();
        let selection = input.selection(dataset_version_id);
        assert_eq!(selection.dataset_version_id, Some(dataset_version_id));
    }
}
