use chrono::Utc;
use uuid::Uuid;

use crate::modules::lakes::core::bitset::{CellMask, PREVIEW_LEVEL, STORAGE_LEVEL};
use crate::modules::lakes::core::views::{BlockedBreakdown, GeometryIssue};
use crate::modules::simulations::core::ports::SubdivisionChange;
use crate::modules::simulations::core::simulation::{
    Simulation, Subdivision, SubdivisionInput, decide_add, ensure_dataset, validate_attributes,
};
use crate::modules::simulations::core::views::{SubdivisionAdded, SubdivisionValidation};
use crate::modules::simulations::errors::SimulationsError;
use crate::modules::simulations::service::SimulationsService;

pub const SUBDIVISION_OVERLAP: &str = "SUBDIVISION_OVERLAP";

#[derive(Debug, Clone, PartialEq)]
pub enum SubdivisionOutcome {
    Added(SubdivisionAdded),
    Rejected(SubdivisionValidation),
}

fn overlap_cells(selection: &CellMask, occupied: &CellMask) -> usize {
    let cols = selection.cols() as usize;
    selection
        .selected_ids()
        .filter(|id| occupied.get((id / cols) as u32, (id % cols) as u32))
        .count()
}

impl SimulationsService {
    /// Runs the lake checks and the overlap check. The selection comes back
    /// only when the subdivision could be stored as drawn.
    async fn check_subdivision(
        &self,
        simulation: &Simulation,
        input: &SubdivisionInput,
    ) -> Result<(SubdivisionValidation, Option<CellMask>), SimulationsError> {
        let assessment = self
            .lakes
            .assess_selection(
                simulation.lake_id,
                &input.selection(simulation.dataset_version_id),
            )
            .await?;

        let mut errors = assessment.issues();
        let mut overlap = 0;
        let mut selection_bitset_base64 = None;
        let selection = assessment.selection.filter(|s| s.count() > 0);
        if let Some(selection) = &selection {
            overlap = overlap_cells(selection, &simulation.occupied()?);
            if overlap > 0 {
                errors.push(GeometryIssue {
                    code: SUBDIVISION_OVERLAP.into(),
                    message: format!(
                        "Selection overlaps existing subdivisions in {overlap} cell(s)."
                    ),
                });
            }
            selection_bitset_base64 = Some(selection.encode(PREVIEW_LEVEL)?);
        }

        let ok = errors.is_empty();
        let validation = SubdivisionValidation {
            ok,
            simulation_id: simulation.id,
            lake_id: simulation.lake_id,
            dataset_version_id: simulation.dataset_version_id,
            rows: simulation.rows,
            cols: simulation.cols,
            selected_cells: assessment.hits.selected_cells,
            blocked_cells: assessment.hits.blocked_cells,
            blocked_breakdown: BlockedBreakdown {
                water: assessment.hits.water_hits,
                inhabitants: assessment.hits.inhabitants_hits,
            },
            overlap_cells: overlap,
            selection_bitset_base64,
            errors,
        };
        Ok((validation, selection.filter(|_| ok)))
    }

    /// Dry run of `add_subdivision`. Nothing is stored.
    pub async fn validate_subdivision(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
        input: &SubdivisionInput,
    ) -> Result<SubdivisionValidation, SimulationsError> {
        let simulation = self.owned(simulation_id, user_id).await?;
        ensure_dataset(&simulation, input.dataset_version_id)?;
        validate_attributes(input.inhabitants, input.impact_factor)?;
        let (validation, _) = self.check_subdivision(&simulation, input).await?;
        Ok(validation)
    }

    pub async fn add_subdivision(
        &self,
        simulation_id: Uuid,
        user_id: Uuid,
        input: &SubdivisionInput,
    ) -> Result<SubdivisionOutcome, SimulationsError> {
        let simulation = self.owned(simulation_id, user_id).await?;
        decide_add(&simulation, input.dataset_version_id)?;
        validate_attributes(input.inhabitants, input.impact_factor)?;

        let (validation, selection) = self.check_subdivision(&simulation, input).await?;
        let Some(selection) = selection else {
            tracing::debug!(%simulation_id, code = validation.rejection_code(), "subdivision rejected");
            return Ok(SubdivisionOutcome::Rejected(validation));
        };

        let now = Utc::now();
        let subdivision = Subdivision {
            id: Uuid::now_v7(),
            simulation_id,
            geometry: input.geometry.clone(),
            geometry_crs: input.geometry_crs.clone(),
            all_touched: input.all_touched,
            selection_bitset_base64: selection.encode(STORAGE_LEVEL)?,
            selected_cells: selection.count() as u64,
            inhabitants: input.inhabitants,
            impact_factor: input.impact_factor,
            created_at: now,
        };
        let next = simulation.with_subdivision(&selection, now)?;
        self.simulations
            .save(
                &next,
                simulation.version,
                SubdivisionChange::Added(subdivision.clone()),
            )
            .await?;

        tracing::info!(
            %simulation_id,
            subdivision_id = %subdivision.id,
            selected_cells = subdivision.selected_cells,
            "subdivision added"
        );
        Ok(SubdivisionOutcome::Added(SubdivisionAdded {
            subdivision,
            simulation: next.into(),
        }))
    }

    pub async fn delete_subdivision(
        &self,
        simulation_id: Uuid,
        subdivision_id: Uuid,
        user_id: Uuid,
    ) -> Result<Simulation, SimulationsError> {
        let simulation = self.owned(simulation_id, user_id).await?;
        let subdivisions = self.simulations.subdivisions(simulation_id).await?;
        if !subdivisions.iter().any(|s| s.id == subdivision_id) {
            return Err(SimulationsError::SubdivisionNotFound(subdivision_id));
        }

        let remaining: Vec<Subdivision> = subdivisions
            .into_iter()
            .filter(|s| s.id != subdivision_id)
            .collect();
        let next = simulation.recomputed(&remaining, Utc::now())?;
        self.simulations
            .save(
                &next,
                simulation.version,
                SubdivisionChange::Removed(subdivision_id),
            )
            .await?;

        tracing::info!(%simulation_id, %subdivision_id, "subdivision deleted");
        Ok(next)
    }
}
