use uuid::Uuid;

use crate::modules::lakes::core::bitset::PREVIEW_LEVEL;
use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::selection::{
    SelectionAssessment, SelectionHits, SelectionInput, rasterize_selection,
};
use crate::modules::lakes::core::views::{
    BitsetContract, BlockedBreakdown, GeometryValidationResponse, RasterizeResponse,
};
use crate::modules::lakes::errors::LakesError;
use crate::modules::lakes::service::LakesService;

impl LakesService {
    /// Rasterizes a drawn geometry and checks it against the blocked cells.
    ///
    /// Missing lakes, datasets or layers and storage problems are errors.
    /// Problems the user can fix by redrawing end up in the assessment.
    /// Constraint layers are only read once the geometry selects a cell.
    pub async fn assess_selection(
        &self,
        lake_id: Uuid,
        input: &SelectionInput,
    ) -> Result<SelectionAssessment, LakesError> {
        let lake = self.lake(lake_id).await?;
        let grid = GridSpec::from_lake(&lake)?;
        let dataset = self
            .resolve_dataset_version(lake_id, input.dataset_version_id)
            .await?;

        let mut assessment = SelectionAssessment {
            lake_id,
            dataset_version_id: dataset.id,
            grid: grid.clone(),
            geometry_error: None,
            selection: None,
            hits: SelectionHits::default(),
        };

        let selection =
            match rasterize_selection(&input.geometry, &input.geometry_crs, &grid, input.all_touched) {
                Ok(selection) => selection,
                Err(e) => {
                    tracing::debug!(%lake_id, code = e.code(), "geometry rejected");
                    assessment.geometry_error = Some(e);
                    return Ok(assessment);
                }
            };

        if selection.count() > 0 {
            let masks = self.constraint_masks(lake_id, dataset.id, &grid).await?;
            assessment.hits = SelectionHits::count(&selection, &masks);
        }
        assessment.selection = Some(selection);
        Ok(assessment)
    }

    pub async fn validate_geometry(
        &self,
        lake_id: Uuid,
        input: &SelectionInput,
    ) -> Result<GeometryValidationResponse, LakesError> {
        let assessment = self.assess_selection(lake_id, input).await?;
        let selection_bitset_base64 = match &assessment.selection {
            Some(selection) if selection.count() > 0 => Some(selection.encode(PREVIEW_LEVEL)?),
            _ => None,
        };
        let errors = assessment.issues();
        Ok(GeometryValidationResponse {
            ok: errors.is_empty(),
            lake_id,
            dataset_version_id: assessment.dataset_version_id,
            rows: assessment.grid.rows,
            cols: assessment.grid.cols,
            selected_cells: assessment.hits.selected_cells,
            blocked_cells: assessment.hits.blocked_cells,
            blocked_breakdown: BlockedBreakdown {
                water: assessment.hits.water_hits,
                inhabitants: assessment.hits.inhabitants_hits,
            },
            contract: BitsetContract::default(),
            selection_bitset_base64,
            errors,
        })
    }

    /// Strict variant of `validate_geometry`: any rejection is an error.
    pub async fn rasterize_geometry(
        &self,
        lake_id: Uuid,
        input: &SelectionInput,
    ) -> Result<RasterizeResponse, LakesError> {
        let assessment = self.assess_selection(lake_id, input).await?;
        if let Some(error) = assessment.geometry_error {
            return Err(LakesError::Geometry(error));
        }
        let hits = assessment.hits;
        let selection = match assessment.selection {
            Some(selection) if hits.selected_cells > 0 => selection,
            _ => return Err(LakesError::EmptySelection),
        };
        if hits.blocked_cells > 0 {
            return Err(LakesError::BlockedSelection {
                selected_cells: hits.selected_cells,
                blocked_cells: hits.blocked_cells,
                water_hits: hits.water_hits,
                inhabitants_hits: hits.inhabitants_hits,
            });
        }

        Ok(RasterizeResponse {
            lake_id,
            dataset_version_id: assessment.dataset_version_id,
            rows: assessment.grid.rows,
            cols: assessment.grid.cols,
            contract: BitsetContract::default(),
            cell_count: hits.selected_cells,
            selection_bitset_base64: selection.encode(PREVIEW_LEVEL)?,
        })
    }
}
