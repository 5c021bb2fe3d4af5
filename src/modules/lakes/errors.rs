use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use crate::modules::lakes::core::bitset::BitsetError;
use crate::modules::lakes::core::geometry::GeometryError;
use crate::modules::lakes::core::raster::RasterError;
use crate::shared::core::errors::AppError;
use crate::shared::infrastructure::object_store::ObjectStoreError;

#[derive(Debug, Error)]
pub enum LakesError {
    #[error("Lake not found.")]
    LakeNotFound(Uuid),

    /// `dataset_version_id: None` means the ACTIVE dataset was requested.
    #[error("Dataset version not found.")]
    DatasetNotFound {
        lake_id: Uuid,
        dataset_version_id: Option<Uuid>,
    },

    #[error("Layer not found.")]
    LayerNotFound {
        lake_id: Uuid,
        dataset_version_id: Uuid,
        layer_kind: String,
    },

    #[error("Unsupported grid origin corner: {0}")]
    UnsupportedOriginCorner(String),

    #[error("Lake {0} has an invalid grid definition.")]
    InvalidGrid(Uuid),

    #[error("Layer {layer_kind} is {actual_rows}x{actual_cols}, lake grid is {rows}x{cols}.")]
    DimensionMismatch {
        layer_kind: String,
        rows: u32,
        cols: u32,
        actual_rows: u32,
        actual_cols: u32,
    },

    /// Rejected geometry on endpoints that answer with a hard failure.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Geometry selection is invalid.")]
    BlockedSelection {
        selected_cells: usize,
        blocked_cells: usize,
        water_hits: usize,
        inhabitants_hits: usize,
    },

    #[error("Geometry does not intersect the lake grid (0 selected cells).")]
    EmptySelection,

    #[error(transparent)]
    Storage(#[from] ObjectStoreError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Bitset(#[from] BitsetError),

    #[error(transparent)]
    Catalog(#[from] anyhow::Error),
}

impl LakesError {
    pub fn code(&self) -> &'static str {
        match self {
            LakesError::LakeNotFound(_) => "LAKE_NOT_FOUND",
            LakesError::DatasetNotFound { .. } => "DATASET_NOT_FOUND",
            LakesError::LayerNotFound { .. } => "LAYER_NOT_FOUND",
            LakesError::UnsupportedOriginCorner(_) => "UNSUPPORTED_ORIGIN_CORNER",
            LakesError::InvalidGrid(_) => "INVALID_GRID",
            LakesError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            LakesError::Geometry(e) => e.code(),
            LakesError::BlockedSelection { .. } => "INVALID_SELECTION",
            LakesError::EmptySelection => "EMPTY_SELECTION",
            LakesError::Storage(_) => "STORAGE_ERROR",
            LakesError::Raster(_) => "RASTER_DECODE_ERROR",
            LakesError::Bitset(_) => "BITSET_ERROR",
            LakesError::Catalog(_) => "INTERNAL_ERROR",
        }
    }

    fn meta(&self) -> Option<Value> {
        match self {
            LakesError::LakeNotFound(lake_id) | LakesError::InvalidGrid(lake_id) => {
                Some(json!({ "lake_id": lake_id }))
            }
            LakesError::DatasetNotFound {
                lake_id,
                dataset_version_id,
            } => Some(json!({
                "lake_id": lake_id,
                "dataset_version_id": dataset_version_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "ACTIVE".to_string()),
            })),
            LakesError::LayerNotFound {
                lake_id,
                dataset_version_id,
                layer_kind,
            } => Some(json!({
                "lake_id": lake_id,
                "dataset_version_id": dataset_version_id,
                "layer_kind": layer_kind,
            })),
            LakesError::DimensionMismatch {
                layer_kind,
                rows,
                cols,
                actual_rows,
                actual_cols,
            } => Some(json!({
                "layer_kind": layer_kind,
                "expected": [rows, cols],
                "actual": [actual_rows, actual_cols],
            })),
            LakesError::BlockedSelection {
                selected_cells,
                blocked_cells,
                water_hits,
                inhabitants_hits,
            } => Some(json!({
                "selected_cells": selected_cells,
                "water_hits": water_hits,
                "inhabitants_hits": inhabitants_hits,
                "nodata_hits": 0,
                "blocked_cells": blocked_cells,
            })),
            _ => None,
        }
    }
}

impl From<LakesError> for AppError {
    fn from(error: LakesError) -> Self {
        let code = error.code();
        let meta = error.meta();
        let app_error = match &error {
            LakesError::LakeNotFound(_)
            | LakesError::DatasetNotFound { .. }
            | LakesError::LayerNotFound { .. } => AppError::not_found(code, error.to_string()),
            LakesError::UnsupportedOriginCorner(_)
            | LakesError::Geometry(_)
            | LakesError::BlockedSelection { .. }
            | LakesError::EmptySelection => AppError::bad_request(code, error.to_string()),
            LakesError::InvalidGrid(_)
            | LakesError::DimensionMismatch { .. }
            | LakesError::Storage(_)
            | LakesError::Raster(_)
            | LakesError::Bitset(_)
            | LakesError::Catalog(_) => AppError::internal(code, error.to_string()),
        };
        match meta {
            Some(meta) => app_error.with_meta(meta),
            None => app_error,
        }
    }
}
