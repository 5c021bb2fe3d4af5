// Payloads returned by the lakes endpoints.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::modules::lakes::core::bitset::{BIT_ORDER, CELL_ORDER, ENCODING};
use crate::modules::lakes::core::crs::{Crs, transform};
use crate::modules::lakes::core::geometry::GeometryError;
use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::lake::{DatasetStatus, DatasetVersion, LayerKind};
use crate::modules::lakes::core::stats::LayerStatsValues;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LakeSummary {
    pub id: Uuid,
    pub name: String,
    pub active_dataset_version_id: Option<Uuid>,
    pub grid: GridSpec,
}

/// `bbox_*` are `[minx, miny, maxx, maxy]`; `leaflet_bounds` is
/// `[[south, west], [north, east]]`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LakeBounds {
    pub bbox_lake_crs: [f64; 4],
    pub bbox_wgs84: [f64; 4],
    pub leaflet_bounds: [[f64; 2]; 2],
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LakeDetail {
    #[serde(flatten)]
    pub summary: LakeSummary,
    #[serde(flatten)]
    pub bounds: LakeBounds,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridManifest {
    pub lake_id: Uuid,
    pub grid: GridSpec,
    #[serde(flatten)]
    pub bounds: LakeBounds,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetVersionSummary {
    pub id: Uuid,
    pub lake_id: Uuid,
    pub version: i32,
    pub status: DatasetStatus,
    pub notes: Option<String>,
    pub meta: Option<Value>,
}

impl From<DatasetVersion> for DatasetVersionSummary {
    fn from(dataset: DatasetVersion) -> Self {
        Self {
            id: dataset.id,
            lake_id: dataset.lake_id,
            version: dataset.version,
            status: dataset.status,
            notes: dataset.notes,
            meta: dataset.meta,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LayerStatsResponse {
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub layer_kind: LayerKind,
    pub rows: u32,
    pub cols: u32,
    pub dtype: String,
    pub nodata: Option<f64>,
    pub stats: LayerStatsValues,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BitsetContract {
    pub encoding: &'static str,
    pub bit_order: &'static str,
    pub cell_order: &'static str,
}

impl Default for BitsetContract {
    fn default() -> Self {
        Self {
            encoding: ENCODING,
            bit_order: BIT_ORDER,
            cell_order: CELL_ORDER,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlockedMaskResponse {
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub rows: u32,
    pub cols: u32,
    #[serde(flatten)]
    pub contract: BitsetContract,
    pub blocked_bitset_base64: String,
    pub blocked_count: usize,
    pub water_count: usize,
    pub inhabited_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GeometryIssue {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BlockedBreakdown {
    pub water: usize,
    pub inhabitants: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeometryValidationResponse {
    pub ok: bool,
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub rows: u32,
    pub cols: u32,
    pub selected_cells: usize,
    pub blocked_cells: usize,
    pub blocked_breakdown: BlockedBreakdown,
    #[serde(flatten)]
    pub contract: BitsetContract,
    pub selection_bitset_base64: Option<String>,
    pub errors: Vec<GeometryIssue>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RasterizeResponse {
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub rows: u32,
    pub cols: u32,
    #[serde(flatten)]
    pub contract: BitsetContract,
    pub cell_count: usize,
    pub selection_bitset_base64: String,
}

impl LakeBounds {
    pub fn from_grid(grid: &GridSpec) -> Result<Self, GeometryError> {
        let (minx, miny, maxx, maxy) = grid.bbox();
        let lake_crs = Crs::parse(&grid.crs)?;
        let corners = [
            transform(lake_crs, Crs::Wgs84, (minx, miny))?,
            transform(lake_crs, Crs::Wgs84, (maxx, maxy))?,
        ];
        let min_lon = corners[0].0.min(corners[1].0);
        let max_lon = corners[0].0.max(corners[1].0);
        let min_lat = corners[0].1.min(corners[1].1);
        let max_lat = corners[0].1.max(corners[1].1);
        Ok(Self {
            bbox_lake_crs: [minx, miny, maxx, maxy],
            bbox_wgs84: [min_lon, min_lat, max_lon, max_lat],
            leaflet_bounds: [[min_lat, min_lon], [max_lat, max_lon]],
        })
    }
}
