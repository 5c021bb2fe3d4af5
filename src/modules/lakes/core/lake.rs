use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Lake {
    pub id: Uuid,
    pub name: String,
    pub grid_rows: u32,
    pub grid_cols: u32,
    pub cell_size_m: f64,
    pub crs: String,
    pub origin_corner: String,
    pub origin_x: f64,
    pub origin_y: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatasetStatus {
    Active,
    Inactive,
}

impl DatasetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetStatus::Active => "ACTIVE",
            DatasetStatus::Inactive => "INACTIVE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ACTIVE" => Some(DatasetStatus::Active),
            "INACTIVE" => Some(DatasetStatus::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetVersion {
    pub id: Uuid,
    pub lake_id: Uuid,
    pub version: i32,
    pub status: DatasetStatus,
    pub notes: Option<String>,
    pub meta: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Raster layers a dataset version carries. The API speaks lowercase,
/// storage speaks uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Water,
    Inhabitants,
    Ci,
}

impl LayerKind {
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw {
            "water" => Some(LayerKind::Water),
            "inhabitants" => Some(LayerKind::Inhabitants),
            "ci" => Some(LayerKind::Ci),
            _ => None,
        }
    }

    pub fn from_db(raw: &str) -> Option<Self> {
        match raw {
            "WATER" => Some(LayerKind::Water),
            "INHABITANTS" => Some(LayerKind::Inhabitants),
            "CI" => Some(LayerKind::Ci),
            _ => None,
        }
    }

    pub fn as_api(&self) -> &'static str {
        match self {
            LayerKind::Water => "water",
            LayerKind::Inhabitants => "inhabitants",
            LayerKind::Ci => "ci",
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            LayerKind::Water => "WATER",
            LayerKind::Inhabitants => "INHABITANTS",
            LayerKind::Ci => "CI",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LakeLayer {
    pub id: Uuid,
    pub dataset_version_id: Uuid,
    pub layer_kind: LayerKind,
    pub storage_uri: String,
    pub rows: u32,
    pub cols: u32,
    pub dtype: String,
    pub nodata: Option<f64>,
}
