use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::modules::lakes::core::lake::{DatasetStatus, DatasetVersion, Lake, LakeLayer, LayerKind};
use crate::modules::lakes::core::ports::LakeCatalog;

const LAKE_COLUMNS: &str = "id, name, grid_rows, grid_cols, cell_size_m, crs, origin_corner, \
                            origin_x, origin_y, created_at";
const DATASET_COLUMNS: &str = "id, lake_id, version, status, notes, meta, created_at";
const LAYER_COLUMNS: &str =
    "id, dataset_version_id, layer_kind, storage_uri, rows, cols, dtype, nodata";

#[derive(FromRow)]
struct LakeRow {
    id: Uuid,
    name: String,
    grid_rows: i32,
    grid_cols: i32,
    cell_size_m: f64,
    crs: String,
    origin_corner: String,
    origin_x: f64,
    origin_y: f64,
    created_at: DateTime<Utc>,
}

impl TryFrom<LakeRow> for Lake {
    type Error = anyhow::Error;

    fn try_from(row: LakeRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            grid_rows: u32::try_from(row.grid_rows).context("negative grid_rows")?,
            grid_cols: u32::try_from(row.grid_cols).context("negative grid_cols")?,
            cell_size_m: row.cell_size_m,
            crs: row.crs,
            origin_corner: row.origin_corner,
            origin_x: row.origin_x,
            origin_y: row.origin_y,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct DatasetRow {
    id: Uuid,
    lake_id: Uuid,
    version: i32,
    status: String,
    notes: Option<String>,
    meta: Option<Value>,
    created_at: DateTime<Utc>,
}

impl TryFrom<DatasetRow> for DatasetVersion {
    type Error = anyhow::Error;

    fn try_from(row: DatasetRow) -> anyhow::Result<Self> {
        let status = DatasetStatus::parse(&row.status)
            .with_context(|| format!("unknown dataset status {}", row.status))?;
        Ok(Self {
            id: row.id,
            lake_id: row.lake_id,
            version: row.version,
            status,
            notes: row.notes,
            meta: row.meta,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct LayerRow {
    id: Uuid,
    dataset_version_id: Uuid,
    layer_kind: String,
    storage_uri: String,
    rows: i32,
    cols: i32,
    dtype: String,
    nodata: Option<f64>,
}

impl TryFrom<LayerRow> for LakeLayer {
    type Error = anyhow::Error;

    fn try_from(row: LayerRow) -> anyhow::Result<Self> {
        let layer_kind = LayerKind::from_db(&row.layer_kind)
            .with_context(|| format!("unknown layer kind {}", row.layer_kind))?;
        Ok(Self {
            id: row.id,
            dataset_version_id: row.dataset_version_id,
            layer_kind,
            storage_uri: row.storage_uri,
            rows: u32::try_from(row.rows).context("negative rows")?,
            cols: u32::try_from(row.cols).context("negative cols")?,
            dtype: row.dtype,
            nodata: row.nodata,
        })
    }
}

pub struct PostgresLakeCatalog {
    pool: PgPool,
}

impl PostgresLakeCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LakeCatalog for PostgresLakeCatalog {
    async fn list_lakes(&self) -> anyhow::Result<Vec<Lake>> {
        let rows = sqlx::query_as::<_, LakeRow>(&format!(
            "SELECT {LAKE_COLUMNS} FROM lakes ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Lake::try_from).collect()
    }

    async fn get_lake(&self, lake_id: Uuid) -> anyhow::Result<Option<Lake>> {
        let row = sqlx::query_as::<_, LakeRow>(&format!(
            "SELECT {LAKE_COLUMNS} FROM lakes WHERE id = $1"
        ))
        .bind(lake_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Lake::try_from).transpose()
    }

    async fn active_dataset(&self, lake_id: Uuid) -> anyhow::Result<Option<DatasetVersion>> {
        let row = sqlx::query_as::<_, DatasetRow>(&format!(
            "SELECT {DATASET_COLUMNS} FROM lake_dataset_versions \
             WHERE lake_id = $1 AND status = 'ACTIVE' ORDER BY version DESC LIMIT 1"
        ))
        .bind(lake_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(DatasetVersion::try_from).transpose()
    }

    async fn dataset(
        &self,
        lake_id: Uuid,
        dataset_version_id: Uuid,
    ) -> anyhow::Result<Option<DatasetVersion>> {
        let row = sqlx::query_as::<_, DatasetRow>(&format!(
            "SELECT {DATASET_COLUMNS} FROM lake_dataset_versions WHERE id = $1 AND lake_id = $2"
        ))
        .bind(dataset_version_id)
        .bind(lake_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(DatasetVersion::try_from).transpose()
    }

    async fn layer(
        &self,
        dataset_version_id: Uuid,
        kind: LayerKind,
    ) -> anyhow::Result<Option<LakeLayer>> {
        let row = sqlx::query_as::<_, LayerRow>(&format!(
            "SELECT {LAYER_COLUMNS} FROM lake_layers \
             WHERE dataset_version_id = $1 AND layer_kind = $2"
        ))
        .bind(dataset_version_id)
        .bind(kind.as_db())
        .fetch_optional(&self.pool)
        .await?;
        row.map(LakeLayer::try_from).transpose()
    }

    async fn insert_lake(&self, lake: Lake) -> anyhow::Result<()> {
        sqlx::query(&format!(
            "INSERT INTO lakes ({LAKE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(lake.id)
        .bind(&lake.name)
        .bind(i32::try_from(lake.grid_rows)?)
        .bind(i32::try_from(lake.grid_cols)?)
        .bind(lake.cell_size_m)
        .bind(&lake.crs)
        .bind(&lake.origin_corner)
        .bind(lake.origin_x)
        .bind(lake.origin_y)
        .bind(lake.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_dataset(&self, dataset: DatasetVersion) -> anyhow::Result<()> {
        sqlx::query(&format!(
            "INSERT INTO lake_dataset_versions ({DATASET_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)"
        ))
        .bind(dataset.id)
        .bind(dataset.lake_id)
        .bind(dataset.version)
        .bind(dataset.status.as_str())
        .bind(&dataset.notes)
        .bind(&dataset.meta)
        .bind(dataset.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_layer(&self, layer: LakeLayer) -> anyhow::Result<()> {
        sqlx::query(&format!(
            "INSERT INTO lake_layers ({LAYER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (dataset_version_id, layer_kind) DO UPDATE SET \
             storage_uri = EXCLUDED.storage_uri, rows = EXCLUDED.rows, cols = EXCLUDED.cols, \
             dtype = EXCLUDED.dtype, nodata = EXCLUDED.nodata"
        ))
        .bind(layer.id)
        .bind(layer.dataset_version_id)
        .bind(layer.layer_kind.as_db())
        .bind(&layer.storage_uri)
        .bind(i32::try_from(layer.rows)?)
        .bind(i32::try_from(layer.cols)?)
        .bind(&layer.dtype)
        .bind(layer.nodata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
