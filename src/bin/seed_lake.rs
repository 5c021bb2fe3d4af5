// Inserts the Lago San Roque demo lake with an ACTIVE dataset version 1.
//
// Only catalog rows are written. The rasters are expected under
// `s3://maps/lakes/san_roque_demo/v1/` in the configured bucket.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use lake_maps::modules::lakes::adapters::outbound::postgres::PostgresLakeCatalog;
use lake_maps::modules::lakes::core::lake::{DatasetStatus, DatasetVersion, Lake, LakeLayer, LayerKind};
use lake_maps::modules::lakes::core::ports::LakeCatalog;
use lake_maps::shared::infrastructure::postgres::{connect, migrate};
use lake_maps::shell::config::Settings;

const STORAGE_BASE: &str = "s3://maps/lakes/san_roque_demo/v1";
const GRID_SIZE: u32 = 300;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    let database_url = settings
        .database_url
        .as_deref()
        .context("DATABASE_URL is required to seed the catalog")?;
    let pool = connect(database_url).await?;
    migrate(&pool).await?;
    let catalog: Arc<dyn LakeCatalog> = Arc::new(PostgresLakeCatalog::new(pool));

    let now = Utc::now();
    let lake = Lake {
        id: Uuid::now_v7(),
        name: "Lago San Roque (DEMO)".into(),
        grid_rows: GRID_SIZE,
        grid_cols: GRID_SIZE,
        cell_size_m: 100.0,
        crs: "EPSG:3857".into(),
        origin_corner: "top_left".into(),
        origin_x: -7_191_767.571_442_347,
        origin_y: -3_665_894.488_587_622,
        created_at: now,
    };
    catalog.insert_lake(lake.clone()).await?;

    let dataset = DatasetVersion {
        id: Uuid::now_v7(),
        lake_id: lake.id,
        version: 1,
        status: DatasetStatus::Active,
        notes: Some("Demo v1, synthetic layers".into()),
        meta: Some(json!({
            "dataset_name": "san_roque_demo_v1",
            "center_lonlat": {"lon": -64.47, "lat": -31.37},
            "validation": {
                "water_count": 3343,
                "inhabited_cells_count": 11829,
                "inhabitants_total": 179403
            }
        })),
        created_at: now,
    };
    catalog.insert_dataset(dataset.clone()).await?;

    let layers = [
        (LayerKind::Water, "uint8", None),
        (LayerKind::Inhabitants, "int32", Some(0.0)),
        (LayerKind::Ci, "float32", Some(0.0)),
    ];
    for (kind, dtype, nodata) in layers {
        catalog
            .insert_layer(LakeLayer {
                id: Uuid::now_v7(),
                dataset_version_id: dataset.id,
                layer_kind: kind,
                storage_uri: format!("{STORAGE_BASE}/{}.tif", kind.as_api()),
                rows: GRID_SIZE,
                cols: GRID_SIZE,
                dtype: dtype.into(),
                nodata,
            })
            .await?;
    }

    tracing::info!(
        lake_id = %lake.id,
        dataset_version_id = %dataset.id,
        storage = STORAGE_BASE,
        "demo lake seeded"
    );
    Ok(())
}
