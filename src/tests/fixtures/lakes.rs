// A 3x3 demo lake in EPSG:3857 with 10 m cells and its origin at (0, 30).
// Water covers (0,0), five people live in (2,2).

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::modules::lakes::adapters::outbound::in_memory::InMemoryLakeCatalog;
use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::lake::{
    DatasetStatus, DatasetVersion, Lake, LakeLayer, LayerKind,
};
use crate::modules::lakes::core::ports::LakeCatalog;
use crate::modules::lakes::service::LakesService;
use crate::shared::infrastructure::object_store::in_memory::InMemoryObjectStore;
use crate::tests::fixtures::rasters::{gray8_tiff, gray32f_tiff};

pub const CELL_SIZE_M: f64 = 10.0;

pub struct SeededLake {
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub grid: GridSpec,
}

pub fn make_lakes_service() -> (LakesService, Arc<InMemoryLakeCatalog>, Arc<InMemoryObjectStore>) {
    let catalog = Arc::new(InMemoryLakeCatalog::default());
    let store = Arc::new(InMemoryObjectStore::new());
    let service = LakesService::new(catalog.clone(), store.clone());
    (service, catalog, store)
}

pub fn make_lake(name: &str, rows: u32, cols: u32) -> Lake {
    Lake {
        id: Uuid::now_v7(),
        name: name.to_string(),
        grid_rows: rows,
        grid_cols: cols,
        cell_size_m: CELL_SIZE_M,
        crs: "EPSG:3857".into(),
        origin_corner: "top_left".into(),
        origin_x: 0.0,
        origin_y: rows as f64 * CELL_SIZE_M,
        created_at: Utc::now(),
    }
}

pub fn make_dataset(lake_id: Uuid, version: i32, status: DatasetStatus) -> DatasetVersion {
    DatasetVersion {
        id: Uuid::now_v7(),
        lake_id,
        version,
        status,
        notes: None,
        meta: Some(json!({"source": "fixture"})),
        created_at: Utc::now(),
    }
}

pub async fn seed_bare_lake(catalog: &Arc<InMemoryLakeCatalog>, name: &str) -> Lake {
    let lake = make_lake(name, 3, 3);
    catalog.insert_lake(lake.clone()).await.unwrap();
    lake
}

/// Seeds the demo lake with the given water raster and the standard
/// inhabitants and ci rasters.
pub async fn seed_lake_with_layers(
    catalog: &Arc<InMemoryLakeCatalog>,
    store: &Arc<InMemoryObjectStore>,
    name: &str,
    water_tiff: Vec<u8>,
) -> SeededLake {
    let lake = seed_bare_lake(catalog, name).await;
    let dataset = make_dataset(lake.id, 1, DatasetStatus::Active);
    catalog.insert_dataset(dataset.clone()).await.unwrap();

    let mut inhabitants = [0.0f32; 9];
    inhabitants[8] = 5.0;
    let ci = [0.1f32, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
    let layers = [
        (LayerKind::Water, water_tiff, "uint8", None),
        (
            LayerKind::Inhabitants,
            gray32f_tiff(3, 3, &inhabitants),
            "float32",
            Some(0.0),
        ),
        (LayerKind::Ci, gray32f_tiff(3, 3, &ci), "float32", None),
    ];
    for (kind, bytes, dtype, nodata) in layers {
        let uri = format!("s3://maps/lakes/{}/{}.tif", lake.id, kind.as_api());
        store.put(uri.clone(), bytes).await;
        catalog
            .insert_layer(LakeLayer {
                id: Uuid::now_v7(),
                dataset_version_id: dataset.id,
                layer_kind: kind,
                storage_uri: uri,
                rows: 3,
                cols: 3,
                dtype: dtype.into(),
                nodata,
            })
            .await
            .unwrap();
    }

    SeededLake {
        lake_id: lake.id,
        dataset_version_id: dataset.id,
        grid: GridSpec::from_lake(&lake).unwrap(),
    }
}

pub async fn seed_lake(
    catalog: &Arc<InMemoryLakeCatalog>,
    store: &Arc<InMemoryObjectStore>,
    name: &str,
) -> SeededLake {
    let water = gray8_tiff(3, 3, &[1, 0, 0, 0, 0, 0, 0, 0, 0]);
    seed_lake_with_layers(catalog, store, name, water).await
}

/// EPSG:3857 rectangle covering the block of cells, inset by 1 m so it
/// never touches neighbouring cells.
pub fn cells_polygon(grid: &GridSpec, row_lo: u32, row_hi: u32, col_lo: u32, col_hi: u32) -> Value {
    let size = grid.cell_size_m;
    let min_x = grid.origin_x + col_lo as f64 * size + 1.0;
    let max_x = grid.origin_x + (col_hi + 1) as f64 * size - 1.0;
    let max_y = grid.origin_y - row_lo as f64 * size - 1.0;
    let min_y = grid.origin_y - (row_hi + 1) as f64 * size + 1.0;
    json!({
        "type": "Polygon",
        "coordinates": [[
            [min_x, min_y],
            [max_x, min_y],
            [max_x, max_y],
            [min_x, max_y],
            [min_x, min_y]
        ]]
    })
}
