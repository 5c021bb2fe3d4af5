// Drawn selections checked against the lake's constraint layers.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::modules::lakes::core::bitset::CellMask;
use crate::modules::lakes::core::crs::Crs;
use crate::modules::lakes::core::geometry::{GeometryError, parse_geojson};
use crate::modules::lakes::core::grid::GridSpec;
use crate::modules::lakes::core::raster::Raster;
use crate::modules::lakes::core::rasterize::rasterize;
use crate::modules::lakes::core::views::GeometryIssue;

pub const EMPTY_SELECTION: &str = "EMPTY_SELECTION";
pub const INTERSECTS_WATER: &str = "INTERSECTS_WATER";
pub const INTERSECTS_INHABITANTS: &str = "INTERSECTS_INHABITANTS";

pub const DEFAULT_GEOMETRY_CRS: &str = "EPSG:4326";

fn default_geometry_crs() -> String {
    DEFAULT_GEOMETRY_CRS.to_string()
}

/// A drawn geometry to check against a lake. Map clients usually send
/// WGS84 coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionInput {
    pub dataset_version_id: Option<Uuid>,
    pub geometry: Value,
    #[serde(default = "default_geometry_crs")]
    pub geometry_crs: String,
    #[serde(default)]
    pub all_touched: bool,
}

/// Cells a selection may not cover, derived from the water and inhabitants
/// layers of one dataset version.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintMasks {
    pub water: CellMask,
    pub inhabited: CellMask,
    pub blocked: CellMask,
}

impl ConstraintMasks {
    /// Blocked means water != 0 or inhabitants > 0. Both rasters must share
    /// the grid shape.
    pub fn from_layers(water: &Raster, inhabitants: &Raster) -> Self {
        let (rows, cols) = water.shape();
        let water = CellMask::from_fn(rows, cols, |r, c| water.at(r, c) != 0.0);
        let inhabited = CellMask::from_fn(rows, cols, |r, c| inhabitants.at(r, c) > 0.0);
        let blocked = CellMask::from_fn(rows, cols, |r, c| water.get(r, c) || inhabited.get(r, c));
        Self {
            water,
            inhabited,
            blocked,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionHits {
    pub selected_cells: usize,
    pub blocked_cells: usize,
    pub water_hits: usize,
    pub inhabitants_hits: usize,
}

impl SelectionHits {
    pub fn count(selection: &CellMask, masks: &ConstraintMasks) -> Self {
        let mut hits = SelectionHits {
            selected_cells: selection.count(),
            ..Default::default()
        };
        let cols = selection.cols() as usize;
        for id in selection.selected_ids() {
            let (row, col) = ((id / cols) as u32, (id % cols) as u32);
            if masks.water.get(row, col) {
                hits.water_hits += 1;
            }
            if masks.inhabited.get(row, col) {
                hits.inhabitants_hits += 1;
            }
            if masks.blocked.get(row, col) {
                hits.blocked_cells += 1;
            }
        }
        hits
    }

    /// One issue per constraint kind the selection touches.
    pub fn issues(&self) -> Vec<GeometryIssue> {
        let mut issues = Vec::new();
        if self.water_hits > 0 {
            issues.push(GeometryIssue {
                code: INTERSECTS_WATER.into(),
                message: format!("Selection intersects water in {} cell(s).", self.water_hits),
            });
        }
        if self.inhabitants_hits > 0 {
            issues.push(GeometryIssue {
                code: INTERSECTS_INHABITANTS.into(),
                message: format!(
                    "Selection intersects inhabited areas in {} cell(s).",
                    self.inhabitants_hits
                ),
            });
        }
        issues
    }
}

impl From<&GeometryError> for GeometryIssue {
    fn from(error: &GeometryError) -> Self {
        GeometryIssue {
            code: error.code().into(),
            message: error.message.clone(),
        }
    }
}

pub fn empty_selection_issue() -> GeometryIssue {
    GeometryIssue {
        code: EMPTY_SELECTION.into(),
        message: "Geometry does not intersect the lake grid (0 selected cells).".into(),
    }
}

/// Where a selection stands after rasterizing it and, when it selected
/// anything, counting its constraint hits.
#[derive(Debug, Clone)]
pub struct SelectionAssessment {
    pub lake_id: Uuid,
    pub dataset_version_id: Uuid,
    pub grid: GridSpec,
    pub geometry_error: Option<GeometryError>,
    pub selection: Option<CellMask>,
    pub hits: SelectionHits,
}

impl SelectionAssessment {
    pub fn selected_cells(&self) -> usize {
        self.hits.selected_cells
    }

    pub fn issues(&self) -> Vec<GeometryIssue> {
        if let Some(error) = &self.geometry_error {
            return vec![GeometryIssue::from(error)];
        }
        if self.hits.selected_cells == 0 {
            return vec![empty_selection_issue()];
        }
        self.hits.issues()
    }

    pub fn is_ok(&self) -> bool {
        self.issues().is_empty()
    }
}

/// Parses, reprojects into the lake CRS and burns the geometry into the grid.
pub fn rasterize_selection(
    geometry: &Value,
    geometry_crs: &str,
    grid: &GridSpec,
    all_touched: bool,
) -> Result<CellMask, GeometryError> {
    let area = parse_geojson(geometry)?;
    let from = Crs::parse(geometry_crs)?;
    let to = Crs::parse(&grid.crs)?;
    let projected = area.reproject(from, to)?;
    Ok(rasterize(&projected, grid, all_touched))
}

#[cfg(test)]
mod selection_tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn grid() -> GridSpec {
        GridSpec {
            rows: 2,
            cols: 2,
            cell_size_m: 10.0,
            crs: "EPSG:3857".into(),
            origin_corner: "top_left".into(),
            origin_x: 0.0,
            origin_y: 20.0,
        }
    }

    fn raster(values: [f64; 4]) -> Raster {
        Raster {
            rows: 2,
            cols: 2,
            values: values.to_vec(),
        }
    }

    #[fixture]
    fn masks() -> ConstraintMasks {
        // water at (0,0), inhabitants at (0,0) and (1,1), a negative count at (0,1)
        ConstraintMasks::from_layers(
            &raster([1.0, 0.0, 0.0, 0.0]),
            &raster([3.0, -1.0, 0.0, 7.0]),
        )
    }

    #[rstest]
    fn blocked_should_be_the_union_of_water_and_inhabited(masks: ConstraintMasks) {
        assert_eq!(masks.water.count(), 1);
        assert_eq!(masks.inhabited.count(), 2);
        assert_eq!(masks.blocked.count(), 2);
        assert!(!masks.blocked.get(0, 1));
    }

    #[rstest]
    fn hits_should_be_counted_per_constraint(masks: ConstraintMasks) {
        let selection = CellMask::from_fn(2, 2, |r, _| r == 0);
        let hits = SelectionHits::count(&selection, &masks);
        assert_eq!(
            hits,
            SelectionHits {
                selected_cells: 2,
                blocked_cells: 1,
                water_hits: 1,
                inhabitants_hits: 1,
            }
        );
        let codes: Vec<String> = hits.issues().into_iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![INTERSECTS_WATER, INTERSECTS_INHABITANTS]);
    }

    #[rstest]
    fn a_free_selection_has_no_issues(masks: ConstraintMasks) {
        let selection = CellMask::from_fn(2, 2, |r, c| r == 1 && c == 0);
        let hits = SelectionHits::count(&selection, &masks);
        assert_eq!(hits.blocked_cells, 0);
        assert!(hits.issues().is_empty());
    }

    #[rstest]
    fn it_should_rasterize_a_lake_crs_polygon(grid: GridSpec) {
        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
        });
        let mask = rasterize_selection(&geometry, "EPSG:3857", &grid, false).unwrap();
        assert_eq!(mask.count(), 1);
        assert!(mask.get(1, 0));
    }

    #[rstest]
    fn an_unknown_crs_should_be_an_invalid_geometry(grid: GridSpec) {
        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 0.0]]]
        });
        let error = rasterize_selection(&geometry, "EPSG:2154", &grid, false).unwrap_err();
        assert_eq!(error.code(), "INVALID_GEOMETRY");
        assert!(error.message.starts_with("Reprojection error"));
    }

    #[rstest]
    fn geometry_errors_should_become_issues() {
        let issue = GeometryIssue::from(&GeometryError::unsupported("Point is not supported."));
        assert_eq!(issue.code, "UNSUPPORTED_GEOMETRY");
    }
}
