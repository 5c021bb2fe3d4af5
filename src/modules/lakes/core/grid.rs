// Lake grid geometry.
//
// Row 0 is the northern edge, column 0 the western edge. Cell (r, c) spans
// x in [origin_x + c*size, origin_x + (c+1)*size] and
// y in [origin_y - (r+1)*size, origin_y - r*size].

use serde::{Deserialize, Serialize};

use crate::modules::lakes::core::lake::Lake;
use crate::modules::lakes::errors::LakesError;

pub const ORIGIN_TOP_LEFT: &str = "top_left";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, async_graphql::SimpleObject)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub cell_size_m: f64,
    pub crs: String,
    pub origin_corner: String,
    pub origin_x: f64,
    pub origin_y: f64,
}

/// `(minx, miny, maxx, maxy)`
pub type BBox = (f64, f64, f64, f64);

impl GridSpec {
    pub fn from_lake(lake: &Lake) -> Result<Self, LakesError> {
        if !lake.origin_corner.eq_ignore_ascii_case(ORIGIN_TOP_LEFT) {
            return Err(LakesError::UnsupportedOriginCorner(lake.origin_corner.clone()));
        }
        if lake.grid_rows == 0 || lake.grid_cols == 0 || !(lake.cell_size_m > 0.0) {
            return Err(LakesError::InvalidGrid(lake.id));
        }
        Ok(Self {
            rows: lake.grid_rows,
            cols: lake.grid_cols,
            cell_size_m: lake.cell_size_m,
            crs: lake.crs.clone(),
            origin_corner: ORIGIN_TOP_LEFT.to_string(),
            origin_x: lake.origin_x,
            origin_y: lake.origin_y,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    pub fn cell_bounds(&self, row: u32, col: u32) -> BBox {
        let size = self.cell_size_m;
        let minx = self.origin_x + f64::from(col) * size;
        let maxy = self.origin_y - f64::from(row) * size;
        (minx, maxy - size, minx + size, maxy)
    }

    pub fn cell_center(&self, row: u32, col: u32) -> (f64, f64) {
        let size = self.cell_size_m;
        (
            self.origin_x + (f64::from(col) + 0.5) * size,
            self.origin_y - (f64::from(row) + 0.5) * size,
        )
    }

    pub fn bbox(&self) -> BBox {
        (
            self.origin_x,
            self.origin_y - f64::from(self.rows) * self.cell_size_m,
            self.origin_x + f64::from(self.cols) * self.cell_size_m,
            self.origin_y,
        )
    }

    /// Inclusive `(row_min, row_max, col_min, col_max)` of the cells a bbox may
    /// touch, or `None` when it lies outside the grid.
    pub fn cell_window(&self, bbox: BBox) -> Option<(u32, u32, u32, u32)> {
        let (minx, miny, maxx, maxy) = bbox;
        let size = self.cell_size_m;
        let col_lo = ((minx - self.origin_x) / size).floor();
        let col_hi = ((maxx - self.origin_x) / size).floor();
        let row_lo = ((self.origin_y - maxy) / size).floor();
        let row_hi = ((self.origin_y - miny) / size).floor();
        let last_col = f64::from(self.cols - 1);
        let last_row = f64::from(self.rows - 1);
        if col_hi < 0.0 || row_hi < 0.0 || col_lo > last_col || row_lo > last_row {
            return None;
        }
        Some((
            row_lo.max(0.0) as u32,
            row_hi.min(last_row) as u32,
            col_lo.max(0.0) as u32,
            col_hi.min(last_col) as u32,
        ))
    }
}
