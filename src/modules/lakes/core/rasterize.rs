use crate::modules::lakes::core::bitset::CellMask;
use crate::modules::lakes::core::geometry::{Area, Point, Polygon, polygon_contains};
use crate::modules::lakes::core::grid::{BBox, GridSpec};

/// Fraction of a cell trimmed from each side before the touch test, so a
/// polygon edge lying exactly on a cell border does not select the neighbour.
const TOUCH_EPSILON: f64 = 1e-9;

/// Burns a projected area into the lake grid.
///
/// With `all_touched = false` a cell is selected when its centre falls
/// inside the area. With `all_touched = true` any cell whose interior
/// overlaps the area is selected, a superset of the centre rule.
pub fn rasterize(area: &Area, grid: &GridSpec, all_touched: bool) -> CellMask {
    let mut mask = CellMask::empty(grid.rows, grid.cols);
    for polygon in &area.polygons {
        let Some((row_lo, row_hi, col_lo, col_hi)) = grid.cell_window(ring_bbox(&polygon.rings[0])) else {
            continue;
        };
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                if mask.get(row, col) {
                    continue;
                }
                let selected = if all_touched {
                    cell_touches(polygon, shrink(grid.cell_bounds(row, col), grid.cell_size_m))
                } else {
                    polygon_contains(polygon, grid.cell_center(row, col))
                };
                if selected {
                    mask.set(row, col);
                }
            }
        }
    }
    mask
}

fn ring_bbox(ring: &[Point]) -> BBox {
    ring.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(minx, miny, maxx, maxy), &(x, y)| (minx.min(x), miny.min(y), maxx.max(x), maxy.max(y)),
    )
}

fn shrink(bounds: BBox, size: f64) -> BBox {
    let d = size * TOUCH_EPSILON;
    (bounds.0 + d, bounds.1 + d, bounds.2 - d, bounds.3 - d)
}

fn cell_touches(polygon: &Polygon, rect: BBox) -> bool {
    let crosses_boundary = polygon
        .rings
        .iter()
        .flat_map(|ring| ring.windows(2))
        .any(|w| segment_hits_rect(w[0], w[1], rect));
    if crosses_boundary {
        return true;
    }
    // No edge reaches the cell: it is either fully inside or fully outside.
    let center = ((rect.0 + rect.2) / 2.0, (rect.1 + rect.3) / 2.0);
    polygon_contains(polygon, center)
}

/// Liang-Barsky clip of segment `a-b` against a closed rectangle.
fn segment_hits_rect(a: Point, b: Point, rect: BBox) -> bool {
    let (minx, miny, maxx, maxy) = rect;
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, a.0 - minx),
        (dx, maxx - a.0),
        (-dy, a.1 - miny),
        (dy, maxy - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return false;
        }
    }
    true
}
