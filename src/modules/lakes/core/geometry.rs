// Drawn selections: GeoJSON Polygon / MultiPolygon parsing and validity.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::modules::lakes::core::crs::{Crs, transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeometryErrorCode {
    InvalidGeojson,
    UnsupportedGeometry,
    InvalidGeometry,
}

/// A geometry problem the user can fix by redrawing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GeometryError {
    pub kind: GeometryErrorCode,
    pub message: String,
}

impl GeometryError {
    pub fn invalid_geojson(message: impl Into<String>) -> Self {
        Self {
            kind: GeometryErrorCode::InvalidGeojson,
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self {
            kind: GeometryErrorCode::UnsupportedGeometry,
            message: message.into(),
        }
    }

    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self {
            kind: GeometryErrorCode::InvalidGeometry,
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            GeometryErrorCode::InvalidGeojson => "INVALID_GEOJSON",
            GeometryErrorCode::UnsupportedGeometry => "UNSUPPORTED_GEOMETRY",
            GeometryErrorCode::InvalidGeometry => "INVALID_GEOMETRY",
        }
    }
}

pub type Point = (f64, f64);
pub type Ring = Vec<Point>;

/// First ring is the shell, the rest are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

/// Polygon and MultiPolygon inputs normalised to a list of polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub polygons: Vec<Polygon>,
}

const UNSUPPORTED_TYPES: [&str; 5] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "GeometryCollection",
];

/// Parses a GeoJSON geometry, or a Feature wrapping one, and checks validity.
pub fn parse_geojson(value: &Value) -> Result<Area, GeometryError> {
    let object = value
        .as_object()
        .ok_or_else(|| GeometryError::invalid_geojson("Invalid GeoJSON geometry: expected an object."))?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeometryError::invalid_geojson("Invalid GeoJSON geometry: missing 'type'."))?;

    let area = match kind {
        "Feature" => {
            return match object.get("geometry") {
                Some(geometry) if !geometry.is_null() => parse_geojson(geometry),
                _ => Err(GeometryError::invalid_geojson("Feature has no geometry.")),
            };
        }
        "Polygon" => Area {
            polygons: match parse_polygon(coordinates(object)?)? {
                Some(polygon) => vec![polygon],
                None => Vec::new(),
            },
        },
        "MultiPolygon" => {
            let parts = coordinates(object)?
                .as_array()
                .ok_or_else(|| GeometryError::invalid_geojson("MultiPolygon coordinates must be an array."))?;
            let mut polygons = Vec::with_capacity(parts.len());
            for part in parts {
                if let Some(polygon) = parse_polygon(part)? {
                    polygons.push(polygon);
                }
            }
            Area { polygons }
        }
        other if UNSUPPORTED_TYPES.contains(&other) => {
            return Err(GeometryError::unsupported(format!(
                "Unsupported geometry type: {other}. Use Polygon/MultiPolygon."
            )));
        }
        other => {
            return Err(GeometryError::invalid_geojson(format!(
                "Unknown GeoJSON type: {other}."
            )));
        }
    };

    if area.polygons.is_empty() {
        return Err(GeometryError::invalid_geojson("Geometry is empty."));
    }
    for polygon in &area.polygons {
        validate_polygon(polygon)?;
    }
    if has_overlapping_parts(&area.polygons) {
        return Err(GeometryError::invalid_geometry(
            "Geometry is not valid: polygon parts overlap.",
        ));
    }
    Ok(area)
}

fn coordinates(object: &serde_json::Map<String, Value>) -> Result<&Value, GeometryError> {
    object
        .get("coordinates")
        .ok_or_else(|| GeometryError::invalid_geojson("Invalid GeoJSON geometry: missing 'coordinates'."))
}

fn parse_polygon(value: &Value) -> Result<Option<Polygon>, GeometryError> {
    let rings = value
        .as_array()
        .ok_or_else(|| GeometryError::invalid_geojson("Polygon coordinates must be an array of rings."))?;
    if rings.is_empty() {
        return Ok(None);
    }
    let rings = rings
        .iter()
        .map(parse_ring)
        .collect::<Result<Vec<_>, _>>()?;
    if rings[0].is_empty() {
        return Ok(None);
    }
    Ok(Some(Polygon { rings }))
}

fn parse_ring(value: &Value) -> Result<Ring, GeometryError> {
    value
        .as_array()
        .ok_or_else(|| GeometryError::invalid_geojson("A ring must be an array of positions."))?
        .iter()
        .map(parse_position)
        .collect()
}

fn parse_position(value: &Value) -> Result<Point, GeometryError> {
    let position = value
        .as_array()
        .filter(|p| p.len() >= 2)
        .ok_or_else(|| GeometryError::invalid_geojson("A position must hold at least two numbers."))?;
    let x = position[0]
        .as_f64()
        .ok_or_else(|| GeometryError::invalid_geojson("Position coordinates must be numbers."))?;
    let y = position[1]
        .as_f64()
        .ok_or_else(|| GeometryError::invalid_geojson("Position coordinates must be numbers."))?;
    Ok((x, y))
}

fn validate_polygon(polygon: &Polygon) -> Result<(), GeometryError> {
    for ring in &polygon.rings {
        if ring.len() < 4 {
            return Err(GeometryError::invalid_geometry(
                "Geometry is not valid: a ring needs at least 4 positions.",
            ));
        }
        if ring.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(GeometryError::invalid_geometry(
                "Geometry is not valid: non-finite coordinate.",
            ));
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::invalid_geometry(
                "Geometry is not valid: ring is not closed.",
            ));
        }
        if signed_area(ring) == 0.0 {
            return Err(GeometryError::invalid_geometry(
                "Geometry is not valid: ring has zero area.",
            ));
        }
    }
    if has_self_intersection(polygon) {
        return Err(GeometryError::invalid_geometry(
            "Geometry is not valid (self-intersection or invalid ring).",
        ));
    }
    let shell = &polygon.rings[0];
    for hole in &polygon.rings[1..] {
        let shell_only = Polygon {
            rings: vec![shell.clone()],
        };
        if !hole.iter().any(|&p| strictly_inside(&shell_only, p)) {
            return Err(GeometryError::invalid_geometry(
                "Geometry is not valid: hole lies outside the shell.",
            ));
        }
    }
    Ok(())
}

/// Parts of a MultiPolygon may touch but never share interior.
fn has_overlapping_parts(polygons: &[Polygon]) -> bool {
    for (i, first) in polygons.iter().enumerate() {
        for second in polygons.iter().skip(i + 1) {
            let first_shell = edges(&first.rings[0]);
            let second_shell = edges(&second.rings[0]);
            let crossing = first_shell.iter().any(|&(a1, a2)| {
                second_shell
                    .iter()
                    .any(|&(b1, b2)| proper_crossing(a1, a2, b1, b2))
            });
            if crossing
                || second.rings[0].iter().any(|&p| strictly_inside(first, p))
                || first.rings[0].iter().any(|&p| strictly_inside(second, p))
            {
                return true;
            }
        }
    }
    false
}

pub fn signed_area(ring: &[Point]) -> f64 {
    ring.windows(2)
        .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
        .sum::<f64>()
        / 2.0
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

/// Closed segment intersection, touching endpoints included.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(a1, b1, b2))
        || (d2 == 0.0 && on_segment(a2, b1, b2))
        || (d3 == 0.0 && on_segment(b1, a1, a2))
        || (d4 == 0.0 && on_segment(b2, a1, a2))
}

fn proper_crossing(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross(b1, b2, a1);
    let d2 = cross(b1, b2, a2);
    let d3 = cross(a1, a2, b1);
    let d4 = cross(a1, a2, b2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn edges(ring: &[Point]) -> Vec<(Point, Point)> {
    let mut points: Vec<Point> = Vec::with_capacity(ring.len());
    for &p in ring {
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    points.windows(2).map(|w| (w[0], w[1])).collect()
}

fn has_self_intersection(polygon: &Polygon) -> bool {
    let rings: Vec<Vec<(Point, Point)>> = polygon.rings.iter().map(|r| edges(r)).collect();

    for ring in &rings {
        let n = ring.len();
        for i in 0..n {
            // Adjacent edges share a vertex; only a spike back along the
            // previous edge makes them overlap.
            let (a, b) = ring[i];
            let (_, c) = ring[(i + 1) % n];
            if cross(a, b, c) == 0.0
                && (b.0 - a.0) * (c.0 - b.0) + (b.1 - a.1) * (c.1 - b.1) < 0.0
            {
                return true;
            }
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let (c1, c2) = ring[j];
                if segments_intersect(a, b, c1, c2) {
                    return true;
                }
            }
        }
    }

    for (i, first) in rings.iter().enumerate() {
        for second in rings.iter().skip(i + 1) {
            for &(a1, a2) in first {
                for &(b1, b2) in second {
                    if proper_crossing(a1, a2, b1, b2) {
                        return true;
                    }
                }
            }
        }
    }
    false
}

impl Area {
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        let mut bbox = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for polygon in &self.polygons {
            for &(x, y) in &polygon.rings[0] {
                bbox.0 = bbox.0.min(x);
                bbox.1 = bbox.1.min(y);
                bbox.2 = bbox.2.max(x);
                bbox.3 = bbox.3.max(y);
            }
        }
        bbox
    }

    pub fn reproject(&self, from: Crs, to: Crs) -> Result<Area, GeometryError> {
        if from == to {
            return Ok(self.clone());
        }
        let polygons = self
            .polygons
            .iter()
            .map(|polygon| {
                let rings = polygon
                    .rings
                    .iter()
                    .map(|ring| {
                        ring.iter()
                            .map(|&p| transform(from, to, p))
                            .collect::<Result<Ring, _>>()
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Polygon { rings })
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;
        Ok(Area { polygons })
    }
}

/// Even-odd rule across all rings, so holes are excluded.
pub fn polygon_contains(polygon: &Polygon, point: Point) -> bool {
    polygon
        .rings
        .iter()
        .filter(|ring| ring_contains(ring, point))
        .count()
        % 2
        == 1
}

/// Interior test that treats points on any ring as outside.
fn strictly_inside(polygon: &Polygon, point: Point) -> bool {
    let on_boundary = polygon
        .rings
        .iter()
        .flat_map(|ring| edges(ring))
        .any(|(a, b)| cross(a, b, point) == 0.0 && on_segment(point, a, b));
    !on_boundary && polygon_contains(polygon, point)
}

/// Even-odd ray test against a single ring.
fn ring_contains(ring: &[Point], point: Point) -> bool {
    let (px, py) = point;
    let mut inside = false;
    for w in ring.windows(2) {
        let ((xi, yi), (xj, yj)) = (w[0], w[1]);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
    }
    inside
}
