// Coordinate reference systems accepted for drawn geometries and lake grids.
//
// Web Mercator uses the spherical formulas with R = 6378137 m.

use std::f64::consts::FRAC_PI_4;

use crate::modules::lakes::core::geometry::GeometryError;

pub const EARTH_RADIUS_M: f64 = 6_378_137.0;
pub const MAX_MERCATOR_LATITUDE: f64 = 85.0511;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    Wgs84,
    WebMercator,
}

impl Crs {
    pub fn parse(raw: &str) -> Result<Self, GeometryError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "EPSG:4326" => Ok(Crs::Wgs84),
            "EPSG:3857" | "EPSG:900913" => Ok(Crs::WebMercator),
            _ => Err(GeometryError::invalid_geometry(format!(
                "Reprojection error: unsupported CRS '{raw}'."
            ))),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Crs::Wgs84 => "EPSG:4326",
            Crs::WebMercator => "EPSG:3857",
        }
    }
}

fn lonlat_to_mercator(lon: f64, lat: f64) -> Result<(f64, f64), GeometryError> {
    if !lat.is_finite() || lat.abs() > MAX_MERCATOR_LATITUDE {
        return Err(GeometryError::invalid_geometry(format!(
            "Reprojection error: latitude {lat} is outside the Web Mercator range."
        )));
    }
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Ok((x, y))
}

fn mercator_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

/// Transforms one `(x, y)` position. Axis order is always easting/longitude first.
pub fn transform(from: Crs, to: Crs, point: (f64, f64)) -> Result<(f64, f64), GeometryError> {
    match (from, to) {
        (Crs::Wgs84, Crs::WebMercator) => lonlat_to_mercator(point.0, point.1),
        (Crs::WebMercator, Crs::Wgs84) => Ok(mercator_to_lonlat(point.0, point.1)),
        _ => Ok(point),
    }
}
