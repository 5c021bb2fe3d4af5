// Per-layer summary statistics.

use serde::Serialize;

use crate::modules::lakes::core::lake::LayerKind;
use crate::modules::lakes::core::raster::Raster;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerStatsValues {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inhabited_cells: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inhabited_fraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_inhabitants: Option<f64>,
}

/// Linear interpolation between closest ranks over sorted values.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

pub fn compute_stats(raster: &Raster, kind: LayerKind, nodata: Option<f64>) -> LayerStatsValues {
    let is_valid = |v: f64| nodata.is_none_or(|nd| v != nd) && !v.is_nan();
    let mut valid: Vec<f64> = raster.values.iter().copied().filter(|v| is_valid(*v)).collect();
    if valid.is_empty() {
        return LayerStatsValues::default();
    }
    let total_cells = raster.values.len() as f64;
    let count = valid.len();

    match kind {
        LayerKind::Water => {
            let water_count = valid.iter().filter(|v| **v != 0.0).count();
            LayerStatsValues {
                count,
                water_count: Some(water_count),
                water_fraction: Some(water_count as f64 / total_cells),
                ..Default::default()
            }
        }
        LayerKind::Inhabitants | LayerKind::Ci => {
            valid.sort_by(f64::total_cmp);
            let mut stats = LayerStatsValues {
                count,
                min: valid.first().copied(),
                max: valid.last().copied(),
                p50: Some(percentile(&valid, 50.0)),
                p95: Some(percentile(&valid, 95.0)),
                ..Default::default()
            };
            if kind == LayerKind::Inhabitants {
                let inhabited = raster.values.iter().filter(|v| **v > 0.0).count();
                stats.inhabited_cells = Some(inhabited);
                stats.inhabited_fraction = Some(inhabited as f64 / total_cells);
                stats.total_inhabitants =
                    Some(raster.values.iter().filter(|v| **v > 0.0).sum());
            }
            stats
        }
    }
}
