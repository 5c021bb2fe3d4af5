use std::io::Cursor;

use thiserror::Error;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("cannot decode GeoTIFF: {0}")]
    Decode(String),

    #[error("unsupported raster layout: {0:?}")]
    UnsupportedLayout(String),
}

impl From<tiff::TiffError> for RasterError {
    fn from(error: tiff::TiffError) -> Self {
        RasterError::Decode(error.to_string())
    }
}

/// Band 1 of a layer, widened to `f64`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub rows: u32,
    pub cols: u32,
    pub values: Vec<f64>,
}

impl Raster {
    pub fn shape(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    pub fn at(&self, row: u32, col: u32) -> f64 {
        self.values[row as usize * self.cols as usize + col as usize]
    }
}

pub fn decode_geotiff(bytes: &[u8]) -> Result<Raster, RasterError> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;
    let (cols, rows) = decoder.dimensions()?;
    match decoder.colortype()? {
        ColorType::Gray(_) => {}
        other => return Err(RasterError::UnsupportedLayout(format!("{other:?}"))),
    }
    let values: Vec<f64> = match decoder.read_image()? {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    };
    if values.len() != rows as usize * cols as usize {
        return Err(RasterError::Decode(format!(
            "expected {} samples, got {}",
            rows as usize * cols as usize,
            values.len()
        )));
    }
    Ok(Raster { rows, cols, values })
}
