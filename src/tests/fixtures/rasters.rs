// Single band GeoTIFF bytes for raster layers.

use std::io::Cursor;

use tiff::encoder::{TiffEncoder, colortype};

pub fn gray8_tiff(rows: u32, cols: u32, values: &[u8]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    TiffEncoder::new(&mut cursor)
        .unwrap()
        .write_image::<colortype::Gray8>(cols, rows, values)
        .unwrap();
    cursor.into_inner()
}

pub fn gray32f_tiff(rows: u32, cols: u32, values: &[f32]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    TiffEncoder::new(&mut cursor)
        .unwrap()
        .write_image::<colortype::Gray32Float>(cols, rows, values)
        .unwrap();
    cursor.into_inner()
}
