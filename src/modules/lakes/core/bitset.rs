// Packed cell masks exchanged with the frontend.
//
// Cell id = row * cols + col. Bit i lives in byte i / 8 under mask
// 1 << (i % 8) (LSB0). The packed bytes are zlib-compressed, then
// standard base64 encoded.

use std::io::{Read, Write};

use base64::{Engine, engine::general_purpose::STANDARD};
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use thiserror::Error;

pub const ENCODING: &str = "bitset+zlib+base64";
pub const BIT_ORDER: &str = "lsb0";
pub const CELL_ORDER: &str = "row_major_cell_id";

/// Level used for stored masks (blocked masks, subdivisions, occupancy).
pub const STORAGE_LEVEL: u32 = 6;
/// Level used for one-off selection previews.
pub const PREVIEW_LEVEL: u32 = 9;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BitsetError {
    #[error("invalid base64: {0}")]
    Base64(String),

    #[error("invalid zlib stream: {0}")]
    Zlib(String),

    #[error("bitset length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    rows: u32,
    cols: u32,
    cells: Vec<bool>,
}

impl CellMask {
    pub fn empty(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows as usize * cols as usize],
        }
    }

    pub fn from_fn(rows: u32, cols: u32, mut selected: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::empty(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                if selected(row, col) {
                    mask.set(row, col);
                }
            }
        }
        mask
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    pub fn set(&mut self, row: u32, col: u32) {
        let i = self.index(row, col);
        self.cells[i] = true;
    }

    pub fn get(&self, row: u32, col: u32) -> bool {
        self.cells[self.index(row, col)]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Cell ids in row-major order.
    pub fn selected_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, selected)| selected.then_some(i))
    }

    pub fn to_packed(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; packed_len(self.rows, self.cols)];
        for i in self.selected_ids() {
            bytes[i / 8] |= 1 << (i % 8);
        }
        bytes
    }

    pub fn from_packed(rows: u32, cols: u32, bytes: &[u8]) -> Result<Self, BitsetError> {
        let expected = packed_len(rows, cols);
        if bytes.len() != expected {
            return Err(BitsetError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let n = rows as usize * cols as usize;
        let cells = (0..n).map(|i| bytes[i / 8] & (1 << (i % 8)) != 0).collect();
        Ok(Self { rows, cols, cells })
    }

    pub fn encode(&self, level: u32) -> Result<String, BitsetError> {
        encode_packed(&self.to_packed(), level)
    }

    pub fn decode(rows: u32, cols: u32, encoded: &str) -> Result<Self, BitsetError> {
        Self::from_packed(rows, cols, &decode_packed(encoded)?)
    }
}

pub fn packed_len(rows: u32, cols: u32) -> usize {
    (rows as usize * cols as usize).div_ceil(8)
}

pub fn encode_packed(bytes: &[u8], level: u32) -> Result<String, BitsetError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(bytes)
        .map_err(|e| BitsetError::Zlib(e.to_string()))?;
    let compressed = encoder
        .finish()
        .map_err(|e| BitsetError::Zlib(e.to_string()))?;
    Ok(STANDARD.encode(compressed))
}

pub fn decode_packed(encoded: &str) -> Result<Vec<u8>, BitsetError> {
    let compressed = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| BitsetError::Base64(e.to_string()))?;
    let mut bytes = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut bytes)
        .map_err(|e| BitsetError::Zlib(e.to_string()))?;
    Ok(bytes)
}

pub fn packed_intersects(a: &[u8], b: &[u8]) -> Result<bool, BitsetError> {
    if a.len() != b.len() {
        return Err(BitsetError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b).any(|(x, y)| x & y != 0))
}

pub fn packed_or(a: &[u8], b: &[u8]) -> Result<Vec<u8>, BitsetError> {
    if a.len() != b.len() {
        return Err(BitsetError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x | y).collect())
}
