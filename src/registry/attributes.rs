//! Hex-code attribute table
//!
//! An admin-managed grid of 24-bit color codes associated with the
//! collection. Writes replace the whole grid; there is no partial-row
//! merge. Reads are bounds-checked, and out-of-range coordinates are an
//! error rather than a default value.

use super::{RegistryError, RegistryResult};
use crate::types::HexCode;
use serde::{Deserialize, Serialize};

/// Grid of color codes, addressed by `(row, col)`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeTable {
    grid: Vec<Vec<HexCode>>,
}

impl AttributeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored grid wholesale
    pub fn replace(&mut self, grid: Vec<Vec<HexCode>>) {
        self.grid = grid;
    }

    /// Read a single cell
    pub fn get(&self, row: usize, col: usize) -> RegistryResult<HexCode> {
        self.grid
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .ok_or(RegistryError::IndexOutOfRange { row, col })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    /// Number of cells across all rows
    pub fn cells(&self) -> usize {
        self.grid.iter().map(Vec::len).sum()
    }

    /// The full stored grid
    pub fn grid(&self) -> &[Vec<HexCode>] {
        &self.grid
    }

    /// Check whether any grid has been set
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
