//! Precomputed lap-position tables stored as RON.
//!
//! Only defined pixels are written, as a flat list of samples. Values are stored
//! as given; nothing here range-checks distances or section ids.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FieldLoadError;
use crate::table::{LapPosition, LapPositionTable};

/// On-disk table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableFile {
    pub width: u32,
    pub height: u32,
    pub section_count: u32,
    #[serde(default)]
    pub samples: Vec<SampleRecord>,
}

/// One defined pixel, `y = 0` at the top of the map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SampleRecord {
    pub x: u32,
    pub y: u32,
    pub section_id: u32,
    pub section_distance: f32,
    pub center_distance: f32,
}

impl TableFile {
    /// Build the dense table, rejecting samples outside the grid.
    pub fn into_table(self) -> Result<LapPositionTable, FieldLoadError> {
        if self.section_count == 0 && !self.samples.is_empty() {
            return Err(FieldLoadError::ZeroSectionCount {
                samples: self.samples.len(),
            });
        }

        let mut table = LapPositionTable::try_new(self.width, self.height, self.section_count)?;
        for sample in self.samples {
            if sample.x >= self.width || sample.y >= self.height {
                return Err(FieldLoadError::OutOfBounds {
                    x: sample.x,
                    y: sample.y,
                    width: self.width,
                    height: self.height,
                });
            }
            table.set(
                sample.x,
                sample.y,
                LapPosition::new(
                    sample.section_id,
                    sample.section_distance,
                    sample.center_distance,
                ),
            );
        }
        Ok(table)
    }

    pub fn from_table(table: &LapPositionTable) -> Self {
        use crate::NavigationField;

        Self {
            width: table.width(),
            height: table.height(),
            section_count: table.section_count(),
            samples: table
                .iter()
                .map(|(x, y, pos)| SampleRecord {
                    x,
                    y,
                    section_id: pos.section_id,
                    section_distance: pos.section_distance,
                    center_distance: pos.center_distance,
                })
                .collect(),
        }
    }
}

/// Parse a table file from RON text.
pub fn parse_table_file(contents: &str) -> Result<TableFile, FieldLoadError> {
    ron::from_str(contents).map_err(FieldLoadError::Parse)
}

/// Read a table file without building the dense table.
///
/// Lets callers check the declared size before allocating a cell per pixel.
pub fn read_table_file(path: &Path) -> Result<TableFile, FieldLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| FieldLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table_file(&contents)
}

/// Write `table` to disk in the format [`read_table_file`] reads.
pub fn save_table(path: &Path, table: &LapPositionTable) -> Result<(), FieldLoadError> {
    let serialized = ron::ser::to_string_pretty(
        &TableFile::from_table(table),
        ron::ser::PrettyConfig::new().depth_limit(2),
    )
    .map_err(FieldLoadError::Serialize)?;
    std::fs::write(path, serialized).map_err(|source| FieldLoadError::Write {
        path: path.to_path_buf(),
        source,
    })
}
