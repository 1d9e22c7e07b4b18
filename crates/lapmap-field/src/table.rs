//! Lap positions and the dense per-pixel table holding them.

use serde::{Deserialize, Serialize};

use crate::error::FieldLoadError;

/// Progress and lateral offset of one drivable pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapPosition {
    /// 0-based index of the track section.
    pub section_id: u32,
    /// Progress through the section, nominally 0.0..=1.0.
    pub section_distance: f32,
    /// Signed offset from the centerline, nominally -1.0..=1.0 (magnitude 1 is the edge).
    pub center_distance: f32,
}

impl LapPosition {
    pub fn new(section_id: u32, section_distance: f32, center_distance: f32) -> Self {
        Self {
            section_id,
            section_distance,
            center_distance,
        }
    }
}

/// Read-only per-pixel lookup of lap positions.
///
/// Coordinates are pixel coordinates of the rendered map with `y = 0` at the top.
pub trait NavigationField {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Number of sections along the track.
    fn section_count(&self) -> u32;
    /// The lap position at (`x`, `y`), or `None` off the drivable surface.
    fn get(&self, x: u32, y: u32) -> Option<LapPosition>;
}

/// Dense lap-position table covering every pixel of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct LapPositionTable {
    width: u32,
    height: u32,
    section_count: u32,
    positions: Vec<Option<LapPosition>>,
}

impl LapPositionTable {
    /// An empty table: no pixel has a position yet.
    ///
    /// # Panics
    ///
    /// Panics if the table can't be allocated; use [`LapPositionTable::try_new`]
    /// for sizes read from untrusted input.
    pub fn new(width: u32, height: u32, section_count: u32) -> Self {
        Self {
            width,
            height,
            section_count,
            positions: vec![None; width as usize * height as usize],
        }
    }

    /// An empty table, or [`FieldLoadError::TooLarge`] if its cells can't be
    /// allocated.
    pub fn try_new(width: u32, height: u32, section_count: u32) -> Result<Self, FieldLoadError> {
        let too_large = || FieldLoadError::TooLarge { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        let mut positions = Vec::new();
        positions.try_reserve_exact(len).map_err(|_| too_large())?;
        positions.resize(len, None);
        Ok(Self {
            width,
            height,
            section_count,
            positions,
        })
    }

    /// Store `position` at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the table.
    pub fn set(&mut self, x: u32, y: u32, position: LapPosition) {
        let index = self
            .index(x, y)
            .unwrap_or_else(|| panic!("({x}, {y}) outside {}x{} table", self.width, self.height));
        self.positions[index] = Some(position);
    }

    /// Number of pixels carrying a position.
    pub fn sample_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }

    /// Defined positions as `(x, y, position)`, row by row from the top.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, LapPosition)> + '_ {
        let width = self.width.max(1);
        self.positions
            .iter()
            .enumerate()
            .filter_map(move |(i, pos)| pos.map(|p| (i as u32 % width, i as u32 / width, p)))
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }
}

impl NavigationField for LapPositionTable {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn section_count(&self) -> u32 {
        self.section_count
    }

    fn get(&self, x: u32, y: u32) -> Option<LapPosition> {
        self.index(x, y).and_then(|i| self.positions[i])
    }
}
