use serde::{Deserialize, Serialize};

/// Final placement of one requested size inside an atlas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Position of the request in the input sequence
    pub index: usize,
    pub x: u32,
    pub y: u32,
    /// Requested width, independent of storage orientation
    pub width: u32,
    /// Requested height, independent of storage orientation
    pub height: u32,
    /// Stored turned by 90 degrees, occupying `height` x `width` in the atlas
    pub flipped: bool,
}

impl Entry {
    /// Width of the region the entry covers in the atlas
    pub fn footprint_width(&self) -> u32 {
        if self.flipped { self.height } else { self.width }
    }

    /// Height of the region the entry covers in the atlas
    pub fn footprint_height(&self) -> u32 {
        if self.flipped { self.width } else { self.height }
    }
}

/// A completed texture atlas layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atlas {
    /// Atlas index (for multi-atlas support)
    pub index: usize,
    /// Atlas width
    pub width: u32,
    /// Atlas height
    pub height: u32,
    /// Fraction of the atlas covered by entries (0.0 to 1.0)
    pub occupancy: f64,
    /// All entries packed into this atlas, in placement order
    pub entries: Vec<Entry>,
}

/// Result of [`crate::atlas::AtlasBuilder::build`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildOutput {
    pub atlases: Vec<Atlas>,
    /// Request indices that did not fit within the atlas budget, ascending
    pub unplaced: Vec<usize>,
    /// Some accepted atlas could not hold every request left at its turn
    pub oversize: bool,
}

impl BuildOutput {
    pub fn placed_count(&self) -> usize {
        self.atlases.iter().map(|a| a.entries.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}
