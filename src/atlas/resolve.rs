use super::Entry;
use crate::error::AtlasError;
use crate::packing::{Rect, Size};

/// Rounds pixel dimensions to a `1 << shift` grid and back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    shift: u32,
}

impl Quantizer {
    pub fn new(shift: u32) -> Self {
        Self { shift }
    }

    /// Round a request dimension up to grid units
    pub fn up(&self, value: u32) -> u32 {
        value.div_ceil(1 << self.shift)
    }

    /// Round a bin dimension down to grid units, so it never grows past its maximum
    pub fn down(&self, value: u32) -> u32 {
        value >> self.shift
    }

    /// Grid units back to pixels
    pub fn descale(&self, value: u32) -> u32 {
        value << self.shift
    }

    pub fn size(&self, size: Size) -> Size {
        Size::new(self.up(size.width), self.up(size.height))
    }
}

/// Map each placement of an accepted atlas back to the request it was made for.
///
/// A placement claims the first unclaimed request with the same grid size,
/// falling back to the first unclaimed request with the swapped size, which
/// marks the entry as flipped. Claimed requests are recorded in `claimed`.
pub fn resolve_entries(
    atlas_index: usize,
    placements: &[Rect],
    requests: &[Size],
    claimed: &mut [bool],
    quantizer: Quantizer,
) -> Result<Vec<Entry>, AtlasError> {
    let mut entries = Vec::with_capacity(placements.len());

    for placement in placements {
        let footprint = placement.size();
        let find = |wanted: Size| {
            requests
                .iter()
                .zip(claimed.iter())
                .position(|(&request, &taken)| !taken && quantizer.size(request) == wanted)
        };

        let (index, flipped) = match find(footprint) {
            Some(index) => (index, false),
            None => match find(footprint.rotated()) {
                Some(index) => (index, true),
                None => {
                    return Err(AtlasError::InconsistentPlacement {
                        atlas: atlas_index,
                        width: placement.width,
                        height: placement.height,
                    });
                }
            },
        };

        claimed[index] = true;
        let request = requests[index];
        entries.push(Entry {
            index,
            x: quantizer.descale(placement.x),
            y: quantizer.descale(placement.y),
            width: request.width,
            height: request.height,
            flipped,
        });
    }

    Ok(entries)
}
