use anyhow::Result;
use log::{debug, info, warn};

use super::resolve::{Quantizer, resolve_entries};
use super::{Atlas, BuildOutput};
use crate::error::AtlasError;
use crate::packing::{Selection, Size, select_best};

/// Occupancy an atlas must exceed before its size is accepted
const OCCUPANCY_THRESHOLD: f64 = 0.5;

/// Largest supported quantization shift
pub const MAX_ALIGN_SHIFT: u32 = 15;

/// Configuration for atlas building
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    pub max_width: u32,
    pub max_height: u32,
    pub max_atlas_count: usize,
    pub optimize_size: bool,
    pub force_square: bool,
    pub allow_rotation: bool,
    pub align_shift: u32,
    requests: Vec<Size>,
}

/// Candidate bin size search state for a single atlas
struct SizeSearch {
    width: u32,
    height: u32,
    /// Size before the most recent shrink step
    previous: Option<(u32, u32)>,
    reverted: bool,
    pass: u32,
}

impl AtlasBuilder {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            max_atlas_count: 1,
            optimize_size: true,
            force_square: false,
            allow_rotation: true,
            align_shift: 0,
            requests: Vec::new(),
        }
    }

    pub fn max_atlas_count(mut self, count: usize) -> Self {
        self.max_atlas_count = count;
        self
    }

    pub fn optimize_size(mut self, optimize: bool) -> Self {
        self.optimize_size = optimize;
        self
    }

    pub fn force_square(mut self, square: bool) -> Self {
        self.force_square = square;
        self
    }

    pub fn allow_rotation(mut self, rotation: bool) -> Self {
        self.allow_rotation = rotation;
        self
    }

    pub fn align_shift(mut self, shift: u32) -> Self {
        self.align_shift = shift;
        self
    }

    /// Append a request; returns its index in the build output
    pub fn add_rect(&mut self, width: u32, height: u32) -> usize {
        self.requests.push(Size::new(width, height));
        self.requests.len() - 1
    }

    /// Requests added so far, in index order
    pub fn rects(&self) -> &[Size] {
        &self.requests
    }

    fn validate(&self) -> Result<(u32, u32), AtlasError> {
        if self.max_atlas_count == 0 {
            return Err(AtlasError::InvalidConfig(
                "maximum atlas count must be at least 1".to_string(),
            ));
        }
        if self.align_shift > MAX_ALIGN_SHIFT {
            return Err(AtlasError::InvalidConfig(format!(
                "align shift {} is larger than {}",
                self.align_shift, MAX_ALIGN_SHIFT
            )));
        }

        let quantizer = Quantizer::new(self.align_shift);
        let bin = (
            quantizer.down(self.max_width),
            quantizer.down(self.max_height),
        );
        if bin.0 == 0 || bin.1 == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "atlas size {}x{} is smaller than one {}px cell",
                self.max_width,
                self.max_height,
                1u32 << self.align_shift
            )));
        }

        Ok(bin)
    }

    /// Longer side against the bin's longer side, shorter against shorter.
    ///
    /// Orientation is ignored: with rotation off a request that only fits
    /// turned passes here and is left over by the packer instead.
    fn fits_bin(size: Size, bin_width: u32, bin_height: u32) -> bool {
        size.width.max(size.height) <= bin_width.max(bin_height)
            && size.width.min(size.height) <= bin_width.min(bin_height)
    }

    /// Pack all added requests into at most `max_atlas_count` atlases
    pub fn build(&self) -> Result<BuildOutput> {
        let (bin_width, bin_height) = self.validate()?;
        let quantizer = Quantizer::new(self.align_shift);
        let quantized: Vec<Size> = self.requests.iter().map(|&r| quantizer.size(r)).collect();

        if let Some(index) = quantized
            .iter()
            .position(|&size| !Self::fits_bin(size, bin_width, bin_height))
        {
            let request = self.requests[index];
            warn!(
                "Request {} ({}x{}) can never fit a {}x{} atlas, nothing was packed",
                index, request.width, request.height, self.max_width, self.max_height
            );
            return Ok(BuildOutput {
                atlases: Vec::new(),
                unplaced: (0..self.requests.len()).collect(),
                oversize: false,
            });
        }

        let mut claimed = vec![false; self.requests.len()];
        let mut remaining = quantized;
        let mut atlases: Vec<Atlas> = Vec::new();
        let mut oversize = false;

        while !remaining.is_empty() && atlases.len() < self.max_atlas_count {
            let index = atlases.len();
            let (width, height, selection) =
                self.search_size(index, bin_width, bin_height, &remaining);

            if selection.packer.used_rects().is_empty() {
                warn!(
                    "Atlas {}: none of the {} remaining requests could be placed",
                    index,
                    remaining.len()
                );
                break;
            }

            if selection.oversize {
                debug!(
                    "Atlas {}: {} requests left over at {}x{}",
                    index,
                    selection.remaining.len(),
                    width,
                    height
                );
            }
            oversize |= selection.oversize;

            let entries = resolve_entries(
                index,
                selection.packer.used_rects(),
                &self.requests,
                &mut claimed,
                quantizer,
            )?;

            let atlas = Atlas {
                index,
                width: quantizer.descale(width),
                height: quantizer.descale(height),
                occupancy: selection.packer.occupancy(),
                entries,
            };

            info!(
                "Atlas {}: {}x{} with {} entries ({:.1}% occupancy, {})",
                index,
                atlas.width,
                atlas.height,
                atlas.entries.len(),
                atlas.occupancy * 100.0,
                selection.heuristic,
            );

            atlases.push(atlas);
            remaining = selection.remaining;
        }

        let unplaced: Vec<usize> = claimed
            .iter()
            .enumerate()
            .filter(|(_, taken)| !**taken)
            .map(|(i, _)| i)
            .collect();

        if !unplaced.is_empty() {
            warn!(
                "{} request(s) did not fit in {} atlas(es)",
                unplaced.len(),
                self.max_atlas_count
            );
        }

        let output = BuildOutput {
            atlases,
            unplaced,
            oversize,
        };

        info!(
            "Created {} atlas(es) with {} total entries",
            output.atlases.len(),
            output.placed_count()
        );

        Ok(output)
    }

    /// Find the bin size for one atlas, starting from the full size.
    ///
    /// A size is accepted when the first pass is more than half full, a later
    /// pass is more than half full with everything placed, the search has just
    /// reverted a shrink that lost requests, or size optimization is off.
    /// Otherwise a size that places everything is shrunk and a size that does
    /// not is grown back.
    fn search_size(
        &self,
        atlas_index: usize,
        max_width: u32,
        max_height: u32,
        remaining: &[Size],
    ) -> (u32, u32, Selection) {
        let mut search = SizeSearch {
            width: max_width,
            height: max_height,
            previous: None,
            reverted: false,
            pass: 1,
        };

        loop {
            let selection = select_best(search.width, search.height, remaining, self.allow_rotation);
            let occupancy = selection.packer.occupancy();

            debug!(
                "Atlas {} pass {}: {}x{} occupancy {:.1}%, placed {}/{}",
                atlas_index,
                search.pass,
                search.width,
                search.height,
                occupancy * 100.0,
                remaining.len() - selection.remaining.len(),
                remaining.len()
            );

            let first_pass_full = search.pass == 1 && occupancy > OCCUPANCY_THRESHOLD;
            let later_pass_full =
                search.pass > 1 && occupancy > OCCUPANCY_THRESHOLD && selection.all_placed;

            if first_pass_full || later_pass_full || search.reverted || !self.optimize_size {
                return (search.width, search.height, selection);
            }

            if !selection.all_placed {
                // Only a shrunk size can be grown back; at full size the
                // revert would retry the same bin, so accept it right away
                let Some((width, height)) = search.previous.take() else {
                    return (search.width, search.height, selection);
                };
                search.width = width;
                search.height = height;
                search.reverted = true;
            } else {
                let Some((width, height)) = self.shrink(search.width, search.height) else {
                    return (search.width, search.height, selection);
                };
                search.previous = Some((search.width, search.height));
                search.width = width;
                search.height = height;
            }

            search.pass += 1;
        }
    }

    /// Halve both sides when forcing square steps, otherwise the larger side.
    /// Returns `None` when the side to halve is already a single cell.
    fn shrink(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.force_square {
            (width > 1 && height > 1).then(|| (width / 2, height / 2))
        } else if width < height {
            (height > 1).then(|| (width, height / 2))
        } else {
            (width > 1).then(|| (width / 2, height))
        }
    }
}
