use log::debug;
use rayon::prelude::*;

use super::{Heuristic, MaxRectsPacker, SELECTOR_HEURISTICS, Size};

/// Winning trial of [`select_best`]
#[derive(Debug, Clone)]
pub struct Selection {
    pub heuristic: Heuristic,
    pub packer: MaxRectsPacker,
    /// Sizes the winning packer could not place
    pub remaining: Vec<Size>,
    pub all_placed: bool,
    /// The winning layout needs more than one bin of this size.
    /// Diagnostic only.
    pub oversize: bool,
}

/// Pack `sizes` into a `width` x `height` bin once per selector heuristic and
/// keep the trial with the least wasted area.
///
/// Trials are independent and run on the rayon pool. Results are compared in
/// [`SELECTOR_HEURISTICS`] order and the first of equally wasteful trials wins.
pub fn select_best(width: u32, height: u32, sizes: &[Size], allow_rotation: bool) -> Selection {
    let trials: Vec<Selection> = SELECTOR_HEURISTICS
        .par_iter()
        .map(|&heuristic| {
            let mut packer = MaxRectsPacker::new(width, height, allow_rotation);
            let mut remaining = sizes.to_vec();
            let all_placed = packer.place_all(&mut remaining, heuristic);
            Selection {
                heuristic,
                packer,
                remaining,
                all_placed,
                oversize: !all_placed,
            }
        })
        .collect();

    let mut best: Option<Selection> = None;
    for trial in trials {
        debug!(
            "{}x{} {}: placed {}/{}, wasted {}",
            width,
            height,
            trial.heuristic,
            sizes.len() - trial.remaining.len(),
            sizes.len(),
            trial.packer.wasted_area()
        );

        let better = best
            .as_ref()
            .is_none_or(|b| trial.packer.wasted_area() < b.packer.wasted_area());
        if better {
            best = Some(trial);
        }
    }

    // SELECTOR_HEURISTICS is non-empty
    #[expect(clippy::expect_used, reason = "selector heuristics are non-empty")]
    best.expect("at least one heuristic should be tried")
}
