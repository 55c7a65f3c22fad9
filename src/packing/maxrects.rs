use super::rect::common_interval_length;
use super::{Heuristic, Rect, Score, Size};

/// MaxRects bin packer implementation
#[derive(Debug, Clone)]
pub struct MaxRectsPacker {
    bin_width: u32,
    bin_height: u32,
    allow_rotation: bool,
    free_rects: Vec<Rect>,
    used_rects: Vec<Rect>,
}

impl MaxRectsPacker {
    pub fn new(width: u32, height: u32, allow_rotation: bool) -> Self {
        let initial_rect = Rect::new(0, 0, width, height);
        Self {
            bin_width: width,
            bin_height: height,
            allow_rotation,
            free_rects: vec![initial_rect],
            used_rects: Vec::new(),
        }
    }

    pub fn bin_width(&self) -> u32 {
        self.bin_width
    }

    pub fn bin_height(&self) -> u32 {
        self.bin_height
    }

    /// Rectangles committed so far, in placement order
    pub fn used_rects(&self) -> &[Rect] {
        &self.used_rects
    }

    /// Maximal free regions of the bin. They may overlap each other.
    pub fn free_rects(&self) -> &[Rect] {
        &self.free_rects
    }

    /// Try to insert a rectangle with the given dimensions.
    ///
    /// Returns the placed rectangle if successful; its size is swapped when the
    /// packer chose the rotated orientation. Returns `None` and leaves the packer
    /// untouched when no free rectangle can hold either orientation.
    pub fn place(&mut self, width: u32, height: u32, heuristic: Heuristic) -> Option<Rect> {
        let (best_rect, _) = self.find_position(width, height, heuristic)?;
        self.place_rect(best_rect);
        Some(best_rect)
    }

    /// Whether some free rectangle could take `width` x `height` right now,
    /// turned if rotation is allowed. Does not modify the packer.
    pub fn can_fit(&self, width: u32, height: u32) -> bool {
        self.free_rects.iter().any(|free_rect| {
            free_rect.fits(width, height) || (self.allow_rotation && free_rect.fits(height, width))
        })
    }

    /// Insert a batch of sizes, always committing the best scoring
    /// (size, position) pair next.
    ///
    /// Placed sizes are removed from `sizes`; whatever is left could not be
    /// placed. Returns true if every size was placed.
    pub fn place_all(&mut self, sizes: &mut Vec<Size>, heuristic: Heuristic) -> bool {
        while !sizes.is_empty() {
            let mut best: Option<(usize, Rect, Score)> = None;

            for (i, size) in sizes.iter().enumerate() {
                if let Some((rect, score)) = self.find_position(size.width, size.height, heuristic)
                    && best.as_ref().is_none_or(|(_, _, b)| score < *b)
                {
                    best = Some((i, rect, score));
                }
            }

            let Some((index, rect, _)) = best else {
                break;
            };

            self.place_rect(rect);
            sizes.remove(index);
        }

        sizes.is_empty()
    }

    fn find_position(
        &self,
        width: u32,
        height: u32,
        heuristic: Heuristic,
    ) -> Option<(Rect, Score)> {
        let mut best: Option<(Rect, Score)> = None;

        let mut consider = |free_rect: &Rect, candidate: Rect| {
            let score = self.score_rect(free_rect, &candidate, heuristic);
            if best.as_ref().is_none_or(|(_, b)| score < *b) {
                best = Some((candidate, score));
            }
        };

        for free_rect in &self.free_rects {
            if free_rect.fits(width, height) {
                consider(free_rect, Rect::new(free_rect.x, free_rect.y, width, height));
            }
            if self.allow_rotation && free_rect.fits(height, width) {
                consider(free_rect, Rect::new(free_rect.x, free_rect.y, height, width));
            }
        }

        best
    }

    /// Score `candidate`, already sized in its final orientation, against the
    /// free rectangle it would occupy.
    fn score_rect(&self, free_rect: &Rect, candidate: &Rect, heuristic: Heuristic) -> Score {
        let leftover_h = i64::from(free_rect.width - candidate.width);
        let leftover_v = i64::from(free_rect.height - candidate.height);
        let short = leftover_h.min(leftover_v);
        let long = leftover_h.max(leftover_v);

        match heuristic {
            Heuristic::BestShortSideFit => Score::new(short, long),
            Heuristic::BestLongSideFit => Score::new(long, short),
            Heuristic::BestAreaFit => {
                let area_fit = free_rect.area().abs_diff(candidate.area());
                Score::new(i64::try_from(area_fit).unwrap_or(i64::MAX), short)
            }
            Heuristic::BottomLeft => Score::new(
                i64::from(free_rect.y) + i64::from(candidate.height),
                i64::from(free_rect.x),
            ),
            // More contact is better, negate so that lower still wins
            Heuristic::ContactPoint => {
                Score::new(-i64::from(self.contact_point_score(candidate)), 0)
            }
        }
    }

    /// Total edge length `rect` would share with the bin border and placed rectangles
    fn contact_point_score(&self, rect: &Rect) -> u32 {
        let mut score = 0;

        if rect.x == 0 || rect.right() == self.bin_width {
            score += rect.height;
        }
        if rect.y == 0 || rect.bottom() == self.bin_height {
            score += rect.width;
        }

        for used in &self.used_rects {
            if used.x == rect.right() || used.right() == rect.x {
                score += common_interval_length(used.y, used.bottom(), rect.y, rect.bottom());
            }
            if used.y == rect.bottom() || used.bottom() == rect.y {
                score += common_interval_length(used.x, used.right(), rect.x, rect.right());
            }
        }

        score
    }

    fn place_rect(&mut self, rect: Rect) {
        let mut new_rects = Vec::new();

        self.free_rects.retain(|free_rect| {
            if !rect.intersects(free_rect) {
                return true;
            }
            split_free_rect(free_rect, &rect, &mut new_rects);
            false
        });

        self.free_rects.extend(new_rects);
        self.prune_free_rects();
        self.used_rects.push(rect);
    }

    /// Remove free rectangles that are fully contained within others.
    ///
    /// Every rectangle is tested against the whole list before anything is
    /// removed, so the outcome does not depend on scan order. Of several
    /// identical rectangles only the first is kept.
    fn prune_free_rects(&mut self) {
        let rects = &self.free_rects;
        let redundant: Vec<bool> = rects
            .iter()
            .enumerate()
            .map(|(i, inner)| {
                rects.iter().enumerate().any(|(j, outer)| {
                    j != i && outer.contains(inner) && (j < i || outer != inner)
                })
            })
            .collect();

        let mut redundant = redundant.into_iter();
        self.free_rects
            .retain(|_| !redundant.next().unwrap_or(false));
    }

    pub fn used_area(&self) -> u64 {
        self.used_rects.iter().map(Rect::area).sum()
    }

    fn bin_area(&self) -> u64 {
        u64::from(self.bin_width) * u64::from(self.bin_height)
    }

    /// Get packing efficiency as a ratio (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total_area = self.bin_area();
        if total_area == 0 {
            return 0.0;
        }
        self.used_area() as f64 / total_area as f64
    }

    /// Bin area not covered by any placement
    pub fn wasted_area(&self) -> u64 {
        self.bin_area().saturating_sub(self.used_area())
    }
}

/// Split `free_rect` around `used`, pushing the up to four remaining slivers.
/// Each sliver keeps the full extent of `free_rect` along its long axis.
fn split_free_rect(free_rect: &Rect, used: &Rect, out: &mut Vec<Rect>) {
    // Top portion
    if used.y > free_rect.y && used.y < free_rect.bottom() {
        out.push(Rect::new(
            free_rect.x,
            free_rect.y,
            free_rect.width,
            used.y - free_rect.y,
        ));
    }

    // Bottom portion
    if used.bottom() < free_rect.bottom() {
        out.push(Rect::new(
            free_rect.x,
            used.bottom(),
            free_rect.width,
            free_rect.bottom() - used.bottom(),
        ));
    }

    // Left portion
    if used.x > free_rect.x && used.x < free_rect.right() {
        out.push(Rect::new(
            free_rect.x,
            free_rect.y,
            used.x - free_rect.x,
            free_rect.height,
        ));
    }

    // Right portion
    if used.right() < free_rect.right() {
        out.push(Rect::new(
            used.right(),
            free_rect.y,
            free_rect.right() - used.right(),
            free_rect.height,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_HEURISTICS: [Heuristic; 5] = [
        Heuristic::BestShortSideFit,
        Heuristic::BestLongSideFit,
        Heuristic::BestAreaFit,
        Heuristic::BottomLeft,
        Heuristic::ContactPoint,
    ];

    /// Deterministic size generator so property checks stay reproducible
    fn pseudo_random_sizes(seed: u64, count: usize, max_side: u32) -> Vec<Size> {
        let mut state = seed;
        let mut next = move || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % u64::from(max_side)) as u32 + 1
        };
        (0..count).map(|_| Size::new(next(), next())).collect()
    }

    fn assert_no_overlap(rects: &[Rect]) {
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    fn assert_free_list_pruned(packer: &MaxRectsPacker) {
        let free = packer.free_rects();
        for (i, a) in free.iter().enumerate() {
            for (j, b) in free.iter().enumerate() {
                if i != j {
                    assert!(!b.contains(a), "{:?} is contained in {:?}", a, b);
                }
            }
        }
    }

    fn assert_within_bin(packer: &MaxRectsPacker) {
        for r in packer.used_rects().iter().chain(packer.free_rects()) {
            assert!(r.right() <= packer.bin_width());
            assert!(r.bottom() <= packer.bin_height());
        }
    }

    #[test]
    fn test_single_insert() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        let rect = packer.place(50, 50, Heuristic::BestShortSideFit).unwrap();

        assert_eq!(rect, Rect::new(0, 0, 50, 50));
        assert_eq!(packer.used_rects(), &[rect]);
    }

    #[test]
    fn test_four_quarters_fill_bin() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        let rects: Vec<Rect> = (0..4)
            .map(|_| packer.place(50, 50, Heuristic::BestShortSideFit).unwrap())
            .collect();

        assert_no_overlap(&rects);
        assert_eq!(packer.occupancy(), 1.0);
        assert_eq!(packer.wasted_area(), 0);
        assert!(packer.free_rects().is_empty());
    }

    #[test]
    fn test_too_large_leaves_packer_untouched() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        let result = packer.place(150, 80, Heuristic::BestShortSideFit);

        assert!(result.is_none());
        assert_eq!(packer.free_rects(), &[Rect::new(0, 0, 100, 100)]);
        assert!(packer.used_rects().is_empty());
    }

    #[test]
    fn test_can_fit_tracks_free_space() {
        let mut packer = MaxRectsPacker::new(100, 40, false);
        assert!(packer.can_fit(100, 40));
        assert!(!packer.can_fit(40, 100));
        assert!(MaxRectsPacker::new(100, 40, true).can_fit(40, 100));

        packer.place(60, 40, Heuristic::BestShortSideFit).unwrap();
        assert!(packer.can_fit(40, 40));
        assert!(!packer.can_fit(41, 40));
        assert_eq!(packer.used_rects().len(), 1);
    }

    #[test]
    fn test_rotation_allows_fit() {
        let mut upright = MaxRectsPacker::new(100, 40, false);
        assert!(upright.place(30, 80, Heuristic::BestAreaFit).is_none());

        let mut rotating = MaxRectsPacker::new(100, 40, true);
        let rect = rotating.place(30, 80, Heuristic::BestAreaFit).unwrap();
        assert_eq!((rect.width, rect.height), (80, 30));
    }

    #[test]
    fn test_split_produces_maximal_slivers() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        packer.place(30, 40, Heuristic::BottomLeft).unwrap();

        let mut free = packer.free_rects().to_vec();
        free.sort_by_key(|r| (r.x, r.y));
        assert_eq!(
            free,
            vec![Rect::new(0, 40, 100, 60), Rect::new(30, 0, 70, 100)]
        );
    }

    #[test]
    fn test_bottom_left_fills_rows_first() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        let a = packer.place(40, 20, Heuristic::BottomLeft).unwrap();
        let b = packer.place(40, 20, Heuristic::BottomLeft).unwrap();
        let c = packer.place(40, 20, Heuristic::BottomLeft).unwrap();

        assert_eq!((a.x, a.y), (0, 0));
        assert_eq!((b.x, b.y), (40, 0));
        assert_eq!((c.x, c.y), (0, 20));
    }

    #[test]
    fn test_contact_point_prefers_touching_edges() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        packer.place(50, 100, Heuristic::ContactPoint).unwrap();
        let next = packer.place(50, 50, Heuristic::ContactPoint).unwrap();

        // Corner at (50, 0) touches the bin top, the bin right and the first rect
        assert_eq!(next.x, 50);
        assert!(next.y == 0 || next.y == 50);
    }

    #[test]
    fn test_contact_point_scores_rotated_footprint() {
        let mut packer = MaxRectsPacker::new(100, 20, true);
        let rect = packer.place(20, 100, Heuristic::ContactPoint).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 100, 20));
    }

    #[test]
    fn test_place_all_packs_everything_it_can() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        let mut sizes = vec![Size::new(50, 50); 5];

        let all_placed = packer.place_all(&mut sizes, Heuristic::BestShortSideFit);

        assert!(!all_placed);
        assert_eq!(sizes, vec![Size::new(50, 50)]);
        assert_eq!(packer.used_rects().len(), 4);
    }

    #[test]
    fn test_place_all_picks_best_fit_first() {
        // Input order would block the 100x60 slot with the small rect first
        let mut packer = MaxRectsPacker::new(100, 100, false);
        let mut sizes = vec![Size::new(10, 10), Size::new(100, 60)];

        assert!(packer.place_all(&mut sizes, Heuristic::BestShortSideFit));
        assert_eq!(packer.used_rects()[0].size(), Size::new(100, 60));
    }

    #[test]
    fn test_place_all_reports_success() {
        let mut packer = MaxRectsPacker::new(64, 64, true);
        let mut sizes = vec![Size::new(32, 64), Size::new(64, 16), Size::new(16, 32)];

        assert!(packer.place_all(&mut sizes, Heuristic::BestAreaFit));
        assert!(sizes.is_empty());
        assert_no_overlap(packer.used_rects());
    }

    #[test]
    fn test_occupancy_and_waste() {
        let mut packer = MaxRectsPacker::new(100, 100, false);
        packer.place(50, 50, Heuristic::BestShortSideFit).unwrap();

        assert!((packer.occupancy() - 0.25).abs() < f64::EPSILON);
        assert_eq!(packer.wasted_area(), 7500);
    }

    #[test]
    fn test_occupancy_of_empty_bin() {
        let packer = MaxRectsPacker::new(0, 0, true);
        assert_eq!(packer.occupancy(), 0.0);
        assert_eq!(packer.wasted_area(), 0);
    }

    #[test]
    fn test_properties_hold_for_random_batches() {
        for seed in 0..8 {
            for heuristic in ALL_HEURISTICS {
                for allow_rotation in [false, true] {
                    let mut packer = MaxRectsPacker::new(256, 192, allow_rotation);
                    let mut sizes = pseudo_random_sizes(seed, 40, 64);
                    packer.place_all(&mut sizes, heuristic);

                    assert_no_overlap(packer.used_rects());
                    assert_free_list_pruned(&packer);
                    assert_within_bin(&packer);
                    let occupancy = packer.occupancy();
                    assert!((0.0..=1.0).contains(&occupancy));
                    assert_eq!(
                        packer.wasted_area() + packer.used_area(),
                        256 * 192,
                        "seed {} {:?}",
                        seed,
                        heuristic
                    );
                }
            }
        }
    }

    #[test]
    fn test_free_list_pruned_after_every_single_placement() {
        let mut packer = MaxRectsPacker::new(128, 128, true);
        for size in pseudo_random_sizes(42, 30, 40) {
            packer.place(size.width, size.height, Heuristic::BestShortSideFit);
            assert_free_list_pruned(&packer);
            assert_no_overlap(packer.used_rects());
        }
    }

    #[test]
    fn test_deterministic() {
        for heuristic in ALL_HEURISTICS {
            let run = || {
                let mut packer = MaxRectsPacker::new(200, 200, true);
                let mut sizes = pseudo_random_sizes(7, 50, 50);
                packer.place_all(&mut sizes, heuristic);
                (packer.used_rects().to_vec(), sizes)
            };
            assert_eq!(run(), run());
        }
    }
}
