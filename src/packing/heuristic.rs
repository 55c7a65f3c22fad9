use std::fmt;

/// Rule used to choose a free rectangle for a new placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Best Short Side Fit - minimizes the shorter leftover side
    BestShortSideFit,
    /// Best Long Side Fit - minimizes the longer leftover side
    BestLongSideFit,
    /// Best Area Fit - picks the smallest free rectangle
    BestAreaFit,
    /// Bottom Left - Tetris-style packing
    BottomLeft,
    /// Contact Point - maximizes contact with placed rectangles and bin edges
    ContactPoint,
}

/// Heuristics tried by the selector, in comparison order.
///
/// Contact point is only available through [`crate::packing::MaxRectsPacker::place`].
pub const SELECTOR_HEURISTICS: [Heuristic; 4] = [
    Heuristic::BestAreaFit,
    Heuristic::BestLongSideFit,
    Heuristic::BestShortSideFit,
    Heuristic::BottomLeft,
];

impl Heuristic {
    pub fn name(self) -> &'static str {
        match self {
            Heuristic::BestShortSideFit => "best-short-side-fit",
            Heuristic::BestLongSideFit => "best-long-side-fit",
            Heuristic::BestAreaFit => "best-area-fit",
            Heuristic::BottomLeft => "bottom-left",
            Heuristic::ContactPoint => "contact-point",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Placement score, lower is better.
///
/// Compared lexicographically: `primary` first, `secondary` breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    pub primary: i64,
    pub secondary: i64,
}

impl Score {
    pub fn new(primary: i64, secondary: i64) -> Self {
        Self { primary, secondary }
    }
}
