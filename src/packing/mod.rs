mod heuristic;
mod maxrects;
mod rect;
mod selector;

pub use heuristic::{Heuristic, SELECTOR_HEURISTICS, Score};
pub use maxrects::MaxRectsPacker;
pub use rect::{Rect, Size};
pub use selector::{Selection, select_best};
