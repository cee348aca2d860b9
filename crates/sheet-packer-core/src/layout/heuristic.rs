use crate::bounds::BoundsRect;
use crate::model::{Rect, Size};

/// Free-rect selection rule of the MaxRects layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreeRectHeuristic {
    /// Topmost free rect, then leftmost.
    BottomLeft,
    /// Smallest free rect, then smallest leftover short side.
    BestAreaFit,
    /// Smallest leftover short side.
    BestShortSideFit,
    /// Smallest leftover long side.
    BestLongSideFit,
    /// Longest contact with the sheet border and placed frames.
    BestContactPoint,
}

/// Lower is better; the earlier free rect wins equal scores.
pub(crate) type Score = (i64, i64);

impl FreeRectHeuristic {
    /// Scores `free` for a frame of `size`. `contact` is only evaluated by
    /// `BestContactPoint`, which needs the surrounding layout.
    pub(crate) fn score(self, free: &BoundsRect, size: Size, contact: impl FnOnce() -> u64) -> Score {
        let rest_w = free.sprite_rect.w as i64 - size.w as i64;
        let rest_h = free.sprite_rect.h as i64 - size.h as i64;
        let short_side = rest_w.min(rest_h);
        let long_side = rest_w.max(rest_h);
        match self {
            Self::BottomLeft => (free.margins_rect.y as i64, free.margins_rect.x as i64),
            Self::BestAreaFit => (free.sprite_rect.area() as i64, short_side),
            Self::BestShortSideFit => (short_side, long_side),
            Self::BestLongSideFit => (long_side, short_side),
            Self::BestContactPoint => (-(contact() as i64), short_side),
        }
    }
}

pub(crate) fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    let start = a1.max(b1);
    let end = a2.min(b2);
    end.saturating_sub(start)
}

/// Length of the border segment `a` and `b` share when they sit side by side.
pub(crate) fn contact_length(a: &Rect, b: &Rect) -> u32 {
    let mut len = 0;
    if a.x == b.right_ex() || b.x == a.right_ex() {
        len += overlap_1d(a.y, a.bottom_ex(), b.y, b.bottom_ex());
    }
    if a.y == b.bottom_ex() || b.y == a.bottom_ex() {
        len += overlap_1d(a.x, a.right_ex(), b.x, b.right_ex());
    }
    len
}
