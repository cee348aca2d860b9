use crate::bounds::{BoundsRect, Reservation};
use crate::config::PackingAlgorithm;
use crate::model::{FrameKey, Rect, Size};

pub mod free_rect;
pub mod heuristic;
pub mod shelf;

use free_rect::FreeRectLayout;
use heuristic::FreeRectHeuristic;
use shelf::ShelfLayout;

/// Placement state of one sheet for one pack attempt.
///
/// Implementations must keep reserved rects disjoint and inside `rect()`.
/// `try_place` returning `false` is a normal outcome: the caller tries another
/// sheet size or defers the frame to the next sheet. Placing the same key twice
/// on one layout is a caller bug.
#[derive(Debug, Clone)]
pub enum SheetLayout {
    Shelf(ShelfLayout),
    FreeRect(FreeRectLayout),
}

impl SheetLayout {
    pub fn new(width: u32, height: u32, reservation: Reservation, algorithm: PackingAlgorithm) -> Self {
        let heuristic = match algorithm {
            PackingAlgorithm::Basic => {
                return Self::Shelf(ShelfLayout::new(width, height, reservation));
            }
            PackingAlgorithm::MaxRectsBottomLeft => FreeRectHeuristic::BottomLeft,
            PackingAlgorithm::MaxRectsBestAreaFit => FreeRectHeuristic::BestAreaFit,
            PackingAlgorithm::MaxRectsBestShortSideFit => FreeRectHeuristic::BestShortSideFit,
            PackingAlgorithm::MaxRectsBestLongSideFit => FreeRectHeuristic::BestLongSideFit,
            PackingAlgorithm::MaxRectsBestContactPoint => FreeRectHeuristic::BestContactPoint,
        };
        Self::FreeRect(FreeRectLayout::new(width, height, reservation, heuristic))
    }

    pub fn try_place(&mut self, size: Size, key: FrameKey) -> bool {
        match self {
            Self::Shelf(l) => l.try_place(size, key),
            Self::FreeRect(l) => l.try_place(size, key),
        }
    }

    pub fn find_bounds(&self, key: FrameKey) -> Option<&BoundsRect> {
        match self {
            Self::Shelf(l) => l.find_bounds(key),
            Self::FreeRect(l) => l.find_bounds(key),
        }
    }

    /// Sheet extents, fixed at construction.
    pub fn rect(&self) -> Rect {
        match self {
            Self::Shelf(l) => l.rect(),
            Self::FreeRect(l) => l.rect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.rect().w
    }

    pub fn height(&self) -> u32 {
        self.rect().h
    }

    /// Sheet area, used to break ties between equally filled candidates.
    pub fn weight(&self) -> u64 {
        self.rect().area()
    }

    pub fn algorithm(&self) -> PackingAlgorithm {
        match self {
            Self::Shelf(_) => PackingAlgorithm::Basic,
            Self::FreeRect(l) => match l.heuristic() {
                FreeRectHeuristic::BottomLeft => PackingAlgorithm::MaxRectsBottomLeft,
                FreeRectHeuristic::BestAreaFit => PackingAlgorithm::MaxRectsBestAreaFit,
                FreeRectHeuristic::BestShortSideFit => PackingAlgorithm::MaxRectsBestShortSideFit,
                FreeRectHeuristic::BestLongSideFit => PackingAlgorithm::MaxRectsBestLongSideFit,
                FreeRectHeuristic::BestContactPoint => PackingAlgorithm::MaxRectsBestContactPoint,
            },
        }
    }

    /// Placed frames in placement order.
    pub fn placements(&self) -> Box<dyn Iterator<Item = (FrameKey, &BoundsRect)> + '_> {
        match self {
            Self::Shelf(l) => Box::new(l.placements()),
            Self::FreeRect(l) => Box::new(l.placements()),
        }
    }

    pub fn placed_count(&self) -> usize {
        match self {
            Self::Shelf(l) => l.placed_count(),
            Self::FreeRect(l) => l.placed_count(),
        }
    }
}
