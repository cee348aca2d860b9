use crate::model::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Placement record of one sprite frame on a sheet.
///
/// `sprite_rect` is where the frame's pixels go. `margins_rect` is the whole
/// region reserved for it: the sprite rect grown by duplicated edge pixels on
/// each side plus the trailing (right/bottom) margin. Only `margins_rect` takes
/// part in collision bookkeeping.
///
/// Free cells of the MaxRects layout reuse this type: there `sprite_rect` is the
/// largest sprite that still fits once the cell's reservations are honoured.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundsRect {
    pub sprite_rect: Rect,
    pub margins_rect: Rect,
    pub left_edge: u32,
    pub right_edge: u32,
    pub top_edge: u32,
    pub bottom_edge: u32,
    pub right_margin: u32,
    pub bottom_margin: u32,
}

impl BoundsRect {
    /// Unreserved cell covering `rect`.
    pub(crate) fn free(rect: Rect) -> Self {
        Self {
            sprite_rect: rect,
            margins_rect: rect,
            ..Default::default()
        }
    }

    pub fn has_left_edge(&self) -> bool {
        self.left_edge > 0
    }
    pub fn has_right_edge(&self) -> bool {
        self.right_edge > 0
    }
    pub fn has_top_edge(&self) -> bool {
        self.top_edge > 0
    }
    pub fn has_bottom_edge(&self) -> bool {
        self.bottom_edge > 0
    }

    /// Pixels reserved around the sprite along x.
    pub fn horizontal_reserve(&self) -> u32 {
        self.left_edge
            .saturating_add(self.right_edge)
            .saturating_add(self.right_margin)
    }

    /// Pixels reserved around the sprite along y.
    pub fn vertical_reserve(&self) -> u32 {
        self.top_edge
            .saturating_add(self.bottom_edge)
            .saturating_add(self.bottom_margin)
    }

    /// `sprite_rect` sits inside `margins_rect` at the offsets the reservations describe.
    pub fn is_consistent(&self) -> bool {
        self.margins_rect.contains(&self.sprite_rect)
            && self.sprite_rect.x == self.margins_rect.x + self.left_edge
            && self.sprite_rect.y == self.margins_rect.y + self.top_edge
    }
}

/// Edge-pixel and margin settings shared by every layout of a pack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub edge_pixel: u32,
    pub margin: u32,
}

impl Reservation {
    pub fn new(duplicate_edge_pixel: bool, margin: u32) -> Self {
        Self {
            edge_pixel: u32::from(duplicate_edge_pixel),
            margin,
        }
    }

    /// Leftover below or at this many pixels is absorbed instead of split off.
    pub fn splitter(&self) -> u32 {
        self.margin.saturating_add(self.edge_pixel * 2)
    }

    /// Spends part of `rest` on a duplicated edge pixel if that side has none yet.
    pub(crate) fn take_edge(&self, rest: &mut u32, edge: &mut u32) {
        if *edge == 0 && *rest >= self.edge_pixel {
            *rest -= self.edge_pixel;
            *edge = self.edge_pixel;
        }
    }

    /// Reserves `size` at the top-left corner of the free cell.
    ///
    /// Slack up to the splitter threshold is folded into the trailing edge and
    /// margin; larger slack gets the canonical edge + margin and stays free.
    pub(crate) fn fit(&self, free: &BoundsRect, size: Size) -> BoundsRect {
        debug_assert!(free.sprite_rect.w >= size.w && free.sprite_rect.h >= size.h);
        let mut b = *free;
        let mut rest_w = free.sprite_rect.w - size.w;
        let mut rest_h = free.sprite_rect.h - size.h;
        b.sprite_rect.w = size.w;
        b.sprite_rect.h = size.h;

        if rest_w <= self.splitter() {
            self.take_edge(&mut rest_w, &mut b.right_edge);
            b.right_margin += rest_w;
        } else {
            b.right_margin = self.margin;
            b.right_edge = self.edge_pixel;
        }

        if rest_h <= self.splitter() {
            self.take_edge(&mut rest_h, &mut b.bottom_edge);
            b.bottom_margin += rest_h;
        } else {
            b.bottom_margin = self.margin;
            b.bottom_edge = self.edge_pixel;
        }

        b.margins_rect.w = size.w + b.horizontal_reserve();
        b.margins_rect.h = size.h + b.vertical_reserve();
        b
    }
}
