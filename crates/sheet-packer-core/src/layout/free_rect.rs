//! MaxRects layout: a list of maximal free cells.
//!
//! Placing a frame runs four steps: pick a free cell with the configured
//! heuristic, reserve the frame at that cell's top-left corner, cut every free
//! cell the reservation overlaps into the parts left outside of it, and drop
//! cells contained in other cells.

use super::heuristic::{FreeRectHeuristic, Score, contact_length};
use crate::bounds::{BoundsRect, Reservation};
use crate::model::{FrameKey, Rect, Size};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct FreeRectLayout {
    sheet: Rect,
    reservation: Reservation,
    heuristic: FreeRectHeuristic,
    free: Vec<BoundsRect>,
    placed: Vec<(FrameKey, BoundsRect)>,
    index: HashMap<FrameKey, usize>,
}

impl FreeRectLayout {
    pub fn new(
        width: u32,
        height: u32,
        reservation: Reservation,
        heuristic: FreeRectHeuristic,
    ) -> Self {
        let sheet = Rect::new(0, 0, width, height);
        Self {
            sheet,
            reservation,
            heuristic,
            free: vec![BoundsRect::free(sheet)],
            placed: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.sheet
    }

    pub fn heuristic(&self) -> FreeRectHeuristic {
        self.heuristic
    }

    /// Current free cells (reserved extents).
    pub fn free_rects(&self) -> impl Iterator<Item = &Rect> + '_ {
        self.free.iter().map(|f| &f.margins_rect)
    }

    pub fn free_list_len(&self) -> usize {
        self.free.len()
    }

    pub fn try_place(&mut self, size: Size, key: FrameKey) -> bool {
        debug_assert!(!self.index.contains_key(&key), "frame {key:?} placed twice");
        let Some(best) = self.find_best_free_rect(size) else {
            return false;
        };
        let bounds = self.reservation.fit(&self.free[best], size);
        debug_assert!(bounds.is_consistent());
        debug_assert!(self.sheet.contains(&bounds.margins_rect));
        tracing::trace!(
            x = bounds.sprite_rect.x,
            y = bounds.sprite_rect.y,
            w = size.w,
            h = size.h,
            heuristic = ?self.heuristic,
            "free rect placement"
        );

        self.index.insert(key, self.placed.len());
        self.placed.push((key, bounds));
        self.split_intersected(&bounds.margins_rect);
        self.remove_redundant();
        true
    }

    fn find_best_free_rect(&self, size: Size) -> Option<usize> {
        let mut best: Option<(usize, Score)> = None;
        for (i, fr) in self.free.iter().enumerate() {
            if fr.sprite_rect.w < size.w || fr.sprite_rect.h < size.h {
                continue;
            }
            let score = self
                .heuristic
                .score(fr, size, || self.contact_score(fr, size));
            if best.is_none_or(|(_, s)| score < s) {
                best = Some((i, score));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Contact length of the would-be reservation with the sheet border and
    /// placed frames, plus the sprite side for each axis the cell matches exactly.
    fn contact_score(&self, fr: &BoundsRect, size: Size) -> u64 {
        let cand = self.reservation.fit(fr, size).margins_rect;
        let mut score = 0u64;
        if cand.x == self.sheet.x {
            score += cand.h as u64;
        }
        if cand.y == self.sheet.y {
            score += cand.w as u64;
        }
        if cand.right_ex() == self.sheet.right_ex() {
            score += cand.h as u64;
        }
        if cand.bottom_ex() == self.sheet.bottom_ex() {
            score += cand.w as u64;
        }
        for (_, placed) in &self.placed {
            score += contact_length(&cand, &placed.margins_rect) as u64;
        }
        if fr.sprite_rect.w == size.w {
            score += cand.h as u64;
        }
        if fr.sprite_rect.h == size.h {
            score += cand.w as u64;
        }
        score
    }

    fn split_intersected(&mut self, used: &Rect) {
        let res = self.reservation;
        let mut produced = Vec::new();
        let mut kept = Vec::with_capacity(self.free.len());
        for fr in self.free.drain(..) {
            match fr.margins_rect.intersection(used) {
                Some(cut) => split_free_cell(&fr, &cut, res, &mut produced),
                None => kept.push(fr),
            }
        }
        kept.extend(produced);
        self.free = kept;
    }

    fn remove_redundant(&mut self) {
        let n = self.free.len();
        let mut keep = vec![true; n];
        for i in 0..n {
            if !keep[i] {
                continue;
            }
            let outer = self.free[i].margins_rect;
            for j in 0..n {
                if i != j && keep[j] && outer.contains(&self.free[j].margins_rect) {
                    keep[j] = false;
                }
            }
        }
        let mut idx = 0;
        self.free.retain(|_| {
            let k = keep[idx];
            idx += 1;
            k
        });
    }

    pub fn find_bounds(&self, key: FrameKey) -> Option<&BoundsRect> {
        self.index.get(&key).map(|&i| &self.placed[i].1)
    }

    pub fn placements(&self) -> impl Iterator<Item = (FrameKey, &BoundsRect)> + '_ {
        self.placed.iter().map(|(k, b)| (*k, b))
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }
}

/// Usable sprite extent of a cell after its reservations, if any is left.
fn usable(extent: u32, reserve: u32) -> Option<u32> {
    extent.checked_sub(reserve).filter(|v| *v > 0)
}

/// Pushes the parts of `fr` lying above, below, left and right of `cut`.
/// Each part reserves edge pixel and margin on the side facing the cut.
fn split_free_cell(fr: &BoundsRect, cut: &Rect, res: Reservation, out: &mut Vec<BoundsRect>) {
    let m = fr.margins_rect;
    let (fx0, fx1, fy0, fy1) = (m.x, m.right_ex(), m.y, m.bottom_ex());
    let (cx0, cx1, cy0, cy1) = (cut.x, cut.right_ex(), cut.y, cut.bottom_ex());

    if fy0 < cy0 && cy0 < fy1 {
        let mut r = *fr;
        r.bottom_edge = res.edge_pixel;
        r.bottom_margin = res.margin;
        r.margins_rect.h = cy0 - fy0;
        if let Some(h) = usable(r.margins_rect.h, r.vertical_reserve()) {
            r.sprite_rect.h = h;
            out.push(r);
        }
    }

    if fy0 < cy1 && cy1 < fy1 {
        let mut r = *fr;
        r.top_edge = res.edge_pixel;
        r.margins_rect.y = cy1;
        r.margins_rect.h = fy1 - cy1;
        r.sprite_rect.y = cy1 + r.top_edge;
        if let Some(h) = usable(r.margins_rect.h, r.vertical_reserve()) {
            r.sprite_rect.h = h;
            out.push(r);
        }
    }

    if fx0 < cx0 && cx0 < fx1 {
        let mut r = *fr;
        r.right_edge = res.edge_pixel;
        r.right_margin = res.margin;
        r.margins_rect.w = cx0 - fx0;
        if let Some(w) = usable(r.margins_rect.w, r.horizontal_reserve()) {
            r.sprite_rect.w = w;
            out.push(r);
        }
    }

    if fx0 < cx1 && cx1 < fx1 {
        let mut r = *fr;
        r.left_edge = res.edge_pixel;
        r.margins_rect.x = cx1;
        r.margins_rect.w = fx1 - cx1;
        r.sprite_rect.x = cx1 + r.left_edge;
        if let Some(w) = usable(r.margins_rect.w, r.horizontal_reserve()) {
            r.sprite_rect.w = w;
            out.push(r);
        }
    }
}
