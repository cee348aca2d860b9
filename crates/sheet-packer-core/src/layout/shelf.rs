//! Binary split tree ("Basic") layout.
//!
//! Every node covers a rect of the sheet; leaves are either empty or hold one
//! frame. A frame goes into the first empty leaf (depth-first, child 0 before
//! child 1) that can take it. A leaf that is too large is cut in two along the
//! axis with more slack and the frame is placed into the first half.
//! Nodes live in an arena and refer to their children by index.

use crate::bounds::{BoundsRect, Reservation};
use crate::model::{FrameKey, Rect, Size};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Node {
    children: Option<[usize; 2]>,
    cell: BoundsRect,
    key: Option<FrameKey>,
}

impl Node {
    fn leaf(cell: BoundsRect) -> Self {
        Self {
            children: None,
            cell,
            key: None,
        }
    }
}

enum LeafFit {
    Placed,
    Rejected,
    Split(usize),
}

#[derive(Debug, Clone)]
pub struct ShelfLayout {
    reservation: Reservation,
    nodes: Vec<Node>,
    index: HashMap<FrameKey, usize>,
    order: Vec<FrameKey>,
}

impl ShelfLayout {
    const ROOT: usize = 0;

    pub fn new(width: u32, height: u32, reservation: Reservation) -> Self {
        Self {
            reservation,
            nodes: vec![Node::leaf(BoundsRect::free(Rect::new(0, 0, width, height)))],
            index: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        self.nodes[Self::ROOT].cell.margins_rect
    }

    pub fn try_place(&mut self, size: Size, key: FrameKey) -> bool {
        debug_assert!(!self.index.contains_key(&key), "frame {key:?} placed twice");
        let mut stack = vec![Self::ROOT];
        while let Some(idx) = stack.pop() {
            if let Some([c0, c1]) = self.nodes[idx].children {
                stack.push(c1);
                stack.push(c0);
                continue;
            }
            let mut leaf = idx;
            loop {
                match self.fit_leaf(leaf, size, key) {
                    LeafFit::Placed => {
                        tracing::trace!(
                            x = self.nodes[leaf].cell.sprite_rect.x,
                            y = self.nodes[leaf].cell.sprite_rect.y,
                            w = size.w,
                            h = size.h,
                            "shelf placement"
                        );
                        return true;
                    }
                    LeafFit::Rejected => break,
                    LeafFit::Split(first) => leaf = first,
                }
            }
        }
        false
    }

    fn fit_leaf(&mut self, idx: usize, size: Size, key: FrameKey) -> LeafFit {
        let node = &self.nodes[idx];
        if node.key.is_some() {
            return LeafFit::Rejected;
        }
        let mut cell = node.cell;
        let occupied_w = size.w as i64 + cell.horizontal_reserve() as i64;
        let occupied_h = size.h as i64 + cell.vertical_reserve() as i64;
        let rest_w = cell.margins_rect.w as i64 - occupied_w;
        let rest_h = cell.margins_rect.h as i64 - occupied_h;
        if rest_w < 0 || rest_h < 0 {
            return LeafFit::Rejected;
        }
        let (mut rest_w, mut rest_h) = (rest_w as u32, rest_h as u32);
        if rest_w == 0 && rest_h == 0 {
            self.stamp(idx, cell, size, key);
            return LeafFit::Placed;
        }

        let res = self.reservation;
        let longest = rest_w.max(rest_h);
        if longest <= res.splitter() {
            // not worth a split: fold the slack into edge pixel and margin
            if longest == rest_w && cell.right_edge == 0 && rest_w >= res.edge_pixel {
                res.take_edge(&mut rest_w, &mut cell.right_edge);
            } else if longest == rest_h && cell.bottom_edge == 0 && rest_h >= res.edge_pixel {
                res.take_edge(&mut rest_h, &mut cell.bottom_edge);
            }
            cell.right_margin += rest_w;
            cell.bottom_margin += rest_h;
            self.stamp(idx, cell, size, key);
            return LeafFit::Placed;
        }

        let mut first = cell;
        let mut second = cell;
        let r = cell.margins_rect;
        if longest == rest_w {
            first.right_edge = res.edge_pixel;
            first.right_margin = res.margin;
            second.left_edge = res.edge_pixel;
            let first_w = size.w + first.horizontal_reserve();
            first.margins_rect = Rect::new(r.x, r.y, first_w, r.h);
            second.margins_rect = Rect::new(r.x + first_w, r.y, r.w - first_w, r.h);
        } else {
            first.bottom_edge = res.edge_pixel;
            first.bottom_margin = res.margin;
            second.top_edge = res.edge_pixel;
            let first_h = size.h + first.vertical_reserve();
            first.margins_rect = Rect::new(r.x, r.y, r.w, first_h);
            second.margins_rect = Rect::new(r.x, r.y + first_h, r.w, r.h - first_h);
        }

        let c0 = self.nodes.len();
        self.nodes.push(Node::leaf(first));
        self.nodes.push(Node::leaf(second));
        self.nodes[idx].children = Some([c0, c0 + 1]);
        LeafFit::Split(c0)
    }

    fn stamp(&mut self, idx: usize, mut cell: BoundsRect, size: Size, key: FrameKey) {
        cell.sprite_rect = Rect::new(
            cell.margins_rect.x + cell.left_edge,
            cell.margins_rect.y + cell.top_edge,
            size.w,
            size.h,
        );
        debug_assert!(cell.is_consistent());
        let node = &mut self.nodes[idx];
        node.cell = cell;
        node.key = Some(key);
        self.index.insert(key, idx);
        self.order.push(key);
    }

    pub fn find_bounds(&self, key: FrameKey) -> Option<&BoundsRect> {
        self.index.get(&key).map(|&idx| &self.nodes[idx].cell)
    }

    pub fn placements(&self) -> impl Iterator<Item = (FrameKey, &BoundsRect)> + '_ {
        self.order
            .iter()
            .map(|key| (*key, &self.nodes[self.index[key]].cell))
    }

    pub fn placed_count(&self) -> usize {
        self.order.len()
    }

    /// Number of tree nodes allocated so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
