use rand::{Rng, SeedableRng};
use sheet_packer_core::bounds::{BoundsRect, Reservation};
use sheet_packer_core::config::PackingAlgorithm;
use sheet_packer_core::layout::SheetLayout;
use sheet_packer_core::model::{FrameKey, Rect, Size};

fn key(i: usize) -> FrameKey {
    FrameKey::new(i, 0)
}

fn disjoint(bounds: &[BoundsRect]) -> bool {
    for i in 0..bounds.len() {
        for j in (i + 1)..bounds.len() {
            if bounds[i].margins_rect.intersects(&bounds[j].margins_rect) {
                return false;
            }
        }
    }
    true
}

#[test]
fn split_tree_reserves_edges_on_facing_sides() {
    let mut sheet = SheetLayout::new(64, 64, Reservation::new(true, 1), PackingAlgorithm::Basic);
    for i in 0..3 {
        assert!(sheet.try_place(Size::new(30, 30), key(i)));
    }

    let a = sheet.find_bounds(key(0)).copied().expect("first");
    assert_eq!(a.sprite_rect, Rect::new(0, 0, 30, 30));
    assert_eq!(a.margins_rect, Rect::new(0, 0, 32, 32));
    assert!(a.has_right_edge() && a.has_bottom_edge());
    assert!(!a.has_left_edge() && !a.has_top_edge());
    assert_eq!((a.right_margin, a.bottom_margin), (1, 1));

    // below the first one: top edge from the split, bottom edge from the 1px slack
    let b = sheet.find_bounds(key(1)).copied().expect("second");
    assert_eq!(b.sprite_rect, Rect::new(0, 33, 30, 30));
    assert_eq!(b.margins_rect, Rect::new(0, 32, 32, 32));
    assert!(b.has_top_edge() && b.has_bottom_edge());

    // right column
    let c = sheet.find_bounds(key(2)).copied().expect("third");
    assert_eq!(c.sprite_rect, Rect::new(33, 0, 30, 30));
    assert!(c.has_left_edge() && c.has_right_edge());

    assert!(disjoint(&[a, b, c]));
}

#[test]
fn exact_fit_takes_whole_sheet() {
    let mut sheet = SheetLayout::new(32, 32, Reservation::new(false, 1), PackingAlgorithm::Basic);
    assert!(sheet.try_place(Size::new(32, 32), key(0)));
    let b = sheet.find_bounds(key(0)).expect("placed");
    assert_eq!(b.margins_rect, sheet.rect());
    assert_eq!(b.sprite_rect, sheet.rect());
    assert!(!sheet.try_place(Size::new(1, 1), key(1)));
    assert!(sheet.find_bounds(key(1)).is_none());
    if let SheetLayout::Shelf(inner) = &sheet {
        assert_eq!(inner.node_count(), 1);
    }
}

#[test]
fn quarters_fill_without_margin() {
    let mut sheet = SheetLayout::new(64, 64, Reservation::new(false, 0), PackingAlgorithm::Basic);
    for i in 0..4 {
        assert!(sheet.try_place(Size::new(32, 32), key(i)), "quarter {i}");
    }
    assert!(!sheet.try_place(Size::new(1, 1), key(4)));
    let mut origins: Vec<(u32, u32)> = sheet
        .placements()
        .map(|(_, b)| (b.sprite_rect.x, b.sprite_rect.y))
        .collect();
    origins.sort();
    assert_eq!(origins, vec![(0, 0), (0, 32), (32, 0), (32, 32)]);
}

#[test]
fn too_large_is_rejected_without_side_effects() {
    let mut sheet = SheetLayout::new(64, 32, Reservation::new(false, 1), PackingAlgorithm::Basic);
    assert!(!sheet.try_place(Size::new(65, 8), key(0)));
    assert!(!sheet.try_place(Size::new(8, 33), key(1)));
    assert_eq!(sheet.placed_count(), 0);
    assert_eq!(sheet.weight(), 64 * 32);
}

#[test]
fn random_sets_stay_disjoint_and_contained() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for (edge, margin) in [(false, 0), (false, 1), (true, 1), (true, 3)] {
        let mut sheet =
            SheetLayout::new(256, 256, Reservation::new(edge, margin), PackingAlgorithm::Basic);
        let mut sizes = Vec::new();
        for i in 0..150 {
            let size = Size::new(rng.gen_range(1..=40), rng.gen_range(1..=40));
            if sheet.try_place(size, key(i)) {
                sizes.push((key(i), size));
            }
        }
        assert!(!sizes.is_empty());
        let placed: Vec<BoundsRect> = sheet.placements().map(|(_, b)| *b).collect();
        assert!(disjoint(&placed), "overlap with edge={edge} margin={margin}");
        for (k, size) in sizes {
            let b = sheet.find_bounds(k).expect("placed frame");
            assert_eq!(b.sprite_rect.size(), size);
            assert!(b.is_consistent());
            assert!(sheet.rect().contains(&b.margins_rect));
        }
    }
}
