use rand::{Rng, SeedableRng};
use sheet_packer_core::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn sprites(sizes: &[(u32, u32)]) -> Vec<Arc<SpriteDefinition>> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| Arc::new(SpriteDefinition::from_sizes(format!("s{i}"), &[(w, h)])))
        .collect()
}

/// Checks every property a successful result must hold.
fn assert_valid(result: &PackResult, input: &[Arc<SpriteDefinition>], cfg: &PackerConfig) {
    assert!(result.success(), "errors: {:?}", result.errors);
    for sheet in &result.sheets {
        let (w, h) = (sheet.width(), sheet.height());
        assert!(w >= cfg.min_texture_size && w <= cfg.max_texture_size);
        assert!(h >= cfg.min_texture_size && h <= cfg.max_texture_size);
        if cfg.only_square {
            assert_eq!(w, h);
        }
        let placed: Vec<&BoundsRect> = sheet.placements().map(|(_, b)| b).collect();
        for (i, a) in placed.iter().enumerate() {
            assert!(a.margins_rect.contains(&a.sprite_rect));
            assert!(sheet.rect().contains(&a.margins_rect));
            for b in &placed[i + 1..] {
                assert!(!a.margins_rect.intersects(&b.margins_rect), "{a:?} overlaps {b:?}");
            }
        }
    }
    assert_eq!(result.indexed_sprites.len(), input.len());
    let mut seen = HashSet::new();
    for (s, sprite) in input.iter().enumerate() {
        for f in 0..sprite.frame_count() {
            let (sheet, bounds) = result.placement(s, f).expect("every frame resolves");
            assert_eq!(Some(bounds.sprite_rect.size()), sprite.frame_size(f));
            let owners = result
                .sheets
                .iter()
                .filter(|l| l.find_bounds(FrameKey::new(s, f)).is_some())
                .count();
            assert_eq!(owners, 1, "frame ({s}, {f}) must live on exactly one sheet");
            assert_eq!(result.sheets[sheet].find_bounds(FrameKey::new(s, f)), Some(bounds));
            assert!(seen.insert((s, f)));
        }
    }
}

#[test]
fn single_sprite_gets_smallest_fitting_sheet() {
    let input = sprites(&[(100, 100)]);
    let cfg = PackerConfig::default();
    let result = pack_sprites(&input, cfg.clone());
    assert_valid(&result, &input, &cfg);
    assert_eq!(result.sheets.len(), 1);
    assert_eq!((result.sheets[0].width(), result.sheets[0].height()), (128, 128));
    let (sheet, bounds) = result.placement(0, 0).expect("placed");
    assert_eq!(sheet, 0);
    assert_eq!(bounds.sprite_rect, Rect::new(0, 0, 100, 100));
}

#[test]
fn oversized_set_spills_into_several_sheets() {
    let input = sprites(&[(200, 200); 5]);
    let cfg = PackerConfig::builder().max_texture_size(256).build();
    let result = pack_sprites(&input, cfg.clone());
    assert_valid(&result, &input, &cfg);
    assert!(result.sheets.len() >= 2);
    assert_eq!(result.sheets.len(), 5);
    let total: usize = result.sheets.iter().map(|s| s.placed_count()).sum();
    assert_eq!(total, 5);
}

#[test]
fn sprite_larger_than_max_fails_cleanly() {
    let input = sprites(&[(32, 32), (100, 100)]);
    let cfg = PackerConfig::builder().max_texture_size(64).build();
    let result = pack_sprites(&input, cfg);
    assert!(!result.success());
    assert!(!result.errors.is_empty());
    assert!(result.sheets.is_empty());
    assert!(result.indexed_sprites.is_empty());
    assert!(result.errors.iter().any(|e| e.contains("too small")));
    assert!(result.into_result().is_err());
}

#[test]
fn bottom_left_alone_still_places_everything() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let sizes: Vec<(u32, u32)> = (0..60)
        .map(|_| (rng.gen_range(8..=120), rng.gen_range(8..=120)))
        .collect();
    let input = sprites(&sizes);
    let cfg = PackerConfig::builder()
        .max_texture_size(512)
        .algorithms([PackingAlgorithm::MaxRectsBottomLeft])
        .build();
    let result = pack_sprites(&input, cfg.clone());
    assert_valid(&result, &input, &cfg);
    for sheet in &result.sheets {
        assert_eq!(sheet.algorithm(), PackingAlgorithm::MaxRectsBottomLeft);
    }
}

#[test]
fn largest_frame_is_placed_first() {
    let input = sprites(&[(10, 10), (50, 50), (20, 20)]);
    let cfg = PackerConfig::builder()
        .algorithms([PackingAlgorithm::Basic])
        .build();
    let result = pack_sprites(&input, cfg.clone());
    assert_valid(&result, &input, &cfg);
    let (_, big) = result.placement(1, 0).expect("big");
    assert_eq!((big.sprite_rect.x, big.sprite_rect.y), (0, 0));
}

#[test]
fn animation_frames_can_span_sheets() {
    let input = vec![Arc::new(SpriteDefinition::from_sizes(
        "explosion",
        &[(200, 200), (200, 200), (200, 200)],
    ))];
    let cfg = PackerConfig::builder().max_texture_size(256).build();
    let result = pack_sprites(&input, cfg.clone());
    assert_valid(&result, &input, &cfg);
    let data = &result.indexed_sprites[0];
    assert_eq!(data.frame_to_sheet.len(), 3);
    assert_eq!(data.sheet_indices(), vec![0, 1, 2]);
    assert_eq!(input[0].frame_size(2), Some(Size::new(200, 200)));
    assert_eq!(input[0].frame_size(3), None);
    assert!(Arc::ptr_eq(&data.sprite, &input[0]));
}

#[test]
fn square_only_and_bounds_are_respected() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(5);
    let sizes: Vec<(u32, u32)> = (0..40)
        .map(|_| (rng.gen_range(1..=90), rng.gen_range(1..=30)))
        .collect();
    let input = sprites(&sizes);
    let cfg = PackerConfig::builder()
        .max_texture_size(256)
        .min_texture_size(32)
        .only_square(true)
        .two_side_margin(true)
        .margin(2)
        .build();
    let result = pack_sprites(&input, cfg.clone());
    assert_valid(&result, &input, &cfg);
}

#[test]
fn random_sets_resolve_or_fail_explicitly() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    for round in 0..12 {
        let count = rng.gen_range(1..=30);
        let sizes: Vec<(u32, u32)> = (0..count)
            .map(|_| (rng.gen_range(1..=160), rng.gen_range(1..=160)))
            .collect();
        let input = sprites(&sizes);
        let cfg = PackerConfig::builder()
            .max_texture_size(if round % 3 == 0 { 128 } else { 256 })
            .two_side_margin(round % 2 == 0)
            .margin(round % 3)
            .build();
        let result = pack_sprites(&input, cfg.clone());
        if result.success() {
            assert_valid(&result, &input, &cfg);
        } else {
            assert!(result.sheets.is_empty());
            assert!(result.indexed_sprites.is_empty());
        }
    }
}

#[test]
fn empty_input_packs_to_nothing() {
    let result = pack_sprites(&[], PackerConfig::default());
    assert!(result.success());
    assert!(result.sheets.is_empty());
    assert!(result.indexed_sprites.is_empty());
}

#[test]
fn zero_sized_frame_is_reported() {
    let input = vec![Arc::new(SpriteDefinition::new("broken").with_frame(16, 16).with_frame(0, 4))];
    let result = pack_sprites(&input, PackerConfig::default());
    assert!(!result.success());
    assert!(result.errors.iter().any(|e| e.contains("broken") && e.contains("zero size")));
}

#[test]
fn invalid_config_is_reported() {
    let input = sprites(&[(16, 16)]);
    let cfg = PackerConfig::builder().max_texture_size(1000).build();
    let result = SpritePacker::new(cfg).pack(&input);
    assert!(!result.success());
    assert!(result.errors.iter().any(|e| e.contains("power of two")));
}

#[test]
fn huge_margin_is_reported_not_panicking() {
    let input = sprites(&[(10, 10)]);
    let cfg = PackerConfig::builder()
        .margin(u32::MAX)
        .two_side_margin(true)
        .build();
    let result = pack_sprites(&input, cfg);
    assert!(!result.success());
    assert!(result.sheets.is_empty());
    assert!(result.errors.iter().any(|e| e.contains("margin")));
}

#[test]
fn equal_definitions_are_distinct_frames() {
    let shared = Arc::new(SpriteDefinition::from_sizes("tile", &[(16, 16)]));
    let input = vec![shared.clone(), shared.clone(), shared];
    let cfg = PackerConfig::default();
    let result = pack_sprites(&input, cfg.clone());
    assert_valid(&result, &input, &cfg);
    let rects: HashSet<Rect> = (0..3)
        .map(|s| result.placement(s, 0).expect("placed").1.sprite_rect)
        .collect();
    assert_eq!(rects.len(), 3);
}
