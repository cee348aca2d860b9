use sheet_packer_core::prelude::*;
use std::sync::Arc;

#[test]
fn stats_single_sprite() {
    let input = vec![Arc::new(SpriteDefinition::from_sizes("a", &[(100, 100)]))];
    let result = pack_sprites(&input, PackerConfig::default());
    let stats = result.stats();
    assert_eq!(stats.num_sheets, 1);
    assert_eq!(stats.num_frames, 1);
    assert_eq!(stats.total_sheet_area, 128 * 128);
    assert_eq!(stats.used_sprite_area, 100 * 100);
    assert!(stats.reserved_area >= stats.used_sprite_area);
    assert!((stats.occupancy - 10_000.0 / 16_384.0).abs() < 1e-9);
    assert_eq!(stats.wasted_area(), 16_384 - 10_000);
    assert!(stats.summary().contains("Sheets: 1"));
}

#[test]
fn stats_count_edge_duplication() {
    let input = vec![Arc::new(SpriteDefinition::from_sizes(
        "tiles",
        &[(30, 30), (30, 30), (30, 30)],
    ))];
    let cfg = PackerConfig::builder()
        .two_side_margin(true)
        .algorithms([PackingAlgorithm::Basic])
        .build();
    let result = pack_sprites(&input, cfg);
    let stats = result.stats();
    assert_eq!(stats.num_frames, 3);
    assert!(stats.num_edge_duplicated >= 2);
    assert!(stats.waste_percentage() > 0.0 && stats.waste_percentage() < 100.0);
}

#[test]
fn stats_empty_result() {
    let stats = PackResult::default().stats();
    assert_eq!(stats.num_sheets, 0);
    assert_eq!(stats.occupancy, 0.0);
    assert_eq!(stats.waste_percentage(), 0.0);
}
