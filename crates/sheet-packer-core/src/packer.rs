use crate::bounds::Reservation;
use crate::config::{PackerConfig, PackingAlgorithm};
use crate::error::SheetPackerError;
use crate::layout::SheetLayout;
use crate::model::{FrameKey, Size, SpriteDefinition};
use crate::result::{PackResult, SpriteIndexedData};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One frame waiting to be placed, weighted by its area.
#[derive(Debug, Clone, Copy)]
pub struct SpriteItem {
    pub key: FrameKey,
    pub size: Size,
    pub weight: u64,
}

/// One resolution × algorithm try over the remaining items.
struct Attempt {
    layout: SheetLayout,
    /// Positions (into the remaining list) of the items that got placed.
    placed: Vec<usize>,
    weight: u64,
    full: bool,
}

impl Attempt {
    fn run(w: u32, h: u32, algorithm: PackingAlgorithm, res: Reservation, items: &[SpriteItem]) -> Self {
        let mut layout = SheetLayout::new(w, h, res, algorithm);
        let mut placed = Vec::new();
        let mut weight = 0u64;
        for (i, item) in items.iter().enumerate() {
            if layout.try_place(item.size, item.key) {
                placed.push(i);
                weight += item.weight;
            }
        }
        let full = placed.len() == items.len();
        trace!(w, h, %algorithm, placed = placed.len(), total = items.len(), "attempt");
        Self {
            layout,
            placed,
            weight,
            full,
        }
    }

    /// More placed weight wins; at equal weight a full pack on a smaller sheet wins.
    fn beats(&self, other: &Attempt) -> bool {
        self.weight > other.weight
            || (self.weight == other.weight
                && self.full
                && self.layout.weight() < other.layout.weight())
    }
}

/// Packs sprite frames into as few, as small sheets as it can find.
#[derive(Debug, Clone, Default)]
pub struct SpritePacker {
    cfg: PackerConfig,
}

impl SpritePacker {
    pub fn new(cfg: PackerConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &PackerConfig {
        &self.cfg
    }

    #[instrument(skip_all)]
    /// Packs every frame of `sprites` into sheets.
    ///
    /// Notes:
    /// - Frames are sorted by area, largest first; the sort is stable so equal
    ///   areas keep input order and the result is deterministic.
    /// - Each pass tries every resolution × algorithm combination on the frames
    ///   still unplaced, commits the best sheet and repeats on the leftovers.
    /// - Fails only when a pass cannot place a single frame; failures are
    ///   reported in `PackResult::errors`.
    pub fn pack(&self, sprites: &[Arc<SpriteDefinition>]) -> PackResult {
        if let Err(e) = self.cfg.validate() {
            warn!(error = %e, "invalid packer config");
            return PackResult::failed(e);
        }

        let mut items = match collect_items(sprites) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "invalid sprite list");
                return PackResult::failed(e);
            }
        };
        items.sort_by(|a, b| b.weight.cmp(&a.weight));
        info!(
            sprites = sprites.len(),
            frames = items.len(),
            max_size = self.cfg.max_texture_size,
            "packing sprites"
        );

        let res = self.cfg.reservation();
        let resolutions = self.cfg.candidate_resolutions();
        let mut sheets: Vec<SheetLayout> = Vec::new();

        while !items.is_empty() {
            let best = self.best_attempt(&resolutions, res, &items);
            let best = match best {
                Some(a) if a.weight > 0 => a,
                _ => {
                    let err = SheetPackerError::CannotPlace {
                        remaining: items.len(),
                        max_size: self.cfg.max_texture_size,
                    };
                    warn!(error = %err, sheets = sheets.len(), "packing failed");
                    return PackResult::failed(err);
                }
            };

            debug!(
                sheet = sheets.len(),
                w = best.layout.width(),
                h = best.layout.height(),
                algorithm = %best.layout.algorithm(),
                placed = best.placed.len(),
                fill = best.weight as f64 / best.layout.weight() as f64,
                remaining = items.len() - best.placed.len(),
                "committed sheet"
            );
            let mut placed = best.placed.iter().peekable();
            let mut pos = 0usize;
            items.retain(|_| {
                let hit = placed.next_if(|&&p| p == pos).is_some();
                pos += 1;
                !hit
            });
            sheets.push(best.layout);
        }

        let indexed_sprites = build_index(sprites, &sheets);
        info!(sheets = sheets.len(), "packing done");
        PackResult {
            sheets,
            indexed_sprites,
            errors: Default::default(),
        }
    }

    fn best_attempt(
        &self,
        resolutions: &[(u32, u32)],
        res: Reservation,
        items: &[SpriteItem],
    ) -> Option<Attempt> {
        #[cfg(feature = "parallel")]
        {
            if self.cfg.parallel {
                return self.best_attempt_parallel(resolutions, res, items);
            }
        }

        let mut best: Option<Attempt> = None;
        let mut best_full_area: Option<u64> = None;
        for &(w, h) in resolutions {
            let area = w as u64 * h as u64;
            if best_full_area.is_some_and(|full| area >= full) {
                continue;
            }
            for &algorithm in &self.cfg.algorithms {
                let attempt = Attempt::run(w, h, algorithm, res, items);
                let full = attempt.full;
                if best.as_ref().is_none_or(|b| attempt.beats(b)) {
                    best = Some(attempt);
                }
                if full {
                    best_full_area = Some(area);
                    break;
                }
            }
        }
        best
    }

    /// Evaluates every candidate concurrently, then reduces in candidate order
    /// with the same rule as the sequential path.
    #[cfg(feature = "parallel")]
    fn best_attempt_parallel(
        &self,
        resolutions: &[(u32, u32)],
        res: Reservation,
        items: &[SpriteItem],
    ) -> Option<Attempt> {
        let candidates: Vec<(u32, u32, PackingAlgorithm)> = resolutions
            .iter()
            .flat_map(|&(w, h)| self.cfg.algorithms.iter().map(move |&a| (w, h, a)))
            .collect();
        let attempts: Vec<Attempt> = candidates
            .par_iter()
            .map(|&(w, h, algorithm)| Attempt::run(w, h, algorithm, res, items))
            .collect();
        let mut best: Option<Attempt> = None;
        for attempt in attempts {
            if best.as_ref().is_none_or(|b| attempt.beats(b)) {
                best = Some(attempt);
            }
        }
        best
    }
}

/// Packs `sprites` with `cfg`. Shorthand for `SpritePacker::new(cfg).pack(sprites)`.
pub fn pack_sprites(sprites: &[Arc<SpriteDefinition>], cfg: PackerConfig) -> PackResult {
    SpritePacker::new(cfg).pack(sprites)
}

fn collect_items(sprites: &[Arc<SpriteDefinition>]) -> crate::error::Result<Vec<SpriteItem>> {
    let mut items = Vec::new();
    for (sprite_idx, sprite) in sprites.iter().enumerate() {
        for (frame_idx, rect) in sprite.frame_rects.iter().enumerate() {
            if rect.w == 0 || rect.h == 0 {
                return Err(SheetPackerError::ZeroSizedFrame {
                    sprite: sprite.name.clone(),
                    frame: frame_idx,
                    width: rect.w,
                    height: rect.h,
                });
            }
            let size = rect.size();
            items.push(SpriteItem {
                key: FrameKey::new(sprite_idx, frame_idx),
                size,
                weight: size.area(),
            });
        }
    }
    Ok(items)
}

fn build_index(sprites: &[Arc<SpriteDefinition>], sheets: &[SheetLayout]) -> Vec<SpriteIndexedData> {
    sprites
        .iter()
        .enumerate()
        .map(|(sprite_idx, sprite)| {
            let mut frame_to_sheet = Vec::with_capacity(sprite.frame_count());
            let mut frame_to_bounds = Vec::with_capacity(sprite.frame_count());
            for frame_idx in 0..sprite.frame_count() {
                let key = FrameKey::new(sprite_idx, frame_idx);
                let found = sheets
                    .iter()
                    .enumerate()
                    .find_map(|(i, sheet)| sheet.find_bounds(key).map(|b| (i, *b)));
                debug_assert!(found.is_some(), "committed frame {key:?} missing from every sheet");
                if let Some((sheet, bounds)) = found {
                    frame_to_sheet.push(sheet);
                    frame_to_bounds.push(bounds);
                }
            }
            SpriteIndexedData {
                sprite: Arc::clone(sprite),
                frame_to_sheet,
                frame_to_bounds,
            }
        })
        .collect()
}
