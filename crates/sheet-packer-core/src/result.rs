use crate::bounds::BoundsRect;
use crate::error::{Result, SheetPackerError};
use crate::layout::SheetLayout;
use crate::model::{PackStats, SpriteDefinition};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Where every frame of one input sprite ended up.
#[derive(Debug, Clone)]
pub struct SpriteIndexedData {
    pub sprite: Arc<SpriteDefinition>,
    /// Sheet index per frame.
    pub frame_to_sheet: Vec<usize>,
    /// Placement record per frame.
    pub frame_to_bounds: Vec<BoundsRect>,
}

impl SpriteIndexedData {
    /// Distinct sheets used by this sprite, in order of first use.
    pub fn sheet_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for &sheet in &self.frame_to_sheet {
            if !out.contains(&sheet) {
                out.push(sheet);
            }
        }
        out
    }
}

/// Output of a pack run.
///
/// A non-empty `errors` set means the run failed as a whole: `sheets` and
/// `indexed_sprites` are empty then and nothing should be consumed.
#[derive(Debug, Clone, Default)]
pub struct PackResult {
    pub sheets: Vec<SheetLayout>,
    /// One entry per input sprite, in input order.
    pub indexed_sprites: Vec<SpriteIndexedData>,
    pub errors: BTreeSet<String>,
}

impl PackResult {
    pub(crate) fn failed(err: SheetPackerError) -> Self {
        let mut out = Self::default();
        out.errors.insert(err.to_string());
        out
    }

    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Sheet index and placement of frame `frame` of the `sprite`-th input.
    pub fn placement(&self, sprite: usize, frame: usize) -> Option<(usize, &BoundsRect)> {
        let data = self.indexed_sprites.get(sprite)?;
        Some((*data.frame_to_sheet.get(frame)?, data.frame_to_bounds.get(frame)?))
    }

    /// Turns a failed result into an error carrying every message.
    pub fn into_result(self) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            let msg = self.errors.iter().cloned().collect::<Vec<_>>().join("; ");
            Err(SheetPackerError::Failed(msg))
        }
    }

    /// Computes sheet utilization statistics.
    pub fn stats(&self) -> PackStats {
        let mut stats = PackStats {
            num_sheets: self.sheets.len(),
            ..Default::default()
        };
        for sheet in &self.sheets {
            stats.total_sheet_area += sheet.weight();
            stats.max_sheet_width = stats.max_sheet_width.max(sheet.width());
            stats.max_sheet_height = stats.max_sheet_height.max(sheet.height());
            for (_, b) in sheet.placements() {
                stats.num_frames += 1;
                stats.used_sprite_area += b.sprite_rect.area();
                stats.reserved_area += b.margins_rect.area();
                if b.has_left_edge() || b.has_right_edge() || b.has_top_edge() || b.has_bottom_edge()
                {
                    stats.num_edge_duplicated += 1;
                }
            }
        }
        stats.occupancy = if stats.total_sheet_area > 0 {
            stats.used_sprite_area as f64 / stats.total_sheet_area as f64
        } else {
            0.0
        };
        stats
    }
}
