use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right_ex(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom_ex(&self) -> u32 {
        self.y + self.h
    }
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// Returns true if `r` lies fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x
            && r.y >= self.y
            && r.right_ex() <= self.right_ex()
            && r.bottom_ex() <= self.bottom_ex()
    }
    /// Strict intersection test: rects that only share an edge do not intersect.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.right_ex()
            || r.x >= self.right_ex()
            || self.y >= r.bottom_ex()
            || r.y >= self.bottom_ex())
    }
    /// Overlapping region of two rects, `None` when it has no area.
    pub fn intersection(&self, r: &Rect) -> Option<Rect> {
        let x1 = self.x.max(r.x);
        let y1 = self.y.max(r.y);
        let x2 = self.right_ex().min(r.right_ex());
        let y2 = self.bottom_ex().min(r.bottom_ex());
        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

/// Width and height of a frame to place.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
}

/// Identity of one sprite frame within a pack run.
///
/// `sprite` is the position of the sprite in the input list, so two sprites with
/// equal geometry still map to distinct keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameKey {
    pub sprite: usize,
    pub frame: usize,
}

impl FrameKey {
    pub fn new(sprite: usize, frame: usize) -> Self {
        Self { sprite, frame }
    }
}

/// Geometry of one logical sprite: an ordered list of frame rects.
///
/// Only `w`/`h` of each frame matter to packing. `x`/`y` keep the frame's
/// location in its source image for whoever composites the final sheets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteDefinition {
    pub name: String,
    pub frame_rects: Vec<Rect>,
}

impl SpriteDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_rects: Vec::new(),
        }
    }

    /// Builds a sprite whose frames all start at the source origin.
    pub fn from_sizes(name: impl Into<String>, sizes: &[(u32, u32)]) -> Self {
        Self {
            name: name.into(),
            frame_rects: sizes.iter().map(|&(w, h)| Rect::new(0, 0, w, h)).collect(),
        }
    }

    pub fn with_frame(mut self, w: u32, h: u32) -> Self {
        self.frame_rects.push(Rect::new(0, 0, w, h));
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frame_rects.len()
    }

    pub fn frame_size(&self, frame: usize) -> Option<Size> {
        self.frame_rects.get(frame).map(Rect::size)
    }
}

/// Statistics about sheet utilization of a pack result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PackStats {
    /// Number of committed sheets.
    pub num_sheets: usize,
    /// Number of placed sprite frames.
    pub num_frames: usize,
    /// Sum of width * height over all sheets.
    pub total_sheet_area: u64,
    /// Sum of sprite rect areas.
    pub used_sprite_area: u64,
    /// Sum of reserved (margins) rect areas, including edge pixels and margins.
    pub reserved_area: u64,
    /// used_sprite_area / total_sheet_area (0.0 to 1.0).
    pub occupancy: f64,
    pub max_sheet_width: u32,
    pub max_sheet_height: u32,
    /// Frames that got at least one duplicated edge pixel.
    pub num_edge_duplicated: usize,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sheets: {}, Frames: {}, Occupancy: {:.2}%, Total Area: {} px², Sprite Area: {} px², Reserved Area: {} px²",
            self.num_sheets,
            self.num_frames,
            self.occupancy * 100.0,
            self.total_sheet_area,
            self.used_sprite_area,
            self.reserved_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_sheet_area.saturating_sub(self.used_sprite_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_sheet_area > 0 {
            (self.wasted_area() as f64 / self.total_sheet_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
