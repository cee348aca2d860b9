use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest sheet side used when nothing else is configured.
pub const DEFAULT_TEXTURE_SIZE: u32 = 2048;
/// Smallest texture side the engine creates.
pub const MIN_TEXTURE_SIZE: u32 = 8;

/// Single-sheet placement strategies.
///
/// `Basic` is the binary split tree; the `MaxRects*` variants share the
/// free-rectangle layout and differ only in how a free rect is chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PackingAlgorithm {
    Basic,
    #[serde(rename = "maxrects_bl")]
    MaxRectsBottomLeft,
    #[serde(rename = "maxrects_baf")]
    MaxRectsBestAreaFit,
    #[serde(rename = "maxrects_bssf")]
    MaxRectsBestShortSideFit,
    #[serde(rename = "maxrects_blsf")]
    MaxRectsBestLongSideFit,
    #[serde(rename = "maxrects_cp")]
    MaxRectsBestContactPoint,
}

impl PackingAlgorithm {
    pub const ALL: [PackingAlgorithm; 6] = [
        PackingAlgorithm::Basic,
        PackingAlgorithm::MaxRectsBottomLeft,
        PackingAlgorithm::MaxRectsBestAreaFit,
        PackingAlgorithm::MaxRectsBestShortSideFit,
        PackingAlgorithm::MaxRectsBestLongSideFit,
        PackingAlgorithm::MaxRectsBestContactPoint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::MaxRectsBottomLeft => "maxrects_bl",
            Self::MaxRectsBestAreaFit => "maxrects_baf",
            Self::MaxRectsBestShortSideFit => "maxrects_bssf",
            Self::MaxRectsBestLongSideFit => "maxrects_blsf",
            Self::MaxRectsBestContactPoint => "maxrects_cp",
        }
    }
}

impl fmt::Display for PackingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackingAlgorithm {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "shelf" => Ok(Self::Basic),
            "maxrects_bl" | "bl" | "bottomleft" => Ok(Self::MaxRectsBottomLeft),
            "maxrects_baf" | "baf" | "bestareafit" => Ok(Self::MaxRectsBestAreaFit),
            "maxrects_bssf" | "bssf" | "bestshortsidefit" => Ok(Self::MaxRectsBestShortSideFit),
            "maxrects_blsf" | "blsf" | "bestlongsidefit" => Ok(Self::MaxRectsBestLongSideFit),
            "maxrects_cp" | "cp" | "bestcontactpoint" | "contactpoint" => {
                Ok(Self::MaxRectsBestContactPoint)
            }
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PackerConfig {
    /// Largest sheet side in pixels (power of two).
    pub max_texture_size: u32,
    /// Smallest sheet side in pixels (power of two).
    pub min_texture_size: u32,
    /// Only consider sheets with width == height.
    pub only_square: bool,
    /// Duplicate edge pixels on both sides of every seam between sprites.
    pub two_side_margin: bool,
    /// Empty pixels between neighbouring sprites.
    pub margin: u32,
    /// Algorithms tried for every candidate resolution, in order.
    pub algorithms: Vec<PackingAlgorithm>,
    /// Evaluate candidates in parallel when the "parallel" feature is on.
    pub parallel: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_texture_size: DEFAULT_TEXTURE_SIZE,
            min_texture_size: MIN_TEXTURE_SIZE,
            only_square: false,
            two_side_margin: false,
            margin: 1,
            algorithms: PackingAlgorithm::ALL.to_vec(),
            parallel: false,
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - A texture size is zero or not a power of two
    /// - The minimum texture size exceeds the maximum
    /// - Margin and edge pixels do not fit in the maximum texture size
    /// - No algorithm is enabled
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SheetPackerError;

        for size in [self.max_texture_size, self.min_texture_size] {
            if size == 0 {
                return Err(SheetPackerError::InvalidTextureSize {
                    size,
                    reason: "must be non-zero",
                });
            }
            if !size.is_power_of_two() {
                return Err(SheetPackerError::InvalidTextureSize {
                    size,
                    reason: "must be a power of two",
                });
            }
        }

        if self.min_texture_size > self.max_texture_size {
            return Err(SheetPackerError::InvalidConfig(format!(
                "min_texture_size ({}) exceeds max_texture_size ({})",
                self.min_texture_size, self.max_texture_size
            )));
        }

        let reserve = u64::from(self.margin) + 2 * u64::from(self.two_side_margin);
        if reserve >= u64::from(self.max_texture_size) {
            return Err(SheetPackerError::InvalidConfig(format!(
                "margin {} plus edge pixels leaves no room in a {} px sheet",
                self.margin, self.max_texture_size
            )));
        }

        if self.algorithms.is_empty() {
            return Err(SheetPackerError::InvalidConfig(
                "no packing algorithm enabled".into(),
            ));
        }

        Ok(())
    }

    /// Edge-pixel and margin reservation applied by every layout.
    pub fn reservation(&self) -> crate::bounds::Reservation {
        crate::bounds::Reservation::new(self.two_side_margin, self.margin)
    }

    /// Candidate sheet sizes in evaluation order: height outer, width inner,
    /// each doubling from the minimum to the maximum texture size.
    pub fn candidate_resolutions(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        let mut h = self.min_texture_size;
        while h <= self.max_texture_size {
            let mut w = self.min_texture_size;
            while w <= self.max_texture_size {
                if !self.only_square || w == h {
                    out.push((w, h));
                }
                w = match w.checked_mul(2) {
                    Some(v) => v,
                    None => break,
                };
            }
            h = match h.checked_mul(2) {
                Some(v) => v,
                None => break,
            };
        }
        out
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn max_texture_size(mut self, v: u32) -> Self {
        self.cfg.max_texture_size = v;
        self
    }
    pub fn min_texture_size(mut self, v: u32) -> Self {
        self.cfg.min_texture_size = v;
        self
    }
    pub fn only_square(mut self, v: bool) -> Self {
        self.cfg.only_square = v;
        self
    }
    pub fn two_side_margin(mut self, v: bool) -> Self {
        self.cfg.two_side_margin = v;
        self
    }
    pub fn margin(mut self, v: u32) -> Self {
        self.cfg.margin = v;
        self
    }
    pub fn algorithms(mut self, v: impl IntoIterator<Item = PackingAlgorithm>) -> Self {
        self.cfg.algorithms = v.into_iter().collect();
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

impl PackerConfig {
    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}
