//! Spritesheet packing engine.
//!
//! - Layouts: Basic binary split tree, MaxRects (BL/BAF/BSSF/BLSF/CP)
//! - Packer: tries every power-of-two resolution × algorithm, keeps the best
//!   sheet, repeats on the leftovers until every frame is placed
//! - Margins and duplicated edge pixels keep bilinear sampling from bleeding
//!   across neighbouring sprites
//!
//! Quick example:
//! ```
//! use std::sync::Arc;
//! use sheet_packer_core::{PackerConfig, SpriteDefinition, pack_sprites};
//!
//! let sprites = vec![
//!     Arc::new(SpriteDefinition::from_sizes("hero", &[(32, 48), (32, 48)])),
//!     Arc::new(SpriteDefinition::from_sizes("coin", &[(16, 16)])),
//! ];
//! let result = pack_sprites(&sprites, PackerConfig::default());
//! assert!(result.success());
//! let (sheet, bounds) = result.placement(0, 1).unwrap();
//! println!("hero#1 -> sheet {sheet} at {:?}", bounds.sprite_rect);
//! ```

pub mod bounds;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod packer;
pub mod result;

pub use bounds::*;
pub use config::*;
pub use error::*;
pub use layout::SheetLayout;
pub use model::*;
pub use packer::*;
pub use result::*;

/// Convenience prelude for common types and functions.
/// Importing `sheet_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::bounds::BoundsRect;
    pub use crate::config::{PackerConfig, PackerConfigBuilder, PackingAlgorithm};
    pub use crate::layout::SheetLayout;
    pub use crate::model::{FrameKey, PackStats, Rect, Size, SpriteDefinition};
    pub use crate::result::{PackResult, SpriteIndexedData};
    pub use crate::{SpritePacker, pack_sprites};
}
