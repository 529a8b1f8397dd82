//! postertile turns a photograph into a stylized poster.
//!
//! # Pipeline overview
//!
//! 1. **Load**: decode the upload into a straight-alpha RGBA8 [`Bitmap`]
//! 2. **Position**: fit, drag and zoom the image on the canvas ([`ViewportState`])
//! 3. **Place**: freeze the viewport and lay out a [`TileOverlay`] ([`generate_tiles`])
//! 4. **Filter**: desaturate, grain, contrast, tint ([`apply_filter_chain`]), memoized by
//!    [`FilterCache`]
//! 5. **Compose**: background, scaled image and opaque tiles ([`CompositeRenderer`])
//! 6. **Export**: PNG named `output-YYYYMMDD-HHMMSS.png` ([`export_png`])
//!
//! [`PosterSession`] wires these steps to discrete front-end events. All randomness comes from
//! an injected, seedable source, so a fixed seed reproduces grain and tile layout exactly.
#![forbid(unsafe_code)]

mod assets;
mod color;
mod config;
mod export;
mod filter;
mod foundation;
mod pattern;
mod render;
mod session;
mod viewport;

pub use assets::decode::{decode_image, read_image_file};
pub use color::hsl::{Hsl, hsl_to_rgb, hsl_to_rgb8, rgb_to_hsl};
pub use config::PosterConfig;
pub use export::png::{ensure_parent_dir, export_file_name, export_png, local_now, write_png};
pub use filter::chain::{
    FilterParameters, LUMA_WEIGHTS, PARTIAL_DESATURATION, add_grain, apply_contrast,
    apply_filter_chain, desaturate, multiply_tint, reduce_saturation,
};
pub use foundation::core::{Bitmap, Canvas, Point, Rect, Rgb8, Vec2};
pub use foundation::error::{PosterError, PosterResult};
pub use foundation::random::{RandomSource, from_entropy, seeded};
pub use pattern::tiles::{
    CIRCLE_DIAMETER_RATIO, CLUSTER_BONUS, GridAlignment, PlacedTile, TileGridParameters,
    TileOverlay, TileShape, default_palette, generate_tiles,
};
pub use render::cache::FilterCache;
pub use render::composite::{CompositeRenderer, draw_image, fill_tile, over};
pub use session::poster::PosterSession;
pub use viewport::state::{MAX_SCALE_RATIO, MIN_SCALE_RATIO, ViewportState, ZOOM_STEP};
