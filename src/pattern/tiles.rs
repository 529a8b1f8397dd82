use rand::Rng;

use crate::{
    foundation::core::{Canvas, Point, Rgb8},
    foundation::error::{PosterError, PosterResult},
};

/// Extra placement probability for a cell whose left or upper neighbor was placed.
pub const CLUSTER_BONUS: f64 = 0.2;

/// Circles are drawn slightly smaller than squares of the same cell.
pub const CIRCLE_DIAMETER_RATIO: f64 = 0.9;

/// Shape drawn for each placed tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileShape {
    #[default]
    Square,
    Circle,
}

/// Vertical anchoring of the grid when rows overflow the canvas height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridAlignment {
    /// First row starts at y = 0; all overflow falls off the bottom edge.
    Top,
    /// Overflow is split between top and bottom edges.
    #[default]
    Centered,
}

/// Parameters of the tile overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TileGridParameters {
    /// Cell edge length in pixels.
    pub tile_size: u32,
    /// Base placement probability per cell, in `[0, 1]`.
    pub density: f64,
    /// Maximum size jitter as a percentage of `tile_size`.
    pub variation_percent: u32,
    /// Raise placement probability next to already placed cells.
    pub clustering: bool,
    pub shape: TileShape,
    /// Colors picked uniformly for placed tiles.
    pub palette: Vec<Rgb8>,
    pub alignment: GridAlignment,
}

impl Default for TileGridParameters {
    fn default() -> Self {
        Self {
            tile_size: 100,
            density: 0.1,
            variation_percent: 0,
            clustering: false,
            shape: TileShape::Square,
            palette: default_palette(),
            alignment: GridAlignment::Centered,
        }
    }
}

/// Red, green, blue, yellow and the paper background.
pub fn default_palette() -> Vec<Rgb8> {
    vec![
        Rgb8::new(0xef, 0x3f, 0x35),
        Rgb8::new(0x32, 0x97, 0x58),
        Rgb8::new(0x33, 0x56, 0xa3),
        Rgb8::new(0xfa, 0xe2, 0x5e),
        Rgb8::new(0xf6, 0xf2, 0xdf),
    ]
}

impl TileGridParameters {
    pub fn validate(&self) -> PosterResult<()> {
        if self.tile_size == 0 {
            return Err(PosterError::parameter("tile_size must be > 0"));
        }
        if !self.density.is_finite() || !(0.0..=1.0).contains(&self.density) {
            return Err(PosterError::parameter(format!(
                "density must be within [0, 1], got {}",
                self.density
            )));
        }
        if self.palette.is_empty() {
            return Err(PosterError::parameter("palette must contain at least one color"));
        }
        Ok(())
    }
}

/// One placed shape. `center` and `size_px` are in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacedTile {
    pub grid_x: u32,
    pub grid_y: u32,
    pub center: Point,
    /// Square side or circle diameter.
    pub size_px: f64,
    pub color: Rgb8,
    pub shape: TileShape,
}

/// Sparse overlay produced by [`generate_tiles`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TileOverlay {
    pub cols: u32,
    pub rows: u32,
    pub tiles: Vec<PlacedTile>,
}

impl TileOverlay {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_placed(&self, grid_x: u32, grid_y: u32) -> bool {
        self.tiles
            .iter()
            .any(|t| t.grid_x == grid_x && t.grid_y == grid_y)
    }
}

/// Lay out tiles over `canvas`.
///
/// Cells are visited row by row, left to right. With clustering on, a cell whose left or
/// upper neighbor was placed gets [`CLUSTER_BONUS`] on top of `density`; right and lower
/// neighbors are not consulted, so clusters grow toward the bottom-right.
#[tracing::instrument(skip(params, rng), fields(tile_size = params.tile_size, density = params.density))]
pub fn generate_tiles<R: Rng + ?Sized>(
    canvas: Canvas,
    params: &TileGridParameters,
    rng: &mut R,
) -> PosterResult<TileOverlay> {
    canvas.validate()?;
    params.validate()?;

    let tile = params.tile_size;
    let cols = canvas.width.div_ceil(tile);
    let rows = canvas.height.div_ceil(tile);
    let tile_f = f64::from(tile);
    let offset_y = match params.alignment {
        GridAlignment::Top => 0.0,
        GridAlignment::Centered => (f64::from(canvas.height) - f64::from(rows) * tile_f) / 2.0,
    };
    let max_offset = tile_f * f64::from(params.variation_percent) / 100.0;

    let mut placed = vec![false; (cols as usize) * (rows as usize)];
    let mut tiles = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let idx = (y as usize) * (cols as usize) + (x as usize);
            let mut p = params.density;
            if params.clustering {
                let left = x > 0 && placed[idx - 1];
                let up = y > 0 && placed[idx - cols as usize];
                if left || up {
                    p += CLUSTER_BONUS;
                }
            }
            if rng.r#gen::<f64>() >= p {
                continue;
            }
            placed[idx] = true;

            let color = params.palette[rng.gen_range(0..params.palette.len())];
            let size_offset = if max_offset > 0.0 {
                rng.gen_range(-max_offset..=max_offset)
            } else {
                0.0
            };
            let size = (tile_f + size_offset).max(0.0);
            let size_px = match params.shape {
                TileShape::Square => size,
                TileShape::Circle => size * CIRCLE_DIAMETER_RATIO,
            };
            let center = Point::new(
                f64::from(x) * tile_f + tile_f / 2.0,
                offset_y + f64::from(y) * tile_f + tile_f / 2.0,
            );

            tiles.push(PlacedTile {
                grid_x: x,
                grid_y: y,
                center,
                size_px,
                color,
                shape: params.shape,
            });
        }
    }

    tracing::debug!(cols, rows, placed = tiles.len(), "tile overlay generated");
    Ok(TileOverlay { cols, rows, tiles })
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/tiles.rs"]
mod tests;
