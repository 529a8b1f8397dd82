use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDateTime;

use crate::{
    assets::decode::decode_image,
    config::PosterConfig,
    export::png::export_png,
    filter::chain::FilterParameters,
    foundation::core::{Bitmap, Canvas, Point, Rgb8},
    foundation::error::{PosterError, PosterResult},
    foundation::random::{self, RandomSource},
    pattern::tiles::{TileGridParameters, TileOverlay, generate_tiles},
    render::{cache::FilterCache, composite::CompositeRenderer},
    viewport::state::ViewportState,
};

/// Interactive poster state driven by discrete front-end events.
///
/// Every parameter mutation goes through a setter that compares against the current value
/// and invalidates the filter cache in the same call, so a render never sees stale output.
#[derive(Debug)]
pub struct PosterSession {
    renderer: CompositeRenderer,
    source: Option<Bitmap>,
    viewport: Option<ViewportState>,
    filter: FilterParameters,
    tiles: TileGridParameters,
    overlay: Option<TileOverlay>,
    cache: FilterCache,
    rng: RandomSource,
}

impl PosterSession {
    pub fn new(config: &PosterConfig) -> PosterResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => random::seeded(seed),
            None => random::from_entropy(),
        };
        Ok(Self {
            renderer: CompositeRenderer::new(config.canvas, config.background),
            source: None,
            viewport: None,
            filter: config.filter.clone(),
            tiles: config.tiles.clone(),
            overlay: None,
            cache: FilterCache::new(),
            rng,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.renderer.canvas
    }

    pub fn background(&self) -> Rgb8 {
        self.renderer.background
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_placed(&self) -> bool {
        self.viewport.as_ref().is_some_and(|vp| vp.placed)
    }

    pub fn viewport(&self) -> Option<&ViewportState> {
        self.viewport.as_ref()
    }

    pub fn filter_params(&self) -> &FilterParameters {
        &self.filter
    }

    pub fn tile_params(&self) -> &TileGridParameters {
        &self.tiles
    }

    pub fn overlay(&self) -> Option<&TileOverlay> {
        self.overlay.as_ref()
    }

    pub fn filter_cache(&self) -> &FilterCache {
        &self.cache
    }

    /// Decode and load an uploaded file. On failure the previous image stays loaded.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> PosterResult<()> {
        let bitmap = decode_image(bytes)?;
        self.load_image(bitmap)
    }

    /// Replace the source image, refit the viewport and drop the overlay.
    pub fn load_image(&mut self, bitmap: Bitmap) -> PosterResult<()> {
        if bitmap.is_empty() {
            return Err(PosterError::input("image has no pixels"));
        }
        self.viewport = Some(ViewportState::fit(
            self.renderer.canvas,
            bitmap.width,
            bitmap.height,
        ));
        tracing::info!(width = bitmap.width, height = bitmap.height, "image loaded");
        self.source = Some(bitmap);
        self.overlay = None;
        self.cache.invalidate();
        Ok(())
    }

    fn viewport_mut(&mut self) -> PosterResult<&mut ViewportState> {
        self.viewport
            .as_mut()
            .ok_or_else(|| PosterError::not_ready("load an image before positioning it"))
    }

    /// Grab the image at `p`. `Ok(false)` when `p` misses the image or it is placed.
    pub fn begin_drag(&mut self, p: Point) -> PosterResult<bool> {
        Ok(self.viewport_mut()?.begin_drag(p))
    }

    pub fn drag_to(&mut self, p: Point) -> PosterResult<bool> {
        Ok(self.viewport_mut()?.drag_to(p))
    }

    pub fn end_drag(&mut self) -> PosterResult<()> {
        self.viewport_mut()?.end_drag();
        Ok(())
    }

    /// One wheel notch, see [`ViewportState::zoom`].
    pub fn zoom(&mut self, delta: f64) -> PosterResult<bool> {
        Ok(self.viewport_mut()?.zoom(delta))
    }

    /// Lay out a fresh overlay and freeze the viewport. Placing again only regenerates tiles.
    pub fn place(&mut self) -> PosterResult<()> {
        if self.viewport.is_none() {
            return Err(PosterError::not_ready("load an image before placing it"));
        }
        let overlay = generate_tiles(self.renderer.canvas, &self.tiles, &mut self.rng)?;
        self.viewport_mut()?.place();
        tracing::info!(tiles = overlay.len(), "image placed");
        self.overlay = Some(overlay);
        Ok(())
    }

    /// Lay out a new overlay with the current parameters.
    pub fn regenerate_tiles(&mut self) -> PosterResult<&TileOverlay> {
        if !self.is_placed() {
            return Err(PosterError::not_ready("place the image before drawing tiles"));
        }
        let overlay = generate_tiles(self.renderer.canvas, &self.tiles, &mut self.rng)?;
        Ok(self.overlay.insert(overlay))
    }

    pub fn set_filter_params(&mut self, params: FilterParameters) -> PosterResult<()> {
        params.validate()?;
        if params != self.filter {
            self.filter = params;
            self.cache.invalidate();
        }
        Ok(())
    }

    /// Flip grayscale mode and return the new value.
    pub fn toggle_grayscale(&mut self) -> bool {
        self.filter.grayscale = !self.filter.grayscale;
        self.cache.invalidate();
        tracing::info!(grayscale = self.filter.grayscale, "grayscale toggled");
        self.filter.grayscale
    }

    /// Replace tile parameters; a placed session gets a new overlay immediately.
    pub fn set_tile_params(&mut self, params: TileGridParameters) -> PosterResult<()> {
        params.validate()?;
        if params == self.tiles {
            return Ok(());
        }
        self.tiles = params;
        if self.is_placed() {
            self.regenerate_tiles()?;
        }
        Ok(())
    }

    /// Compose the current state: background only, raw image while positioning, filtered
    /// image plus overlay once placed.
    pub fn render_preview(&mut self) -> PosterResult<Bitmap> {
        let Some(source) = self.source.as_ref() else {
            return self.renderer.render(None, None, None);
        };
        let viewport = self.viewport.as_ref();
        if !self.is_placed() {
            return self.renderer.render(viewport, Some(source), None);
        }

        let filtered: Arc<Bitmap> = self
            .cache
            .get_or_compute(&self.filter, source, &mut self.rng)?;
        self.renderer
            .render(viewport, Some(filtered.as_ref()), self.overlay.as_ref())
    }

    /// Final composite for export. Requires a placed image.
    pub fn render_export(&mut self) -> PosterResult<Bitmap> {
        if !self.is_placed() {
            return Err(PosterError::not_ready("place the image before exporting"));
        }
        self.render_preview()
    }

    /// Write the export composite to `dir` as `output-YYYYMMDD-HHMMSS.png`.
    pub fn export(&mut self, dir: &Path, at: NaiveDateTime) -> PosterResult<PathBuf> {
        let frame = self.render_export()?;
        export_png(dir, &frame, at)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/poster.rs"]
mod tests;
