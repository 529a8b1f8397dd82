use kurbo::{Circle, Shape};
use rayon::prelude::*;

use crate::{
    foundation::core::{Bitmap, Canvas, Point, Rect, Rgb8, rgba8_len},
    foundation::error::{PosterError, PosterResult},
    pattern::tiles::{PlacedTile, TileOverlay, TileShape},
    viewport::state::ViewportState,
};

pub type StraightRgba8 = [u8; 4];

/// Straight-alpha source-over.
pub fn over(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // Alpha scaled by 255 to keep the channel math in integers.
    let out_a_255 = sa * 255 + da * inv;
    if out_a_255 == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + out_a_255 / 2) / out_a_255).min(255) as u8;
    }
    out[3] = ((out_a_255 + 127) / 255).min(255) as u8;
    out
}

/// Draws background, positioned image and tile overlay into a canvas-sized bitmap.
#[derive(Clone, Copy, Debug)]
pub struct CompositeRenderer {
    pub canvas: Canvas,
    pub background: Rgb8,
}

impl CompositeRenderer {
    pub fn new(canvas: Canvas, background: Rgb8) -> Self {
        Self { canvas, background }
    }

    /// Compose one frame.
    ///
    /// `image` is drawn at `viewport.origin` scaled by `viewport.scale`, see [`draw_image`];
    /// the overlay shapes are painted on top as opaque fills.
    #[tracing::instrument(skip_all, fields(width = self.canvas.width, height = self.canvas.height))]
    pub fn render(
        &self,
        viewport: Option<&ViewportState>,
        image: Option<&Bitmap>,
        overlay: Option<&TileOverlay>,
    ) -> PosterResult<Bitmap> {
        self.canvas.validate()?;
        let mut out = Bitmap::filled(
            self.canvas.width,
            self.canvas.height,
            self.background.opaque(),
        );

        if let (Some(viewport), Some(image)) = (viewport, image) {
            draw_image(&mut out, image, viewport)?;
        }

        if let Some(overlay) = overlay {
            for tile in &overlay.tiles {
                fill_tile(&mut out, tile);
            }
            tracing::debug!(tiles = overlay.len(), "overlay painted");
        }

        Ok(out)
    }
}

/// Blend `bitmap` onto `dst` as placed by `viewport`.
///
/// Only destination pixels whose centers fall inside the image bounds are visited, and each
/// one samples the source bilinearly with edge clamping. Memory use is bounded by the canvas,
/// never by the scaled image size.
pub fn draw_image(dst: &mut Bitmap, bitmap: &Bitmap, viewport: &ViewportState) -> PosterResult<()> {
    if (bitmap.width, bitmap.height) != (viewport.image_width, viewport.image_height) {
        return Err(PosterError::parameter(format!(
            "image is {}x{} but the viewport was fit for {}x{}",
            bitmap.width, bitmap.height, viewport.image_width, viewport.image_height
        )));
    }
    if bitmap.data.len() != rgba8_len(bitmap.width, bitmap.height)?
        || dst.data.len() != rgba8_len(dst.width, dst.height)?
    {
        return Err(PosterError::parameter(
            "bitmap buffer does not match its dimensions",
        ));
    }
    let scale = viewport.scale;
    if bitmap.is_empty() || dst.is_empty() || !scale.is_finite() || scale <= 0.0 {
        return Ok(());
    }

    let bounds = viewport.bounds();
    let (x0, x1) = covered_span(bounds.x0, bounds.x1, dst.width);
    let (y0, y1) = covered_span(bounds.y0, bounds.y1, dst.height);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let columns: Vec<Tap> = (x0..x1)
        .map(|x| Tap::new(f64::from(x), viewport.origin.x, scale, bitmap.width))
        .collect();
    let row_bytes = dst.width as usize * 4;
    let src = &bitmap.data;
    let src_stride = bitmap.width as usize * 4;

    dst.data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .skip(y0 as usize)
        .take((y1 - y0) as usize)
        .for_each(|(y, row)| {
            let ty = Tap::new(y as f64, viewport.origin.y, scale, bitmap.height);
            let top = &src[ty.lo * src_stride..(ty.lo + 1) * src_stride];
            let bottom = &src[ty.hi * src_stride..(ty.hi + 1) * src_stride];
            for (x, tx) in (x0 as usize..).zip(&columns) {
                let mut s = [0u8; 4];
                for (c, out) in s.iter_mut().enumerate() {
                    let a = lerp(top[tx.lo * 4 + c], top[tx.hi * 4 + c], tx.t);
                    let b = lerp(bottom[tx.lo * 4 + c], bottom[tx.hi * 4 + c], tx.t);
                    *out = (a + (b - a) * ty.t).round().clamp(0.0, 255.0) as u8;
                }
                let px = &mut row[x * 4..x * 4 + 4];
                let d = [px[0], px[1], px[2], px[3]];
                px.copy_from_slice(&over(d, s));
            }
        });
    Ok(())
}

/// Half-open range of pixel indices in `[0, len)` whose centers lie in `[lo, hi)`.
fn covered_span(lo: f64, hi: f64, len: u32) -> (u32, u32) {
    let len = f64::from(len);
    // NaN bounds saturate to 0 and yield an empty span.
    let first = (lo - 0.5).ceil().clamp(0.0, len) as u32;
    let end = (hi - 0.5).ceil().clamp(0.0, len) as u32;
    (first, end)
}

/// Two neighboring source indices and the blend weight between them.
#[derive(Clone, Copy, Debug)]
struct Tap {
    lo: usize,
    hi: usize,
    t: f32,
}

impl Tap {
    /// Source taps for destination pixel `dst` along one axis.
    fn new(dst: f64, origin: f64, scale: f64, len: u32) -> Self {
        let max = f64::from(len.saturating_sub(1));
        let u = ((dst + 0.5 - origin) / scale - 0.5).clamp(0.0, max);
        let lo = u.floor();
        Self {
            lo: lo as usize,
            hi: (lo + 1.0).min(max) as usize,
            t: (u - lo) as f32,
        }
    }
}

fn lerp(a: u8, b: u8, t: f32) -> f32 {
    let a = f32::from(a);
    a + (f32::from(b) - a) * t
}

/// Paint one tile with an opaque fill, sampling coverage at pixel centers.
pub fn fill_tile(dst: &mut Bitmap, tile: &PlacedTile) {
    if tile.size_px <= 0.0 || !tile.size_px.is_finite() {
        return;
    }
    let rgba = tile.color.opaque();
    match tile.shape {
        TileShape::Square => {
            let rect = Rect::from_center_size(tile.center, (tile.size_px, tile.size_px));
            fill_shape(dst, &rect, rgba);
        }
        TileShape::Circle => {
            let circle = Circle::new(tile.center, tile.size_px / 2.0);
            fill_shape(dst, &circle, rgba);
        }
    }
}

fn fill_shape(dst: &mut Bitmap, shape: &impl Shape, rgba: [u8; 4]) {
    let bbox = shape.bounding_box();
    let x0 = bbox.x0.floor().max(0.0) as u32;
    let y0 = bbox.y0.floor().max(0.0) as u32;
    let x1 = bbox.x1.ceil().min(f64::from(dst.width)).max(0.0) as u32;
    let y1 = bbox.y1.ceil().min(f64::from(dst.height)).max(0.0) as u32;

    let w = dst.width as usize;
    for y in y0..y1 {
        for x in x0..x1 {
            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if shape.contains(center) {
                let idx = (y as usize * w + x as usize) * 4;
                dst.data[idx..idx + 4].copy_from_slice(&rgba);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
