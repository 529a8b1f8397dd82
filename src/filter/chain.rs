use rand::Rng;
use rayon::prelude::*;

use crate::{
    color::hsl::{hsl_to_rgb8, rgb_to_hsl},
    foundation::core::{Bitmap, Rgb8},
    foundation::error::{PosterError, PosterResult},
};

/// Rec. 709 luma weights used by the grayscale stage.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Saturation removed when grayscale is off.
pub const PARTIAL_DESATURATION: f32 = 0.5;

/// Parameters of the poster filter chain.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterParameters {
    /// Full luma grayscale when true, half saturation otherwise.
    pub grayscale: bool,
    /// Contrast factor around mid-gray, `1.0` is identity.
    pub contrast: f32,
    /// Maximum per-channel grain magnitude.
    pub grain: u8,
    /// Multiply color.
    pub tint: Rgb8,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            grayscale: true,
            contrast: 1.3,
            grain: 15,
            tint: Rgb8::new(0xf6, 0xf2, 0xdf),
        }
    }
}

impl FilterParameters {
    pub fn validate(&self) -> PosterResult<()> {
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(PosterError::parameter(format!(
                "contrast must be finite and > 0, got {}",
                self.contrast
            )));
        }
        Ok(())
    }
}

/// Run the full chain on a copy of `bitmap`.
///
/// Stage order is fixed: desaturation, grain, contrast, tint. Alpha is never touched.
/// Grain draws from `rng` in row-major order, so the result depends only on the
/// generator state, not on how the parallel stages are scheduled.
#[tracing::instrument(skip(bitmap, rng), fields(width = bitmap.width, height = bitmap.height))]
pub fn apply_filter_chain<R: Rng + ?Sized>(
    bitmap: &Bitmap,
    params: &FilterParameters,
    rng: &mut R,
) -> PosterResult<Bitmap> {
    params.validate()?;
    if bitmap.is_empty() {
        return Ok(bitmap.clone());
    }

    let mut scratch = bitmap.data.clone();

    if params.grayscale {
        desaturate(&mut scratch)?;
    } else {
        reduce_saturation(&mut scratch, PARTIAL_DESATURATION)?;
    }
    add_grain(&mut scratch, params.grain, rng)?;
    apply_contrast(&mut scratch, params.contrast)?;
    multiply_tint(&mut scratch, params.tint)?;

    tracing::debug!(pixels = scratch.len() / 4, "filter chain complete");
    Bitmap::new(bitmap.width, bitmap.height, scratch)
}

/// Replace RGB with its Rec. 709 luma.
pub fn desaturate(rgba: &mut [u8]) -> PosterResult<()> {
    check_rgba8(rgba, "desaturate")?;
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        let y = LUMA_WEIGHTS[0] * f32::from(px[0])
            + LUMA_WEIGHTS[1] * f32::from(px[1])
            + LUMA_WEIGHTS[2] * f32::from(px[2]);
        let y = y.round().clamp(0.0, 255.0) as u8;
        px[0] = y;
        px[1] = y;
        px[2] = y;
    });
    Ok(())
}

/// Scale HSL saturation by `1 - amount`.
pub fn reduce_saturation(rgba: &mut [u8], amount: f32) -> PosterResult<()> {
    check_rgba8(rgba, "reduce_saturation")?;
    if !amount.is_finite() || !(0.0..=1.0).contains(&amount) {
        return Err(PosterError::parameter(
            "saturation reduction must be within [0, 1]",
        ));
    }
    let keep = 1.0 - amount;
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        let mut hsl = rgb_to_hsl(px[0], px[1], px[2]);
        hsl.s *= keep;
        let [r, g, b] = hsl_to_rgb8(hsl);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    });
    Ok(())
}

/// Add independent uniform noise in `[-amplitude, amplitude]` to each color channel.
pub fn add_grain<R: Rng + ?Sized>(rgba: &mut [u8], amplitude: u8, rng: &mut R) -> PosterResult<()> {
    check_rgba8(rgba, "add_grain")?;
    if amplitude == 0 {
        return Ok(());
    }
    let a = i16::from(amplitude);
    for px in rgba.chunks_exact_mut(4) {
        for c in px.iter_mut().take(3) {
            let noise: i16 = rng.gen_range(-a..=a);
            *c = (i16::from(*c) + noise).clamp(0, 255) as u8;
        }
    }
    Ok(())
}

/// Stretch each channel around mid-gray by `factor`.
pub fn apply_contrast(rgba: &mut [u8], factor: f32) -> PosterResult<()> {
    check_rgba8(rgba, "apply_contrast")?;
    if !factor.is_finite() || factor <= 0.0 {
        return Err(PosterError::parameter("contrast must be finite and > 0"));
    }
    let lut = contrast_lut(factor);
    apply_lut(rgba, &lut, &lut, &lut);
    Ok(())
}

/// Multiply blend against `tint`: `out = in * tint / 255`.
pub fn multiply_tint(rgba: &mut [u8], tint: Rgb8) -> PosterResult<()> {
    check_rgba8(rgba, "multiply_tint")?;
    let [r, g, b] = tint.channels().map(multiply_lut);
    apply_lut(rgba, &r, &g, &b);
    Ok(())
}

pub(crate) fn contrast_value(v: u8, factor: f32) -> u8 {
    let n = f32::from(v) / 255.0;
    let out = ((n - 0.5) * factor + 0.5) * 255.0;
    out.round().clamp(0.0, 255.0) as u8
}

fn contrast_lut(factor: f32) -> [u8; 256] {
    std::array::from_fn(|i| contrast_value(i as u8, factor))
}

fn multiply_lut(tint: u8) -> [u8; 256] {
    std::array::from_fn(|i| mul_div255(i as u16, u16::from(tint)))
}

fn apply_lut(rgba: &mut [u8], r: &[u8; 256], g: &[u8; 256], b: &[u8; 256]) {
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        px[0] = r[px[0] as usize];
        px[1] = g[px[1] as usize];
        px[2] = b[px[2] as usize];
    });
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn check_rgba8(rgba: &[u8], stage: &str) -> PosterResult<()> {
    if !rgba.len().is_multiple_of(4) {
        return Err(PosterError::parameter(format!(
            "{stage} expects an rgba8 buffer (length multiple of 4)"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/filter/chain.rs"]
mod tests;
