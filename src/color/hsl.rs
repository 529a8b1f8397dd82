//! RGB <-> HSL conversion.
//!
//! All three HSL components are normalized to `[0, 1]` (hue as a fraction of a full turn).
//! RGB enters as 8-bit channels and leaves as `0.0..=255.0` floats so callers choose the rounding.

/// HSL color with every component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Convert 8-bit RGB to HSL.
#[inline]
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    // Achromatic: exact equality is safe, the inputs are quantized.
    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

/// Convert HSL back to RGB in `0.0..=255.0`.
#[inline]
pub fn hsl_to_rgb(hsl: Hsl) -> [f32; 3] {
    let Hsl { h, s, l } = hsl;

    if s == 0.0 {
        let v = l * 255.0;
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_rgb(p, q, h) * 255.0,
        hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0,
    ]
}

/// [`hsl_to_rgb`] rounded and clamped to 8-bit channels.
#[inline]
pub fn hsl_to_rgb8(hsl: Hsl) -> [u8; 3] {
    hsl_to_rgb(hsl).map(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[inline]
fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/hsl.rs"]
mod tests;
